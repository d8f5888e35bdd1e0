//! End-to-end exchanges against a fake HTTP server.
//!
//! Each test binds a one-shot server on `127.0.0.1:0`, runs it on a Tokio
//! current-thread runtime in a background thread, and drives the blocking
//! client against it. The server records the raw request bytes it received
//! so the wire format can be checked byte for byte.

use std::net::SocketAddr;
use std::thread::{self, JoinHandle};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use stix_req::http::{self, ParseError};
use stix_req::{ClientConfig, ClientError, FormArgs, HttpClient, HttpResponse, Method};

/// Starts a server that answers exactly one connection with `response`,
/// then closes it. Joining the handle yields the request bytes received.
fn serve_once(response: Vec<u8>) -> (SocketAddr, JoinHandle<Vec<u8>>) {
    serve_once_with_body(response, 0)
}

/// Like [`serve_once`], for requests carrying `body_len` bytes of arguments.
///
/// The advertised `Content-Length` does not match the bytes actually sent
/// once there is more than one argument, so the server is told the real
/// body size instead of trusting the header.
fn serve_once_with_body(response: Vec<u8>, body_len: usize) -> (SocketAddr, JoinHandle<Vec<u8>>) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let handle = thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = TcpListener::from_std(std_listener).unwrap();
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream, body_len).await;
            stream.write_all(&response).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        })
    });

    (addr, handle)
}

/// Reads the head and then exactly `body_len` further bytes.
async fn read_request(stream: &mut TcpStream, body_len: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 512];
    loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            if buf.len() >= pos + 4 + body_len {
                return buf;
            }
        }
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return buf;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

const HELLO: &[u8] = b"HTTP/1.1 200 OK\r\nHeader: x\r\n\r\nHello";

#[test]
fn get_returns_code_and_body() {
    let (addr, server) = serve_once(HELLO.to_vec());
    let res = HttpClient::new().get(&url(addr, "/"), None).unwrap();
    server.join().unwrap();

    assert_eq!(res, HttpResponse::new(200, "Hello"));
}

#[test]
fn get_sends_exact_wire_bytes() {
    let (addr, server) = serve_once(HELLO.to_vec());
    HttpClient::new()
        .get(&url(addr, "/path/to?ignored=1"), None)
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(
        String::from_utf8(request).unwrap(),
        "GET /path/to HTTP/1.1\r\n\
         Host: 127.0.0.1\r\n\
         User-Agent: stix_req/1.0\r\n\
         Accept: */*\r\n\
         Content-Length: 0\r\n\
         Connection: close\r\n\
         \r\n"
    );
}

#[test]
fn post_sends_form_body_with_advertised_length() {
    let (addr, server) = serve_once_with_body(b"HTTP/1.1 201 Created\r\n\r\nmade".to_vec(), 7);
    let args: FormArgs = [("a", "1"), ("b", "2")].into_iter().collect();
    let res = HttpClient::new().post(&url(addr, "/form"), Some(&args)).unwrap();
    let request = server.join().unwrap();

    assert_eq!(res.code(), 201);
    assert_eq!(res.body(), "made");
    assert_eq!(
        String::from_utf8(request).unwrap(),
        "POST /form HTTP/1.1\r\n\
         Host: 127.0.0.1\r\n\
         User-Agent: stix_req/1.0\r\n\
         Accept: */*\r\n\
         Accept-Language: en-US,en;q=0.9\r\n\
         Content-Type: application/x-www-form-urlencoded\r\n\
         Content-Length: 6\r\n\
         Connection: close\r\n\
         \r\n\
         a=1&b=2"
    );
}

#[test]
fn get_carries_args_in_body() {
    let (addr, server) = serve_once_with_body(HELLO.to_vec(), 6);
    let args: FormArgs = [("q", "rust")].into_iter().collect();
    HttpClient::new().get(&url(addr, "/search"), Some(&args)).unwrap();
    let request = String::from_utf8(server.join().unwrap()).unwrap();

    assert!(request.starts_with("GET /search HTTP/1.1\r\n"));
    assert!(request.contains("Content-Length: 6\r\n"));
    assert!(request.ends_with("\r\n\r\nq=rust"));
}

#[test]
fn command_post_takes_post_path() {
    let (addr, server) = serve_once(HELLO.to_vec());
    HttpClient::new()
        .command(&url(addr, "/"), "POST", None)
        .unwrap();
    let request = String::from_utf8(server.join().unwrap()).unwrap();
    assert!(request.starts_with("POST / HTTP/1.1\r\n"));
}

#[test]
fn command_anything_else_takes_get_path() {
    for command in ["GET", "DELETE", "post", ""] {
        let (addr, server) = serve_once(HELLO.to_vec());
        HttpClient::new()
            .command(&url(addr, "/"), command, None)
            .unwrap();
        let request = String::from_utf8(server.join().unwrap()).unwrap();
        assert!(request.starts_with("GET / HTTP/1.1\r\n"), "{command:?}");
    }
}

#[test]
fn body_keeps_embedded_separator() {
    let (addr, server) = serve_once(b"HTTP/1.1 200 OK\r\n\r\nline\r\n\r\nmore".to_vec());
    let res = HttpClient::new().get(&url(addr, "/"), None).unwrap();
    server.join().unwrap();
    assert_eq!(res.body(), "line\r\n\r\nmore");
}

#[test]
fn large_response_spans_many_reads() {
    let body = "0123456789".repeat(2_000);
    let raw = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{body}", body.len());
    let (addr, server) = serve_once(raw.into_bytes());
    let res = HttpClient::new().get(&url(addr, "/big"), None).unwrap();
    server.join().unwrap();
    assert_eq!(res.body().len(), 20_000);
    assert_eq!(res.body(), body);
}

#[test]
fn non_utf8_response_is_a_decode_error() {
    let mut raw = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
    raw.extend_from_slice(&[0xc3, 0x28]);
    let (addr, server) = serve_once(raw);
    let err = HttpClient::new().get(&url(addr, "/"), None).unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[test]
fn response_without_separator_is_a_parse_error() {
    let (addr, server) = serve_once(b"HTTP/1.1 200 OK\r\nHeader: x\r\n".to_vec());
    let err = HttpClient::new().get(&url(addr, "/"), None).unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, ClientError::Parse(ParseError::MissingSeparator)));
}

#[test]
fn configured_user_agent_is_sent() {
    let (addr, server) = serve_once(HELLO.to_vec());
    let client = HttpClient::with_config(ClientConfig::default().user_agent("tester/2.0"));
    client.get(&url(addr, "/"), None).unwrap();
    let request = String::from_utf8(server.join().unwrap()).unwrap();
    assert!(request.contains("\r\nUser-Agent: tester/2.0\r\n"));
}

#[test]
fn exchange_exposes_header_lines() {
    let (addr, server) = serve_once(b"HTTP/1.1 200 OK\r\nA: 1\r\nB: 2\r\n\r\nbody".to_vec());
    let raw = HttpClient::new()
        .exchange(Method::Get, &url(addr, "/"), None)
        .unwrap();
    server.join().unwrap();

    let lines: Vec<_> = http::get_headers(&raw).unwrap().collect();
    assert_eq!(lines, vec![&b"A: 1"[..], &b"B: 2"[..]]);
    let fields: Vec<_> = http::Headers::parse_block(&raw)
        .unwrap()
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    assert_eq!(fields, vec!["A=1", "B=2"]);
}

#[test]
fn request_line_keeps_path_as_written() {
    let (addr, server) = serve_once(HELLO.to_vec());
    HttpClient::new()
        .get(&url(addr, "/a/../b/./c?x=1"), None)
        .unwrap();
    let request = String::from_utf8(server.join().unwrap()).unwrap();
    assert!(request.starts_with("GET /a/../b/./c HTTP/1.1\r\n"), "{request:?}");
}

#[test]
fn one_client_serves_parallel_calls() {
    let client = HttpClient::new();
    let servers: Vec<_> = (0..4)
        .map(|i| serve_once(format!("HTTP/1.1 200 OK\r\n\r\nserver-{i}").into_bytes()))
        .collect();

    thread::scope(|scope| {
        let calls: Vec<_> = servers
            .iter()
            .map(|(addr, _)| {
                let client = &client;
                let target = url(*addr, "/");
                scope.spawn(move || client.get(&target, None).unwrap())
            })
            .collect();
        for (i, call) in calls.into_iter().enumerate() {
            assert_eq!(call.join().unwrap().body(), format!("server-{i}"));
        }
    });

    for (_, server) in servers {
        server.join().unwrap();
    }
}
