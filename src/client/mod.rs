//! Blocking HTTP/1.1 client over a raw `TcpStream`.
//!
//! Every call performs one complete exchange: connect, send the request,
//! read until the server closes the connection, close, parse. The socket
//! lives only for the duration of that call, so a single [`HttpClient`] can
//! be shared freely between threads.
//!
//! There is no timeout, no redirect handling and no keep-alive. Responses
//! that use chunked transfer-encoding are returned with the chunk framing
//! still in the body.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::string::FromUtf8Error;

use bytes::BytesMut;
use thiserror::Error;
use tracing::{debug, trace};

use crate::http::{FormArgs, HttpResponse, Method, ParseError, Request, Target, UrlError};

pub mod config;

pub use config::ClientConfig;

/// Errors produced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("response is not valid UTF-8: {0}")]
    Decode(#[from] FromUtf8Error),

    #[error("response parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("response exceeds the configured limit of {limit} bytes")]
    ResponseTooLarge { limit: usize },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// A minimal HTTP/1.1 client.
///
/// # Examples
///
/// ```rust,no_run
/// use stix_req::{FormArgs, HttpClient};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = HttpClient::new();
///
///     let res = client.get("http://example.com/", None)?;
///     println!("{} {}", res.code(), res.body().len());
///
///     let args: FormArgs = [("name", "stix")].into_iter().collect();
///     let res = client.command("http://example.com/form", "POST", Some(&args))?;
///     println!("{res}");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    /// Creates a client with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a GET request, carrying `args` as the body.
    pub fn get(&self, url: &str, args: Option<&FormArgs>) -> Result<HttpResponse> {
        self.request(Method::Get, url, args)
    }

    /// Sends a form-encoded POST request.
    pub fn post(&self, url: &str, args: Option<&FormArgs>) -> Result<HttpResponse> {
        self.request(Method::Post, url, args)
    }

    /// Dispatches on `command`: `"POST"` posts, anything else gets.
    pub fn command(&self, url: &str, command: &str, args: Option<&FormArgs>) -> Result<HttpResponse> {
        match Method::from_command(command) {
            Method::Post => self.post(url, args),
            Method::Get => self.get(url, args),
        }
    }

    /// Performs one exchange and parses the code and body.
    pub fn request(&self, method: Method, url: &str, args: Option<&FormArgs>) -> Result<HttpResponse> {
        let raw = self.exchange(method, url, args)?;
        Ok(HttpResponse::parse(&raw)?)
    }

    /// Performs one exchange and returns the full decoded response text,
    /// status line and headers included.
    ///
    /// The socket is closed before this returns, on success and on failure.
    pub fn exchange(&self, method: Method, url: &str, args: Option<&FormArgs>) -> Result<String> {
        let target = Target::parse(url)?;
        let request = Request::new(method, &target, args).user_agent(self.config.user_agent.as_str());

        debug!(
            method = %method,
            host = %target.host,
            port = target.port,
            path = %target.path,
            content_length = request.content_length(),
            "sending request"
        );

        let mut stream = self.connect(&target.host, target.port)?;
        let result = self
            .send_all(&mut stream, &request.into_bytes())
            .and_then(|()| self.recv_all(&mut stream));
        close(stream);

        let raw = result?;
        debug!(host = %target.host, bytes = raw.len(), "response received");
        Ok(raw)
    }

    /// Opens a blocking TCP connection to `(host, port)`.
    pub fn connect(&self, host: &str, port: u16) -> Result<TcpStream> {
        let stream = TcpStream::connect((host, port)).map_err(|source| ClientError::Connect {
            host: host.to_owned(),
            port,
            source,
        })?;
        trace!(host = %host, port, "connected");
        Ok(stream)
    }

    /// Writes all of `data`, retrying partial writes, then flushes.
    pub fn send_all<W: Write>(&self, writer: &mut W, data: &[u8]) -> Result<()> {
        writer.write_all(data)?;
        writer.flush()?;
        trace!(bytes = data.len(), "request sent");
        Ok(())
    }

    /// Reads until end-of-stream and decodes the bytes as UTF-8.
    ///
    /// Each read asks for at most [`ClientConfig::read_chunk_size`] bytes. The
    /// loop ends only when a read returns zero bytes.
    pub fn recv_all<R: Read>(&self, reader: &mut R) -> Result<String> {
        let mut chunk = vec![0u8; self.config.read_chunk_size.max(1)];
        let mut buf = BytesMut::with_capacity(chunk.len());

        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            buf.extend_from_slice(&chunk[..n]);
            trace!(read = n, total = buf.len(), "received chunk");

            if let Some(limit) = self.config.max_response_bytes {
                if buf.len() > limit {
                    return Err(ClientError::ResponseTooLarge { limit });
                }
            }
        }

        // Hands the allocation over instead of copying it.
        Ok(String::from_utf8(Vec::from(buf))?)
    }
}

/// Shuts the stream down and drops it.
fn close(stream: TcpStream) {
    if let Err(e) = stream.shutdown(Shutdown::Both) {
        // The peer usually hung up first.
        debug!(error = %e, "socket shutdown failed");
    }
}
