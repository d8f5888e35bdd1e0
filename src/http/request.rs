//! HTTP/1.1 request serialization.
//!
//! Requests are written with a fixed header set in a fixed order and always
//! carry `Connection: close`: the client reads the response until the server
//! hangs up, so it never negotiates a persistent connection.

use bytes::{BufMut, BytesMut};

use super::form::{FormArgs, get_argstr};
use super::url::Target;
use super::Method;

/// Default value of the `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = "stix_req/1.0";

/// A GET or POST request, ready to be serialized and sent.
///
/// # Examples
///
/// ```
/// use stix_req::http::{Method, Request, Target};
///
/// let target = Target::parse("http://example.com/hello").unwrap();
/// let bytes = Request::new(Method::Get, &target, None).into_bytes();
///
/// assert_eq!(
///     &bytes[..],
///     b"GET /hello HTTP/1.1\r\n\
///       Host: example.com\r\n\
///       User-Agent: stix_req/1.0\r\n\
///       Accept: */*\r\n\
///       Content-Length: 0\r\n\
///       Connection: close\r\n\
///       \r\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    host: String,
    path: String,
    user_agent: String,
    body: String,
    content_length: usize,
}

impl Request {
    /// Creates a request for `target`, encoding `args` as the body.
    pub fn new(method: Method, target: &Target, args: Option<&FormArgs>) -> Self {
        let (body, content_length) = get_argstr(args);
        Self {
            method,
            host: target.host.clone(),
            path: target.path.clone(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            body,
            content_length,
        }
    }

    /// Overrides the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The encoded argument string sent after the blank line.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The value advertised in `Content-Length`.
    pub fn content_length(&self) -> usize {
        self.content_length
    }

    /// Serializes the request into a `BytesMut` buffer using HTTP/1.1 wire format.
    ///
    /// Header order is fixed: `Host`, `User-Agent`, `Accept`, then for POST
    /// `Accept-Language` and `Content-Type`, then `Content-Length` and
    /// `Connection: close`.
    pub fn into_bytes(self) -> BytesMut {
        let estimated_size = 256 + self.path.len() + self.host.len() + self.body.len();
        let mut buf = BytesMut::with_capacity(estimated_size);

        // Request line
        buf.put(format!("{} {} HTTP/1.1\r\n", self.method, self.path).as_bytes());

        // Headers
        buf.put(format!("Host: {}\r\n", self.host).as_bytes());
        buf.put(format!("User-Agent: {}\r\n", self.user_agent).as_bytes());
        buf.put(&b"Accept: */*\r\n"[..]);
        if self.method == Method::Post {
            buf.put(&b"Accept-Language: en-US,en;q=0.9\r\n"[..]);
            buf.put(&b"Content-Type: application/x-www-form-urlencoded\r\n"[..]);
        }
        buf.put(format!("Content-Length: {}\r\n", self.content_length).as_bytes());
        buf.put(&b"Connection: close\r\n"[..]);

        // Header/body separator
        buf.put(&b"\r\n"[..]);

        // Body
        buf.put(self.body.as_bytes());

        buf
    }
}
