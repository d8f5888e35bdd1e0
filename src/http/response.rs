//! HTTP/1.1 response parsing.
//!
//! All parsing works on the fully decoded response text. The header block
//! ends at the *first* `\r\n\r\n`; everything after it is body, even when
//! the body itself contains the same sequence.

use std::fmt;
use std::vec;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

/// Header/body delimiter.
pub const SEPARATOR: &str = "\r\n\r\n";

/// Errors that can occur while parsing a raw HTTP/1.1 response.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response has no header/body separator")]
    MissingSeparator,

    #[error("invalid status code in status line {line:?}")]
    StatusCode { line: String },

    #[error("malformed header block: {0}")]
    Header(#[from] httparse::Error),
}

/// Splits `data` at the first separator into `(head, body)`.
pub(crate) fn split_head(data: &str) -> Result<(&str, &str), ParseError> {
    data.split_once(SEPARATOR)
        .ok_or(ParseError::MissingSeparator)
}

/// Returns the status code: the second whitespace-separated token.
///
/// # Examples
///
/// ```
/// use stix_req::http::get_code;
///
/// assert_eq!(get_code("HTTP/1.1 404 Not Found\r\n\r\n").unwrap(), 404);
/// assert!(get_code("garbage").is_err());
/// ```
pub fn get_code(data: &str) -> Result<u16, ParseError> {
    data.split_whitespace()
        .nth(1)
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| ParseError::StatusCode {
            line: data.lines().next().unwrap_or_default().to_owned(),
        })
}

/// Returns the header lines of `data`, excluding the status line.
///
/// # Errors
///
/// [`ParseError::MissingSeparator`] if the text has no `\r\n\r\n`.
pub fn get_headers(data: &str) -> Result<HeaderLines, ParseError> {
    let (head, _) = split_head(data)?;
    let lines: Vec<Bytes> = head
        .split("\r\n")
        .skip(1)
        .map(|line| Bytes::copy_from_slice(line.as_bytes()))
        .collect();
    Ok(HeaderLines {
        inner: lines.into_iter(),
    })
}

/// Returns everything after the first `\r\n\r\n`.
pub fn get_body(data: &str) -> Result<String, ParseError> {
    let (_, body) = split_head(data)?;
    Ok(body.to_owned())
}

/// The raw header lines of a response, as bytes, in wire order.
///
/// Single pass: the iterator is consumed as it is read and cannot be
/// restarted. Call [`get_headers`] again for a fresh one.
#[derive(Debug)]
pub struct HeaderLines {
    inner: vec::IntoIter<Bytes>,
}

impl Iterator for HeaderLines {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for HeaderLines {}

impl std::iter::FusedIterator for HeaderLines {}

/// The result of one request: status code and body text.
///
/// # Examples
///
/// ```
/// use stix_req::http::HttpResponse;
///
/// let res = HttpResponse::parse("HTTP/1.1 200 OK\r\nHeader: x\r\n\r\nHello").unwrap();
/// assert_eq!(res.code(), 200);
/// assert_eq!(res.body(), "Hello");
/// assert_eq!(res.to_string(), "200\nHello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpResponse {
    code: u16,
    body: String,
}

impl HttpResponse {
    pub fn new(code: u16, body: impl Into<String>) -> Self {
        Self {
            code,
            body: body.into(),
        }
    }

    /// Parses the status code and body out of raw response text.
    pub fn parse(data: &str) -> Result<Self, ParseError> {
        let code = get_code(data)?;
        let body = get_body(data)?;
        Ok(Self { code, body })
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consumes the response, returning the body.
    pub fn into_body(self) -> String {
        self.body
    }

    /// Returns `true` for 2xx codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.code, self.body)
    }
}
