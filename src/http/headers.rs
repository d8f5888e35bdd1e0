//! Structured access to the response header block.
//!
//! HTTP header fields are order-preserving and may repeat ([RFC 9110 §5]).

use super::response::{ParseError, split_head};

/// The header fields of a response, in the order the server sent them.
///
/// Repeated names are kept as separate entries.
///
/// # Examples
///
/// ```
/// use stix_req::http::Headers;
///
/// let raw = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n<p>hi</p>";
/// let headers = Headers::parse_block(raw).unwrap();
///
/// let fields: Vec<_> = headers.iter().collect();
/// assert_eq!(
///     fields,
///     vec![("Content-Type", "text/html"), ("Set-Cookie", "a=1"), ("Set-Cookie", "b=2")]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    /// Parses the header block of a raw response.
    ///
    /// The status line is skipped and parsing stops at the first blank line;
    /// the body is never inspected. There is no limit on the number of fields.
    ///
    /// # Errors
    ///
    /// - [`ParseError::MissingSeparator`] if the text has no `\r\n\r\n`.
    /// - [`ParseError::Header`] if a header line is malformed.
    pub fn parse_block(data: &str) -> Result<Self, ParseError> {
        let (head, _) = split_head(data)?;

        // Field lines start after the status line. Re-attach the blank line
        // so httparse sees a complete block.
        let sep = head.len();
        let fields_start = head.find("\r\n").map_or(sep + 2, |pos| pos + 2);
        let block = &data[fields_start..sep + 4];

        // Every field ends in a newline, so this is enough slots for all of them.
        let slots = block.bytes().filter(|&b| b == b'\n').count();
        let mut raw = vec![httparse::EMPTY_HEADER; slots];
        let parsed = match httparse::parse_headers(block.as_bytes(), &mut raw)? {
            httparse::Status::Complete((_, parsed)) => parsed,
            httparse::Status::Partial => return Err(ParseError::MissingSeparator),
        };

        // Values are slices of a `&str`, so the conversion never replaces anything.
        let inner = parsed
            .iter()
            .map(|header| {
                (
                    header.name.to_owned(),
                    String::from_utf8_lossy(header.value).into_owned(),
                )
            })
            .collect();
        Ok(Self { inner })
    }

    /// Returns an iterator over all `(name, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
