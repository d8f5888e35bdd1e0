//! HTTP/1.1 protocol types, request serialization and response parsing.
//!
//! This module provides the client-side primitives:
//! [`Method`], [`FormArgs`], [`Target`], [`Request`], [`Headers`] and
//! [`HttpResponse`], plus the free parsing functions used on raw response
//! text.

use std::fmt;

pub mod form;
pub mod headers;
pub mod request;
pub mod response;
pub mod url;

pub use form::{FormArgs, get_argstr};
pub use headers::Headers;
pub use request::Request;
pub use response::{HeaderLines, HttpResponse, ParseError, get_body, get_code, get_headers};
pub use self::url::{Target, UrlError, get_host_port, get_path};

/// An HTTP request method supported by the client.
///
/// # Examples
///
/// ```
/// use stix_req::http::Method;
///
/// assert_eq!(Method::from_command("POST"), Method::Post);
/// assert_eq!(Method::from_command("GET"), Method::Get);
/// assert_eq!(Method::from_command("DELETE"), Method::Get);
/// assert_eq!(Method::Post.as_str(), "POST");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// GET — arguments travel as the request body, like the query string.
    #[default]
    Get,
    /// POST — arguments travel as an `application/x-www-form-urlencoded` body.
    Post,
}

impl Method {
    /// Returns the method as it appears on the request line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Maps a command string to a method.
    ///
    /// Only the exact string `"POST"` selects [`Method::Post`]; every other
    /// string, recognized or not, falls back to [`Method::Get`].
    pub fn from_command(command: &str) -> Self {
        if command == "POST" { Self::Post } else { Self::Get }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_command(s))
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
