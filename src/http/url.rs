//! Target URL resolution using the [`url`] crate.
//!
//! Only the `http` and `https` schemes are understood. The query string and
//! fragment of the target URL are never sent: form arguments travel
//! separately (see [`crate::http::form`]).
//!
//! The [`url`] crate validates the URL and yields host and port. The path is
//! taken from the URL text as written: dot segments, spaces and backslashes
//! reach the request line unchanged.

use thiserror::Error;
use url::{Host, Url};

/// Errors produced while resolving a target URL.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid URL {url:?}: {source}")]
    Invalid {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {scheme:?} (expected http or https)")]
    UnsupportedScheme { scheme: String },
}

/// Returns the default port for a scheme, or `None` if the scheme is unknown.
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

fn parse(url: &str) -> Result<Url, UrlError> {
    Url::parse(url).map_err(|source| UrlError::Invalid {
        url: url.to_owned(),
        source,
    })
}

/// Resolves `url` into `(host, port)`.
///
/// An explicit port is used verbatim; otherwise `http` maps to 80 and
/// `https` to 443. Any other scheme is rejected.
///
/// # Examples
///
/// ```
/// use stix_req::http::get_host_port;
///
/// assert_eq!(get_host_port("http://example.com/").unwrap(), ("example.com".to_owned(), 80));
/// assert_eq!(get_host_port("https://example.com/").unwrap(), ("example.com".to_owned(), 443));
/// assert_eq!(get_host_port("http://example.com:8080/").unwrap().1, 8080);
/// assert!(get_host_port("ftp://example.com/").is_err());
/// ```
pub fn get_host_port(url: &str) -> Result<(String, u16), UrlError> {
    host_port(&parse(url)?, url)
}

/// Extracts the path component of `url`, ignoring any query or fragment.
///
/// The path is returned as written, without normalization or
/// percent-encoding. An empty path becomes `/`.
///
/// # Examples
///
/// ```
/// use stix_req::http::get_path;
///
/// assert_eq!(get_path("http://example.com/a/../b?x=1").unwrap(), "/a/../b");
/// ```
pub fn get_path(url: &str) -> Result<String, UrlError> {
    parse(url)?;
    Ok(raw_path(url))
}

/// Slices the path out of the URL text: after the authority, up to the
/// first `?` or `#`.
fn raw_path(url: &str) -> String {
    // Same stripping the url crate applies before parsing.
    let url = url.trim_matches(|c: char| c <= ' ');
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let rest = &rest[rest.find(['/', '?', '#']).unwrap_or(rest.len())..];
    let path: String = rest[..rest.find(['?', '#']).unwrap_or(rest.len())]
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .collect();

    if path.is_empty() { "/".to_owned() } else { path }
}

fn host_port(parsed: &Url, raw: &str) -> Result<(String, u16), UrlError> {
    let scheme = parsed.scheme();
    let fallback = default_port(scheme).ok_or_else(|| UrlError::UnsupportedScheme {
        scheme: scheme.to_owned(),
    })?;

    // Bracketless form so the value can be handed straight to the resolver.
    let host = match parsed.host() {
        Some(Host::Domain(domain)) => domain.to_owned(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        // http and https URLs always parse with a host.
        None => {
            return Err(UrlError::Invalid {
                url: raw.to_owned(),
                source: url::ParseError::EmptyHost,
            });
        }
    };

    Ok((host, parsed.port().unwrap_or(fallback)))
}

/// A resolved request target: where to connect and what to ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Target {
    /// Parses `url` once and resolves host, port and path from it.
    pub fn parse(url: &str) -> Result<Self, UrlError> {
        let parsed = parse(url)?;
        let (host, port) = host_port(&parsed, url)?;
        Ok(Self {
            host,
            port,
            path: raw_path(url),
        })
    }
}
