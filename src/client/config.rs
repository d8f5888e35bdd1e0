//! Per-client configuration.

use crate::http::request::DEFAULT_USER_AGENT;

/// Size of each socket read in the receive loop.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// Settings shared by every request an [`HttpClient`](super::HttpClient) makes.
///
/// # Examples
///
/// ```
/// use stix_req::ClientConfig;
///
/// let config = ClientConfig::default()
///     .user_agent("tester/2.0")
///     .max_response_bytes(64 * 1024);
///
/// assert_eq!(config.user_agent, "tester/2.0");
/// assert_eq!(config.read_chunk_size, 1024);
/// assert_eq!(config.max_response_bytes, Some(65536));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Value of the `User-Agent` header.
    pub user_agent: String,

    /// Upper bound on the bytes requested per read.
    pub read_chunk_size: usize,

    /// Largest response accepted, in bytes. `None` reads until the peer
    /// closes, however much that is.
    pub max_response_bytes: Option<usize>,
}

impl ClientConfig {
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the read size. Zero is bumped to one so reads always make progress.
    #[must_use]
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size.max(1);
        self
    }

    #[must_use]
    pub fn max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = Some(limit);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            max_response_bytes: None,
        }
    }
}
