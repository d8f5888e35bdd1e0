//! # stix_req
//!
//! A from-scratch, blocking HTTP/1.1 client that speaks GET and POST over a
//! raw TCP socket.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stix_req::{FormArgs, HttpClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new();
//!     let args: FormArgs = [("q", "rust")].into_iter().collect();
//!     let response = client.post("http://127.0.0.1:8080/search", Some(&args))?;
//!     println!("{} {}", response.code(), response.body());
//!     Ok(())
//! }
//! ```
//!
//! ## Wire behavior
//!
//! - Requests always send `Connection: close`; the response is read until the
//!   server closes the socket.
//! - Form arguments are joined verbatim, without percent-encoding.
//! - `Content-Length` is `len(key) + len(value) + 1` summed over the
//!   arguments, which falls short of the joined string by one byte for each
//!   argument after the first.

pub mod cli;
pub mod client;
pub mod http;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use client::{ClientConfig, ClientError, HttpClient};
pub use http::{FormArgs, Headers, HttpResponse, Method};
