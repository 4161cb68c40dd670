//! Core types shared by the photo store crates.
//!
//! This crate holds the pieces that do not know anything about blobs: the
//! error type, the buffered HTTP request/response model, the [`HttpClient`]
//! transport seam and the [`Pageable`] stream used by every paged listing.

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]

pub mod date;
pub mod error;
pub mod headers;
mod http_client;
mod pageable;
pub mod prelude;
pub mod request_options;
mod request;
mod response;

pub use error::{Error, ErrorKind, Result, ResultExt};
pub use headers::Headers;
#[cfg(any(feature = "enable_reqwest", feature = "enable_reqwest_rustls"))]
pub use http_client::new_http_client;
pub use http_client::HttpClient;
pub use http_types::{Method, StatusCode};
pub use pageable::{Continuable, Pageable};
pub use request::{Body, Request, EMPTY_BODY};
pub use response::Response;
pub use url::Url;
