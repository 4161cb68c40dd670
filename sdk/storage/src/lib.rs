//! Storage account plumbing: where an account lives, how requests are
//! authorized, and the steps every storage request goes through.

#![forbid(unsafe_code)]

pub mod core;
pub mod headers;
pub mod prelude;

pub use crate::core::clients;
pub use crate::core::ConnectionString;
