pub mod clients;
mod connection_string;

pub use connection_string::*;
