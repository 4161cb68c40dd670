mod fetch_all;
mod list_blobs;

pub use fetch_all::*;
pub use list_blobs::*;
