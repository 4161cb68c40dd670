//! Blob storage client for the photo store.
//!
//! The two operations the photo page relies on live on [`BlobServiceClient`]:
//!
//! * [`fetch_all`](BlobServiceClient::fetch_all) walks a container listing page
//!   by page and keeps the items of one [`BlobKind`](blob::BlobKind).
//! * [`upload_block`](BlobServiceClient::upload_block) stores a payload as a
//!   block blob.
//!
//! ```no_run
//! use photostore_blobs::prelude::*;
//!
//! # async fn show() -> photostore_core::Result<()> {
//! let client = BlobServiceClientBuilder::from_connection_string(
//!     "AccountName=xamstore;SharedAccessSignature=sv=2021-06-08&sig=abc",
//! )?
//! .build()?;
//!
//! let photos = client.fetch_all("photos", BlobKind::BlockBlob).into_future().await?;
//! let photo = PhotoModel::from_items(&photos.blobs);
//! println!("{:?} {:?}", photo.title, photo.uri);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod blob;
pub mod clients;
pub mod container;
mod options;
pub mod photo;
pub mod prelude;

pub use clients::*;
pub use options::{BlobListingDetails, FetchMode};
