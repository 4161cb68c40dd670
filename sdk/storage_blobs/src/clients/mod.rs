mod blob_client;
mod blob_service_client;
mod container_client;

pub use blob_client::BlobClient;
pub use blob_service_client::{BlobServiceClient, BlobServiceClientBuilder};
pub use container_client::ContainerClient;
