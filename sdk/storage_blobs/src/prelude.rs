pub use crate::blob::{Blob, BlobItem, BlobKind, BlobPrefix, BlobProperties, BlobType};
pub use crate::clients::{BlobClient, BlobServiceClient, BlobServiceClientBuilder, ContainerClient};
pub use crate::container::operations::{FetchAllResponse, ListBlobsResponse};
pub use crate::options::*;
pub use crate::photo::PhotoModel;
