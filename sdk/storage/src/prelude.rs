pub use crate::clients::{CloudLocation, StorageCredentials};
pub use crate::core::ConnectionString;
pub use crate::headers::CommonStorageResponseHeaders;
