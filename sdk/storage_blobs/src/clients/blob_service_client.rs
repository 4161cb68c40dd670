use crate::blob::{Blob, BlobKind};
use crate::clients::ContainerClient;
use crate::container::operations::FetchAllBuilder;
use photostore_core::{Body, HttpClient, Request, Response, Url};
use photostore_storage::clients::{CloudLocation, StorageCredentials};
use photostore_storage::ConnectionString;
use std::sync::Arc;

/// Configures a [`BlobServiceClient`].
///
/// ```
/// use photostore_blobs::prelude::*;
/// use photostore_storage::clients::StorageCredentials;
///
/// let builder = BlobServiceClientBuilder::new("xamstore", StorageCredentials::Anonymous);
/// ```
#[derive(Debug, Clone)]
pub struct BlobServiceClientBuilder {
    cloud_location: CloudLocation,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl BlobServiceClientBuilder {
    /// A client for an account in the public cloud.
    #[must_use]
    pub fn new(account: impl Into<String>, storage_credentials: StorageCredentials) -> Self {
        Self::with_location(CloudLocation::Public {
            account: account.into(),
            storage_credentials,
        })
    }

    #[must_use]
    pub fn with_location(cloud_location: CloudLocation) -> Self {
        Self {
            cloud_location,
            http_client: None,
        }
    }

    /// A client for the local storage emulator, without credentials.
    ///
    /// The emulator's well-known account key cannot be used since requests are
    /// never signed, so this only reaches containers with public access. Use
    /// [`emulator_with_sas`](Self::emulator_with_sas) for private containers.
    #[must_use]
    pub fn emulator() -> Self {
        Self::with_location(CloudLocation::Emulator {
            address: "127.0.0.1".to_owned(),
            port: 10000,
        })
    }

    /// A client for the local storage emulator authorized by a SAS token.
    pub fn emulator_with_sas(
        storage_credentials: StorageCredentials,
    ) -> photostore_core::Result<Self> {
        let uri = CloudLocation::Emulator {
            address: "127.0.0.1".to_owned(),
            port: 10000,
        }
        .url("blob")?;
        Ok(Self::with_location(CloudLocation::Custom {
            uri,
            storage_credentials,
        }))
    }

    pub fn from_connection_string(connection_string: &str) -> photostore_core::Result<Self> {
        let cs = ConnectionString::new(connection_string)?;
        Ok(Self::with_location(cs.blob_location()?))
    }

    /// Send requests through this client instead of the default one.
    #[must_use]
    pub fn transport(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn build(self) -> photostore_core::Result<BlobServiceClient> {
        let storage_credentials = self.cloud_location.storage_credentials();
        storage_credentials.ensure_sendable()?;
        let url = self.cloud_location.url("blob")?;
        let http_client = match self.http_client {
            Some(http_client) => http_client,
            None => default_http_client()?,
        };
        debug!("blob service client for {url}");
        Ok(BlobServiceClient {
            url,
            storage_credentials,
            http_client,
        })
    }
}

#[cfg(any(feature = "enable_reqwest", feature = "enable_reqwest_rustls"))]
fn default_http_client() -> photostore_core::Result<Arc<dyn HttpClient>> {
    Ok(photostore_core::new_http_client())
}

#[cfg(not(any(feature = "enable_reqwest", feature = "enable_reqwest_rustls")))]
fn default_http_client() -> photostore_core::Result<Arc<dyn HttpClient>> {
    use photostore_core::error::{Error, ErrorKind};

    Err(Error::message(
        ErrorKind::Other,
        "no default transport compiled in, set one with `transport`",
    ))
}

/// Entry point to the blob service of one account.
///
/// Cheap to clone; clones share the transport.
#[derive(Debug, Clone)]
pub struct BlobServiceClient {
    url: Url,
    storage_credentials: StorageCredentials,
    http_client: Arc<dyn HttpClient>,
}

impl BlobServiceClient {
    /// A reference to a container. Nothing is sent until an operation runs.
    pub fn container_client(&self, container_name: impl Into<String>) -> ContainerClient {
        ContainerClient::new(self.clone(), container_name.into())
    }

    /// Collect every item of `kind` in a container, following continuation markers.
    pub fn fetch_all(&self, container_name: impl Into<String>, kind: BlobKind) -> FetchAllBuilder {
        FetchAllBuilder::new(self.clone(), container_name.into(), kind)
    }

    /// Store `payload` as the block blob `blob_name`, replacing any previous content.
    ///
    /// Failures are returned as they are.
    pub async fn upload_block(
        &self,
        container_name: impl Into<String>,
        payload: impl Into<Body>,
        blob_name: impl Into<String>,
    ) -> photostore_core::Result<Blob> {
        self.container_client(container_name)
            .blob_client(blob_name)
            .put_block_blob(payload)
            .into_future()
            .await
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn storage_credentials(&self) -> &StorageCredentials {
        &self.storage_credentials
    }

    pub(crate) async fn send(&self, request: &Request) -> photostore_core::Result<Response> {
        photostore_storage::clients::send(self.http_client.as_ref(), request).await
    }
}
