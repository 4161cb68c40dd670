use crate::blob::operations::*;
use crate::clients::ContainerClient;
use photostore_core::error::{Error, ErrorKind};
use photostore_core::{headers::Headers, Body, Method, Request, Response, Url};
use photostore_storage::clients::url_with_segments;

const MAX_BLOB_NAME_LENGTH: usize = 1024;

#[derive(Debug, Clone)]
pub struct BlobClient {
    container_client: ContainerClient,
    blob_name: String,
}

impl BlobClient {
    pub(crate) fn new(container_client: ContainerClient, blob_name: String) -> Self {
        Self {
            container_client,
            blob_name,
        }
    }

    /// Upload `body` as the whole content of this block blob.
    pub fn put_block_blob(&self, body: impl Into<Body>) -> PutBlockBlobBuilder {
        PutBlockBlobBuilder::new(self.clone(), body.into())
    }

    pub fn blob_name(&self) -> &str {
        &self.blob_name
    }

    pub fn container_client(&self) -> &ContainerClient {
        &self.container_client
    }

    /// The blob's address. `/` in the name separates path segments.
    pub fn url(&self) -> photostore_core::Result<Url> {
        if self.blob_name.is_empty() || self.blob_name.len() > MAX_BLOB_NAME_LENGTH {
            return Err(Error::message(
                ErrorKind::DataConversion,
                format!(
                    "blob names must be 1 to {MAX_BLOB_NAME_LENGTH} characters long, got {}",
                    self.blob_name.len()
                ),
            ));
        }
        url_with_segments(self.container_client.url()?, self.blob_name.split('/'))
    }

    pub(crate) async fn send(&self, request: &Request) -> photostore_core::Result<Response> {
        self.container_client.send(request).await
    }

    pub(crate) fn finalize_request(
        &self,
        url: Url,
        method: Method,
        headers: Headers,
        request_body: Option<Body>,
    ) -> photostore_core::Result<Request> {
        self.container_client
            .finalize_request(url, method, headers, request_body)
    }
}
