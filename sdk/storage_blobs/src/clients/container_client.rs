use crate::clients::{BlobClient, BlobServiceClient};
use crate::container::operations::*;
use crate::container::validate_container_name;
use photostore_core::{headers::Headers, Body, Method, Request, Response, Url};
use photostore_storage::clients::{finalize_request, url_with_segments};

#[derive(Debug, Clone)]
pub struct ContainerClient {
    service_client: BlobServiceClient,
    container_name: String,
}

impl ContainerClient {
    pub(crate) fn new(service_client: BlobServiceClient, container_name: String) -> Self {
        Self {
            service_client,
            container_name,
        }
    }

    pub fn list_blobs(&self) -> ListBlobsBuilder {
        ListBlobsBuilder::new(self.clone())
    }

    pub fn blob_client(&self, blob_name: impl Into<String>) -> BlobClient {
        BlobClient::new(self.clone(), blob_name.into())
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    pub fn service_client(&self) -> &BlobServiceClient {
        &self.service_client
    }

    /// The container's address. Fails when the name breaks the naming rules.
    pub fn url(&self) -> photostore_core::Result<Url> {
        validate_container_name(&self.container_name)?;
        url_with_segments(self.service_client.url().clone(), [self.container_name()])
    }

    pub(crate) async fn send(&self, request: &Request) -> photostore_core::Result<Response> {
        self.service_client.send(request).await
    }

    pub(crate) fn finalize_request(
        &self,
        url: Url,
        method: Method,
        headers: Headers,
        request_body: Option<Body>,
    ) -> photostore_core::Result<Request> {
        finalize_request(
            url,
            method,
            headers,
            request_body,
            self.service_client.storage_credentials(),
        )
    }
}
