use crate::blob::{Blob, BlobProperties, BlobType};
use crate::clients::BlobClient;
use photostore_core::headers::{
    Headers, BLOB_TYPE, CONTENT_MD5, CONTENT_TYPE, ETAG, LAST_MODIFIED,
};
use photostore_core::{Body, Method};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub type PutBlockBlob =
    Pin<Box<dyn Future<Output = photostore_core::Result<Blob>> + Send + 'static>>;

/// Uploads the whole content of a block blob in a single request.
///
/// An existing blob with the same name is overwritten.
#[derive(Debug, Clone)]
pub struct PutBlockBlobBuilder {
    client: BlobClient,
    body: Body,
    content_type: Option<String>,
}

impl PutBlockBlobBuilder {
    pub(crate) fn new(client: BlobClient, body: Body) -> Self {
        Self {
            client,
            body,
            content_type: None,
        }
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn into_future(self) -> PutBlockBlob {
        Box::pin(async move {
            let url = self.client.url()?;
            let content_md5 = base64::encode(md5::compute(&self.body).0);
            let content_type = self
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());
            let content_length = self.body.len() as u64;

            let mut headers = Headers::new();
            headers.insert(BLOB_TYPE, BlobType::BlockBlob.as_str());
            headers.insert(CONTENT_TYPE, content_type.clone());
            headers.insert(CONTENT_MD5, content_md5.clone());

            let request =
                self.client
                    .finalize_request(url.clone(), Method::Put, headers, Some(self.body))?;
            let response = self.client.send(&request).await?;
            debug!(
                "uploaded {content_length} byte(s) to {}/{}",
                self.client.container_client().container_name(),
                self.client.blob_name()
            );

            let headers = response.headers();
            Ok(Blob {
                name: self.client.blob_name().to_owned(),
                url,
                snapshot: None,
                deleted: false,
                properties: BlobProperties {
                    blob_type: BlobType::BlockBlob,
                    content_length,
                    content_type: Some(content_type),
                    content_md5: headers
                        .get_optional_string(&CONTENT_MD5)
                        .or(Some(content_md5)),
                    etag: headers.get_optional_string(&ETAG),
                    last_modified: headers.get_optional_string(&LAST_MODIFIED),
                },
                metadata: HashMap::new(),
            })
        })
    }
}
