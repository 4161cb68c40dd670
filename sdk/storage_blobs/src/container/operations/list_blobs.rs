use crate::blob::{Blob, BlobItem, BlobPrefix, BlobProperties, BlobType};
use crate::clients::ContainerClient;
use crate::options::BlobListingDetails;
use photostore_core::error::{ErrorKind, ResultExt};
use photostore_core::headers::Headers;
use photostore_core::prelude::*;
use photostore_core::{Method, Response, Url};
use photostore_storage::clients::url_with_segments;
use photostore_storage::headers::CommonStorageResponseHeaders;
use std::collections::HashMap;
use std::num::NonZeroU32;

/// Lists the blobs of a container one page at a time.
///
/// Without a delimiter the listing is flat: every blob under the prefix is
/// returned whatever `/` its name contains.
#[derive(Debug, Clone)]
pub struct ListBlobsBuilder {
    client: ContainerClient,
    prefix: Option<Prefix>,
    delimiter: Option<Delimiter>,
    max_results: Option<MaxResults>,
    details: BlobListingDetails,
}

impl ListBlobsBuilder {
    pub(crate) fn new(client: ContainerClient) -> Self {
        Self {
            client,
            prefix: None,
            delimiter: None,
            max_results: None,
            details: BlobListingDetails::default(),
        }
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<Prefix>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<Delimiter>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    #[must_use]
    pub fn max_results(mut self, max_results: NonZeroU32) -> Self {
        self.max_results = Some(MaxResults::new(max_results));
        self
    }

    #[must_use]
    pub fn details(mut self, details: BlobListingDetails) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub fn include_snapshots(mut self, include: bool) -> Self {
        self.details.snapshots = include;
        self
    }

    #[must_use]
    pub fn include_metadata(mut self, include: bool) -> Self {
        self.details.metadata = include;
        self
    }

    #[must_use]
    pub fn include_uncommitted_blobs(mut self, include: bool) -> Self {
        self.details.uncommitted_blobs = include;
        self
    }

    #[must_use]
    pub fn include_copy(mut self, include: bool) -> Self {
        self.details.copy = include;
        self
    }

    #[must_use]
    pub fn include_deleted(mut self, include: bool) -> Self {
        self.details.deleted = include;
        self
    }

    /// A stream of pages, each requested once the previous one was consumed.
    pub fn into_stream(self) -> Pageable<ListBlobsResponse> {
        let make_request = move |marker: Option<NextMarker>| {
            let this = self.clone();
            async move { this.list_page(marker).await }
        };
        Pageable::new(make_request)
    }

    async fn list_page(
        &self,
        marker: Option<NextMarker>,
    ) -> photostore_core::Result<ListBlobsResponse> {
        let container_url = self.client.url()?;
        let mut url = container_url.clone();
        url.query_pairs_mut()
            .append_pair("restype", "container")
            .append_pair("comp", "list");
        self.prefix.append_to_url_query(&mut url);
        self.delimiter.append_to_url_query(&mut url);
        marker.append_to_url_query(&mut url);
        self.max_results.append_to_url_query(&mut url);
        self.details.append_to_url_query(&mut url);

        let request = self
            .client
            .finalize_request(url, Method::Get, Headers::new(), None)?;
        let response = self.client.send(&request).await?;
        let page = ListBlobsResponse::try_from(response, &container_url)?;
        trace!(
            "listed {} items from {}, more: {}",
            page.blobs.len(),
            self.client.container_name(),
            page.next_marker.is_some()
        );
        Ok(page)
    }
}

/// One page of a blob listing.
#[derive(Debug, Clone)]
pub struct ListBlobsResponse {
    pub common: CommonStorageResponseHeaders,
    pub prefix: Option<String>,
    pub max_results: Option<u32>,
    pub delimiter: Option<String>,
    pub next_marker: Option<NextMarker>,
    pub blobs: Vec<BlobItem>,
}

impl ListBlobsResponse {
    fn try_from(response: Response, container_url: &Url) -> photostore_core::Result<Self> {
        let (_, headers, body) = response.deconstruct();
        let common = CommonStorageResponseHeaders::from(&headers);
        let body = String::from_utf8(body.to_vec())?;
        Self::from_xml(body.trim_start_matches('\u{feff}'), container_url, common)
    }

    fn from_xml(
        body: &str,
        container_url: &Url,
        common: CommonStorageResponseHeaders,
    ) -> photostore_core::Result<Self> {
        let internal: ListBlobsResponseInternal = serde_xml_rs::from_str(body)
            .context(ErrorKind::DataConversion, "failed to parse list blobs response")?;

        let blobs = internal
            .blobs
            .items
            .into_iter()
            .map(|item| item.into_blob_item(container_url))
            .collect::<photostore_core::Result<Vec<_>>>()?;

        Ok(Self {
            common,
            prefix: non_empty(internal.prefix),
            max_results: internal.max_results,
            delimiter: non_empty(internal.delimiter),
            next_marker: NextMarker::from_possibly_empty_string(internal.next_marker),
            blobs,
        })
    }
}

impl Continuable for ListBlobsResponse {
    fn continuation(&self) -> Option<NextMarker> {
        self.next_marker.clone()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn item_url(container_url: &Url, name: &str) -> photostore_core::Result<Url> {
    url_with_segments(container_url.clone(), name.split('/'))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListBlobsResponseInternal {
    prefix: Option<String>,
    max_results: Option<u32>,
    delimiter: Option<String>,
    next_marker: Option<String>,
    blobs: BlobsInternal,
}

#[derive(Debug, Deserialize)]
struct BlobsInternal {
    #[serde(rename = "$value", default)]
    items: Vec<BlobItemInternal>,
}

#[derive(Debug, Deserialize)]
enum BlobItemInternal {
    Blob(BlobInternal),
    BlobPrefix(BlobPrefixInternal),
}

impl BlobItemInternal {
    fn into_blob_item(self, container_url: &Url) -> photostore_core::Result<BlobItem> {
        Ok(match self {
            BlobItemInternal::Blob(blob) => BlobItem::Blob(Blob {
                url: item_url(container_url, &blob.name)?,
                name: blob.name,
                snapshot: non_empty(blob.snapshot),
                deleted: blob.deleted.unwrap_or(false),
                properties: BlobProperties {
                    blob_type: blob.properties.blob_type,
                    content_length: blob.properties.content_length,
                    content_type: non_empty(blob.properties.content_type),
                    content_md5: non_empty(blob.properties.content_md5),
                    etag: non_empty(blob.properties.etag),
                    last_modified: non_empty(blob.properties.last_modified),
                },
                metadata: blob.metadata.unwrap_or_default(),
            }),
            BlobItemInternal::BlobPrefix(prefix) => BlobItem::BlobPrefix(BlobPrefix {
                url: item_url(container_url, &prefix.name)?,
                name: prefix.name,
            }),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlobInternal {
    name: String,
    snapshot: Option<String>,
    deleted: Option<bool>,
    properties: BlobPropertiesInternal,
    metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct BlobPropertiesInternal {
    #[serde(rename = "BlobType")]
    blob_type: BlobType,
    #[serde(rename = "Content-Length")]
    content_length: u64,
    #[serde(rename = "Content-Type")]
    content_type: Option<String>,
    #[serde(rename = "Content-MD5")]
    content_md5: Option<String>,
    #[serde(rename = "Etag")]
    etag: Option<String>,
    #[serde(rename = "Last-Modified")]
    last_modified: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlobPrefixInternal {
    name: String,
}
