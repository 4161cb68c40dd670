use crate::blob::{BlobItem, BlobKind};
use crate::clients::BlobServiceClient;
use crate::options::{BlobListingDetails, FetchMode};
use futures::StreamExt;
use photostore_core::request_options::Prefix;
use photostore_core::Error;
use std::future::Future;
use std::num::NonZeroU32;
use std::pin::Pin;

pub type FetchAll =
    Pin<Box<dyn Future<Output = photostore_core::Result<FetchAllResponse>> + Send + 'static>>;

/// Collects every item of one kind from a container.
///
/// The listing is flat and follows continuation markers until the service
/// reports no more pages. Pages are requested one after the other.
#[derive(Debug, Clone)]
pub struct FetchAllBuilder {
    client: BlobServiceClient,
    container_name: String,
    kind: BlobKind,
    prefix: Prefix,
    max_results: Option<NonZeroU32>,
    details: BlobListingDetails,
    mode: FetchMode,
}

impl FetchAllBuilder {
    pub(crate) fn new(client: BlobServiceClient, container_name: String, kind: BlobKind) -> Self {
        Self {
            client,
            container_name,
            kind,
            prefix: Prefix::default(),
            max_results: None,
            details: BlobListingDetails::default(),
            mode: FetchMode::default(),
        }
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<Prefix>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Suggest how many items a single page should hold.
    #[must_use]
    pub fn max_results(mut self, max_results: NonZeroU32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    #[must_use]
    pub fn details(mut self, details: BlobListingDetails) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub fn include_deleted(mut self, include: bool) -> Self {
        self.details.deleted = include;
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
    pub fn include_copy(mut self, include: bool) -> Self {
        self.details.copy = include;
        self
    }

    #[must_use]
    pub fn include_uncommitted_blobs(mut self, include: bool) -> Self {
        self.details.uncommitted_blobs = include;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn into_future(self) -> FetchAll {
        Box::pin(async move {
            let mut collected = FetchAllResponse::default();
            let outcome = self.collect_into(&mut collected).await;

            match (outcome, self.mode) {
                (Ok(()), _) => Ok(collected),
                (Err(error), FetchMode::Strict) => Err(error),
                (Err(error), FetchMode::BestEffort) => {
                    warn!(
                        "listing '{}' stopped after {} page(s), returning {} item(s): {}",
                        self.container_name,
                        collected.pages,
                        collected.blobs.len(),
                        error
                    );
                    collected.failure = Some(error);
                    Ok(collected)
                }
            }
        })
    }

    async fn collect_into(&self, collected: &mut FetchAllResponse) -> photostore_core::Result<()> {
        let container_client = self.client.container_client(self.container_name.clone());
        container_client.url()?;

        let mut listing = container_client
            .list_blobs()
            .prefix(self.prefix.clone())
            .details(self.details);
        if let Some(max_results) = self.max_results {
            listing = listing.max_results(max_results);
        }

        let mut pages = listing.into_stream();
        while let Some(page) = pages.next().await {
            let page = page?;
            collected.pages += 1;
            let kind = self.kind;
            collected
                .blobs
                .extend(page.blobs.into_iter().filter(|item| item.kind() == kind));
        }
        debug!(
            "fetched {} {:?} item(s) from '{}' in {} page(s)",
            collected.blobs.len(),
            self.kind,
            self.container_name,
            collected.pages
        );
        Ok(())
    }
}

/// Everything `fetch_all` collected, in the order the service listed it.
#[derive(Debug, Default)]
pub struct FetchAllResponse {
    pub blobs: Vec<BlobItem>,
    /// Pages received successfully.
    pub pages: usize,
    /// The failure that cut the listing short. Only set in best-effort mode.
    pub failure: Option<Error>,
}

impl FetchAllResponse {
    pub fn first(&self) -> Option<&BlobItem> {
        self.blobs.first()
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

impl IntoIterator for FetchAllResponse {
    type Item = BlobItem;
    type IntoIter = std::vec::IntoIter<BlobItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.blobs.into_iter()
    }
}
