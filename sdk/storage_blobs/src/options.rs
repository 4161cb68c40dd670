use photostore_core::request_options::AppendToUrlQuery;
use url::Url;

/// Optional datasets a listing can include, sent as the `include` query parameter.
///
/// Nothing extra is included by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlobListingDetails {
    pub snapshots: bool,
    pub metadata: bool,
    pub uncommitted_blobs: bool,
    pub copy: bool,
    pub deleted: bool,
}

impl BlobListingDetails {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn include_values(&self) -> Vec<&'static str> {
        let mut values = Vec::new();
        if self.snapshots {
            values.push("snapshots");
        }
        if self.metadata {
            values.push("metadata");
        }
        if self.uncommitted_blobs {
            values.push("uncommittedblobs");
        }
        if self.copy {
            values.push("copy");
        }
        if self.deleted {
            values.push("deleted");
        }
        values
    }
}

impl AppendToUrlQuery for BlobListingDetails {
    fn append_to_url_query(&self, url: &mut Url) {
        if !self.is_empty() {
            url.query_pairs_mut()
                .append_pair("include", &self.include_values().join(","));
        }
    }
}

/// What `fetch_all` does when the store fails part way through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Stop, log the failure and return what was collected so far as a success.
    BestEffort,
    /// Stop and return the failure.
    Strict,
}

impl Default for FetchMode {
    fn default() -> Self {
        FetchMode::BestEffort
    }
}
