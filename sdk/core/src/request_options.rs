//! Typed request options that end up in the URL query.

use std::num::NonZeroU32;
use url::Url;

/// Add a value to a URL's query string.
pub trait AppendToUrlQuery {
    fn append_to_url_query(&self, url: &mut Url);
}

impl<T> AppendToUrlQuery for Option<T>
where
    T: AppendToUrlQuery,
{
    fn append_to_url_query(&self, url: &mut Url) {
        if let Some(i) = self {
            i.append_to_url_query(url);
        }
    }
}

/// Only return names starting with this prefix. An empty prefix matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prefix(String);

impl Prefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AppendToUrlQuery for Prefix {
    fn append_to_url_query(&self, url: &mut Url) {
        if !self.0.is_empty() {
            url.query_pairs_mut().append_pair("prefix", &self.0);
        }
    }
}

impl<S> From<S> for Prefix
where
    S: Into<String>,
{
    fn from(s: S) -> Self {
        Self::new(s)
    }
}

/// Groups names sharing everything up to the delimiter into a single prefix entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter(String);

impl Delimiter {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self(delimiter.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AppendToUrlQuery for Delimiter {
    fn append_to_url_query(&self, url: &mut Url) {
        url.query_pairs_mut().append_pair("delimiter", &self.0);
    }
}

impl<S> From<S> for Delimiter
where
    S: Into<String>,
{
    fn from(s: S) -> Self {
        Self::new(s)
    }
}

/// A hint for the maximum number of items returned by a single page.
///
/// The service may return fewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxResults(NonZeroU32);

impl MaxResults {
    pub fn new(max_results: NonZeroU32) -> Self {
        Self(max_results)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl AppendToUrlQuery for MaxResults {
    fn append_to_url_query(&self, url: &mut Url) {
        url.query_pairs_mut()
            .append_pair("maxresults", &self.0.to_string());
    }
}

impl From<NonZeroU32> for MaxResults {
    fn from(max_results: NonZeroU32) -> Self {
        Self::new(max_results)
    }
}

/// Opaque continuation marker returned by a paged listing.
///
/// Its presence means another page can be requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextMarker(String);

impl NextMarker {
    pub fn new(marker: impl Into<String>) -> Self {
        Self(marker.into())
    }

    /// The service sends an empty element on the last page.
    pub fn from_possibly_empty_string(marker: Option<String>) -> Option<Self> {
        marker.filter(|m| !m.is_empty()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AppendToUrlQuery for NextMarker {
    fn append_to_url_query(&self, url: &mut Url) {
        url.query_pairs_mut().append_pair("marker", &self.0);
    }
}

impl<S> From<S> for NextMarker
where
    S: Into<String>,
{
    fn from(s: S) -> Self {
        Self::new(s)
    }
}
