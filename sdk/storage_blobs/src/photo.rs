//! What the photo page shows: the first listed blob as a title and an image.

use crate::blob::BlobItem;
use url::Url;

/// Title and image location of the photo on display. Both are empty when
/// there is nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhotoModel {
    pub title: Option<String>,
    pub uri: Option<Url>,
}

impl PhotoModel {
    /// Build the model from the first of `items`, if any.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a BlobItem>) -> Self {
        items
            .into_iter()
            .next()
            .map(|first| Self {
                title: Some(first.name().to_owned()),
                uri: Some(first.location().clone()),
            })
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.uri.is_none()
    }
}
