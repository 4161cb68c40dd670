pub mod operations;

use std::collections::HashMap;
use std::fmt;
use url::Url;

/// The storage layout of a blob as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum BlobType {
    BlockBlob,
    PageBlob,
    AppendBlob,
}

impl BlobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobType::BlockBlob => "BlockBlob",
            BlobType::PageBlob => "PageBlob",
            BlobType::AppendBlob => "AppendBlob",
        }
    }
}

impl fmt::Display for BlobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a listed item is. Listings can be filtered down to a single kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKind {
    BlockBlob,
    PageBlob,
    AppendBlob,
    /// A virtual directory, only produced by listings with a delimiter.
    Directory,
}

impl From<BlobType> for BlobKind {
    fn from(blob_type: BlobType) -> Self {
        match blob_type {
            BlobType::BlockBlob => BlobKind::BlockBlob,
            BlobType::PageBlob => BlobKind::PageBlob,
            BlobType::AppendBlob => BlobKind::AppendBlob,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobProperties {
    pub blob_type: BlobType,
    pub content_length: u64,
    pub content_type: Option<String>,
    /// Base64 encoded MD5 of the content, when the service knows it.
    pub content_md5: Option<String>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

/// A stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub name: String,
    pub url: Url,
    pub snapshot: Option<String>,
    pub deleted: bool,
    pub properties: BlobProperties,
    pub metadata: HashMap<String, String>,
}

impl Blob {
    pub fn kind(&self) -> BlobKind {
        self.properties.blob_type.into()
    }
}

/// A virtual directory: the names sharing a prefix up to the delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobPrefix {
    pub name: String,
    pub url: Url,
}

/// One entry of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobItem {
    Blob(Blob),
    BlobPrefix(BlobPrefix),
}

impl BlobItem {
    pub fn name(&self) -> &str {
        match self {
            BlobItem::Blob(blob) => &blob.name,
            BlobItem::BlobPrefix(prefix) => &prefix.name,
        }
    }

    /// Where the item can be addressed.
    pub fn location(&self) -> &Url {
        match self {
            BlobItem::Blob(blob) => &blob.url,
            BlobItem::BlobPrefix(prefix) => &prefix.url,
        }
    }

    pub fn kind(&self) -> BlobKind {
        match self {
            BlobItem::Blob(blob) => blob.kind(),
            BlobItem::BlobPrefix(_) => BlobKind::Directory,
        }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            BlobItem::Blob(blob) => Some(blob),
            BlobItem::BlobPrefix(_) => None,
        }
    }

    pub fn into_blob(self) -> Option<Blob> {
        match self {
            BlobItem::Blob(blob) => Some(blob),
            BlobItem::BlobPrefix(_) => None,
        }
    }
}
