//! HTTP headers and the well-known header names used by the storage protocol.

use crate::error::{Error, ErrorKind, ResultExt};
use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;

pub const CONTENT_LENGTH: HeaderName = HeaderName::from_static("content-length");
pub const CONTENT_MD5: HeaderName = HeaderName::from_static("content-md5");
pub const CONTENT_TYPE: HeaderName = HeaderName::from_static("content-type");
pub const ETAG: HeaderName = HeaderName::from_static("etag");
pub const LAST_MODIFIED: HeaderName = HeaderName::from_static("last-modified");
pub const BLOB_TYPE: HeaderName = HeaderName::from_static("x-ms-blob-type");
pub const CLIENT_REQUEST_ID: HeaderName = HeaderName::from_static("x-ms-client-request-id");
pub const ERROR_CODE: HeaderName = HeaderName::from_static("x-ms-error-code");
pub const MS_DATE: HeaderName = HeaderName::from_static("x-ms-date");
pub const REQUEST_ID: HeaderName = HeaderName::from_static("x-ms-request-id");
pub const REQUEST_SERVER_ENCRYPTED: HeaderName =
    HeaderName::from_static("x-ms-request-server-encrypted");
pub const VERSION: HeaderName = HeaderName::from_static("x-ms-version");

/// A header name, always compared in lower case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeaderName(Cow<'static, str>);

impl HeaderName {
    pub const fn from_static(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl From<&'static str> for HeaderName {
    fn from(s: &'static str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<String> for HeaderName {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s.to_lowercase()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderValue(Cow<'static, str>);

impl HeaderValue {
    pub const fn from_static(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl From<&'static str> for HeaderValue {
    fn from(s: &'static str) -> Self {
        Self::from_static(s)
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl From<&String> for HeaderValue {
    fn from(s: &String) -> Self {
        s.clone().into()
    }
}

/// A collection of headers
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Headers(HashMap<HeaderName, HeaderValue>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Optionally get a header value as a String
    pub fn get_optional_string(&self, key: &HeaderName) -> Option<String> {
        self.get_optional_str(key).map(ToOwned::to_owned)
    }

    /// Optionally get a header value as a &str
    pub fn get_optional_str(&self, key: &HeaderName) -> Option<&str> {
        self.0.get(key).map(HeaderValue::as_str)
    }

    /// Get a header value as a str or error if it is not found
    pub fn get_str(&self, key: &HeaderName) -> crate::Result<&str> {
        self.get_optional_str(key).ok_or_else(|| {
            Error::message(
                ErrorKind::DataConversion,
                format!("header not found {}", key.as_str()),
            )
        })
    }

    /// Get a header value parsing it as the type or error if it's not found or it fails to parse
    pub fn get_as<V, E>(&self, key: &HeaderName) -> crate::Result<V>
    where
        V: FromStr<Err = E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.get_optional_as(key)?.ok_or_else(|| {
            Error::message(
                ErrorKind::DataConversion,
                format!("header not found {}", key.as_str()),
            )
        })
    }

    /// Optionally get a header value parsing it as the type or error if it fails to parse
    pub fn get_optional_as<V, E>(&self, key: &HeaderName) -> crate::Result<Option<V>>
    where
        V: FromStr<Err = E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.get_optional_str(key)
            .map(|v| {
                v.parse().with_context(ErrorKind::DataConversion, || {
                    format!("failed to parse header '{}' with value '{v}'", key.as_str())
                })
            })
            .transpose()
    }

    /// Insert a header name/value pair
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<HeaderName>,
        V: Into<HeaderValue>,
    {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.0.iter()
    }
}

impl IntoIterator for Headers {
    type Item = (HeaderName, HeaderValue);
    type IntoIter = std::collections::hash_map::IntoIter<HeaderName, HeaderValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<HashMap<HeaderName, HeaderValue>> for Headers {
    fn from(c: HashMap<HeaderName, HeaderValue>) -> Self {
        Self(c)
    }
}
