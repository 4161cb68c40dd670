use crate::headers::{HeaderName, HeaderValue, Headers};
use bytes::Bytes;
use http_types::Method;
use url::Url;

/// The body of a request: always fully buffered.
pub type Body = Bytes;

pub const EMPTY_BODY: Body = Bytes::new();

/// A pipeline request.
#[derive(Debug, Clone)]
pub struct Request {
    url: Url,
    method: Method,
    headers: Headers,
    body: Body,
}

impl Request {
    pub fn new(url: Url, method: Method) -> Self {
        Self {
            url,
            method,
            headers: Headers::new(),
            body: EMPTY_BODY,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn url_mut(&mut self) -> &mut Url {
        &mut self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn insert_header<K, V>(&mut self, key: K, value: V)
    where
        K: Into<HeaderName>,
        V: Into<HeaderValue>,
    {
        self.headers.insert(key, value);
    }

    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = body.into();
    }
}
