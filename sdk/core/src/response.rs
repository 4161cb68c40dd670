use crate::headers::Headers;
use bytes::Bytes;
use http_types::StatusCode;

/// A response with its body fully collected.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, headers: Headers, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn deconstruct(self) -> (StatusCode, Headers, Bytes) {
        (self.status, self.headers, self.body)
    }
}
