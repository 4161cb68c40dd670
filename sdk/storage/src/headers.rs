use photostore_core::headers::{Headers, CLIENT_REQUEST_ID, MS_DATE, REQUEST_ID, VERSION};

/// Headers the service returns on every response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommonStorageResponseHeaders {
    pub request_id: Option<String>,
    pub client_request_id: Option<String>,
    pub version: Option<String>,
    pub date: Option<String>,
}

impl From<&Headers> for CommonStorageResponseHeaders {
    fn from(headers: &Headers) -> Self {
        Self {
            request_id: headers.get_optional_string(&REQUEST_ID),
            client_request_id: headers.get_optional_string(&CLIENT_REQUEST_ID),
            version: headers.get_optional_string(&VERSION),
            date: headers.get_optional_string(&MS_DATE),
        }
    }
}
