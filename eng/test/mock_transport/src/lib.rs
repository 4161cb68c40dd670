//! An in-memory blob service speaking enough of the storage REST dialect for
//! the client tests: flat and delimited listings with continuation markers,
//! block blob uploads, and scripted failures.

use async_trait::async_trait;
use bytes::Bytes;
use photostore_core::headers::{
    Headers, BLOB_TYPE, CONTENT_MD5, CONTENT_TYPE, ERROR_CODE, ETAG, LAST_MODIFIED, REQUEST_ID,
    VERSION,
};
use photostore_core::{HttpClient, Method, Request, Response, StatusCode, Url};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

pub const MOCK_ACCOUNT_URL: &str = "https://mockaccount.blob.core.windows.net/";

const DEFAULT_PAGE_SIZE: usize = 5000;
const LAST_MODIFIED_VALUE: &str = "Sat, 01 Jan 2022 00:00:00 GMT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBlobType {
    Block,
    Page,
    Append,
}

impl MockBlobType {
    fn as_str(self) -> &'static str {
        match self {
            MockBlobType::Block => "BlockBlob",
            MockBlobType::Page => "PageBlob",
            MockBlobType::Append => "AppendBlob",
        }
    }
}

/// A request as the mock saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Headers,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_list(&self) -> bool {
        self.query_value("comp") == Some("list")
    }
}

#[derive(Debug, Clone)]
struct StoredBlob {
    blob_type: MockBlobType,
    content: Bytes,
    content_type: String,
    content_md5: Option<String>,
    etag: String,
    deleted: bool,
}

#[derive(Debug, Default)]
struct State {
    containers: BTreeMap<String, BTreeMap<String, StoredBlob>>,
    page_size: Option<usize>,
    failing_list_calls: BTreeSet<usize>,
    list_calls: usize,
    requests: Vec<RecordedRequest>,
    counter: u64,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }
}

/// In-memory blob service. Clones share their state.
#[derive(Debug, Clone, Default)]
pub struct MockBlobService {
    state: Arc<Mutex<State>>,
}

impl MockBlobService {
    pub fn new() -> Self {
        Self::default()
    }

    /// The base URL clients should be pointed at.
    pub fn url(&self) -> Url {
        Url::parse(MOCK_ACCOUNT_URL).expect("static url")
    }

    /// Cap every page at `page_size` items, whatever the client asks for.
    #[must_use]
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.lock().page_size = Some(page_size.max(1));
        self
    }

    pub fn create_container(&self, container: &str) {
        self.lock()
            .containers
            .entry(container.to_owned())
            .or_default();
    }

    /// Store a blob, creating the container when needed.
    pub fn insert_blob(
        &self,
        container: &str,
        name: &str,
        blob_type: MockBlobType,
        content: impl Into<Bytes>,
    ) {
        self.store(container, name, blob_type, content.into(), false);
    }

    /// Store a soft-deleted blob, only listed when deleted blobs are included.
    pub fn insert_deleted_blob(&self, container: &str, name: &str, blob_type: MockBlobType) {
        self.store(container, name, blob_type, Bytes::new(), true);
    }

    /// Make the `call`-th listing request (1-based) fail with `503 ServerBusy`.
    pub fn fail_list_call(&self, call: usize) {
        self.lock().failing_list_calls.insert(call);
    }

    pub fn blob_content(&self, container: &str, name: &str) -> Option<Bytes> {
        self.lock()
            .containers
            .get(container)
            .and_then(|blobs| blobs.get(name))
            .map(|blob| blob.content.clone())
    }

    pub fn blob_count(&self, container: &str) -> usize {
        self.lock().containers.get(container).map_or(0, BTreeMap::len)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("mock state poisoned")
    }

    fn store(
        &self,
        container: &str,
        name: &str,
        blob_type: MockBlobType,
        content: Bytes,
        deleted: bool,
    ) {
        let mut state = self.lock();
        let etag = format!("\"0x{:X}\"", state.next_id());
        state
            .containers
            .entry(container.to_owned())
            .or_default()
            .insert(
                name.to_owned(),
                StoredBlob {
                    blob_type,
                    content,
                    content_type: "application/octet-stream".to_owned(),
                    content_md5: None,
                    etag,
                    deleted,
                },
            );
    }
}

#[async_trait]
impl HttpClient for MockBlobService {
    async fn execute_request(&self, request: &Request) -> photostore_core::Result<Response> {
        let recorded = RecordedRequest {
            method: request.method(),
            path: request.url().path().to_owned(),
            query: request
                .url()
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            headers: request.headers().clone(),
        };
        log::trace!("mock received {} {}", recorded.method, recorded.path);

        let mut state = self.lock();
        state.requests.push(recorded.clone());
        let (container, blob_name) = split_path(request.url());

        let response = match (recorded.method, blob_name) {
            (Method::Get, None) if recorded.is_list() => list_blobs(&mut state, &container, &recorded),
            (Method::Put, Some(blob_name)) => {
                put_blob(&mut state, &container, &blob_name, &recorded, request.body().clone())
            }
            _ => error_response(
                &mut state,
                StatusCode::BadRequest,
                "UnsupportedHttpVerb",
                "The mock does not support this operation.",
            ),
        };
        Ok(response)
    }
}

fn split_path(url: &Url) -> (String, Option<String>) {
    let segments: Vec<String> = url
        .path_segments()
        .map(|segments| {
            segments
                .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    let mut segments = segments.into_iter();
    let container = segments.next().unwrap_or_default();
    let blob_name = Some(segments.collect::<Vec<_>>().join("/")).filter(|name| !name.is_empty());
    (container, blob_name)
}

fn escape(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

fn base_headers(state: &mut State, request: &RecordedRequest) -> Headers {
    let mut headers = Headers::new();
    headers.insert(REQUEST_ID, format!("mock-{}", state.next_id()));
    if let Some(version) = request.headers.get_optional_string(&VERSION) {
        headers.insert(VERSION, version);
    }
    headers
}

fn error_response(state: &mut State, status: StatusCode, code: &'static str, message: &str) -> Response {
    let mut headers = Headers::new();
    headers.insert(REQUEST_ID, format!("mock-{}", state.next_id()));
    headers.insert(ERROR_CODE, code);
    headers.insert(CONTENT_TYPE, "application/xml");
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><Error><Code>{code}</Code><Message>{}</Message></Error>",
        escape(message)
    );
    Response::new(status, headers, body)
}

enum Entry<'a> {
    Blob(&'a str, &'a StoredBlob),
    Prefix(String),
}

impl Entry<'_> {
    fn name(&self) -> &str {
        match self {
            Entry::Blob(name, _) => name,
            Entry::Prefix(name) => name,
        }
    }
}

fn list_blobs(state: &mut State, container: &str, request: &RecordedRequest) -> Response {
    state.list_calls += 1;
    if state.failing_list_calls.contains(&state.list_calls) {
        return error_response(
            state,
            StatusCode::ServiceUnavailable,
            "ServerBusy",
            "The server is currently unable to receive requests.",
        );
    }
    if !state.containers.contains_key(container) {
        return error_response(
            state,
            StatusCode::NotFound,
            "ContainerNotFound",
            "The specified container does not exist.",
        );
    }

    let prefix = request.query_value("prefix").unwrap_or_default();
    let delimiter = request.query_value("delimiter").filter(|d| !d.is_empty());
    let marker = request.query_value("marker").unwrap_or_default();
    let include: Vec<&str> = request
        .query_value("include")
        .map(|i| i.split(',').collect())
        .unwrap_or_default();
    let requested = request
        .query_value("maxresults")
        .and_then(|m| m.parse::<usize>().ok())
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let page_size = requested.min(state.page_size.unwrap_or(DEFAULT_PAGE_SIZE));

    let blobs = &state.containers[container];
    let mut entries: Vec<Entry<'_>> = Vec::new();
    for (name, blob) in blobs {
        if !name.starts_with(prefix) || (blob.deleted && !include.contains(&"deleted")) {
            continue;
        }
        let grouped = delimiter.and_then(|d| {
            name[prefix.len()..]
                .find(d)
                .map(|pos| name[..prefix.len() + pos + d.len()].to_owned())
        });
        match grouped {
            Some(group) => {
                if entries.last().map(Entry::name) != Some(group.as_str()) {
                    entries.push(Entry::Prefix(group));
                }
            }
            None => entries.push(Entry::Blob(name, blob)),
        }
    }

    let remaining: Vec<&Entry<'_>> = entries
        .iter()
        .filter(|entry| entry.name() >= marker)
        .collect();
    let next_marker = remaining.get(page_size).map(|entry| entry.name().to_owned());

    let mut body = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>");
    body.push_str(&format!(
        "<EnumerationResults ServiceEndpoint=\"{MOCK_ACCOUNT_URL}\" ContainerName=\"{}\">",
        escape(container)
    ));
    if !prefix.is_empty() {
        body.push_str(&format!("<Prefix>{}</Prefix>", escape(prefix)));
    }
    if let Some(delimiter) = delimiter {
        body.push_str(&format!("<Delimiter>{}</Delimiter>", escape(delimiter)));
    }
    body.push_str(&format!("<MaxResults>{page_size}</MaxResults><Blobs>"));
    for entry in remaining.iter().take(page_size) {
        match entry {
            Entry::Blob(name, blob) => {
                body.push_str(&format!("<Blob><Name>{}</Name>", escape(name)));
                if blob.deleted {
                    body.push_str("<Deleted>true</Deleted>");
                }
                body.push_str(&format!(
                    "<Properties><Last-Modified>{LAST_MODIFIED_VALUE}</Last-Modified><Etag>{}</Etag><Content-Length>{}</Content-Length><Content-Type>{}</Content-Type>",
                    escape(&blob.etag),
                    blob.content.len(),
                    escape(&blob.content_type)
                ));
                if let Some(md5) = &blob.content_md5 {
                    body.push_str(&format!("<Content-MD5>{}</Content-MD5>", escape(md5)));
                }
                body.push_str(&format!(
                    "<BlobType>{}</BlobType></Properties></Blob>",
                    blob.blob_type.as_str()
                ));
            }
            Entry::Prefix(name) => {
                body.push_str(&format!("<BlobPrefix><Name>{}</Name></BlobPrefix>", escape(name)));
            }
        }
    }
    body.push_str("</Blobs>");
    if let Some(next_marker) = next_marker {
        body.push_str(&format!("<NextMarker>{}</NextMarker>", escape(&next_marker)));
    }
    body.push_str("</EnumerationResults>");

    let mut headers = base_headers(state, request);
    headers.insert(CONTENT_TYPE, "application/xml");
    Response::new(StatusCode::Ok, headers, body)
}

fn put_blob(
    state: &mut State,
    container: &str,
    blob_name: &str,
    request: &RecordedRequest,
    body: Bytes,
) -> Response {
    if request.headers.get_optional_str(&BLOB_TYPE) != Some(MockBlobType::Block.as_str()) {
        return error_response(
            state,
            StatusCode::BadRequest,
            "MissingRequiredHeader",
            "x-ms-blob-type must be BlockBlob.",
        );
    }
    if !state.containers.contains_key(container) {
        return error_response(
            state,
            StatusCode::NotFound,
            "ContainerNotFound",
            "The specified container does not exist.",
        );
    }

    let etag = format!("\"0x{:X}\"", state.next_id());
    let content_md5 = request.headers.get_optional_string(&CONTENT_MD5);
    let stored = StoredBlob {
        blob_type: MockBlobType::Block,
        content: body,
        content_type: request
            .headers
            .get_optional_string(&CONTENT_TYPE)
            .unwrap_or_else(|| "application/octet-stream".to_owned()),
        content_md5: content_md5.clone(),
        etag: etag.clone(),
        deleted: false,
    };
    if let Some(blobs) = state.containers.get_mut(container) {
        blobs.insert(blob_name.to_owned(), stored);
    }

    let mut headers = base_headers(state, request);
    headers.insert(ETAG, etag);
    headers.insert(LAST_MODIFIED, LAST_MODIFIED_VALUE);
    if let Some(content_md5) = content_md5 {
        headers.insert(CONTENT_MD5, content_md5);
    }
    Response::new(StatusCode::Created, headers, Bytes::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_request(query: &str) -> Request {
        let url = Url::parse(&format!("{MOCK_ACCOUNT_URL}photos?restype=container&comp=list{query}")).unwrap();
        Request::new(url, Method::Get)
    }

    fn body(response: &Response) -> String {
        String::from_utf8(response.body().to_vec()).unwrap()
    }

    fn path_of(url: &str) -> (String, Option<String>) {
        split_path(&Url::parse(url).unwrap())
    }

    #[test]
    fn decodes_percent_escapes() {
        assert_eq!(
            path_of("https://mockaccount.blob.core.windows.net/photos/2022%20trip/r%26d.jpg"),
            ("photos".to_owned(), Some("2022 trip/r&d.jpg".to_owned()))
        );
        assert_eq!(
            path_of("https://mockaccount.blob.core.windows.net/photos?restype=container"),
            ("photos".to_owned(), None)
        );
        assert_eq!(
            path_of("https://mockaccount.blob.core.windows.net/photos/"),
            ("photos".to_owned(), None)
        );
    }

    #[tokio::test]
    async fn listed_names_are_xml_escaped() {
        let mock = MockBlobService::new();
        mock.insert_blob("photos", "r&d <draft>.jpg", MockBlobType::Block, "x");

        let listed = mock.execute_request(&list_request("")).await.unwrap();
        let listed = body(&listed);
        assert!(listed.contains("<Name>r&amp;d &lt;draft&gt;.jpg</Name>"), "{listed}");
    }

    #[tokio::test]
    async fn pages_carry_markers() {
        let mock = MockBlobService::new().with_page_size(2);
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            mock.insert_blob("photos", name, MockBlobType::Block, "x");
        }

        let first = mock.execute_request(&list_request("")).await.unwrap();
        assert_eq!(first.status(), StatusCode::Ok);
        let first = body(&first);
        assert!(first.contains("<Name>a.jpg</Name>"));
        assert!(first.contains("<Name>b.jpg</Name>"));
        assert!(first.contains("<NextMarker>c.jpg</NextMarker>"));

        let second = mock
            .execute_request(&list_request("&marker=c.jpg"))
            .await
            .unwrap();
        let second = body(&second);
        assert!(second.contains("<Name>c.jpg</Name>"));
        assert!(!second.contains("NextMarker"));
        assert_eq!(mock.list_calls(), 2);
    }

    #[tokio::test]
    async fn scripted_failures_and_missing_containers() {
        let mock = MockBlobService::new();
        mock.create_container("photos");
        mock.fail_list_call(1);

        let failed = mock.execute_request(&list_request("")).await.unwrap();
        assert_eq!(failed.status(), StatusCode::ServiceUnavailable);
        assert_eq!(
            failed.headers().get_optional_str(&ERROR_CODE),
            Some("ServerBusy")
        );

        let ok = mock.execute_request(&list_request("")).await.unwrap();
        assert_eq!(ok.status(), StatusCode::Ok);

        let url = Url::parse(&format!("{MOCK_ACCOUNT_URL}missing?restype=container&comp=list")).unwrap();
        let missing = mock
            .execute_request(&Request::new(url, Method::Get))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NotFound);
    }
}
