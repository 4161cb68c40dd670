use photostore_core::error::{Error, ErrorKind, ResultExt};
use photostore_core::headers::{
    HeaderValue, Headers, CLIENT_REQUEST_ID, CONTENT_LENGTH, ERROR_CODE, MS_DATE, VERSION,
};
use photostore_core::{date, Body, HttpClient, Method, Request, Response};
use time::OffsetDateTime;
use url::Url;

/// The well-known account used by Azurite and the legacy Azure Storage Emulator.
/// https://docs.microsoft.com/azure/storage/common/storage-use-azurite#well-known-storage-account-and-key
pub const EMULATOR_ACCOUNT: &str = "devstoreaccount1";

const STORAGE_VERSION: HeaderValue = HeaderValue::from_static("2019-12-12");

/// How requests are authorized.
///
/// Only SAS tokens and anonymous (public container) access can be sent.
/// Account keys are carried so a connection string can be parsed, but a client
/// refuses to be built from them.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageCredentials {
    Key(String, String),
    SASToken(Vec<(String, String)>),
    Anonymous,
}

impl std::fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let credential = match &self {
            StorageCredentials::Key(_, _) => "Key",
            StorageCredentials::SASToken(_) => "SASToken",
            StorageCredentials::Anonymous => "Anonymous",
        };
        f.debug_struct("StorageCredentials")
            .field("credential", &credential)
            .finish()
    }
}

impl StorageCredentials {
    /// Parse a SAS token such as `sv=2021-06-08&ss=b&sig=...`. A leading `?` is accepted.
    pub fn sas_token(token: impl AsRef<str>) -> photostore_core::Result<Self> {
        let token = token.as_ref().trim_start_matches('?');
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(token.as_bytes())
            .into_owned()
            .collect();
        if pairs.is_empty() {
            return Err(Error::message(ErrorKind::Credential, "empty SAS token"));
        }
        Ok(Self::SASToken(pairs))
    }

    /// Fail for credentials that need request signing.
    pub fn ensure_sendable(&self) -> photostore_core::Result<()> {
        match self {
            StorageCredentials::Key(account, _) => Err(Error::message(
                ErrorKind::Credential,
                format!(
                    "account key credentials for '{account}' are not supported, use a SAS token"
                ),
            )),
            _ => Ok(()),
        }
    }

    fn apply(&self, url: &mut Url) {
        if let StorageCredentials::SASToken(pairs) = self {
            url.query_pairs_mut().extend_pairs(pairs);
        }
    }
}

/// The cloud with which you want to interact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudLocation {
    /// Azure public cloud
    Public {
        account: String,
        storage_credentials: StorageCredentials,
    },
    /// Azure China cloud
    China {
        account: String,
        storage_credentials: StorageCredentials,
    },
    /// Use the well-known storage emulator
    Emulator { address: String, port: u16 },
    /// A custom base URL
    Custom {
        uri: Url,
        storage_credentials: StorageCredentials,
    },
}

impl CloudLocation {
    /// the base URL for a given cloud location
    pub fn url(&self, storage_type: impl Into<String>) -> photostore_core::Result<Url> {
        let storage_type = storage_type.into();
        match self {
            CloudLocation::Public { account, .. } => Url::parse(
                format!("https://{account}.{storage_type}.core.windows.net").as_str(),
            )
            .with_context(ErrorKind::DataConversion, || {
                format!("failed to parse url: https://{account}.{storage_type}.core.windows.net")
            }),
            CloudLocation::China { account, .. } => Url::parse(
                format!("https://{account}.{storage_type}.core.chinacloudapi.cn").as_str(),
            )
            .with_context(ErrorKind::DataConversion, || {
                format!(
                    "failed to parse url: https://{account}.{storage_type}.core.chinacloudapi.cn"
                )
            }),
            CloudLocation::Custom { uri, .. } => Ok(uri.clone()),
            CloudLocation::Emulator { address, port } => {
                Url::parse(format!("http://{address}:{port}/{EMULATOR_ACCOUNT}").as_str())
                    .with_context(ErrorKind::DataConversion, || {
                        format!("failed to parse url: http://{address}:{port}/{EMULATOR_ACCOUNT}")
                    })
            }
        }
    }

    pub fn storage_credentials(&self) -> StorageCredentials {
        match self {
            CloudLocation::Public {
                storage_credentials,
                ..
            }
            | CloudLocation::China {
                storage_credentials,
                ..
            }
            | CloudLocation::Custom {
                storage_credentials,
                ..
            } => storage_credentials.clone(),
            CloudLocation::Emulator { .. } => StorageCredentials::Anonymous,
        }
    }

    /// The account name, when the location names one.
    pub fn storage_account(&self) -> Option<&str> {
        match self {
            CloudLocation::Public { account, .. } | CloudLocation::China { account, .. } => {
                Some(account)
            }
            CloudLocation::Emulator { .. } => Some(EMULATOR_ACCOUNT),
            CloudLocation::Custom { .. } => None,
        }
    }
}

/// Build a request carrying the headers every storage call needs.
pub fn finalize_request(
    mut url: Url,
    method: Method,
    headers: Headers,
    request_body: Option<Body>,
    credentials: &StorageCredentials,
) -> photostore_core::Result<Request> {
    credentials.ensure_sendable()?;
    credentials.apply(&mut url);

    let dt = OffsetDateTime::now_utc();
    let time = date::to_rfc1123(&dt)?;

    let mut request = Request::new(url, method);
    for (k, v) in headers {
        request.insert_header(k, v);
    }

    // let's add content length to avoid "chunking" errors.
    match request_body {
        Some(ref b) => request.insert_header(CONTENT_LENGTH, b.len().to_string()),
        None => request.insert_header(CONTENT_LENGTH, "0"),
    };

    request.insert_header(MS_DATE, time);
    request.insert_header(VERSION, STORAGE_VERSION);
    request.insert_header(CLIENT_REQUEST_ID, uuid::Uuid::new_v4().to_string());

    if let Some(request_body) = request_body {
        request.set_body(request_body);
    }

    Ok(request)
}

/// Send a request and turn any non-success status into an error.
pub async fn send(
    http_client: &dyn HttpClient,
    request: &Request,
) -> photostore_core::Result<Response> {
    log::debug!("{} {}", request.method(), request.url().path());
    let response = http_client.execute_request(request).await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_code = response.headers().get_optional_string(&ERROR_CODE);
    let body = String::from_utf8_lossy(response.body());
    log::debug!(
        "{} {} failed with {} ({})",
        request.method(),
        request.url().path(),
        status as u16,
        error_code.as_deref().unwrap_or("no error code")
    );
    Err(Error::message(
        ErrorKind::http_response(status, error_code),
        format!(
            "server returned error status {}: {}",
            status as u16,
            body.trim()
        ),
    ))
}

pub fn url_with_segments<'a, I>(mut url: Url, new_segments: I) -> photostore_core::Result<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    let original_url = url.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            let message = format!("failed to parse url path segments from '{original_url}'");
            Error::message(ErrorKind::DataConversion, message)
        })?;
        segments.pop_if_empty().extend(new_segments);
    }
    Ok(url)
}
