use crate::clients::{CloudLocation, StorageCredentials};
use photostore_core::error::{Error, ErrorKind, ResultExt};
use url::Url;

pub const ACCOUNT_KEY_KEY_NAME: &str = "AccountKey";
pub const ACCOUNT_NAME_KEY_NAME: &str = "AccountName";
pub const SAS_KEY_NAME: &str = "SharedAccessSignature";
pub const ENDPOINT_SUFFIX_KEY_NAME: &str = "EndpointSuffix";
pub const DEFAULT_ENDPOINTS_PROTOCOL_KEY_NAME: &str = "DefaultEndpointsProtocol";
pub const USE_DEVELOPMENT_STORAGE_KEY_NAME: &str = "UseDevelopmentStorage";
pub const BLOB_ENDPOINT_KEY_NAME: &str = "BlobEndpoint";

const PUBLIC_ENDPOINT_SUFFIX: &str = "core.windows.net";
const CHINA_ENDPOINT_SUFFIX: &str = "core.chinacloudapi.cn";

/// A storage connection string, as found in the portal.
///
/// ```
/// use photostore_storage::core::ConnectionString;
///
/// let cs = ConnectionString::new(
///     "DefaultEndpointsProtocol=https;AccountName=xamstore;SharedAccessSignature=sv=2021-06-08&sig=abc",
/// )
/// .unwrap();
/// assert_eq!(cs.account_name, Some("xamstore"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionString<'a> {
    pub account_name: Option<&'a str>,
    pub account_key: Option<&'a str>,
    pub sas: Option<&'a str>,
    pub endpoint_suffix: Option<&'a str>,
    pub default_endpoints_protocol: Option<&'a str>,
    pub use_development_storage: Option<bool>,
    pub blob_endpoint: Option<&'a str>,
}

impl<'a> ConnectionString<'a> {
    pub fn new(connection_string: &'a str) -> photostore_core::Result<Self> {
        let mut cs = Self::default();
        for part in connection_string.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value) = part.split_once('=').ok_or_else(|| {
                Error::message(
                    ErrorKind::DataConversion,
                    format!("no key/value separator in connection string part '{part}'"),
                )
            })?;
            match key {
                ACCOUNT_NAME_KEY_NAME => cs.account_name = Some(value),
                ACCOUNT_KEY_KEY_NAME => cs.account_key = Some(value),
                SAS_KEY_NAME => cs.sas = Some(value),
                ENDPOINT_SUFFIX_KEY_NAME => cs.endpoint_suffix = Some(value),
                DEFAULT_ENDPOINTS_PROTOCOL_KEY_NAME => cs.default_endpoints_protocol = Some(value),
                BLOB_ENDPOINT_KEY_NAME => cs.blob_endpoint = Some(value),
                USE_DEVELOPMENT_STORAGE_KEY_NAME => {
                    cs.use_development_storage =
                        Some(value.parse().with_context(ErrorKind::DataConversion, || {
                            format!("invalid {USE_DEVELOPMENT_STORAGE_KEY_NAME} value '{value}'")
                        })?);
                }
                other => log::debug!("ignoring connection string key '{other}'"),
            }
        }
        Ok(cs)
    }

    /// The credentials described by this connection string.
    ///
    /// A SAS token wins over an account key.
    pub fn storage_credentials(&self) -> photostore_core::Result<StorageCredentials> {
        match (self.sas, self.account_name, self.account_key) {
            (Some(sas), _, _) => StorageCredentials::sas_token(sas),
            (None, Some(account), Some(key)) => Ok(StorageCredentials::Key(
                account.to_owned(),
                key.to_owned(),
            )),
            _ => Ok(StorageCredentials::Anonymous),
        }
    }

    /// Where the blob service of this account lives.
    pub fn blob_location(&self) -> photostore_core::Result<CloudLocation> {
        if self.use_development_storage == Some(true) {
            return Ok(CloudLocation::Emulator {
                address: "127.0.0.1".to_owned(),
                port: 10000,
            });
        }

        let storage_credentials = self.storage_credentials()?;
        if let Some(endpoint) = self.blob_endpoint {
            let uri = Url::parse(endpoint).with_context(ErrorKind::DataConversion, || {
                format!("invalid {BLOB_ENDPOINT_KEY_NAME} '{endpoint}'")
            })?;
            return Ok(CloudLocation::Custom {
                uri,
                storage_credentials,
            });
        }

        let account = self.account_name.ok_or_else(|| {
            Error::message(
                ErrorKind::Other,
                format!("connection string needs {ACCOUNT_NAME_KEY_NAME} or {BLOB_ENDPOINT_KEY_NAME}"),
            )
        })?;
        let protocol = self.default_endpoints_protocol.unwrap_or("https");
        let suffix = self.endpoint_suffix.unwrap_or(PUBLIC_ENDPOINT_SUFFIX);
        let account = account.to_owned();
        match (protocol, suffix) {
            ("https", PUBLIC_ENDPOINT_SUFFIX) => Ok(CloudLocation::Public {
                account,
                storage_credentials,
            }),
            ("https", CHINA_ENDPOINT_SUFFIX) => Ok(CloudLocation::China {
                account,
                storage_credentials,
            }),
            (protocol, suffix) => {
                let endpoint = format!("{protocol}://{account}.blob.{suffix}");
                let uri = Url::parse(&endpoint).with_context(ErrorKind::DataConversion, || {
                    format!("failed to parse url: {endpoint}")
                })?;
                Ok(CloudLocation::Custom {
                    uri,
                    storage_credentials,
                })
            }
        }
    }
}
