use crate::{Request, Response};
use async_trait::async_trait;
#[cfg(any(feature = "enable_reqwest", feature = "enable_reqwest_rustls"))]
use std::sync::Arc;

/// Construct a new `HttpClient` with the `reqwest` backend.
#[cfg(any(feature = "enable_reqwest", feature = "enable_reqwest_rustls"))]
pub fn new_http_client() -> Arc<dyn HttpClient> {
    Arc::new(::reqwest::Client::new())
}

/// An HTTP client which can send requests.
///
/// This is the only seam between the clients and the network; tests plug in
/// an in-memory implementation.
#[async_trait]
pub trait HttpClient: Send + Sync + std::fmt::Debug {
    /// Send out a request and collect the whole response.
    ///
    /// A response with a non-success status is still `Ok`; status checks belong
    /// to the caller.
    async fn execute_request(&self, request: &Request) -> crate::Result<Response>;
}

#[cfg(any(feature = "enable_reqwest", feature = "enable_reqwest_rustls"))]
mod reqwest {
    use super::HttpClient;
    use crate::error::{Error, ErrorKind, ResultExt};
    use crate::headers::Headers;
    use crate::{Request, Response};
    use async_trait::async_trait;
    use http_types::StatusCode;
    use std::convert::TryFrom;

    #[async_trait]
    impl HttpClient for ::reqwest::Client {
        async fn execute_request(&self, request: &Request) -> crate::Result<Response> {
            let method = ::reqwest::Method::from_bytes(request.method().to_string().as_bytes())
                .context(ErrorKind::DataConversion, "unsupported request method")?;
            let mut builder = self.request(method, request.url().clone());
            for (name, value) in request.headers().iter() {
                builder = builder.header(name.as_str(), value.as_str());
            }
            let reqwest_request = builder
                .body(request.body().clone())
                .build()
                .context(ErrorKind::Other, "failed to build request")?;

            log::trace!("sending {} {}", request.method(), request.url());
            let rsp = self
                .execute(reqwest_request)
                .await
                .context(ErrorKind::Io, "failed to execute request")?;

            let status = StatusCode::try_from(rsp.status().as_u16()).map_err(|_| {
                Error::message(
                    ErrorKind::DataConversion,
                    format!("invalid status code {}", rsp.status().as_u16()),
                )
            })?;
            let mut headers = Headers::new();
            for (name, value) in rsp.headers() {
                if let Ok(value) = value.to_str() {
                    headers.insert(name.as_str().to_owned(), value.to_owned());
                }
            }
            let body = rsp
                .bytes()
                .await
                .context(ErrorKind::Io, "failed to read response body")?;

            Ok(Response::new(status, headers, body))
        }
    }
}
