//! Image store client
//!
//! Resolves an image identifier to raw bytes against the remote image
//! service, translating every store-side outcome into the error taxonomy.
//! One attempt per call: no retries, no caching. Retry policy, if any,
//! belongs to the transport in front of us.

use anpr_common::{ErrorKind, PlateError};
use std::time::Duration;

/// Message for store failures the status table does not name
const NON_STANDARD_FAILURE_MSG: &str = "problems with server with images";

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Read access to the remote image store
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// Fetch the image with the given identifier
    ///
    /// The identifier is passed in its original string form; the store API
    /// accepts it as-is.
    async fn fetch(&self, id: &str) -> anpr_common::Result<Vec<u8>>;
}

/// `ImageStore` backed by the HTTP image service
///
/// `GET {base_url}/{id}` with the status translation:
/// 2xx -> bytes, 404 -> `ImageNotFound`, 5xx -> `ImageServiceUnavailable`,
/// other 4xx -> `ImageServiceAccessInvalid`, anything else (including
/// transport failure) -> `ImageServiceUnavailable` with an overridden
/// message.
pub struct HttpImageStore {
    base_url: String,
    http: reqwest::Client,
}

impl HttpImageStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        let base_url = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait::async_trait]
impl ImageStore for HttpImageStore {
    async fn fetch(&self, id: &str) -> anpr_common::Result<Vec<u8>> {
        let url = format!("{}/{}", self.base_url, id);
        tracing::debug!(id = %id, url = %url, "fetching image from store");

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "image store transport failure");
                return Err(PlateError::with_message(
                    ErrorKind::ImageServiceUnavailable,
                    NON_STANDARD_FAILURE_MSG,
                ));
            }
        };

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await.map_err(|e| {
                tracing::debug!(error = %e, "image store body read failure");
                PlateError::with_message(
                    ErrorKind::ImageServiceUnavailable,
                    NON_STANDARD_FAILURE_MSG,
                )
            })?;
            return Ok(bytes.to_vec());
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PlateError::new(ErrorKind::ImageNotFound));
        }
        if status.is_server_error() {
            return Err(PlateError::new(ErrorKind::ImageServiceUnavailable));
        }
        if status.is_client_error() {
            return Err(PlateError::new(ErrorKind::ImageServiceAccessInvalid));
        }

        // 1xx/3xx responses fall outside the translation table
        Err(PlateError::with_message(
            ErrorKind::ImageServiceUnavailable,
            NON_STANDARD_FAILURE_MSG,
        ))
    }
}
