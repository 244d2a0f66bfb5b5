//! Companion client for the plate recognition service
//!
//! Thin convenience wrapper over the HTTP endpoints. Carries no pipeline
//! logic of its own: the service's error responses are surfaced as
//! `RecognitionOutcome::Failed` values, and only transport/decoding
//! problems become `ClientError`s.

use anpr_common::api::ErrorResponse;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Client-side failures (transport and decoding; never the service's
/// own error responses)
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network communication error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not the expected wire shape
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

/// Outcome of one recognition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    /// Key -> plate text pairs in response order
    Plates(Vec<(String, String)>),
    /// Service-reported failure (`{"error": ...}` with its status)
    Failed { message: String, status: u16 },
}

/// HTTP client for the recognition endpoints
pub struct PlateReaderClient {
    host: String,
    http: reqwest::Client,
}

impl PlateReaderClient {
    /// Create a client for the service at `host` (e.g. `http://127.0.0.1:8080`)
    pub fn new(host: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        let host = host.into();
        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Recognize the plate on an inline image
    pub async fn read_plate_number_from_image(
        &self,
        img: Vec<u8>,
    ) -> Result<RecognitionOutcome, ClientError> {
        tracing::debug!(bytes = img.len(), "posting inline image for recognition");
        let response = self
            .http
            .post(format!("{}/readPlateNumberFromImage", self.host))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(img)
            .send()
            .await?;
        decode(response).await
    }

    /// Recognize the plate on the stored image with the given identifier
    pub async fn read_plate_number_from_id(
        &self,
        id: &str,
    ) -> Result<RecognitionOutcome, ClientError> {
        tracing::debug!(id = %id, "requesting recognition by image id");
        let response = self
            .http
            .get(format!("{}/readPlateNumberFromID", self.host))
            .query(&[("id", id)])
            .send()
            .await?;
        decode(response).await
    }

    /// Recognize the plates on several stored images; keys come back
    /// numbered in the order the identifiers were given
    pub async fn read_plate_number_from_ids(
        &self,
        ids: &[&str],
    ) -> Result<RecognitionOutcome, ClientError> {
        tracing::debug!(count = ids.len(), "requesting recognition for id batch");
        let query: Vec<(&str, &str)> = ids.iter().map(|id| ("id", *id)).collect();
        let response = self
            .http
            .get(format!("{}/readPlateNumberFromIDs", self.host))
            .query(&query)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode(response: reqwest::Response) -> Result<RecognitionOutcome, ClientError> {
    let status = response.status().as_u16();
    let value: Value = response.json().await?;

    if value.get("error").is_some() {
        let err: ErrorResponse = serde_json::from_value(value)
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        return Ok(RecognitionOutcome::Failed {
            message: err.error,
            status,
        });
    }

    let Value::Object(map) = value else {
        return Err(ClientError::Decode("response is not a JSON object".to_string()));
    };
    let mut plates = Vec::with_capacity(map.len());
    for (key, plate) in map {
        match plate {
            Value::String(plate) => plates.push((key, plate)),
            other => {
                return Err(ClientError::Decode(format!(
                    "value for {} is not a string: {}",
                    key, other
                )))
            }
        }
    }
    Ok(RecognitionOutcome::Plates(plates))
}
