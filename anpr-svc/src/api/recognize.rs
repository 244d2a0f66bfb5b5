//! Recognition endpoints
//!
//! Thin transport over the pipeline: extract inputs, run the aggregator,
//! serialize the keyed results or let `PlateError` produce the error
//! response.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use anpr_common::{ErrorKind, PlateError};

use crate::pipeline;
use crate::AppState;

const MISSING_ID_MSG: &str = "field \"id\" not found";

/// Content types that declare a textual payload, not byte image data
const TEXTUAL_CONTENT_TYPES: [&str; 2] = ["text/", "application/json"];

fn is_byte_payload(headers: &HeaderMap, body: &[u8]) -> bool {
    if body.is_empty() {
        return false;
    }
    match headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        Some(content_type) => !TEXTUAL_CONTENT_TYPES
            .iter()
            .any(|prefix| content_type.starts_with(prefix)),
        None => true,
    }
}

/// POST /readPlateNumberFromImage
///
/// Body is the raw image. Textual payloads are rejected before the
/// engine is ever invoked.
async fn read_plate_number_from_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !is_byte_payload(&headers, &body) {
        return PlateError::new(ErrorKind::ImageNotBytes).into_response();
    }
    match pipeline::read_plate_from_image(state.engine.as_ref(), &body) {
        Ok(results) => Json(results.into_json()).into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /readPlateNumberFromID?id=10022
async fn read_plate_number_from_id(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let Some(id) = params.into_iter().find(|(k, _)| k == "id").map(|(_, v)| v) else {
        return PlateError::with_message(ErrorKind::FieldMissing, MISSING_ID_MSG).into_response();
    };
    match pipeline::read_plate_from_id(state.engine.as_ref(), state.store.as_ref(), &id).await {
        Ok(results) => Json(results.into_json()).into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /readPlateNumberFromIDs?id=10022&id=9965
///
/// Repeated `id` parameters, processed in request order. Keys come back
/// numbered even when only one `id` is given.
async fn read_plate_number_from_ids(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let ids: Vec<String> = params
        .into_iter()
        .filter(|(k, _)| k == "id")
        .map(|(_, v)| v)
        .collect();
    if ids.is_empty() {
        return PlateError::with_message(ErrorKind::FieldMissing, MISSING_ID_MSG).into_response();
    }
    match pipeline::read_plates_from_ids(state.engine.as_ref(), state.store.as_ref(), &ids).await {
        Ok(results) => Json(results.into_json()).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Build recognition routes
pub fn recognize_routes() -> Router<AppState> {
    Router::new()
        .route("/readPlateNumberFromImage", post(read_plate_number_from_image))
        .route("/readPlateNumberFromID", get(read_plate_number_from_id))
        .route("/readPlateNumberFromIDs", get(read_plate_number_from_ids))
}
