//! Recognition request pipeline
//!
//! Identifier validation, image resolution, recognition, and batch
//! aggregation. Strict left-to-right short-circuit composition: no step
//! runs if a prior step failed, and for batches the first failure in
//! input order aborts the whole request.

use anpr_common::{ErrorKind, PlateError};

use crate::engine::{read_plate_number, PlateReader};
use crate::store::ImageStore;

/// Ordered key -> plate mapping for one request
///
/// Kept as a vector of pairs so numbered batch keys stay in input order
/// through serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedResults(pub Vec<(String, String)>);

impl KeyedResults {
    /// Serialize as a JSON object, keys in input order
    pub fn into_json(self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(self.0.len());
        for (key, plate) in self.0 {
            map.insert(key, serde_json::Value::String(plate));
        }
        serde_json::Value::Object(map)
    }
}

/// Is `id` a syntactically valid image identifier?
///
/// Identifiers are natural numbers in decimal form: non-empty, digits
/// only, no leading zero. Rejects signs, decimals, and octal-like input
/// before any network call is made.
pub fn is_valid_image_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) && !id.starts_with('0')
}

/// Validate -> fetch -> recognize for one identifier
///
/// Errors from lower layers propagate unchanged; nothing is re-wrapped.
pub async fn resolve_and_recognize(
    engine: &dyn PlateReader,
    store: &dyn ImageStore,
    id: &str,
) -> anpr_common::Result<String> {
    if !is_valid_image_id(id) {
        return Err(PlateError::new(ErrorKind::InvalidImageId));
    }
    let img = store.fetch(id).await?;
    read_plate_number(engine, &img)
}

/// Key for the single-result call shapes
const PLATE_KEY: &str = "plate_number";

/// Run the single-item pipeline for one identifier, keyed `plate_number`
pub async fn read_plate_from_id(
    engine: &dyn PlateReader,
    store: &dyn ImageStore,
    id: &str,
) -> anpr_common::Result<KeyedResults> {
    let plate = resolve_and_recognize(engine, store, id).await?;
    assemble(vec![plate], vec![PLATE_KEY.to_string()])
}

/// Run the single-item pipeline over every identifier in input order
///
/// All-or-nothing: the first failure aborts the batch and is returned as
/// the sole result; identifiers after it are never processed and no
/// partial results are surfaced. Processing is strictly sequential, which
/// is what makes "first failure in input order wins" hold for free.
/// Keys are always numbered `plate_number_{i}` (0-indexed), including for
/// a one-element batch.
pub async fn read_plates_from_ids(
    engine: &dyn PlateReader,
    store: &dyn ImageStore,
    ids: &[String],
) -> anpr_common::Result<KeyedResults> {
    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        results.push(resolve_and_recognize(engine, store, id).await?);
    }
    let keys = (0..ids.len())
        .map(|i| format!("plate_number_{}", i))
        .collect();
    assemble(results, keys)
}

/// Recognize one already-fetched image and key it `plate_number`
///
/// No validator or fetcher involved; the image is already in hand.
pub fn read_plate_from_image(
    engine: &dyn PlateReader,
    img: &[u8],
) -> anpr_common::Result<KeyedResults> {
    let plate = read_plate_number(engine, img)?;
    assemble(vec![plate], vec![PLATE_KEY.to_string()])
}

/// Pair results with keys, guarding the lengths
///
/// A mismatch means a wiring bug upstream; it surfaces as
/// `ResultSizeMismatch` rather than a malformed response.
fn assemble(results: Vec<String>, keys: Vec<String>) -> anpr_common::Result<KeyedResults> {
    if results.len() != keys.len() {
        return Err(PlateError::new(ErrorKind::ResultSizeMismatch));
    }
    Ok(KeyedResults(keys.into_iter().zip(results).collect()))
}
