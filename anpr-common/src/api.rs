//! Shared wire types for the recognition endpoints
//!
//! Success responses are dynamic keyed objects (`plate_number`,
//! `plate_number_0`, ...) built by the service's aggregator; only the
//! error shape is fixed enough to share as a concrete type.

use serde::{Deserialize, Serialize};

/// Error wire shape: `{"error": <message>}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
