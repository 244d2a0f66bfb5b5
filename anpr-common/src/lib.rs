//! # ANPR Common Library
//!
//! Shared code for the plate recognition service and its companion client:
//! - Error taxonomy (`ErrorKind`, `PlateError`)
//! - Wire request/response types

pub mod api;
pub mod error;

pub use error::{ErrorKind, PlateError};

/// Common result type for pipeline operations
pub type Result<T> = std::result::Result<T, PlateError>;
