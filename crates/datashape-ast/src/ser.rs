//! JSON interchange for datashapes
//!
//! Deserialization goes through the validating constructors, so a
//! malformed tree is rejected exactly as if it had been built in code.

use thiserror::Error;

use crate::types::Type;

/// Serialization error
#[derive(Error, Debug)]
pub enum SerError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SerError>;

/// Serialize a datashape to pretty JSON
pub fn to_json(ty: &Type) -> Result<String> {
    Ok(serde_json::to_string_pretty(ty)?)
}

/// Serialize a datashape to compact JSON (no whitespace)
pub fn to_json_compact(ty: &Type) -> Result<String> {
    Ok(serde_json::to_string(ty)?)
}

/// Deserialize and validate a datashape
pub fn from_json(json: &str) -> Result<Type> {
    Ok(serde_json::from_str(json)?)
}

/// Deserialize and validate a datashape from bytes
pub fn from_json_bytes(bytes: &[u8]) -> Result<Type> {
    Ok(serde_json::from_slice(bytes)?)
}
