//! Errors raised while decoding, encoding, and building issue fields.

use thiserror::Error;

/// Errors that can occur while working with issue fields
#[derive(Debug, Error)]
pub enum FieldError {
  #[error("Failed to decode {context}: {source}")]
  Decode {
    context: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("Failed to encode field '{field}': {source}")]
  Encode {
    field: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("Invalid timestamp '{value}' in field '{field}': {source}")]
  Parse {
    field: String,
    value: String,
    #[source]
    source: chrono::ParseError,
  },
  #[error("Key {name} is not found in the list of fields")]
  FieldNotFound { name: String },
  #[error("Unsupported field type '{kind}' for {field}")]
  UnsupportedType { kind: String, field: String },
  #[error("Metadata path '{path}' not found")]
  MetadataMissing { path: String },
}

impl FieldError {
  pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
    Self::Decode {
      context: context.into(),
      source,
    }
  }
}
