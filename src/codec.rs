//! Conversion between domain values and their JSON record form.
//!
//! A record is a string-keyed JSON object. Keys come out sorted because
//! `serde_json::Map` is ordered, which keeps the cache file stable across
//! writes. Decoding goes through each type's validating constructor, and any
//! failure is reported as one of three kinds together with the JSON path it
//! happened at.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Date, Identifier, IdMapping, ListEntry, MediaData, Relation, Score, Title, UserData};

/// Serialized form of a domain value.
pub type Record = Map<String, Value>;

#[derive(Debug, Error)]
pub enum CodecError {
  /// A value had the wrong JSON type.
  #[error("type mismatch at `{path}`: {message}")]
  TypeMismatch { path: String, message: String },

  /// A key was missing or unexpected, or the discriminator named no known variant.
  #[error("malformed record at `{path}`: {message}")]
  MalformedRecord { path: String, message: String },

  /// The shape was right but a constructor refused the value.
  #[error("invalid value at `{path}`: {message}")]
  InvalidValue { path: String, message: String },

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}

impl CodecError {
  fn classify(error: serde_path_to_error::Error<serde_json::Error>) -> Self {
    let path = error.path().to_string();
    let inner = error.into_inner();
    if !inner.is_data() {
      return CodecError::Json(inner);
    }

    let message = inner.to_string();
    let structural = ["missing field", "unknown field", "unknown variant", "duplicate field"];
    let typed = ["invalid type", "invalid length"];

    if structural.iter().any(|prefix| message.starts_with(prefix)) {
      CodecError::MalformedRecord { path, message }
    } else if typed.iter().any(|prefix| message.starts_with(prefix)) {
      CodecError::TypeMismatch { path, message }
    } else {
      CodecError::InvalidValue { path, message }
    }
  }
}

/// Record conversion for every persisted type.
///
/// `from_record(&x.to_record()?)? == x` holds for every value.
pub trait Codec: Serialize + DeserializeOwned {
  fn to_record(&self) -> Result<Record, CodecError> {
    match serde_json::to_value(self)? {
      Value::Object(record) => Ok(record),
      other => Err(CodecError::MalformedRecord {
        path: ".".to_string(),
        message: format!("expected an object, serialized to {}", other),
      }),
    }
  }

  fn from_record(record: &Record) -> Result<Self, CodecError> {
    serde_path_to_error::deserialize(Value::Object(record.clone())).map_err(CodecError::classify)
  }

  /// Sorted keys, four-space indentation.
  fn to_json(&self) -> Result<String, CodecError> {
    let record = Value::Object(self.to_record()?);
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    record.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
  }

  fn from_json(text: &str) -> Result<Self, CodecError> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(CodecError::classify)?;
    deserializer.end()?;
    Ok(value)
  }
}

impl Codec for Identifier {}
impl Codec for Title {}
impl Codec for Score {}
impl Codec for Date {}
impl Codec for Relation {}
impl Codec for MediaData {}
impl Codec for UserData {}
impl Codec for ListEntry {}
impl Codec for IdMapping {}
