//! Normalizes the two response shapes the backend uses.
//!
//! Some endpoints answer with the payload itself (a bare list or object),
//! others wrap it as `{"data": ..., ...}`. Callers should only ever see the
//! payload.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::ApiError;

/// A successful response body, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The body is the payload.
    Bare(Value),
    /// The body was an object with a `data` key; this holds that key's value.
    Enveloped(Value),
}

impl ResponseBody {
    /// Classify a decoded JSON body.
    ///
    /// Any JSON object containing a `data` key is treated as an envelope, the
    /// sibling keys (`message`, `status`, ...) are dropped. Everything else,
    /// including arrays and objects without `data`, is bare.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(mut object) => match object.remove("data") {
                Some(data) => ResponseBody::Enveloped(data),
                None => ResponseBody::Bare(Value::Object(object)),
            },
            value => ResponseBody::Bare(value),
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            ResponseBody::Bare(value) | ResponseBody::Enveloped(value) => value,
        }
    }
}

/// Decode a single record from `payload`.
pub(crate) fn decode_record<T: DeserializeOwned>(payload: Value, status: u16) -> Result<T, ApiError> {
    if !payload.is_object() {
        return Err(ApiError::InvalidFormat { status });
    }

    serde_json::from_value(payload).map_err(|error| ApiError::InvalidRecord {
        status,
        message: error.to_string(),
    })
}

/// Decode a list of records from `payload`, which must be a JSON array.
pub(crate) fn decode_list<T: DeserializeOwned>(
    payload: Value,
    status: u16,
) -> Result<Vec<T>, ApiError> {
    let Value::Array(items) = payload else {
        return Err(ApiError::InvalidFormat { status });
    };

    items
        .into_iter()
        .map(|item| decode_record(item, status))
        .collect()
}
