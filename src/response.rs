//! Classification of raw responses into body bytes or a single [`ApiError`].

use std::error::Error as StdError;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Error payload returned by the API on non-success statuses.
///
/// `message` is the server's `message` field when the body is a JSON object carrying one,
/// and the raw body text otherwise. The raw bytes are always kept.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    message: String,
    code: Option<i64>,
    raw_body: Vec<u8>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    code: Option<Value>,
}

impl ApiError {
    /// Decodes an error body, falling back to its verbatim text when it has no usable
    /// `message`.
    #[must_use]
    pub fn from_raw(raw_body: Vec<u8>) -> Self {
        // Only objects qualify; derived struct decoding would also accept arrays.
        let parsed = match serde_json::from_slice::<Value>(&raw_body) {
            Ok(object @ Value::Object(_)) => serde_json::from_value::<ErrorBody>(object).ok(),
            _ => None,
        };

        let code = parsed
            .as_ref()
            .and_then(|body| body.code.as_ref())
            .and_then(Value::as_i64);
        let message = match parsed.and_then(|body| body.message) {
            Some(Value::String(message)) => message,
            _ => String::from_utf8_lossy(&raw_body).into_owned(),
        };

        Self {
            message,
            code,
            raw_body,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Numeric error code, when the server supplied one.
    #[must_use]
    pub const fn code(&self) -> Option<i64> {
        self.code
    }

    #[must_use]
    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }

    #[must_use]
    pub fn into_raw_body(self) -> Vec<u8> {
        self.raw_body
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for ApiError {}

/// Returns the body untouched on success, or the decoded [`ApiError`] on failure.
pub fn normalize(is_error: bool, raw_body: Vec<u8>) -> Result<Vec<u8>, ApiError> {
    if is_error {
        Err(ApiError::from_raw(raw_body))
    } else {
        Ok(raw_body)
    }
}
