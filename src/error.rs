use std::error::Error as StdError;
use std::fmt;

use reqwest::{Method, StatusCode};

use crate::response::ApiError;

/// Broad category of a failed call.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Invalid input or configuration, detected before anything is sent.
    Validation,
    /// Key material missing or unusable, or the signature could not be produced.
    Signing,
    /// Network failure reported by the HTTP transport.
    Transport,
    /// The configured per-call timeout elapsed.
    Timeout,
    /// The configured cancellation token fired.
    Cancelled,
    /// The server answered with a non-success status.
    Status,
    /// Serialization or other failures internal to the client.
    Internal,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// True for failures raised while talking to the server: network errors, timeouts and
    /// cancellation.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.kind, Kind::Transport | Kind::Timeout | Kind::Cancelled)
    }

    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let source = self.source.as_deref()?;
        source.downcast_ref::<E>()
    }

    /// Server-side detail when this is a [`Kind::Status`] error.
    #[must_use]
    pub fn status(&self) -> Option<&Status> {
        self.downcast_ref::<Status>()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    pub fn signing<S: Into<String>>(message: S) -> Self {
        Self::with_source(
            Kind::Signing,
            Signing {
                reason: message.into(),
            },
        )
    }

    #[must_use]
    pub fn cancelled(method: Method, path: String) -> Self {
        Self::with_source(Kind::Cancelled, Cancelled { method, path })
    }

    #[must_use]
    pub fn server(status_code: StatusCode, method: Method, path: String, error: ApiError) -> Self {
        Self::with_source(
            Kind::Status,
            Status {
                status_code,
                method,
                path,
                error,
            },
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Non-success response from the API.
#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub error: ApiError,
}

impl Status {
    #[must_use]
    pub fn message(&self) -> &str {
        self.error.message()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = if self.error.message().is_empty() {
            self.status_code.canonical_reason().unwrap_or("no response body")
        } else {
            self.error.message()
        };
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, message
        )
    }
}

impl StdError for Status {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.error)
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signing {
    pub reason: String,
}

impl fmt::Display for Signing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to sign request: {}", self.reason)
    }
}

impl StdError for Signing {}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancelled {
    pub method: Method,
    pub path: String,
}

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} call to {} was cancelled", self.method, self.path)
    }
}

impl StdError for Cancelled {}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            Kind::Timeout
        } else if err.is_builder() {
            Kind::Validation
        } else {
            Kind::Transport
        };
        Error::with_source(kind, err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, err)
    }
}

impl From<rsa::pkcs8::Error> for Error {
    fn from(err: rsa::pkcs8::Error) -> Self {
        Error::with_source(Kind::Signing, err)
    }
}

impl From<rsa::signature::Error> for Error {
    fn from(err: rsa::signature::Error) -> Self {
        Error::with_source(Kind::Signing, err)
    }
}
