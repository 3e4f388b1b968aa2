use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::error::Error;
use crate::{Result, Timestamp};

/// Claim set carried by every request token.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Request path, including the query string.
    pub uri: String,
    pub nonce: String,
    pub iat: Timestamp,
    pub exp: Timestamp,
    /// API key identifier.
    pub sub: String,
    /// Hex SHA-256 of the request body.
    pub body_hash: String,
}

#[derive(Serialize)]
pub(crate) struct Header {
    alg: &'static str,
    typ: &'static str,
}

impl Header {
    pub(crate) const RS256: Header = Header {
        alg: "RS256",
        typ: "JWT",
    };
}

/// Compact JWS (`header.claims.signature`) authorizing exactly one request.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedToken(String);

impl SignedToken {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the claim segment. The signature is not checked.
    pub fn claims(&self) -> Result<Claims> {
        let mut segments = self.0.split('.');
        let (Some(_), Some(claims), Some(_), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(Error::validation("token is not a compact JWS"));
        };

        let decoded = URL_SAFE_NO_PAD
            .decode(claims)
            .map_err(|e| Error::validation(format!("token claims are not base64url: {e}")))?;
        Ok(serde_json::from_slice(&decoded)?)
    }
}

impl fmt::Display for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Tokens are bearer credentials; keep them out of debug output.
impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignedToken([REDACTED])")
    }
}

/// Lowercase hex SHA-256 of `body`; `None` hashes the empty body.
#[must_use]
pub fn body_hash(body: Option<&[u8]>) -> String {
    hex::encode(Sha256::digest(body.unwrap_or_default()))
}

pub(crate) fn encode_segment<T: Serialize>(value: &T) -> Result<String> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(value)?))
}
