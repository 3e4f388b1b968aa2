//! Per-request authorization tokens.
//!
//! Each call is authorized by a JWT signed with the account's RSA key (RS256). The token
//! binds the API key, the exact request path and a SHA-256 digest of the body, and is valid
//! for [`TOKEN_LIFETIME`] seconds. A random nonce makes every token unique.

mod signer;
mod token;

use std::time::Duration;

pub use signer::RequestSigner;
pub use token::{Claims, SignedToken, body_hash};

/// Validity window of a signed token, from `iat` to `exp`.
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(55);
