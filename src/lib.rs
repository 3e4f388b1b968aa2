//! Authenticated request pipeline for the Fireblocks custody API.
//!
//! Every call is signed with a short-lived RS256 token bound to the request path and body,
//! carries the API key header, and optionally an idempotency key on mutating calls.
//! Endpoint wrappers build on [`Client::get`], [`Client::post`] and [`Client::put`], which
//! return the raw response bytes or a single [`Error`].
//!
//! ```rust,no_run
//! use fireblocks_client_sdk::{Client, ClientConfig, RequestOptions};
//!
//! # async fn example(pem: String) -> fireblocks_client_sdk::Result<()> {
//! let config = ClientConfig::builder()
//!     .with_api_key("3b3a1f9e-api-key")
//!     .with_private_key(pem)
//!     .build()?;
//! let client = Client::new(config);
//!
//! let accounts = client.get("/v1/vault/accounts_paged?limit=10").await?;
//!
//! let options = RequestOptions::builder().idempotency_key("create-7f2c").build();
//! let created = client
//!     .post("/v1/vault/accounts", &serde_json::json!({ "name": "ops" }), Some(&options))
//!     .await?;
//! # let _ = (accounts, created);
//! # Ok(())
//! # }
//! ```

use reqwest::{Client as ReqwestClient, Request};
use tokio_util::sync::CancellationToken;

pub mod auth;
pub mod client;
pub mod error;
pub mod response;

pub use auth::{Claims, RequestSigner, SignedToken, TOKEN_LIFETIME};
pub use client::{Client, ClientConfig, ConfigBuilder, ConfigOption, RequestOptions};
pub use error::{Error, Kind as ErrorKind};
pub use response::{ApiError, normalize};

pub type Result<T> = std::result::Result<T, Error>;

/// Unix timestamp in seconds.
pub type Timestamp = i64;

/// Production API origin used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.fireblocks.io";

/// Environment variable holding the API key identifier.
pub const API_KEY_VAR: &str = "FIREBLOCKS_API_KEY";

/// Environment variable holding the PEM-encoded RSA private key.
pub const PRIVATE_KEY_VAR: &str = "FIREBLOCKS_SECRET_KEY";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_VAR: &str = "FIREBLOCKS_API_URL";

pub(crate) const API_KEY_HEADER: &str = "X-API-Key";
pub(crate) const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Executes `request`, aborting when `cancellation` fires, and normalizes the response.
async fn request(
    client: &ReqwestClient,
    request: Request,
    cancellation: &CancellationToken,
) -> Result<Vec<u8>> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    #[cfg(feature = "tracing")]
    tracing::debug!(%method, %path, "dispatching signed request");

    let response = tokio::select! {
        biased;
        () = cancellation.cancelled() => return Err(Error::cancelled(method, path)),
        response = client.execute(request) => response?,
    };

    let status_code = response.status();
    let body = tokio::select! {
        biased;
        () = cancellation.cancelled() => return Err(Error::cancelled(method, path)),
        body = response.bytes() => body?,
    };

    normalize(!status_code.is_success(), body.to_vec()).map_err(|error| {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            %method,
            %path,
            message = %error,
            code = ?error.code(),
            "request rejected"
        );
        Error::server(status_code, method, path, error)
    })
}
