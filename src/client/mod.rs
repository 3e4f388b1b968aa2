//! Signed request dispatch.
//!
//! A [`ClientConfig`] is built once from ordered [`ConfigOption`]s and shared by every call.
//! Each call:
//! - signs a fresh token over its path and body
//! - attaches `X-API-Key`, `Authorization` and, for `POST`/`PUT`, `Idempotency-Key`
//! - dispatches with the configured timeout, racing the cancellation token
//! - maps non-success statuses through [`crate::normalize`]

#[expect(
    clippy::module_inception,
    reason = "the client type lives next to its config and options"
)]
mod client;
mod config;
mod types;

pub use client::Client;
pub use config::{ClientConfig, ConfigBuilder, ConfigOption, DEFAULT_TIMEOUT};
pub use types::RequestOptions;
