use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;

use crate::auth::SignedToken;
use crate::client::{ClientConfig, RequestOptions};
use crate::error::{Error, Kind};
use crate::{API_KEY_HEADER, IDEMPOTENCY_KEY_HEADER, Result};

/// Issues signed calls against the custody API.
///
/// Cloning is cheap; clones share one immutable [`ClientConfig`].
#[derive(Clone, Debug)]
pub struct Client {
    config: Arc<ClientConfig>,
}

impl Client {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::from_shared(Arc::new(config))
    }

    #[must_use]
    pub const fn from_shared(config: Arc<ClientConfig>) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Signed `GET`. `path` may include a query string.
    pub async fn get(&self, path: &str) -> Result<Vec<u8>> {
        self.execute(Method::GET, path, None, None).await
    }

    /// Signed `POST` with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: Option<&RequestOptions>,
    ) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(body)?;
        self.execute(Method::POST, path, Some(body), options).await
    }

    /// Signed `PUT` with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>> {
        self.put_with_options(path, body, None).await
    }

    /// Signed `PUT` with a JSON body and per-call options.
    pub async fn put_with_options<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: Option<&RequestOptions>,
    ) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(body)?;
        self.execute(Method::PUT, path, Some(body), options).await
    }

    /// Signs and dispatches one call. The token hashes exactly the bytes that are sent.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        options: Option<&RequestOptions>,
    ) -> Result<Vec<u8>> {
        let url = self.config.endpoint(path)?;
        let token = self.config.signer().sign(path, body.as_deref())?;
        let headers = self.create_headers(&method, &token, options)?;

        let mut builder = self
            .config
            .http_client()
            .request(method, url)
            .headers(headers)
            .timeout(self.config.timeout());
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }
        let request = builder.build()?;

        crate::request(self.config.http_client(), request, self.config.cancellation()).await
    }

    fn create_headers(
        &self,
        method: &Method,
        token: &SignedToken,
        options: Option<&RequestOptions>,
    ) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(API_KEY_HEADER, header_value(self.config.api_key())?);

        let mut authorization = header_value(&format!("Bearer {token}"))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        let idempotency_key = options.and_then(RequestOptions::idempotency_key);
        if let Some(key) = idempotency_key
            && matches!(*method, Method::POST | Method::PUT)
        {
            headers.insert(IDEMPOTENCY_KEY_HEADER, header_value(key)?);
        }

        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::with_source(Kind::Validation, e))
}
