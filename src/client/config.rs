use std::time::Duration;

use reqwest::Client as ReqwestClient;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::RequestSigner;
use crate::error::Error;
use crate::{API_KEY_VAR, BASE_URL_VAR, DEFAULT_BASE_URL, PRIVATE_KEY_VAR, Result};

/// Per-call timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A single configuration directive. Directives are applied in order and later ones win.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum ConfigOption {
    /// PEM-encoded RSA private key used to sign request tokens.
    PrivateKey(SecretString),
    /// API key identifier, sent as `X-API-Key` and as the token subject.
    ApiKey(String),
    BaseUrl(String),
    HttpClient(ReqwestClient),
    Timeout(Duration),
    /// Cancelling this token aborts every in-flight and future call.
    Cancellation(CancellationToken),
}

/// Mutable draft folded from [`ConfigOption`]s and finalized by [`ConfigBuilder::build`].
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    private_key: Option<SecretString>,
    api_key: Option<String>,
    base_url: String,
    http_client: Option<ReqwestClient>,
    timeout: Duration,
    cancellation: CancellationToken,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            private_key: None,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http_client: None,
            timeout: DEFAULT_TIMEOUT,
            cancellation: CancellationToken::new(),
        }
    }
}

impl ConfigBuilder {
    /// Seeds a draft from [`API_KEY_VAR`], [`PRIVATE_KEY_VAR`] and [`BASE_URL_VAR`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Like [`ConfigBuilder::from_env`], reading variables through `lookup`.
    #[must_use]
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::default();
        if let Some(api_key) = lookup(API_KEY_VAR) {
            builder = builder.apply(ConfigOption::ApiKey(api_key));
        }
        if let Some(private_key) = lookup(PRIVATE_KEY_VAR) {
            builder = builder.apply(ConfigOption::PrivateKey(private_key.into()));
        }
        if let Some(base_url) = lookup(BASE_URL_VAR) {
            builder = builder.apply(ConfigOption::BaseUrl(base_url));
        }
        builder
    }

    #[must_use]
    pub fn apply(mut self, option: ConfigOption) -> Self {
        match option {
            ConfigOption::PrivateKey(key) => self.private_key = Some(key),
            ConfigOption::ApiKey(key) => self.api_key = Some(key),
            ConfigOption::BaseUrl(url) => self.base_url = url,
            ConfigOption::HttpClient(client) => self.http_client = Some(client),
            ConfigOption::Timeout(timeout) => self.timeout = timeout,
            ConfigOption::Cancellation(token) => self.cancellation = token,
        }
        self
    }

    #[must_use]
    pub fn options<I>(self, options: I) -> Self
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        options.into_iter().fold(self, Self::apply)
    }

    #[must_use]
    pub fn with_private_key<S: Into<String>>(self, private_key: S) -> Self {
        let private_key: String = private_key.into();
        self.apply(ConfigOption::PrivateKey(SecretString::from(private_key)))
    }

    #[must_use]
    pub fn with_api_key<S: Into<String>>(self, api_key: S) -> Self {
        self.apply(ConfigOption::ApiKey(api_key.into()))
    }

    #[must_use]
    pub fn with_base_url<S: Into<String>>(self, base_url: S) -> Self {
        self.apply(ConfigOption::BaseUrl(base_url.into()))
    }

    #[must_use]
    pub fn with_http_client(self, client: ReqwestClient) -> Self {
        self.apply(ConfigOption::HttpClient(client))
    }

    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.apply(ConfigOption::Timeout(timeout))
    }

    #[must_use]
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        self.apply(ConfigOption::Cancellation(token))
    }

    /// Validates the draft and parses the key material.
    pub fn build(self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::validation("api key is not configured"))?;
        let private_key = self
            .private_key
            .ok_or_else(|| Error::signing("private key is not configured"))?;
        let signer = RequestSigner::from_pem(api_key, &private_key)?;

        let base_url = Url::parse(&self.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(Error::validation(format!(
                "base url must be an http(s) origin, got `{base_url}`"
            )));
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(Error::validation(format!(
                "base url must not carry a query or fragment, got `{base_url}`"
            )));
        }

        if self.timeout.is_zero() {
            return Err(Error::validation("timeout must be greater than zero"));
        }

        Ok(ClientConfig {
            signer,
            base_url,
            http_client: self.http_client.unwrap_or_default(),
            timeout: self.timeout,
            cancellation: self.cancellation,
        })
    }
}

/// Immutable connection settings shared by every call of a [`crate::Client`].
#[derive(Debug)]
pub struct ClientConfig {
    signer: RequestSigner,
    base_url: Url,
    http_client: ReqwestClient,
    timeout: Duration,
    cancellation: CancellationToken,
}

impl ClientConfig {
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Folds `options` over the defaults, in order.
    pub fn from_options<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        ConfigBuilder::default().options(options).build()
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        self.signer.api_key()
    }

    #[must_use]
    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn http_client(&self) -> &ReqwestClient {
        &self.http_client
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Full URL for `path`, which must be absolute and may carry a query string.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        if !path.starts_with('/') {
            return Err(Error::validation(format!(
                "request path must start with `/`, got `{path}`"
            )));
        }
        // Fragments are signed into `uri` but never sent.
        if path.contains('#') {
            return Err(Error::validation(format!(
                "request path must not carry a fragment, got `{path}`"
            )));
        }
        let origin = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{origin}{path}"))?)
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha20Rng;
    use rand_chacha::rand_core::SeedableRng as _;
    use rsa::RsaPrivateKey;
    use rsa::pkcs8::{EncodePrivateKey as _, LineEnding};

    use super::*;
    use crate::ErrorKind;

    fn pem() -> String {
        let mut rng = ChaCha20Rng::from_seed([3; 32]);
        let key = RsaPrivateKey::new(&mut rng, 1024).expect("generate test key");
        key.to_pkcs8_pem(LineEnding::LF)
            .expect("encode pem")
            .to_string()
    }

    fn base() -> ConfigBuilder {
        ClientConfig::builder()
            .with_api_key("key")
            .with_private_key(pem())
    }

    #[test]
    fn defaults() {
        let config = base().build().expect("valid config");
        assert_eq!(config.base_url().as_str(), "https://api.fireblocks.io/");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(!config.cancellation().is_cancelled(), "default token never fires");
        assert_eq!(config.api_key(), "key");
    }

    #[test]
    fn later_directives_override_earlier_ones() {
        let config = ClientConfig::from_options([
            ConfigOption::ApiKey("first".to_owned()),
            ConfigOption::PrivateKey(pem().into()),
            ConfigOption::Timeout(Duration::from_secs(1)),
            ConfigOption::BaseUrl("http://localhost:1".to_owned()),
            ConfigOption::ApiKey("second".to_owned()),
            ConfigOption::Timeout(Duration::from_millis(250)),
        ])
        .expect("valid config");

        assert_eq!(config.api_key(), "second");
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.base_url().as_str(), "http://localhost:1/");
    }

    #[test]
    fn missing_private_key_is_a_signing_error() {
        let err = ClientConfig::builder()
            .with_api_key("key")
            .build()
            .expect_err("no key");
        assert_eq!(err.kind(), ErrorKind::Signing);
    }

    #[test]
    fn rejects_invalid_settings() {
        let err = ClientConfig::builder()
            .with_private_key(pem())
            .build()
            .expect_err("no api key");
        assert_eq!(err.kind(), ErrorKind::Validation);

        for url in ["not a url", "ftp://api.fireblocks.io", "https://h/?q=1"] {
            let err = base().with_base_url(url).build().expect_err(url);
            assert_eq!(err.kind(), ErrorKind::Validation, "{url}");
        }

        let err = base()
            .with_timeout(Duration::ZERO)
            .build()
            .expect_err("zero timeout");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn endpoint_concatenates_path_and_query() {
        let config = base()
            .with_base_url("http://127.0.0.1:8080/api/")
            .build()
            .expect("valid config");
        let url = config
            .endpoint("/v1/vault/accounts_paged?limit=10")
            .expect("endpoint");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/api/v1/vault/accounts_paged?limit=10"
        );

        let err = config.endpoint("v1/users").expect_err("relative path");
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = config
            .endpoint("/v1/vault/accounts_paged?limit=10#next")
            .expect_err("fragment");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn env_lookup_seeds_the_draft() {
        let key = pem();
        let config = ConfigBuilder::from_env_with(|name| match name {
            API_KEY_VAR => Some("env-key".to_owned()),
            PRIVATE_KEY_VAR => Some(key.clone()),
            BASE_URL_VAR => Some("https://sandbox-api.fireblocks.io".to_owned()),
            _ => None,
        })
        .build()
        .expect("valid config");

        assert_eq!(config.api_key(), "env-key");
        assert_eq!(config.base_url().host_str(), Some("sandbox-api.fireblocks.io"));
    }
}
