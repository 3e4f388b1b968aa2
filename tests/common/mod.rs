#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::LazyLock;
use std::time::Duration;

use fireblocks_client_sdk::{Client, ClientConfig, ConfigBuilder};
use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::SeedableRng as _;
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey as _, LineEnding};

pub const API_KEY: &str = "0b1c2d3e-test-api-key";

static PRIVATE_KEY: LazyLock<RsaPrivateKey> = LazyLock::new(|| {
    let mut rng = ChaCha20Rng::from_seed([42; 32]);
    RsaPrivateKey::new(&mut rng, 1024).expect("generate test key")
});

pub fn private_key() -> &'static RsaPrivateKey {
    &PRIVATE_KEY
}

pub fn private_key_pem() -> String {
    PRIVATE_KEY
        .to_pkcs8_pem(LineEnding::LF)
        .expect("encode pem")
        .as_str()
        .to_owned()
}

pub fn config_builder(base_url: &str) -> ConfigBuilder {
    ClientConfig::builder()
        .with_api_key(API_KEY)
        .with_private_key(private_key_pem())
        .with_base_url(base_url)
}

pub fn client(base_url: &str) -> Client {
    Client::new(config_builder(base_url).build().expect("valid config"))
}

pub fn client_with_timeout(base_url: &str, timeout: Duration) -> Client {
    Client::new(
        config_builder(base_url)
            .with_timeout(timeout)
            .build()
            .expect("valid config"),
    )
}
