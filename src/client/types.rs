use bon::Builder;

/// Per-call settings for mutating requests.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Builder, PartialEq, Eq)]
pub struct RequestOptions {
    /// Lets the server deduplicate retried `POST`/`PUT` calls.
    #[builder(into)]
    idempotency_key: Option<String>,
}

impl RequestOptions {
    /// The idempotency key, if one was given and is non-empty.
    #[must_use]
    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_treated_as_absent() {
        assert_eq!(RequestOptions::default().idempotency_key(), None);
        assert_eq!(
            RequestOptions::builder().idempotency_key("").build().idempotency_key(),
            None
        );
        assert_eq!(
            RequestOptions::builder()
                .idempotency_key("a1b2")
                .build()
                .idempotency_key(),
            Some("a1b2")
        );
    }

    #[test]
    fn maybe_setter_accepts_optional_keys() {
        let key: Option<String> = None;
        let options = RequestOptions::builder().maybe_idempotency_key(key).build();
        assert_eq!(options, RequestOptions::default());
    }
}
