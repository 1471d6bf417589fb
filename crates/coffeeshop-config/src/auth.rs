//! Token verification configuration.
//!
//! Two key sources are supported:
//!
//! - **JWKS** (RS256): keys published by an identity provider. Selected when
//!   `JWKS_URL` or `AUTH0_DOMAIN` is set.
//! - **Shared secret** (HS256): `JWT_SECRET`, used for local development and
//!   tests. Selected otherwise.
//!
//! # Environment Variables
//!
//! - `AUTH0_DOMAIN`: tenant domain, e.g. `my-shop.us.auth0.com`
//! - `JWKS_URL`: explicit key set URL (overrides the one derived from the domain)
//! - `API_AUDIENCE`: expected `aud` claim (optional)
//! - `AUTH_ISSUER`: expected `iss` claim (defaults to `https://{AUTH0_DOMAIN}/`)
//! - `JWT_SECRET`: shared secret for HS256
//! - `JWT_ACCESS_EXPIRY`: lifetime of locally issued tokens, seconds (default: 3600)
//! - `JWKS_CACHE_TTL`: how long a fetched key set is reused, seconds (default: 3600)

use std::env;
use std::fmt;
use std::time::Duration;

#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    Secret(String),
    Jwks { url: String, cache_ttl: Duration },
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Secret(_) => f.write_str("Secret(<redacted>)"),
            KeySource::Jwks { url, cache_ttl } => f
                .debug_struct("Jwks")
                .field("url", url)
                .field("cache_ttl", cache_ttl)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub key_source: KeySource,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Seconds; a value that is not a non-negative integer falls back to the default
    pub access_token_expiry: u64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let domain = lookup("AUTH0_DOMAIN").filter(|d| !d.is_empty());
        let cache_ttl = Duration::from_secs(
            lookup("JWKS_CACHE_TTL")
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
        );

        let jwks_url = lookup("JWKS_URL")
            .filter(|u| !u.is_empty())
            .or_else(|| {
                domain
                    .as_ref()
                    .map(|d| format!("https://{}/.well-known/jwks.json", d))
            });

        let key_source = match jwks_url {
            Some(url) => KeySource::Jwks { url, cache_ttl },
            None => KeySource::Secret(
                lookup("JWT_SECRET")
                    .unwrap_or_else(|| "your-secret-key-change-in-production".to_string()),
            ),
        };

        Self {
            key_source,
            issuer: lookup("AUTH_ISSUER")
                .filter(|s| !s.is_empty())
                .or_else(|| domain.as_ref().map(|d| format!("https://{}/", d))),
            audience: lookup("API_AUDIENCE").filter(|s| !s.is_empty()),
            access_token_expiry: lookup("JWT_ACCESS_EXPIRY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600), // 1 hour
        }
    }

    /// HS256 configuration without issuer or audience checks.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            key_source: KeySource::Secret(secret.into()),
            issuer: None,
            audience: None,
            access_token_expiry: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_secret_is_default() {
        let config = AuthConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")]));

        assert_eq!(config.key_source, KeySource::Secret("s3cret".to_string()));
        assert!(config.issuer.is_none());
        assert!(config.audience.is_none());
        assert_eq!(config.access_token_expiry, 3600);
    }

    #[test]
    fn test_domain_selects_jwks_and_issuer() {
        let config = AuthConfig::from_lookup(lookup_from(&[
            ("AUTH0_DOMAIN", "shop.eu.auth0.com"),
            ("API_AUDIENCE", "drinks"),
            ("JWT_SECRET", "ignored"),
        ]));

        assert_eq!(
            config.key_source,
            KeySource::Jwks {
                url: "https://shop.eu.auth0.com/.well-known/jwks.json".to_string(),
                cache_ttl: Duration::from_secs(3600),
            }
        );
        assert_eq!(config.issuer.as_deref(), Some("https://shop.eu.auth0.com/"));
        assert_eq!(config.audience.as_deref(), Some("drinks"));
    }

    #[test]
    fn test_explicit_jwks_url_and_issuer() {
        let config = AuthConfig::from_lookup(lookup_from(&[
            ("JWKS_URL", "http://localhost:9000/keys"),
            ("AUTH_ISSUER", "http://localhost:9000/"),
            ("JWKS_CACHE_TTL", "60"),
        ]));

        assert_eq!(
            config.key_source,
            KeySource::Jwks {
                url: "http://localhost:9000/keys".to_string(),
                cache_ttl: Duration::from_secs(60),
            }
        );
        assert_eq!(config.issuer.as_deref(), Some("http://localhost:9000/"));
    }

    #[test]
    fn test_negative_expiry_falls_back_to_default() {
        let config = AuthConfig::from_lookup(lookup_from(&[("JWT_ACCESS_EXPIRY", "-60")]));
        assert_eq!(config.access_token_expiry, 3600);

        let config = AuthConfig::from_lookup(lookup_from(&[("JWT_ACCESS_EXPIRY", "900")]));
        assert_eq!(config.access_token_expiry, 900);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::with_secret("do-not-print-me");
        assert!(!format!("{:?}", config).contains("do-not-print-me"));
    }

    #[test]
    fn test_with_secret() {
        let config = AuthConfig::with_secret("abc");
        assert_eq!(config.key_source, KeySource::Secret("abc".to_string()));
    }
}
