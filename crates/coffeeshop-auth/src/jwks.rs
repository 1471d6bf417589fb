//! Key set fetching and caching for RS256 tokens.
//!
//! The key set is fetched lazily on first use and reused until its TTL runs
//! out. A `kid` that is not in a fresh set forces one refetch, which picks up
//! keys rotated in at the issuer. Refetches are at least
//! [`MIN_REFETCH_INTERVAL`] apart, so tokens with made-up `kid`s cannot
//! drive traffic to the issuer.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, EllipticCurve, Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey};
use reqwest::Client;
use tokio::sync::RwLock;

use crate::error::AuthError;

pub const KEY_NOT_FOUND: &str = "Unable to find the appropriate key.";

pub const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(30);

pub type KeyMap = HashMap<String, (DecodingKey, Algorithm)>;

struct CachedKeys {
    keys: KeyMap,
    fetched_at: Instant,
}

enum Lookup {
    Hit((DecodingKey, Algorithm)),
    Miss,
    Fetch,
}

impl CachedKeys {
    fn lookup(&self, kid: &str, ttl: Duration) -> Lookup {
        let age = self.fetched_at.elapsed();
        let found = self.keys.get(kid).cloned();

        if age < MIN_REFETCH_INTERVAL {
            return found.map_or(Lookup::Miss, Lookup::Hit);
        }

        match found {
            Some(key) if age < ttl => Lookup::Hit(key),
            _ => Lookup::Fetch,
        }
    }
}

pub struct JwksCache {
    http_client: Client,
    url: String,
    ttl: Duration,
    cached: RwLock<Option<CachedKeys>>,
}

/// Map a JWK's algorithm parameters to a `jsonwebtoken::Algorithm`.
pub fn jwk_algorithm(jwk: &Jwk) -> Option<Algorithm> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(_) => Some(Algorithm::RS256),
        AlgorithmParameters::EllipticCurve(params) => match params.curve {
            EllipticCurve::P256 => Some(Algorithm::ES256),
            EllipticCurve::P384 => Some(Algorithm::ES384),
            _ => None,
        },
        AlgorithmParameters::OctetKeyPair(_) => Some(Algorithm::EdDSA),
        // Symmetric keys have no business in a published key set.
        AlgorithmParameters::OctetKey(_) => None,
    }
}

/// Keys usable for verification, by `kid`. Keys without a `kid` or with an
/// unsupported algorithm are skipped.
pub fn parse_key_set(jwk_set: &JwkSet) -> KeyMap {
    let mut keys = HashMap::new();

    for jwk in &jwk_set.keys {
        let Some(kid) = &jwk.common.key_id else {
            tracing::warn!("JWK missing kid field, skipping");
            continue;
        };

        let Some(algorithm) = jwk_algorithm(jwk) else {
            tracing::warn!(kid = %kid, "Unsupported JWK algorithm, skipping");
            continue;
        };

        match DecodingKey::from_jwk(jwk) {
            Ok(decoding_key) => {
                keys.insert(kid.clone(), (decoding_key, algorithm));
            }
            Err(err) => {
                tracing::warn!(kid = %kid, error = %err, "Failed to create decoding key");
            }
        }
    }

    keys
}

impl JwksCache {
    pub fn new(url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            http_client: Client::new(),
            url: url.into(),
            ttl,
            cached: RwLock::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolve the verification key for `kid`.
    pub async fn key_for(&self, kid: &str) -> Result<(DecodingKey, Algorithm), AuthError> {
        {
            let cached = self.cached.read().await;
            if let Some(cached) = cached.as_ref() {
                match cached.lookup(kid, self.ttl) {
                    Lookup::Hit(found) => return Ok(found),
                    Lookup::Miss => {
                        tracing::debug!(kid, "Unknown kid, key set fetched too recently");
                        return Err(AuthError::UnverifiableSignature(KEY_NOT_FOUND.to_string()));
                    }
                    Lookup::Fetch => {}
                }
            }
        }

        let keys = self.fetch().await?;
        let found = keys.get(kid).cloned();

        {
            let mut cached = self.cached.write().await;
            *cached = Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            });
        }

        found.ok_or_else(|| AuthError::UnverifiableSignature(KEY_NOT_FOUND.to_string()))
    }

    async fn fetch(&self) -> Result<KeyMap, AuthError> {
        tracing::debug!(url = %self.url, "Fetching JWKS");

        let unresolvable = |err: &dyn std::fmt::Display| {
            tracing::warn!(url = %self.url, error = %err, "JWKS fetch failed");
            AuthError::UnverifiableSignature(KEY_NOT_FOUND.to_string())
        };

        let response = self
            .http_client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| unresolvable(&e))?;

        if !response.status().is_success() {
            return Err(unresolvable(&response.status()));
        }

        let jwk_set: JwkSet = response.json().await.map_err(|e| unresolvable(&e))?;

        Ok(parse_key_set(&jwk_set))
    }
}
