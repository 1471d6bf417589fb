//! Access token verification and local issuance.
//!
//! [`TokenVerifier::verify`] checks, in order:
//!
//! 1. the token header parses (otherwise [`AuthError::MalformedCredential`])
//! 2. a verification key can be resolved (otherwise [`AuthError::UnverifiableSignature`])
//! 3. signature, expiry, issuer and audience
//! 4. the `permissions` claim is present
//!
//! # Example
//!
//! ```ignore
//! let verifier = TokenVerifier::new(AuthConfig::from_env());
//! let claims = verifier.verify(token).await?;
//! println!("Subject: {}", claims.sub);
//! ```

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};

use coffeeshop_config::{AuthConfig, KeySource};
use coffeeshop_core::AppError;

use crate::claims::{Audience, Claims};
use crate::error::AuthError;
use crate::jwks::JwksCache;

const UNPARSEABLE: &str = "Unable to parse authentication token.";
const MISSING_KID: &str = "Authorization malformed.";
const BAD_SIGNATURE: &str = "Unable to verify token signature.";
const BAD_CLAIMS: &str = "Incorrect claims. Please, check the audience and issuer.";
const NO_PERMISSIONS: &str = "Permissions not included in JWT.";

enum Keys {
    Secret(DecodingKey),
    Jwks(JwksCache),
}

pub struct TokenVerifier {
    keys: Keys,
    issuer: Option<String>,
    audience: Option<String>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.keys {
            Keys::Secret(_) => "secret",
            Keys::Jwks(cache) => cache.url(),
        };
        f.debug_struct("TokenVerifier")
            .field("keys", &source)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(config: AuthConfig) -> Self {
        let keys = match config.key_source {
            KeySource::Secret(secret) => Keys::Secret(DecodingKey::from_secret(secret.as_bytes())),
            KeySource::Jwks { url, cache_ttl } => Keys::Jwks(JwksCache::new(url, cache_ttl)),
        };

        Self {
            keys,
            issuer: config.issuer,
            audience: config.audience,
        }
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|_| AuthError::MalformedCredential(UNPARSEABLE.to_string()))?;

        let (key, algorithm) = match &self.keys {
            Keys::Secret(key) => (key.clone(), Algorithm::HS256),
            Keys::Jwks(cache) => {
                let kid = header
                    .kid
                    .ok_or_else(|| AuthError::MalformedCredential(MISSING_KID.to_string()))?;
                cache.key_for(&kid).await?
            }
        };

        let claims = decode::<Claims>(token, &key, &self.validation(algorithm))
            .map(|data| data.claims)
            .map_err(map_decode_error)?;

        if claims.permissions.is_none() {
            return Err(AuthError::InvalidClaims(NO_PERMISSIONS.to_string()));
        }

        Ok(claims)
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);

        match &self.issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        validation
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims(BAD_CLAIMS.to_string()),
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            AuthError::MalformedCredential(UNPARSEABLE.to_string())
        }
        _ => AuthError::UnverifiableSignature(BAD_SIGNATURE.to_string()),
    }
}

/// Issues an HS256 access token for local development and tests.
///
/// Issuer and audience are taken from the configuration so the token passes
/// the same [`TokenVerifier`]. Fails when the key source is a JWKS endpoint,
/// since those keys are only held by the identity provider.
pub fn create_access_token(
    subject: &str,
    permissions: Vec<String>,
    auth_config: &AuthConfig,
) -> Result<String, AppError> {
    let KeySource::Secret(secret) = &auth_config.key_source else {
        return Err(AppError::internal(anyhow!(
            "Tokens can only be issued with a shared secret key source"
        )));
    };

    let now = Utc::now().timestamp() as usize;
    let exp = now.saturating_add(auth_config.access_token_expiry as usize);

    let claims = Claims {
        sub: subject.to_string(),
        permissions: Some(permissions),
        exp,
        iat: now,
        iss: auth_config.issuer.clone(),
        aud: auth_config.audience.clone().map(Audience::One),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn sign(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn now() -> usize {
        Utc::now().timestamp() as usize
    }

    #[tokio::test]
    async fn test_issue_and_verify() {
        let config = AuthConfig::with_secret(SECRET);
        let token =
            create_access_token("barista", vec!["get:drinks-detail".to_string()], &config).unwrap();

        let claims = TokenVerifier::new(config).verify(&token).await.unwrap();

        assert_eq!(claims.sub, "barista");
        assert!(claims.has_permission("get:drinks-detail"));
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn test_garbage_is_malformed() {
        let verifier = TokenVerifier::new(AuthConfig::with_secret(SECRET));

        let err = verifier.verify("not-a-token").await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedCredential(_)));
    }

    #[tokio::test]
    async fn test_wrong_secret_is_unverifiable() {
        let token = create_access_token(
            "barista",
            vec![],
            &AuthConfig::with_secret("another-secret-that-is-long-enough"),
        )
        .unwrap();
        let verifier = TokenVerifier::new(AuthConfig::with_secret(SECRET));

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnverifiableSignature(_)));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let token = sign(
            &serde_json::json!({
                "sub": "barista",
                "permissions": [],
                "iat": now() - 7200,
                "exp": now() - 3600,
            }),
            SECRET,
        );
        let verifier = TokenVerifier::new(AuthConfig::with_secret(SECRET));

        assert_eq!(verifier.verify(&token).await.unwrap_err(), AuthError::Expired);
    }

    #[tokio::test]
    async fn test_missing_permissions_claim() {
        let token = sign(
            &serde_json::json!({ "sub": "barista", "exp": now() + 600 }),
            SECRET,
        );
        let verifier = TokenVerifier::new(AuthConfig::with_secret(SECRET));

        assert_eq!(
            verifier.verify(&token).await.unwrap_err(),
            AuthError::InvalidClaims(NO_PERMISSIONS.to_string())
        );
    }

    #[tokio::test]
    async fn test_wrong_audience_is_invalid_claims() {
        let mut issuing = AuthConfig::with_secret(SECRET);
        issuing.audience = Some("someone-else".to_string());
        let token = create_access_token("barista", vec![], &issuing).unwrap();

        let mut verifying = AuthConfig::with_secret(SECRET);
        verifying.audience = Some("drinks".to_string());
        let err = TokenVerifier::new(verifying).verify(&token).await.unwrap_err();

        assert_eq!(err, AuthError::InvalidClaims(BAD_CLAIMS.to_string()));
    }

    #[tokio::test]
    async fn test_issuer_and_audience_round_trip() {
        let mut config = AuthConfig::with_secret(SECRET);
        config.issuer = Some("https://shop.eu.auth0.com/".to_string());
        config.audience = Some("drinks".to_string());
        let token = create_access_token("manager", vec!["post:drinks".to_string()], &config).unwrap();

        let claims = TokenVerifier::new(config).verify(&token).await.unwrap();
        assert_eq!(claims.iss.as_deref(), Some("https://shop.eu.auth0.com/"));
    }

    #[tokio::test]
    async fn test_huge_expiry_does_not_overflow() {
        let mut config = AuthConfig::with_secret(SECRET);
        config.access_token_expiry = u64::MAX;
        let token = create_access_token("barista", vec![], &config).unwrap();

        let claims = TokenVerifier::new(config).verify(&token).await.unwrap();
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn test_jwks_token_without_kid_is_malformed() {
        let config = AuthConfig {
            key_source: KeySource::Jwks {
                url: "http://127.0.0.1:9/jwks.json".to_string(),
                cache_ttl: Duration::from_secs(60),
            },
            issuer: None,
            audience: None,
            access_token_expiry: 3600,
        };
        let token = sign(
            &serde_json::json!({ "sub": "barista", "permissions": [], "exp": now() + 600 }),
            SECRET,
        );

        let err = TokenVerifier::new(config).verify(&token).await.unwrap_err();
        assert_eq!(err, AuthError::MalformedCredential(MISSING_KID.to_string()));
    }

    #[test]
    fn test_cannot_issue_with_jwks_source() {
        let config = AuthConfig {
            key_source: KeySource::Jwks {
                url: "https://example.com/jwks.json".to_string(),
                cache_ttl: Duration::from_secs(60),
            },
            issuer: None,
            audience: None,
            access_token_expiry: 3600,
        };

        assert!(create_access_token("barista", vec![], &config).is_err());
    }
}
