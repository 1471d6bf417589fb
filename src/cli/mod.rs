//! Administrative operations behind the `coffeeshop-cli` binary.

use sqlx::SqlitePool;
use sqlx::migrate::MigrateError;

use coffeeshop_auth::create_access_token;
use coffeeshop_config::AuthConfig;
use coffeeshop_core::{AppError, permissions};
use coffeeshop_models::Drink;

use crate::modules::drinks::repository::DrinkRepository;

pub async fn run_migrations(db: &SqlitePool) -> Result<(), MigrateError> {
    coffeeshop_db::MIGRATOR.run(db).await
}

/// Brings the schema up to date, then replaces every drink with the seed drink.
pub async fn reset_database(db: &SqlitePool) -> Result<Drink, AppError> {
    run_migrations(db).await.map_err(AppError::internal)?;
    DrinkRepository::reset(db).await
}

/// Mints a development token. An empty permission list grants every permission.
pub fn issue_token(
    subject: &str,
    permissions: Vec<String>,
    auth_config: &AuthConfig,
) -> Result<String, AppError> {
    let permissions = if permissions.is_empty() {
        permissions::ALL.iter().map(|p| p.to_string()).collect()
    } else {
        permissions
    };

    create_access_token(subject, permissions, auth_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeeshop_auth::TokenVerifier;

    const SECRET: &str = "cli-test-secret-0123456789abcdefghij";

    #[tokio::test]
    async fn test_issue_token_defaults_to_every_permission() {
        let config = AuthConfig::with_secret(SECRET);
        let token = issue_token("manager", vec![], &config).unwrap();

        let claims = TokenVerifier::new(config).verify(&token).await.unwrap();
        for permission in permissions::ALL {
            assert!(claims.has_permission(permission));
        }
    }

    #[tokio::test]
    async fn test_issue_token_with_explicit_permissions() {
        let config = AuthConfig::with_secret(SECRET);
        let token = issue_token("barista", vec!["get:drinks-detail".to_string()], &config).unwrap();

        let claims = TokenVerifier::new(config).verify(&token).await.unwrap();
        assert_eq!(claims.permissions(), ["get:drinks-detail".to_string()]);
    }

    #[tokio::test]
    async fn test_reset_database_seeds_water() {
        let db = coffeeshop_db::init_memory_pool().await.unwrap();
        let recipe = serde_json::from_value(serde_json::json!(
            {"name": "espresso", "color": "brown", "parts": 1}
        ))
        .unwrap();
        DrinkRepository::create(&db, "Espresso", &recipe).await.unwrap();

        let seeded = reset_database(&db).await.unwrap();

        assert_eq!(seeded.title, "water");
        assert_eq!(DrinkRepository::list_all(&db).await.unwrap(), vec![seeded]);
    }
}
