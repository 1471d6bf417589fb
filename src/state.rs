use std::sync::Arc;

use coffeeshop_auth::TokenVerifier;
use coffeeshop_config::{AuthConfig, CorsConfig};
use coffeeshop_db::SqlitePool;

/// Process-wide context, built once at boot and injected into every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
    pub verifier: Arc<TokenVerifier>,
    pub auth_config: AuthConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: SqlitePool, auth_config: AuthConfig, cors_config: CorsConfig) -> Self {
        Self {
            db,
            verifier: Arc::new(TokenVerifier::new(auth_config.clone())),
            auth_config,
            cors_config,
        }
    }
}

pub async fn init_app_state() -> Result<AppState, sqlx::Error> {
    let db = coffeeshop_db::init_db_pool(&coffeeshop_db::database_url()).await?;
    coffeeshop_db::MIGRATOR.run(&db).await?;

    Ok(AppState::new(
        db,
        AuthConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
