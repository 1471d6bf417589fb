//! Persistence for drinks.
//!
//! Every write runs in its own transaction. An early return drops the
//! transaction, which rolls back anything applied before the failure.

use serde_json::Number;
use sqlx::SqlitePool;
use sqlx::types::Json;
use tracing::instrument;

use coffeeshop_core::AppError;
use coffeeshop_models::{Drink, DrinkChanges, Ingredient, Recipe};

pub struct DrinkRepository;

fn write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return AppError::conflict();
    }
    AppError::persistence(err)
}

/// The drink a freshly reset database starts with.
pub fn seed_drink() -> (String, Recipe) {
    (
        "water".to_string(),
        Recipe::One(Ingredient {
            name: "water".to_string(),
            color: "blue".to_string(),
            parts: Number::from(1),
        }),
    )
}

impl DrinkRepository {
    #[instrument(skip(db))]
    pub async fn list_all(db: &SqlitePool) -> Result<Vec<Drink>, AppError> {
        sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drinks ORDER BY id ASC")
            .fetch_all(db)
            .await
            .map_err(AppError::persistence)
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Drink, AppError> {
        sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drinks WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(AppError::persistence)?
            .ok_or_else(AppError::not_found)
    }

    #[instrument(skip(db, recipe))]
    pub async fn create(db: &SqlitePool, title: &str, recipe: &Recipe) -> Result<Drink, AppError> {
        let mut tx = db.begin().await.map_err(AppError::persistence)?;

        let drink = sqlx::query_as::<_, Drink>(
            r#"INSERT INTO drinks (title, recipe)
               VALUES (?, ?)
               RETURNING id, title, recipe"#,
        )
        .bind(title)
        .bind(Json(recipe))
        .fetch_one(&mut *tx)
        .await
        .map_err(write_error)?;

        tx.commit().await.map_err(AppError::persistence)?;

        tracing::info!(id = drink.id, "Drink created");
        Ok(drink)
    }

    /// Replaces the fields present in `changes`; the rest keep their stored value.
    #[instrument(skip(db, changes))]
    pub async fn update(
        db: &SqlitePool,
        id: i64,
        changes: DrinkChanges,
    ) -> Result<Drink, AppError> {
        let mut tx = db.begin().await.map_err(AppError::persistence)?;

        let mut drink =
            sqlx::query_as::<_, Drink>("SELECT id, title, recipe FROM drinks WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::persistence)?
                .ok_or_else(AppError::not_found)?;

        if let Some(title) = changes.title {
            drink.title = title;
        }
        if let Some(recipe) = changes.recipe {
            drink.recipe = Json(recipe);
        }

        sqlx::query("UPDATE drinks SET title = ?, recipe = ? WHERE id = ?")
            .bind(&drink.title)
            .bind(&drink.recipe)
            .bind(drink.id)
            .execute(&mut *tx)
            .await
            .map_err(write_error)?;

        tx.commit().await.map_err(AppError::persistence)?;

        tracing::info!(id = drink.id, "Drink updated");
        Ok(drink)
    }

    /// Returns the id of the removed drink.
    #[instrument(skip(db))]
    pub async fn delete(db: &SqlitePool, id: i64) -> Result<i64, AppError> {
        let mut tx = db.begin().await.map_err(AppError::persistence)?;

        let deleted = sqlx::query_scalar::<_, i64>("DELETE FROM drinks WHERE id = ? RETURNING id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::persistence)?
            .ok_or_else(AppError::not_found)?;

        tx.commit().await.map_err(AppError::persistence)?;

        tracing::info!(id = deleted, "Drink deleted");
        Ok(deleted)
    }

    /// Removes every drink, restarts id assignment and inserts the seed drink.
    #[instrument(skip(db))]
    pub async fn reset(db: &SqlitePool) -> Result<Drink, AppError> {
        let (title, recipe) = seed_drink();
        let mut tx = db.begin().await.map_err(AppError::persistence)?;

        sqlx::query("DELETE FROM drinks")
            .execute(&mut *tx)
            .await
            .map_err(AppError::persistence)?;
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'drinks'")
            .execute(&mut *tx)
            .await
            .map_err(AppError::persistence)?;

        let drink = sqlx::query_as::<_, Drink>(
            r#"INSERT INTO drinks (title, recipe)
               VALUES (?, ?)
               RETURNING id, title, recipe"#,
        )
        .bind(&title)
        .bind(Json(&recipe))
        .fetch_one(&mut *tx)
        .await
        .map_err(write_error)?;

        tx.commit().await.map_err(AppError::persistence)?;

        tracing::warn!("Drinks table reset to seed data");
        Ok(drink)
    }
}
