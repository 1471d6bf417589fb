use axum::{
    Json,
    extract::{FromRequestParts, Path, State},
    http::request::Parts,
};
use tracing::instrument;

use coffeeshop_core::{AppError, ErrorResponse};
use coffeeshop_models::{
    CreateDrinkDto, DeleteDrinkResponse, Drink, DrinkChanges, DrinksLongResponse,
    DrinksShortResponse, UpdateDrinkDto,
};

use crate::metrics::{track_drink_created, track_drink_deleted, track_drink_updated};
use crate::middleware::auth::AuthUser;
use crate::modules::drinks::repository::DrinkRepository;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Drink id taken from the path. An id that is not an integer cannot name a
/// drink, so it is reported as not found.
#[derive(Debug, Clone, Copy)]
pub struct DrinkId(pub i64);

impl<S> FromRequestParts<S> for DrinkId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i64>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| DrinkId(id))
            .map_err(|_| AppError::not_found())
    }
}

#[utoipa::path(
    get,
    path = "/drinks",
    responses(
        (status = 200, description = "All drinks, ingredient names omitted", body = DrinksShortResponse),
        (status = 422, description = "Store failure", body = ErrorResponse)
    ),
    tag = "Drinks"
)]
#[instrument(skip(state))]
pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksShortResponse>, AppError> {
    let drinks = DrinkRepository::list_all(&state.db).await?;

    Ok(Json(DrinksShortResponse {
        success: true,
        drinks: drinks.iter().map(Drink::short).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/drinks-detail",
    responses(
        (status = 200, description = "All drinks with full recipes", body = DrinksLongResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Requires get:drinks-detail permission", body = ErrorResponse)
    ),
    tag = "Drinks",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(subject = %auth_user.subject()))]
pub async fn get_drinks_detail(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DrinksLongResponse>, AppError> {
    let drinks = DrinkRepository::list_all(&state.db).await?;

    Ok(Json(DrinksLongResponse {
        success: true,
        drinks: drinks.iter().map(Drink::long).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/drinks",
    request_body = CreateDrinkDto,
    responses(
        (status = 200, description = "Drink created", body = DrinksLongResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Requires post:drinks permission", body = ErrorResponse),
        (status = 422, description = "Invalid body or title already exists", body = ErrorResponse)
    ),
    tag = "Drinks",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(subject = %auth_user.subject(), title = %dto.title))]
pub async fn create_drink(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateDrinkDto>,
) -> Result<Json<DrinksLongResponse>, AppError> {
    let drink = DrinkRepository::create(&state.db, &dto.title, &dto.recipe).await?;

    track_drink_created();

    Ok(Json(DrinksLongResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    params(
        ("id" = i64, Path, description = "Drink ID")
    ),
    request_body = UpdateDrinkDto,
    responses(
        (status = 200, description = "Drink updated", body = DrinksLongResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Requires patch:drinks permission", body = ErrorResponse),
        (status = 404, description = "Drink not found", body = ErrorResponse),
        (status = 422, description = "Invalid body or title already exists", body = ErrorResponse)
    ),
    tag = "Drinks",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(subject = %auth_user.subject(), id = id))]
pub async fn update_drink(
    State(state): State<AppState>,
    auth_user: AuthUser,
    DrinkId(id): DrinkId,
    ValidatedJson(dto): ValidatedJson<UpdateDrinkDto>,
) -> Result<Json<DrinksLongResponse>, AppError> {
    let drink = DrinkRepository::update(&state.db, id, DrinkChanges::from(dto)).await?;

    track_drink_updated();

    Ok(Json(DrinksLongResponse {
        success: true,
        drinks: vec![drink.long()],
    }))
}

#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    params(
        ("id" = i64, Path, description = "Drink ID")
    ),
    responses(
        (status = 200, description = "Drink deleted", body = DeleteDrinkResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Requires delete:drinks permission", body = ErrorResponse),
        (status = 404, description = "Drink not found", body = ErrorResponse)
    ),
    tag = "Drinks",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(subject = %auth_user.subject(), id = id))]
pub async fn delete_drink(
    State(state): State<AppState>,
    auth_user: AuthUser,
    DrinkId(id): DrinkId,
) -> Result<Json<DeleteDrinkResponse>, AppError> {
    let deleted = DrinkRepository::delete(&state.db, id).await?;

    track_drink_deleted();

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: deleted,
    }))
}
