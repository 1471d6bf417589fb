use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use coffeeshop_core::permissions::{
    DRINKS_CREATE, DRINKS_DELETE, DRINKS_DETAIL_READ, DRINKS_UPDATE,
};

use crate::middleware::auth::require_permission;
use crate::state::AppState;

use super::controller::{create_drink, delete_drink, get_drinks_detail, list_drinks, update_drink};

/// Drink routes. Each gated handler sits behind exactly one permission gate;
/// `GET /drinks` is public.
pub fn init_drinks_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/drinks",
            get(list_drinks).merge(post(create_drink).route_layer(
                middleware::from_fn_with_state(state.clone(), require_permission(DRINKS_CREATE)),
            )),
        )
        .route(
            "/drinks-detail",
            get(get_drinks_detail).route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_permission(DRINKS_DETAIL_READ),
            )),
        )
        .route(
            "/drinks/{id}",
            patch(update_drink)
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_permission(DRINKS_UPDATE),
                ))
                .merge(delete(delete_drink).route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_permission(DRINKS_DELETE),
                ))),
        )
}
