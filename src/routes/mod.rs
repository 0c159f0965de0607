//! Route assembly

pub mod auth;
pub mod menu;
pub mod reservation;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
};

use crate::AppState;
use crate::middleware::auth_middleware;

/// Create the application router. Menu reads, registration, and the auth
/// endpoints are public; everything else requires a valid access token.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/menu", post(menu::create_menu_item))
        .route(
            "/menu/:id",
            put(menu::update_menu_item).delete(menu::delete_menu_item),
        )
        .route(
            "/reservations",
            post(reservation::create_reservation).get(reservation::list_reservations),
        )
        .route(
            "/reservations/:id",
            get(reservation::get_reservation)
                .put(reservation::update_reservation)
                .delete(reservation::delete_reservation),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/user", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/menu/get", get(menu::list_menu_items))
        .route("/menu/get/:id", get(menu::get_menu_item))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "hotel-management"
    }))
}
