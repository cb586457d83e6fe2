use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let posts = Router::new()
        .route("/", get(handlers::posts::list_posts))
        .route(
            "/{postId}",
            get(handlers::posts::get_post).delete(handlers::posts::delete_post),
        );

    let public_routes = Router::new()
        .route("/message", post(handlers::chat::post_message))
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .nest("/posts", posts)
        .route("/sync:run", post(handlers::sync::run_sync))
        .route("/sync:test", post(handlers::sync::test_sync))
        .route("/import:test", post(handlers::import::test_import))
        .route("/import:preview", post(handlers::import::preview_import))
        .route("/import:run", post(handlers::import::run_import))
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
