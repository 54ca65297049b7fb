use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::handlers::{health, navigation};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let collection = get(navigation::list_tree).post(navigation::create_item);

    Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health_check))
        // Collection is served with and without the trailing slash.
        .route("/api/navigation-items", collection.clone())
        .route("/api/navigation-items/", collection)
        .route("/api/navigation-items/flat", get(navigation::list_flat))
        .route(
            "/api/navigation-items/role/{role}",
            get(navigation::tree_by_role),
        )
        .route(
            "/api/navigation-items/{id}",
            get(navigation::get_item)
                .put(navigation::update_item)
                .delete(navigation::delete_item),
        )
        .route(
            "/api/navigation-items/{id}/children",
            get(navigation::list_children),
        )
        .route(
            "/api/navigation-items/{id}/ancestors",
            get(navigation::list_ancestors),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
