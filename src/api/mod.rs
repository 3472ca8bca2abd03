//! HTTP surface: search plus document and widget CRUD under `/api`.

pub mod error;
pub mod handlers;

use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/search", get(handlers::search))
        .route(
            "/documents",
            get(handlers::list_documents).post(handlers::create_document),
        )
        .route(
            "/documents/{id}",
            get(handlers::get_document)
                .put(handlers::update_document)
                .delete(handlers::delete_document),
        )
        .route(
            "/widgets",
            get(handlers::list_widgets).post(handlers::create_widget),
        )
        .route(
            "/widgets/{id}",
            get(handlers::get_widget)
                .put(handlers::update_widget)
                .delete(handlers::delete_widget),
        );

    Router::new()
        .nest("/api", api)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
