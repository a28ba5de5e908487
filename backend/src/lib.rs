//! HTTP API for todo records, backed by Redis.

use std::any::Any;

use axum::{handler::HandlerWithoutStateExt, Router};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::{Config, StoreBackend};
pub use error::ApiError;
pub use state::AppState;
pub use store::{MemoryStore, RedisStore, StoreError, TodoStore};

pub fn build_router(state: AppState) -> Router {
    let expose_details = state.config.expose_error_details;

    let router = routes::todo_routes();

    let router = match &state.config.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(error::route_not_found.into_service()),
        ),
        None => router.fallback(error::route_not_found),
    };

    router
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| {
                error::panic_response(panic, expose_details)
            },
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
