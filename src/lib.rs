use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod policy;
pub mod services;
pub mod state;

use state::AppState;

/// Assemble the full router. Public routes first, then the `/api` surface
/// behind the JWT middleware, then global layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(public_routes())
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        // Token acquisition
        .route("/auth/login", post(handlers::auth::login))
        // Open registration
        .route("/users", post(handlers::users::create))
}

fn api_routes() -> Router<AppState> {
    use handlers::{tasks, users};

    Router::new()
        // Task operations (owner-scoped)
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/:id",
            get(tasks::detail).patch(tasks::update).delete(tasks::remove),
        )
        // User management
        .route("/api/users", get(users::list).patch(users::update_self))
        .route("/api/users/:id", get(users::detail).delete(users::remove))
        .route("/api/users/:id/roles/add", patch(users::add_role))
        .route("/api/users/:id/roles/remove", patch(users::remove_role))
        .route_layer(axum::middleware::from_fn(
            middleware::auth::jwt_auth_middleware,
        ))
}
