use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines the endpoints that are **unauthenticated** and accessible to any
/// client. Together with the documentation mounts in `create_router`, these
/// routes form the complete authentication allow-list: everything else in the
/// application sits behind the authorization middleware.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/register
        // New identity creation. The service assigns the default "USER" role and
        // hashes the credential before persistence.
        .route("/auth/register", post(handlers::register_user))
        // POST /auth/login
        // Credential verification and bearer-token issuance. This is the only
        // place a token is ever created.
        .route("/auth/login", post(handlers::login))
}
