use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Protected Router Module
///
/// Defines every route that requires an authenticated caller. The router
/// itself carries no role logic: `create_router` wraps it with the
/// authorization middleware, which resolves the caller's identity and
/// evaluates the access-control matrix (method x path x role) before any of
/// these handlers run. Which roles may reach which endpoint is therefore
/// visible in one place — the policy table — rather than scattered across
/// handlers.
pub fn protected_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Members ---
        // GET /members?page=N
        // Paginated listing with previous/next page URLs. Readable by USER and ADMIN.
        // POST /members
        // Submits a new member record. The matrix restricts POST here to ADMIN.
        .route(
            "/members",
            get(handlers::get_members).post(handlers::create_member),
        )
        // PUT/DELETE /members/{id}
        // Partial update and removal, both existence-checked (404 on a miss)
        // and both ADMIN-only per the matrix.
        .route(
            "/members/{id}",
            put(handlers::update_member).delete(handlers::delete_member),
        )
        // --- Slides ---
        // POST /slides
        // Creates a carousel slide: organization check, order assignment,
        // image decode + upload, then the single insert. ADMIN-only.
        .route("/slides", post(handlers::create_slide))
        // GET/DELETE /slides/{id}
        // Detail view (USER/ADMIN) and removal (ADMIN).
        .route(
            "/slides/{id}",
            get(handlers::get_slide).delete(handlers::delete_slide),
        )
        // GET /organizations/{id}/slides
        // The carousel read path: slides of one organization in display order.
        .route(
            "/organizations/{id}/slides",
            get(handlers::get_organization_slides),
        )
}
