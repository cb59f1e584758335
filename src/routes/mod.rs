/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules.
/// This structure ensures that access control is applied explicitly at the
/// module level (via Axum layers), preventing accidental exposure of protected
/// endpoints.

/// Routes on the authentication allow-list (health, registration, login).
pub mod public;

/// Every other route. Wrapped by the authorization middleware, which
/// authenticates the caller and evaluates the access-control matrix before
/// any handler executes.
pub mod protected;
