use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::{auth::AuthUser, error::ApiError};

/// Role names used throughout the access-control matrix.
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_USER: &str = "USER";

/// AccessRule
///
/// One row of the access-control matrix: an HTTP method (None = any method),
/// an ant-style path pattern, and the set of roles allowed through. An empty
/// role set means "any authenticated caller".
#[derive(Debug)]
pub struct AccessRule {
    pub method: Option<Method>,
    pub pattern: &'static str,
    pub roles: &'static [&'static str],
}

/// ACCESS_POLICY
///
/// The declarative route x method x role table, evaluated top-to-bottom with
/// first-match-wins semantics. The ordering is significant: the `/comments`
/// POST rule must precede the catch-all POST rule, or commenting would demand
/// the ADMIN role.
///
/// Requests that match no rule still require authentication (the middleware
/// only runs after the `AuthUser` extractor succeeds) but carry no further
/// role restriction.
pub static ACCESS_POLICY: &[AccessRule] = &[
    AccessRule {
        method: Some(Method::GET),
        pattern: "/**",
        roles: &[ROLE_ADMIN, ROLE_USER],
    },
    AccessRule {
        method: Some(Method::DELETE),
        pattern: "/**",
        roles: &[ROLE_ADMIN],
    },
    AccessRule {
        method: Some(Method::POST),
        pattern: "/comments/**",
        roles: &[ROLE_ADMIN, ROLE_USER],
    },
    AccessRule {
        method: Some(Method::POST),
        pattern: "/**",
        roles: &[ROLE_ADMIN],
    },
    AccessRule {
        method: Some(Method::PATCH),
        pattern: "/**",
        roles: &[ROLE_ADMIN],
    },
    AccessRule {
        method: Some(Method::PUT),
        pattern: "/**",
        roles: &[ROLE_ADMIN],
    },
];

/// path_matches
///
/// Ant-style matching for the two pattern forms the table uses: an exact path,
/// or a prefix followed by `/**` which matches the prefix itself and anything
/// below it.
pub fn path_matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix("/**") {
        Some("") => true,
        Some(prefix) => path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/')),
        None => path == pattern,
    }
}

/// is_allowed
///
/// Evaluates the matrix for an authenticated caller. The first rule whose
/// method and pattern match decides; a request matching no rule is allowed
/// for any authenticated role.
pub fn is_allowed(role: &str, method: &Method, path: &str) -> bool {
    for rule in ACCESS_POLICY {
        let method_matches = rule.method.as_ref().map(|m| m == method).unwrap_or(true);
        if method_matches && path_matches(rule.pattern, path) {
            return rule.roles.is_empty() || rule.roles.contains(&role);
        }
    }
    true
}

/// authorize
///
/// The middleware enforcing the matrix on every protected route. The `AuthUser`
/// extractor runs first: a missing or invalid credential is rejected with a
/// structured 401 before this body executes. Given a resolved identity, the
/// request is permitted or answered with a structured 403 — controllers never
/// see a request their caller was not entitled to make.
pub async fn authorize(
    auth_user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if is_allowed(&auth_user.role, &method, &path) {
        Ok(next.run(request).await)
    } else {
        tracing::debug!(
            "authorization denied: role={}, method={}, path={}",
            auth_user.role,
            method,
            path
        );
        Err(ApiError::Forbidden(
            "Insufficient permissions for this operation".to_string(),
        ))
    }
}
