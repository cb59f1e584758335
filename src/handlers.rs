use crate::{
    AppState,
    error::ApiError,
    models::{
        AuthResponse, CreateMemberRequest, CreateSlideRequest, LoginRequest, Member,
        MemberListResponse, RegisterRequest, Slide, UpdateMemberRequest, UserResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// PageParam
///
/// Defines the accepted query parameters for the member listing endpoint
/// (GET /members). Used by Axum's Query extractor to safely bind the page index.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PageParam {
    /// Zero-based page index; defaults to the first page.
    #[serde(default)]
    pub page: i64,
}

// --- Member Handlers ---

/// get_members
///
/// [Protected Route: USER/ADMIN] Paginated member listing.
///
/// The service returns only the page content and the adjacent-page existence
/// flags; this handler turns the flags into navigable URLs, so the pagination
/// rule stays testable without any HTTP context.
#[utoipa::path(
    get,
    path = "/members",
    params(PageParam),
    responses((status = 200, description = "One page of members", body = MemberListResponse))
)]
pub async fn get_members(
    State(state): State<AppState>,
    Query(params): Query<PageParam>,
) -> Json<MemberListResponse> {
    let page = params.page.max(0);
    let result = state.members.get_all(page).await;

    let previous_page_url = result
        .has_previous
        .then(|| format!("/members?page={}", page - 1));
    let next_page_url = result
        .has_next
        .then(|| format!("/members?page={}", page + 1));

    Json(MemberListResponse {
        members: result.members,
        previous_page_url,
        next_page_url,
    })
}

/// create_member
///
/// [Protected Route: ADMIN] Submits a new member record.
/// Shape validation (non-empty name) happens in the service and surfaces as a
/// structured 400.
#[utoipa::path(
    post,
    path = "/members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Created", body = Member),
        (status = 400, description = "Invalid shape", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    Json(payload): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let member = state.members.create_member(payload).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// update_member
///
/// [Protected Route: ADMIN] Applies a partial patch to an existing member.
#[utoipa::path(
    put,
    path = "/members/{id}",
    params(("id" = Uuid, Path, description = "Member ID")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Updated", body = Member),
        (status = 404, description = "Not Found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMemberRequest>,
) -> Result<Json<Member>, ApiError> {
    let member = state.members.update_member(id, payload).await?;
    Ok(Json(member))
}

/// delete_member
///
/// [Protected Route: ADMIN] Removes a member by id. A miss is a structured
/// 404, never a silent success.
#[utoipa::path(
    delete,
    path = "/members/{id}",
    params(("id" = Uuid, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.members.delete_member(id).await?;
    Ok(StatusCode::OK)
}

// --- Slide Handlers ---

/// get_slide
///
/// [Protected Route: USER/ADMIN] Retrieves a single carousel slide.
#[utoipa::path(
    get,
    path = "/slides/{id}",
    params(("id" = Uuid, Path, description = "Slide ID")),
    responses(
        (status = 200, description = "Found", body = Slide),
        (status = 404, description = "Not Found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_slide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Slide>, ApiError> {
    let slide = state.slides.get_slide(id).await?;
    Ok(Json(slide))
}

/// get_organization_slides
///
/// [Protected Route: USER/ADMIN] The carousel read path: every slide of one
/// organization, ordered by its display sequence.
#[utoipa::path(
    get,
    path = "/organizations/{id}/slides",
    params(("id" = Uuid, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Slides in display order", body = [Slide]),
        (status = 404, description = "Organization Not Found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_organization_slides(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Slide>>, ApiError> {
    let slides = state.slides.organization_slides(id).await?;
    Ok(Json(slides))
}

/// create_slide
///
/// [Protected Route: ADMIN] Creates a carousel slide: the service validates
/// the organization, computes the display order when none is given, uploads
/// the decoded image, and persists the stored reference.
#[utoipa::path(
    post,
    path = "/slides",
    request_body = CreateSlideRequest,
    responses(
        (status = 201, description = "Created", body = Slide),
        (status = 400, description = "Invalid image payload", body = crate::error::ErrorResponse),
        (status = 404, description = "Organization Not Found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_slide(
    State(state): State<AppState>,
    Json(payload): Json<CreateSlideRequest>,
) -> Result<(StatusCode, Json<Slide>), ApiError> {
    let slide = state.slides.create_slide(payload).await?;
    Ok((StatusCode::CREATED, Json(slide)))
}

/// delete_slide
///
/// [Protected Route: ADMIN] Removes a slide by id.
#[utoipa::path(
    delete,
    path = "/slides/{id}",
    params(("id" = Uuid, Path, description = "Slide ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_slide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.slides.delete_slide(id).await?;
    Ok(StatusCode::OK)
}

// --- Auth Handlers ---

/// register_user
///
/// [Public Route] Registers a new identity with the default "USER" role.
/// The response is the sanitized user shape — the argon2 hash never leaves
/// the service layer, and the plaintext is never persisted or logged.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = UserResponse),
        (status = 400, description = "Invalid shape or duplicate email", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.users.register(payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// login
///
/// [Public Route] Verifies the credentials and issues a 24-hour bearer token.
/// Unknown email and wrong password are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state.users.login(payload).await?;
    let token = crate::auth::issue_token(user.id, &state.config.jwt_secret)?;
    Ok(Json(AuthResponse { token }))
}
