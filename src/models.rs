use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Member
///
/// Represents an NGO member record from the `members` table: the people shown
/// on the organization's "who we are" page. Paginated listing is the primary
/// access pattern for this entity.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Member {
    pub id: Uuid,
    // The only mandatory display field; validated non-empty on creation.
    pub name: String,

    // Optional social links shown alongside the member.
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub linkedin_url: Option<String>,

    // Stored image reference (object storage URL or key).
    pub image: Option<String>,
    pub description: Option<String>,

    // Timestamp handling for database integration and JSON serialization.
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Organization
///
/// Represents an NGO organization record from the `organizations` table.
/// In this slice it is reference data: Slide creation validates the
/// organization's existence before any write happens.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// Slide
///
/// Represents one entry of an organization's image carousel, from the `slides`
/// table. `organization_order` establishes the display sequence within the
/// owning organization; `image_url` is the stored object reference produced by
/// the upload pipeline, never the raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Slide {
    pub id: Uuid,
    // FK to organizations.id (owner of the carousel).
    pub organization_id: Uuid,
    pub image_url: String,
    pub text: Option<String>,
    pub organization_order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Role
///
/// Static reference data from the `roles` table ("ADMIN", "USER"). Looked up
/// by name during user registration; a missing "USER" row is a configuration
/// fault, not a client error.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub creation_date: DateTime<Utc>,
}

/// User
///
/// The canonical identity record from the `users` table, joined with the role
/// name for authorization decisions. The `password` field holds the argon2
/// hash — this struct is internal and never serialized to a response; clients
/// receive the sanitized `UserResponse` instead.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    // Argon2 PHC string, never plaintext.
    pub password: String,
    // Role name resolved via JOIN with `roles` ("ADMIN" / "USER").
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// --- Request Payloads (Input Schemas) ---

/// CreateMemberRequest
///
/// Input payload for submitting a new member (POST /members).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateMemberRequest {
    pub name: String,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// UpdateMemberRequest
///
/// Partial update payload for modifying an existing member (PUT /members/{id}).
///
/// *Optimization*: Uses `Option<T>` for all fields and `#[serde(skip_serializing_if = "Option::is_none")]`
/// to efficiently handle partial updates, ensuring only provided fields are included in the JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateMemberRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// CreateSlideRequest
///
/// Input payload for creating a carousel slide (POST /slides).
/// The image travels as a base64 text payload (optionally a full `data:` URL);
/// the service decodes it and uploads the bytes to object storage, persisting
/// only the returned reference.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateSlideRequest {
    pub organization_id: Uuid,
    /// Base64-encoded image payload.
    #[schema(example = "iVBORw0KGgoAAAANSUhEUg...")]
    pub image: String,
    pub text: Option<String>,
    /// Explicit display position. When omitted, the service assigns
    /// (current max order within the organization) + 1.
    pub organization_order: Option<i32>,
}

/// RegisterRequest
///
/// Input payload for the public registration endpoint (POST /auth/register).
/// The password is hashed with argon2 before persistence and is never logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// LoginRequest
///
/// Input payload for the public login endpoint (POST /auth/login).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// --- Response Schemas (Output) ---

/// MemberListResponse
///
/// Output schema for the paginated member listing (GET /members?page=N).
/// The page URLs are present only when the corresponding page exists; the
/// service computes the existence flags and the handler renders the URLs.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct MemberListResponse {
    pub members: Vec<Member>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_url: Option<String>,
}

/// UserResponse
///
/// Sanitized registration/identity output. Carries no credential material by
/// construction — there is no password field to accidentally serialize.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
        }
    }
}

/// AuthResponse
///
/// Output schema for a successful login: the signed bearer token the client
/// presents on every subsequent request.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
}

/// NewUser
///
/// Internal insertion record assembled by the user service after role
/// resolution and password hashing. Not a wire type.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Already-hashed credential (argon2 PHC string).
    pub password_hash: String,
    pub role_id: i32,
}

/// NewSlide
///
/// Internal insertion record assembled by the slide service once the
/// organization is resolved, the order computed, and the image uploaded.
#[derive(Debug, Clone)]
pub struct NewSlide {
    pub organization_id: Uuid,
    pub image_url: String,
    pub text: Option<String>,
    pub organization_order: i32,
}
