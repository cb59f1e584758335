use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        CreateMemberRequest, CreateSlideRequest, LoginRequest, Member, NewSlide, NewUser,
        RegisterRequest, Slide, UpdateMemberRequest, User,
    },
    policy::ROLE_USER,
    repository::RepositoryState,
    storage::StorageState,
};

/// Fixed page size for the member listing.
pub const PAGE_SIZE: i64 = 10;

/// MemberPage
///
/// The service-level result of a paginated listing: the page content plus
/// existence flags for the adjacent pages. The service deliberately returns
/// booleans, not URLs — rendering page links is the controller's concern.
#[derive(Debug, Clone, Default)]
pub struct MemberPage {
    pub members: Vec<Member>,
    pub has_previous: bool,
    pub has_next: bool,
}

/// page_flags
///
/// Previous/next page existence for a zero-based page index. A previous page
/// exists when page > 0 and page - 1 is a valid page; a next page exists when
/// page + 1 is a valid page. Both are false for an empty table.
fn page_flags(page: i64, total: i64, page_size: i64) -> (bool, bool) {
    let total_pages = (total + page_size - 1) / page_size;
    let has_previous = page > 0 && page - 1 < total_pages;
    let has_next = page + 1 < total_pages;
    (has_previous, has_next)
}

/// MemberService
///
/// Business rules for the member listing and lifecycle: shape validation on
/// creation, existence-check-before-mutate on update/delete, pagination flags.
#[derive(Clone)]
pub struct MemberService {
    repo: RepositoryState,
}

impl MemberService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// get_all
    ///
    /// One page of members plus the adjacent-page flags. Negative page indices
    /// are clamped to the first page.
    pub async fn get_all(&self, page: i64) -> MemberPage {
        let page = page.max(0);
        let total = self.repo.count_members().await;
        let members = self.repo.list_members(PAGE_SIZE, page * PAGE_SIZE).await;
        let (has_previous, has_next) = page_flags(page, total, PAGE_SIZE);

        MemberPage {
            members,
            has_previous,
            has_next,
        }
    }

    /// create_member
    ///
    /// Validates the input shape before invoking persistence; a new entity
    /// needs no existence check.
    pub async fn create_member(&self, req: CreateMemberRequest) -> Result<Member, ApiError> {
        if req.name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Member name must not be empty".to_string(),
            ));
        }

        self.repo
            .create_member(req)
            .await
            .ok_or_else(|| ApiError::Internal("failed to persist member".to_string()))
    }

    /// update_member
    ///
    /// Applies a partial patch; a miss is a typed NotFound, never a silent no-op.
    pub async fn update_member(
        &self,
        id: Uuid,
        req: UpdateMemberRequest,
    ) -> Result<Member, ApiError> {
        self.repo
            .update_member(id, req)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("Member with id: {} not found", id)))
    }

    /// delete_member
    pub async fn delete_member(&self, id: Uuid) -> Result<(), ApiError> {
        if self.repo.delete_member(id).await {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!(
                "Member with id: {} not found",
                id
            )))
        }
    }
}

/// SlideService
///
/// The carousel lifecycle, including the one multi-step rule in the system:
/// organization resolution -> order computation -> image decode/upload ->
/// persistence. All checks and the upload precede the single INSERT, so any
/// failure leaves no slide row behind.
#[derive(Clone)]
pub struct SlideService {
    repo: RepositoryState,
    storage: StorageState,
}

impl SlideService {
    pub fn new(repo: RepositoryState, storage: StorageState) -> Self {
        Self { repo, storage }
    }

    /// get_slide
    pub async fn get_slide(&self, id: Uuid) -> Result<Slide, ApiError> {
        self.repo
            .get_slide(id)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("Slide with id: {} not found", id)))
    }

    /// organization_slides
    ///
    /// The carousel read path: all slides of one organization in display order.
    /// The organization itself must exist, mirroring the write-side check.
    pub async fn organization_slides(&self, organization_id: Uuid) -> Result<Vec<Slide>, ApiError> {
        self.repo
            .get_organization(organization_id)
            .await
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "Organization with id: {} not found",
                    organization_id
                ))
            })?;

        Ok(self.repo.get_organization_slides(organization_id).await)
    }

    /// delete_slide
    pub async fn delete_slide(&self, id: Uuid) -> Result<(), ApiError> {
        if self.repo.delete_slide(id).await {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("Slide with id: {} not found", id)))
        }
    }

    /// create_slide
    ///
    /// 1. Resolve the organization (explicit check, not a foreign-key error).
    /// 2. Without an explicit order, assign max(existing) + 1; an organization
    ///    with no slides yet is treated as max = 0, so the first slide gets 1.
    /// 3. Decode the base64 payload and upload it, persisting the returned
    ///    reference instead of the raw bytes.
    pub async fn create_slide(&self, req: CreateSlideRequest) -> Result<Slide, ApiError> {
        let organization = self
            .repo
            .get_organization(req.organization_id)
            .await
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "Organization with id: {} not found",
                    req.organization_id
                ))
            })?;

        let organization_order = match req.organization_order {
            Some(order) => order,
            None => self.repo.max_slide_order(organization.id).await.unwrap_or(0) + 1,
        };

        let (bytes, content_type) = decode_image(&req.image)?;
        let extension = content_type.split('/').nth(1).unwrap_or("bin");
        let key = format!("slides/{}.{}", Uuid::new_v4(), extension);

        let image_url = self
            .storage
            .upload_file(&key, bytes, content_type)
            .await
            .map_err(|e| ApiError::Internal(format!("image upload failed: {}", e)))?;

        self.repo
            .create_slide(NewSlide {
                organization_id: organization.id,
                image_url,
                text: req.text,
                organization_order,
            })
            .await
            .ok_or_else(|| ApiError::Internal("failed to persist slide".to_string()))
    }
}

/// decode_image
///
/// Accepts either a raw base64 string or a full `data:<mime>;base64,<payload>`
/// URL; the MIME prefix, when present, supplies the stored content type.
fn decode_image(payload: &str) -> Result<(Vec<u8>, &str), ApiError> {
    let (content_type, data) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (meta, data) = rest.split_once(',').ok_or_else(|| {
                ApiError::Validation("Malformed data URL in image payload".to_string())
            })?;
            let mime = meta.strip_suffix(";base64").unwrap_or(meta);
            (if mime.is_empty() { "image/jpeg" } else { mime }, data)
        }
        None => ("image/jpeg", payload),
    };

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|_| ApiError::Validation("Image payload is not valid base64".to_string()))?;

    if bytes.is_empty() {
        return Err(ApiError::Validation(
            "Image payload must not be empty".to_string(),
        ));
    }

    Ok((bytes, content_type))
}

/// UserService
///
/// Registration and login. Credentials are hashed with argon2 before they
/// reach the repository; the plaintext never leaves this module.
#[derive(Clone)]
pub struct UserService {
    repo: RepositoryState,
}

impl UserService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// register
    ///
    /// Resolves the "USER" reference role (its absence is a configuration
    /// fault, not a client error), hashes the password, and persists the new
    /// identity. The caller receives the domain record; the handler strips it
    /// down to the sanitized response shape.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, ApiError> {
        if req.email.trim().is_empty() || req.password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password must not be empty".to_string(),
            ));
        }

        if self.repo.find_user_by_email(&req.email).await.is_some() {
            return Err(ApiError::Validation(
                "Email is already registered".to_string(),
            ));
        }

        let role = self.repo.find_role_by_name(ROLE_USER).await.ok_or_else(|| {
            ApiError::Internal(format!(
                "reference role '{}' missing from database",
                ROLE_USER
            ))
        })?;

        let password_hash = hash_password(&req.password)?;

        self.repo
            .create_user(NewUser {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                password_hash,
                role_id: role.id,
            })
            .await
            .ok_or_else(|| ApiError::Internal("failed to persist user".to_string()))
    }

    /// login
    ///
    /// Unknown email and wrong password produce the same rejection, so the
    /// endpoint cannot be used to enumerate accounts.
    pub async fn login(&self, req: LoginRequest) -> Result<User, ApiError> {
        let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .repo
            .find_user_by_email(&req.email)
            .await
            .ok_or_else(invalid)?;

        if !verify_password(&req.password, &user.password) {
            return Err(invalid());
        }

        Ok(user)
    }
}

/// hash_password
///
/// One-way salted argon2 hash, serialized as a PHC string.
pub fn hash_password(plaintext: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))
}

/// verify_password
///
/// True only when the plaintext matches the stored PHC hash. A hash that fails
/// to parse counts as a mismatch rather than an error.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
