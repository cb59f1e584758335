use crate::models::{
    CreateMemberRequest, Member, NewSlide, NewUser, Organization, Role, Slide,
    UpdateMemberRequest, User,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the services to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable and usable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Members ---
    // Paginated listing; the page window is computed by the service.
    async fn list_members(&self, limit: i64, offset: i64) -> Vec<Member>;
    async fn count_members(&self) -> i64;
    // Creates return None on a database fault (logged), so the boundary can
    // answer with a structured 500 instead of a worker panic.
    async fn create_member(&self, req: CreateMemberRequest) -> Option<Member>;
    // Partial update via COALESCE; None when the member does not exist.
    async fn update_member(&self, id: Uuid, req: UpdateMemberRequest) -> Option<Member>;
    // True only if a row was actually removed.
    async fn delete_member(&self, id: Uuid) -> bool;

    // --- Slides ---
    async fn get_slide(&self, id: Uuid) -> Option<Slide>;
    // Carousel read path: all slides of one organization in display order.
    async fn get_organization_slides(&self, organization_id: Uuid) -> Vec<Slide>;
    // Highest organization_order within the organization; None when it has no slides.
    async fn max_slide_order(&self, organization_id: Uuid) -> Option<i32>;
    async fn create_slide(&self, slide: NewSlide) -> Option<Slide>;
    async fn delete_slide(&self, id: Uuid) -> bool;

    // --- Organizations ---
    // Existence check performed in application code before a slide write.
    async fn get_organization(&self, id: Uuid) -> Option<Organization>;

    // --- Users & Roles ---
    // Resolves the user's identity and current role; used on every authenticated request.
    async fn get_user(&self, id: Uuid) -> Option<User>;
    async fn find_user_by_email(&self, email: &str) -> Option<User>;
    async fn create_user(&self, user: NewUser) -> Option<User>;
    // Reference-data lookup for registration ("USER").
    async fn find_role_by_name(&self, name: &str) -> Option<Role>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Shared projection for user rows; the role name is resolved via JOIN so the
// security layer always sees the current role, not the one at token issuance.
const USER_COLUMNS: &str = r#"
    u.id, u.first_name, u.last_name, u.email, u.password, r.name AS role, u.created_at
"#;

#[async_trait]
impl Repository for PostgresRepository {
    /// list_members
    ///
    /// Retrieves one page window of members, newest first. The limit/offset
    /// arithmetic lives in the member service so the pagination rule is testable
    /// without a database.
    async fn list_members(&self, limit: i64, offset: i64) -> Vec<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            SELECT id, name, facebook_url, instagram_url, linkedin_url,
                   image, description, created_at, updated_at
            FROM members
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_members error: {:?}", e);
            vec![]
        })
    }

    /// count_members
    ///
    /// Total member count, used to decide whether previous/next pages exist.
    async fn count_members(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("count_members error: {:?}", e);
                0
            })
    }

    /// create_member
    ///
    /// Inserts a new member row. Shape validation (non-empty name) has already
    /// happened in the service; a None here means a database fault.
    async fn create_member(&self, req: CreateMemberRequest) -> Option<Member> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members
                (id, name, facebook_url, instagram_url, linkedin_url, image, description,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            RETURNING id, name, facebook_url, instagram_url, linkedin_url,
                      image, description, created_at, updated_at
            "#,
        )
        .bind(new_id)
        .bind(req.name)
        .bind(req.facebook_url)
        .bind(req.instagram_url)
        .bind(req.linkedin_url)
        .bind(req.image)
        .bind(req.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| tracing::error!("create_member error: {:?}", e))
        .ok()
    }

    /// update_member
    ///
    /// Uses the PostgreSQL `COALESCE` function to efficiently handle `Option<T>` fields,
    /// only updating a column if the corresponding field in `req` is `Some`.
    /// Returns None when no member with this id exists.
    async fn update_member(&self, id: Uuid, req: UpdateMemberRequest) -> Option<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            UPDATE members
            SET name = COALESCE($2, name),
                facebook_url = COALESCE($3, facebook_url),
                instagram_url = COALESCE($4, instagram_url),
                linkedin_url = COALESCE($5, linkedin_url),
                image = COALESCE($6, image),
                description = COALESCE($7, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, facebook_url, instagram_url, linkedin_url,
                      image, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.facebook_url)
        .bind(req.instagram_url)
        .bind(req.linkedin_url)
        .bind(req.image)
        .bind(req.description)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_member error: {:?}", e);
            None
        })
    }

    /// delete_member
    ///
    /// Deletes by id. The `rows_affected` check distinguishes a real removal
    /// from a miss so the service can report NotFound instead of a silent no-op.
    async fn delete_member(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_member error: {:?}", e);
                false
            }
        }
    }

    /// get_slide
    async fn get_slide(&self, id: Uuid) -> Option<Slide> {
        sqlx::query_as::<_, Slide>(
            r#"
            SELECT id, organization_id, image_url, text, organization_order, created_at
            FROM slides
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_slide error: {:?}", e);
            None
        })
    }

    /// get_organization_slides
    ///
    /// All slides of one organization in carousel order (ascending).
    async fn get_organization_slides(&self, organization_id: Uuid) -> Vec<Slide> {
        sqlx::query_as::<_, Slide>(
            r#"
            SELECT id, organization_id, image_url, text, organization_order, created_at
            FROM slides
            WHERE organization_id = $1
            ORDER BY organization_order ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_organization_slides error: {:?}", e);
            vec![]
        })
    }

    /// max_slide_order
    ///
    /// MAX(organization_order) for the organization; NULL (None) when the
    /// organization has no slides yet. The +1 arithmetic and the zero default
    /// live in the slide service.
    async fn max_slide_order(&self, organization_id: Uuid) -> Option<i32> {
        sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(organization_order) FROM slides WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("max_slide_order error: {:?}", e);
            None
        })
    }

    /// create_slide
    ///
    /// Single INSERT; the organization existence check, order computation, and
    /// image upload have all completed before this point, so a failure anywhere
    /// earlier leaves no slide row behind.
    async fn create_slide(&self, slide: NewSlide) -> Option<Slide> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, Slide>(
            r#"
            INSERT INTO slides (id, organization_id, image_url, text, organization_order, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id, organization_id, image_url, text, organization_order, created_at
            "#,
        )
        .bind(new_id)
        .bind(slide.organization_id)
        .bind(slide.image_url)
        .bind(slide.text)
        .bind(slide.organization_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| tracing::error!("create_slide error: {:?}", e))
        .ok()
    }

    /// delete_slide
    async fn delete_slide(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM slides WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_slide error: {:?}", e);
                false
            }
        }
    }

    /// get_organization
    ///
    /// Existence/reference lookup used before slide writes and carousel reads.
    async fn get_organization(&self, id: Uuid) -> Option<Organization> {
        sqlx::query_as::<_, Organization>(
            "SELECT id, name, email, image FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_organization error: {:?}", e);
            None
        })
    }

    /// get_user
    ///
    /// Retrieves identity and current role for authentication and authorization.
    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON u.role_id = r.id WHERE u.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user error: {:?}", e);
            None
        })
    }

    /// find_user_by_email
    ///
    /// Login and duplicate-registration lookup.
    async fn find_user_by_email(&self, email: &str) -> Option<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON u.role_id = r.id WHERE u.email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("find_user_by_email error: {:?}", e);
            None
        })
    }

    /// create_user
    ///
    /// Uses a CTE (Common Table Expression) to perform the insert and the role
    /// join in one round trip, returning the enriched `User` record.
    async fn create_user(&self, user: NewUser) -> Option<User> {
        let new_id = Uuid::new_v4();
        sqlx::query_as::<_, User>(
            r#"
            WITH inserted AS (
                INSERT INTO users (id, first_name, last_name, email, password, role_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, NOW())
                RETURNING id, first_name, last_name, email, password, role_id, created_at
            )
            SELECT i.id, i.first_name, i.last_name, i.email, i.password, r.name AS role, i.created_at
            FROM inserted i JOIN roles r ON i.role_id = r.id
            "#,
        )
        .bind(new_id)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| tracing::error!("create_user error: {:?}", e))
        .ok()
    }

    /// find_role_by_name
    async fn find_role_by_name(&self, name: &str) -> Option<Role> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, creation_date FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("find_role_by_name error: {:?}", e);
            None
        })
    }
}
