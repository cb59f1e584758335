use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, Uri, header, request::Parts},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use ong_portal::{
    AppState,
    auth::{AuthUser, Claims, issue_token},
    config::{AppConfig, Env},
    error::ApiError,
    models::{
        CreateMemberRequest, Member, NewSlide, NewUser, Organization, Role, Slide,
        UpdateMemberRequest, User,
    },
    repository::Repository,
};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

// --- Mock Repository for Auth Logic ---

// The extractor only ever calls get_user; everything else is a placeholder.
#[derive(Default)]
struct MockAuthRepo {
    user_to_return: Option<User>,
}

#[async_trait]
impl Repository for MockAuthRepo {
    async fn get_user(&self, _id: Uuid) -> Option<User> {
        self.user_to_return.clone()
    }

    // Implement all other unused trait methods with placeholders (ensuring they compile)
    async fn list_members(&self, _limit: i64, _offset: i64) -> Vec<Member> {
        vec![]
    }
    async fn count_members(&self) -> i64 {
        0
    }
    async fn create_member(&self, _req: CreateMemberRequest) -> Option<Member> {
        None
    }
    async fn update_member(&self, _id: Uuid, _req: UpdateMemberRequest) -> Option<Member> {
        None
    }
    async fn delete_member(&self, _id: Uuid) -> bool {
        false
    }
    async fn get_slide(&self, _id: Uuid) -> Option<Slide> {
        None
    }
    async fn get_organization_slides(&self, _organization_id: Uuid) -> Vec<Slide> {
        vec![]
    }
    async fn max_slide_order(&self, _organization_id: Uuid) -> Option<i32> {
        None
    }
    async fn create_slide(&self, _slide: NewSlide) -> Option<Slide> {
        None
    }
    async fn delete_slide(&self, _id: Uuid) -> bool {
        false
    }
    async fn get_organization(&self, _id: Uuid) -> Option<Organization> {
        None
    }
    async fn find_user_by_email(&self, _email: &str) -> Option<User> {
        None
    }
    async fn create_user(&self, _user: NewUser) -> Option<User> {
        None
    }
    async fn find_role_by_name(&self, _name: &str) -> Option<Role> {
        None
    }
}

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_USER_ID: Uuid = Uuid::from_u128(1);

fn test_user(id: Uuid, role: &str) -> User {
    User {
        id,
        email: "test@example.com".to_string(),
        role: role.to_string(),
        ..User::default()
    }
}

fn create_token(user_id: Uuid, exp: u64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        exp: exp as usize,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn create_app_state(env: Env, repo: MockAuthRepo, jwt_secret: String) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = jwt_secret;

    AppState::new(
        Arc::new(repo),
        Arc::new(ong_portal::storage::MockStorageService::new()),
        config,
    )
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let token = create_token(TEST_USER_ID, now_secs() + 3600);

    let mock_repo = MockAuthRepo {
        user_to_return: Some(test_user(TEST_USER_ID, "USER")),
    };

    let app_state = create_app_state(Env::Production, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.id, TEST_USER_ID);
    assert_eq!(user.role, "USER");
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthorized(_))));
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    // Expired an hour ago, well beyond the decoder's default leeway.
    let token = create_token(TEST_USER_ID, now_secs() - 3600);

    let mock_repo = MockAuthRepo {
        user_to_return: Some(test_user(TEST_USER_ID, "USER")),
    };
    let app_state = create_app_state(Env::Production, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthorized(_))));
}

#[tokio::test]
async fn test_auth_failure_when_user_deleted_after_issuance() {
    let token = create_token(TEST_USER_ID, now_secs() + 3600);

    // Valid signature, but the repository no longer knows the subject.
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthorized(_))));
}

#[tokio::test]
async fn test_issued_token_round_trips_through_extractor() {
    let token = issue_token(TEST_USER_ID, TEST_JWT_SECRET).unwrap();

    let mock_repo = MockAuthRepo {
        user_to_return: Some(test_user(TEST_USER_ID, "ADMIN")),
    };
    let app_state = create_app_state(Env::Production, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state)
        .await
        .unwrap();
    assert_eq!(auth_user.id, TEST_USER_ID);
    assert_eq!(auth_user.role, "ADMIN");
}

#[tokio::test]
async fn test_local_bypass_success() {
    let mock_user_id = Uuid::new_v4();
    let mock_repo = MockAuthRepo {
        user_to_return: Some(test_user(mock_user_id, "ADMIN")),
    };
    let app_state = create_app_state(Env::Local, mock_repo, TEST_JWT_SECRET.to_string());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.id, mock_user_id);
    assert_eq!(user.role, "ADMIN");
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let mock_user_id = Uuid::new_v4();
    let app_state = create_app_state(
        Env::Production,
        MockAuthRepo::default(),
        TEST_JWT_SECRET.to_string(),
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    // Provide ONLY the local bypass header
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(auth_user, Err(ApiError::Unauthorized(_))));
}
