use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use db::models::CreateUser;
use db::UserRepository;
use serde::{Deserialize, Serialize};
use shared::types::UserId;
use shared::{AppError, DomainError};

use crate::{
    auth::{create_token, AuthUser},
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
    pub rating_average: Option<String>,
    pub review_count: i32,
}

impl From<db::models::User> for UserResponse {
    fn from(user: db::models::User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            bio: user.bio,
            location: user.location,
            avatar: user.avatar,
            rating_average: user.rating_average.map(|r| r.to_string()),
            review_count: user.review_count,
        }
    }
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ApiError::from(AppError::Internal("password hashing failed".to_string())))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::from(AppError::Validation("invalid email".to_string())));
    }
    if req.password.len() < 8 {
        return Err(ApiError::from(AppError::Validation(
            "password must be at least 8 characters".to_string(),
        )));
    }

    let password_hash = hash_password(&req.password)?;

    let user = UserRepository::create(
        &state.pool,
        CreateUser {
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
        },
    )
    .await?;

    let token = create_token(user.id, &state.jwt_secret)
        .map_err(|_| ApiError::from(AppError::Internal("token creation failed".to_string())))?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = UserRepository::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| ApiError::from(DomainError::InvalidCredentials))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::from(DomainError::InvalidCredentials));
    }

    let token = create_token(user.id, &state.jwt_secret)
        .map_err(|_| ApiError::from(AppError::Internal("token creation failed".to_string())))?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /auth/me
pub async fn get_self(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user = load_user(&state, auth.user_id).await?;
    Ok(Json(user.into()))
}

async fn load_user(state: &AppState, id: UserId) -> ApiResult<db::models::User> {
    UserRepository::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::from(AppError::Unauthorized))
}
