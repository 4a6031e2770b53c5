//! # Authentication Middleware
//!
//! JWT authentication middleware for protecting API endpoints.

use auth::{extract_bearer_token, validate_token};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use entity::Users;
use error::AppError;
use sea_orm::EntityTrait;

use crate::AppState;

/// User information extracted from JWT token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User ID
    pub id:    i32,
    /// User email
    pub email: String,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the JWT token
/// 3. Checks the account still exists and is active
/// 4. Adds authenticated user info to request extensions
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match authenticate(&state, request.headers()).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        },
        Err(err) => {
            let mut response = err.into_response();
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
            response
        },
    }
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid authorization header encoding"))?;

    let token =
        extract_bearer_token(auth_header).ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

    let claims = validate_token(&state.jwt_config, token)?;
    let user_id = claims.user_id()?;

    let user = Users::find_by_id(user_id)
        .one(&state.db)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::unauthorized("User account is not active"))?;

    tracing::Span::current().record("user_id", user.id);
    Ok(AuthenticatedUser {
        id:    user.id,
        email: user.email,
    })
}
