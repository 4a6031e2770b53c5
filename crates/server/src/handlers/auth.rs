//! # Authentication Handlers
//!
//! Self registration and password login.

use auth::{
    create_access_token,
    hash_password,
    secrecy::{ExposeSecret, SecretString},
    validate_password_strength,
    verify_password,
};
use axum::{http::StatusCode, Json};
use entity::{profiles, users, Users};
use error::{AppError, Result, ResultExt};
use logging::log_auth_event;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::info;
use validator::Validate;

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        users::UserResponse,
    },
    AppState,
};

/// Lower-cased, trimmed email used for storage and lookups.
pub(crate) fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// Rejects passwords that fail the strength rules.
pub(crate) fn check_password_strength(password: &str) -> Result<()> {
    validate_password_strength(password).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        AppError::validation(messages.join("; "))
    })
}

/// Hashes a raw password with the configured costs.
pub(crate) fn hash_raw_password(state: &AppState, password: String) -> Result<String> {
    let hash = hash_password(
        &SecretString::from(password),
        Some(state.password_config.clone()),
    )
    .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.expose_secret().to_string())
}

/// 409 when another account already uses the email or phone number.
pub(crate) async fn ensure_contact_unique<C: ConnectionTrait>(
    db: &C,
    email: Option<&str>,
    phone_number: Option<&str>,
    exclude_user: Option<i32>,
) -> Result<()> {
    let others = |query: sea_orm::Select<Users>| {
        match exclude_user {
            Some(id) => query.filter(users::Column::Id.ne(id)),
            None => query,
        }
    };

    if let Some(email) = email {
        let taken = others(Users::find().filter(users::Column::Email.eq(email)))
            .one(db)
            .await?;
        if taken.is_some() {
            return Err(AppError::conflict("A user with this email already exists"));
        }
    }
    if let Some(phone_number) = phone_number {
        let taken = others(Users::find().filter(users::Column::PhoneNumber.eq(phone_number)))
            .one(db)
            .await?;
        if taken.is_some() {
            return Err(AppError::conflict("A user with this phone number already exists"));
        }
    }
    Ok(())
}

/// Register a new account
///
/// Creates the user and an empty profile in one transaction.
pub async fn register_handler(state: &AppState, req: RegisterRequest) -> Result<(StatusCode, Json<UserResponse>)> {
    req.validate()?;
    check_password_strength(&req.password)?;

    let email = normalize_email(&req.email);
    let phone_number = req.phone_number.as_deref().map(str::trim).filter(|p| !p.is_empty());

    let txn = state.db.begin().await?;
    ensure_contact_unique(&txn, Some(&email), phone_number, None).await?;

    let user = users::ActiveModel {
        email: Set(email),
        password_hash: Set(hash_raw_password(state, req.password)?),
        first_name: Set(req.first_name.trim().to_string()),
        last_name: Set(req.last_name.trim().to_string()),
        phone_number: Set(phone_number.map(str::to_string)),
        is_corporate_account: Set(false),
        is_superuser: Set(false),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .db_context("create user")?;

    let profile = profiles::ActiveModel {
        user_id:     Set(user.id),
        telegram_id: Set(None),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(user_id = %user.id, email = %user.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new(&user, Some(&profile))),
    ))
}

/// Exchange email and password for an access token
pub async fn login_handler(state: &AppState, req: LoginRequest) -> Result<Json<LoginResponse>> {
    req.validate()?;

    let invalid = || AppError::unauthorized("Invalid email or password");

    let user = Users::find()
        .filter(users::Column::Email.eq(normalize_email(&req.email)))
        .one(&state.db)
        .await?
        .ok_or_else(invalid)?;

    if verify_password(&SecretString::from(req.password), &user.password_hash).is_err() {
        log_auth_event!("login", user.id, false);
        return Err(invalid());
    }

    if !user.is_active {
        log_auth_event!("login", user.id, false);
        return Err(AppError::unauthorized("User account is not active"));
    }

    let access_token = create_access_token(&state.jwt_config, user.id, &user.email)?;
    let profile = profiles::Entity::find_by_id(user.id).one(&state.db).await?;

    log_auth_event!("login", user.id, true);

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_seconds,
        user: UserResponse::new(&user, profile.as_ref()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Anna@Example.COM "), "anna@example.com");
    }

    #[test]
    fn test_weak_password_is_validation_error() {
        let err = check_password_strength("onlyletters").unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.message().contains("digit"));
        assert!(check_password_strength("letters4nd").is_ok());
    }
}
