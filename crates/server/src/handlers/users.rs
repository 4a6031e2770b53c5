//! # User Handlers
//!
//! The caller's own account and the user directory used when inviting people.

use auth::secrecy::SecretString;
use axum::{http::StatusCode, Json};
use entity::{profiles, users, Profiles, Users};
use error::{AppError, Paginated, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    EntityTrait,
    IntoActiveModel,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    Set,
    TransactionTrait,
};
use tracing::info;
use validator::Validate;

use super::auth::{check_password_strength, ensure_contact_unique, hash_raw_password, normalize_email};
use crate::{
    dto::{
        users::{ChangePasswordRequest, UpdateMeRequest, UserResponse, UserSearchQuery},
        UserShort,
    },
    middleware::auth::AuthenticatedUser,
    utils::{icontains, paging, search_term},
    AppState,
};

async fn load_user(state: &AppState, user_id: i32) -> Result<users::Model> {
    Users::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// The caller's account with profile
pub async fn get_me_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<UserResponse>> {
    let account = load_user(state, user.id).await?;
    let profile = Profiles::find_by_id(user.id).one(&state.db).await?;
    Ok(Json(UserResponse::new(&account, profile.as_ref())))
}

/// Partially update the caller's account
///
/// Email and phone number stay unique across accounts. `telegram_id` lives
/// in the profile, which is created on first write if missing.
pub async fn update_me_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: UpdateMeRequest,
) -> Result<Json<UserResponse>> {
    req.validate()?;

    let email = req.email.as_deref().map(normalize_email);
    let phone_number = req.phone_number.as_deref().map(str::trim).map(str::to_string);

    let txn = state.db.begin().await?;
    ensure_contact_unique(
        &txn,
        email.as_deref(),
        phone_number.as_deref().filter(|p| !p.is_empty()),
        Some(user.id),
    )
    .await?;

    let account = Users::find_by_id(user.id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let mut active = account.into_active_model();
    if let Some(first_name) = req.first_name {
        active.first_name = Set(first_name.trim().to_string());
    }
    if let Some(last_name) = req.last_name {
        active.last_name = Set(last_name.trim().to_string());
    }
    if let Some(email) = email {
        active.email = Set(email);
    }
    if let Some(phone_number) = phone_number {
        active.phone_number = Set(Some(phone_number).filter(|p| !p.is_empty()));
    }
    let account = active.update(&txn).await?;

    let profile = match (Profiles::find_by_id(user.id).one(&txn).await?, req.telegram_id) {
        (Some(existing), Some(telegram_id)) => {
            let mut profile = existing.into_active_model();
            profile.telegram_id = Set(Some(telegram_id).filter(|t| !t.is_empty()));
            Some(profile.update(&txn).await?)
        },
        (None, Some(telegram_id)) => {
            Some(
                profiles::ActiveModel {
                    user_id:     Set(user.id),
                    telegram_id: Set(Some(telegram_id).filter(|t| !t.is_empty())),
                }
                .insert(&txn)
                .await?,
            )
        },
        (existing, None) => existing,
    };
    txn.commit().await?;

    info!(user_id = %user.id, "Profile updated");

    Ok(Json(UserResponse::new(&account, profile.as_ref())))
}

/// Change the caller's password
pub async fn change_password_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: ChangePasswordRequest,
) -> Result<StatusCode> {
    req.validate()?;

    let account = load_user(state, user.id).await?;
    if auth::verify_password(&SecretString::from(req.old_password), &account.password_hash).is_err() {
        return Err(AppError::bad_request("The old password is incorrect."));
    }
    check_password_strength(&req.new_password)?;

    let mut active = account.into_active_model();
    active.password_hash = Set(hash_raw_password(state, req.new_password)?);
    active.update(&state.db).await?;

    logging::log_auth_event!("password_change", user.id, true);

    Ok(StatusCode::NO_CONTENT)
}

/// Search people who can be invited into an organisation
///
/// Superusers, corporate accounts and inactive users are never listed.
pub async fn search_users_handler(
    state: &AppState,
    _user: AuthenticatedUser,
    query: UserSearchQuery,
) -> Result<Json<Paginated<UserShort>>> {
    let (page, per_page) = paging(query.page, query.per_page);

    let mut select = Users::find()
        .filter(users::Column::IsSuperuser.eq(false))
        .filter(users::Column::IsCorporateAccount.eq(false))
        .filter(users::Column::IsActive.eq(true));

    if let Some(term) = search_term(query.search.as_deref()) {
        select = select.filter(
            Condition::any()
                .add(icontains(users::Column::Email, term))
                .add(icontains(users::Column::FirstName, term))
                .add(icontains(users::Column::LastName, term)),
        );
    }

    let paginator = select
        .order_by_asc(users::Column::LastName)
        .order_by_asc(users::Column::FirstName)
        .order_by_asc(users::Column::Id)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page - 1).await?;

    Ok(Json(Paginated::new(
        rows.iter().map(UserShort::from).collect(),
        page,
        per_page,
        total,
    )))
}
