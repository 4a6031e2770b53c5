//! The caller's own presence on a shift.

use axum::Json;
use entity::{replacement_members, ReplacementStatuses};
use error::{AppError, Result};
use logging::log_shift_event;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, Set};

use super::replacements::{caller_shift_member, visible_replacement};
use crate::{
    dto::{
        replacements::{ShiftMemberResponse, UpdateShiftMemberRequest},
        StatusItem,
    },
    middleware::auth::AuthenticatedUser,
    scheduling::{apply_status, validate_member_status_change},
    utils::Now,
    AppState,
};

/// Writes status and presence timestamps of a shift member.
pub(crate) async fn save_presence<C: ConnectionTrait>(
    db: &C,
    member: &replacement_members::Model,
) -> Result<replacement_members::Model> {
    let mut active = member.clone().into_active_model();
    active.status = Set(member.status);
    active.time_online = Set(member.time_online);
    active.time_offline = Set(member.time_offline);
    active.time_break_start = Set(member.time_break_start);
    active.time_break_end = Set(member.time_break_end);
    Ok(active.update(db).await?)
}

async fn to_response<C: ConnectionTrait>(db: &C, member: &replacement_members::Model) -> Result<ShiftMemberResponse> {
    let status = ReplacementStatuses::find_by_id(member.status.to_string())
        .one(db)
        .await?
        .ok_or_else(|| AppError::internal(format!("Unknown shift status {}", member.status)))?;
    Ok(ShiftMemberResponse {
        id:     member.id,
        status: StatusItem::from(status),
    })
}

async fn own_row(
    state: &AppState,
    user: &AuthenticatedUser,
    replacement_id: i32,
) -> Result<(entity::replacements::Model, replacement_members::Model)> {
    let (replacement, _) = visible_replacement(&state.db, replacement_id, user.id).await?;
    let member = caller_shift_member(&state.db, replacement.id, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("You are not on this shift"))?;
    Ok((replacement, member))
}

/// The caller's status on a shift
pub async fn get_shift_member_handler(
    state: &AppState,
    user: AuthenticatedUser,
    replacement_id: i32,
) -> Result<Json<ShiftMemberResponse>> {
    let (_, member) = own_row(state, &user, replacement_id).await?;
    Ok(Json(to_response(&state.db, &member).await?))
}

/// Clock in, clock out or mark oneself busy
pub async fn update_shift_member_handler(
    state: &AppState,
    user: AuthenticatedUser,
    replacement_id: i32,
    req: UpdateShiftMemberRequest,
) -> Result<Json<ShiftMemberResponse>> {
    let now = Now::current();
    let (replacement, mut member) = own_row(state, &user, replacement_id).await?;

    validate_member_status_change(replacement.date, &member, req.status, now.today())?;

    let previous = member.status;
    if apply_status(&mut member, req.status, now.utc) {
        member = save_presence(&state.db, &member).await?;
        log_shift_event!(
            "status_changed",
            replacement.id,
            user.id,
            format!("{} -> {}", previous, member.status)
        );
    }

    Ok(Json(to_response(&state.db, &member).await?))
}
