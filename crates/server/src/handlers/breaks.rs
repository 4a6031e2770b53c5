//! # Break Handlers
//!
//! Booking, moving, starting and finishing the caller's lunch break.

use axum::{http::StatusCode, Json};
use entity::{breaks, replacement_members, replacements};
use error::{AppError, Result, ResultExt};
use logging::log_shift_event;
use sea_orm::{ActiveModelTrait, ConnectionTrait, IntoActiveModel, Set, TransactionTrait};

use super::{
    replacements::{break_of, caller_shift_member, roster_size, shift_breaks, visible_replacement},
    shift_member::save_presence,
};
use crate::{
    dto::breaks::{BreakResponse, CreateBreakRequest, UpdateBreakRequest},
    middleware::auth::AuthenticatedUser,
    scheduling::{apply_break_action, validate_booking, validate_break_action, BookedSlot, BreakRequest, Occupancy},
    utils::{hhmm, Now},
    AppState,
};

/// Shift plus the caller's roster row, 403 when they are not on it.
async fn shift_access(
    state: &AppState,
    user: &AuthenticatedUser,
    replacement_id: i32,
) -> Result<(replacements::Model, replacement_members::Model)> {
    let (replacement, _) = visible_replacement(&state.db, replacement_id, user.id).await?;
    let member = caller_shift_member(&state.db, replacement.id, user.id)
        .await?
        .ok_or_else(|| AppError::forbidden("You do not have access to the current shift."))?;
    Ok((replacement, member))
}

async fn check_booking<C: ConnectionTrait>(
    db: &C,
    replacement: &replacements::Model,
    request: &BreakRequest,
    exclude: Option<i32>,
    now: &Now,
) -> Result<()> {
    let booked: Vec<BookedSlot> = shift_breaks(db, replacement.id)
        .await?
        .iter()
        .map(BookedSlot::from)
        .collect();
    let members_count = i64::try_from(roster_size(db, replacement.id).await?).unwrap_or(i64::MAX);

    validate_booking(
        request,
        replacement,
        &Occupancy {
            members_count,
            booked: &booked,
            exclude,
        },
        now.today(),
    )
}

/// The caller's booking on a shift
pub async fn get_break_handler(
    state: &AppState,
    user: AuthenticatedUser,
    replacement_id: i32,
) -> Result<Json<BreakResponse>> {
    let (replacement, member) = shift_access(state, &user, replacement_id).await?;
    let booked = break_of(&state.db, &member)
        .await?
        .ok_or_else(|| AppError::not_found("Break not found"))?;
    Ok(Json(BreakResponse::new(&booked, &replacement)))
}

/// Book a lunch break
pub async fn create_break_handler(
    state: &AppState,
    user: AuthenticatedUser,
    replacement_id: i32,
    req: CreateBreakRequest,
) -> Result<(StatusCode, Json<BreakResponse>)> {
    let now = Now::current();
    let (replacement, member) = shift_access(state, &user, replacement_id).await?;

    let request = BreakRequest {
        start: req.break_start,
        end:   req.break_end,
    };

    // The floor is counted against the bookings this transaction sees
    let txn = state.db.begin().await?;
    check_booking(&txn, &replacement, &request, None, &now).await?;

    if break_of(&txn, &member).await?.is_some() {
        return Err(AppError::conflict("You have already booked your lunch break."));
    }

    let booked = breaks::ActiveModel {
        replacement_id: Set(replacement.id),
        member_id: Set(member.id),
        break_start: Set(request.start),
        break_end: Set(request.end),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .db_context("book break")?;
    txn.commit().await?;

    log_shift_event!(
        "break_booked",
        replacement.id,
        user.id,
        format!("{}-{}", hhmm(booked.break_start), hhmm(booked.break_end))
    );

    Ok((StatusCode::CREATED, Json(BreakResponse::new(&booked, &replacement))))
}

/// Move the booking or start and finish the break
///
/// New times are checked like a fresh booking without counting the old one.
/// Member presence and break status change together.
pub async fn update_break_handler(
    state: &AppState,
    user: AuthenticatedUser,
    replacement_id: i32,
    req: UpdateBreakRequest,
) -> Result<Json<BreakResponse>> {
    let now = Now::current();
    let (replacement, mut member) = shift_access(state, &user, replacement_id).await?;
    let mut booked = break_of(&state.db, &member)
        .await?
        .ok_or_else(|| AppError::not_found("Break not found"))?;

    if replacement.date != now.today() {
        return Err(AppError::bad_request(
            "The break reservation time has already expired or has not started yet.",
        ));
    }

    let txn = state.db.begin().await?;
    if req.break_start.is_some() || req.break_end.is_some() {
        let request = BreakRequest {
            start: req.break_start.unwrap_or(booked.break_start),
            end:   req.break_end.unwrap_or(booked.break_end),
        };
        check_booking(&txn, &replacement, &request, Some(booked.id), &now).await?;
        booked.break_start = request.start;
        booked.break_end = request.end;
    }

    let action = match req.status.as_deref() {
        Some(status) => {
            let action = validate_break_action(status, &member, &booked, replacement.date, now.local)?;
            apply_break_action(action, &mut member, &mut booked, now.utc);
            Some(action)
        },
        None => None,
    };

    let mut active = booked.clone().into_active_model();
    active.break_start = Set(booked.break_start);
    active.break_end = Set(booked.break_end);
    active.status = Set(booked.status);
    let booked = active.update(&txn).await?;
    if action.is_some() {
        save_presence(&txn, &member).await?;
    }
    txn.commit().await?;

    let details = match action {
        Some(action) => format!("{:?}", action),
        None => format!("{}-{}", hhmm(booked.break_start), hhmm(booked.break_end)),
    };
    log_shift_event!("break_updated", replacement.id, user.id, details);

    Ok(Json(BreakResponse::new(&booked, &replacement)))
}
