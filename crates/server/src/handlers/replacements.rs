//! # Shift Handlers
//!
//! Shifts (replacements) are planned per group and day by the group's
//! managers. The roster lists the group members taking part; each of them
//! has a presence row and may book one lunch break.

use std::collections::{HashMap, HashSet};

use axum::{http::StatusCode, Json};
use chrono::NaiveDate;
use entity::{
    breaks,
    employees,
    groups,
    members,
    replacement_members,
    replacements,
    users,
    Breaks,
    GroupBreakSettings,
    Groups,
    Members,
    ReplacementMembers,
    Replacements,
    Users,
};
use error::{AppError, Paginated, Result, ResultExt};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    EntityTrait,
    IntoActiveModel,
    JoinType,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    RelationTrait,
    Set,
    TransactionTrait,
};
use tracing::info;
use validator::Validate;

use super::{dictionaries::replacement_status_map, groups::upsert_settings};
use crate::{
    access,
    dto::{
        groups::{BreakSettings, GroupShort},
        replacements::{
            BreakShort,
            CreateReplacementRequest,
            PersonalStats,
            ReplacementBreaks,
            ReplacementCategory,
            ReplacementDetailResponse,
            ReplacementGeneral,
            ReplacementListQuery,
            ReplacementResponse,
            ReplacementStats,
            ScheduleRow,
            ShiftMemberItem,
            UpdateReplacementRequest,
        },
        StatusItem,
    },
    middleware::auth::AuthenticatedUser,
    scheduling::{
        actions,
        break_button_for,
        member_description,
        resolve_shift_params,
        schedule_row,
        time_until_break,
        validate_bookings_fit,
        validate_shift_date,
        validate_shift_window,
        BookedSlot,
        ShiftParams,
    },
    utils::{dotted_date, hhmm, local_hhmm, paging, Now},
    AppState,
};

const DUPLICATE_SHIFT: &str = "Today there is already an active shift.";

/// Groups whose shifts the user can see: as a member or as a manager.
async fn shift_group_ids<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<HashSet<i32>> {
    let mut ids: HashSet<i32> = access::member_group_ids(db, user_id).await?.into_iter().collect();
    ids.extend(access::managed_group_ids(db, user_id).await?);
    Ok(ids)
}

/// Shift visible to the caller together with its group.
pub(crate) async fn visible_replacement<C: ConnectionTrait>(
    db: &C,
    replacement_id: i32,
    user_id: i32,
) -> Result<(replacements::Model, groups::Model)> {
    let not_found = || AppError::not_found("Shift not found");

    let replacement = Replacements::find_by_id(replacement_id)
        .one(db)
        .await?
        .ok_or_else(not_found)?;
    if !shift_group_ids(db, user_id).await?.contains(&replacement.group_id) {
        return Err(not_found());
    }
    let group = Groups::find_by_id(replacement.group_id)
        .one(db)
        .await?
        .ok_or_else(not_found)?;
    Ok((replacement, group))
}

/// The caller's presence row on a shift, if they are on the roster.
pub(crate) async fn caller_shift_member<C: ConnectionTrait>(
    db: &C,
    replacement_id: i32,
    user_id: i32,
) -> Result<Option<replacement_members::Model>> {
    Ok(ReplacementMembers::find()
        .filter(replacement_members::Column::ReplacementId.eq(replacement_id))
        .join(JoinType::InnerJoin, replacement_members::Relation::Member.def())
        .join(JoinType::InnerJoin, members::Relation::Employee.def())
        .filter(employees::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

/// The break booked by a shift member, if any.
pub(crate) async fn break_of<C: ConnectionTrait>(
    db: &C,
    shift_member: &replacement_members::Model,
) -> Result<Option<breaks::Model>> {
    Ok(Breaks::find()
        .filter(breaks::Column::MemberId.eq(shift_member.id))
        .one(db)
        .await?)
}

/// Every booking of a shift, earliest first.
pub(crate) async fn shift_breaks<C: ConnectionTrait>(db: &C, replacement_id: i32) -> Result<Vec<breaks::Model>> {
    Ok(Breaks::find()
        .filter(breaks::Column::ReplacementId.eq(replacement_id))
        .order_by_asc(breaks::Column::BreakStart)
        .order_by_asc(breaks::Column::Id)
        .all(db)
        .await?)
}

/// Number of people on the roster.
pub(crate) async fn roster_size<C: ConnectionTrait>(db: &C, replacement_id: i32) -> Result<u64> {
    Ok(ReplacementMembers::find()
        .filter(replacement_members::Column::ReplacementId.eq(replacement_id))
        .count(db)
        .await?)
}

/// Roster rows with the person behind each, ordered by name.
async fn roster<C: ConnectionTrait>(
    db: &C,
    replacement_id: i32,
) -> Result<Vec<(replacement_members::Model, users::Model)>> {
    let rows = ReplacementMembers::find()
        .filter(replacement_members::Column::ReplacementId.eq(replacement_id))
        .join(JoinType::InnerJoin, replacement_members::Relation::Member.def())
        .join(JoinType::InnerJoin, members::Relation::Employee.def())
        .join(JoinType::InnerJoin, employees::Relation::User.def())
        .select_also(Users)
        .order_by_asc(users::Column::LastName)
        .order_by_asc(users::Column::FirstName)
        .order_by_asc(replacement_members::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().filter_map(|(m, u)| u.map(|u| (m, u))).collect())
}

fn group_short(group: &groups::Model) -> GroupShort {
    GroupShort {
        id:   group.id,
        name: group.name.clone(),
    }
}

async fn ensure_day_free<C: ConnectionTrait>(
    db: &C,
    group_id: i32,
    date: NaiveDate,
    exclude: Option<i32>,
) -> Result<()> {
    let mut select = Replacements::find()
        .filter(replacements::Column::GroupId.eq(group_id))
        .filter(replacements::Column::Date.eq(date));
    if let Some(id) = exclude {
        select = select.filter(replacements::Column::Id.ne(id));
    }
    if select.one(db).await?.is_some() {
        return Err(AppError::conflict(DUPLICATE_SHIFT));
    }
    Ok(())
}

/// Member ids to put on the roster, all checked against the group.
async fn resolve_roster<C: ConnectionTrait>(
    db: &C,
    group_id: i32,
    requested: Option<&[i32]>,
    all_group_members: bool,
) -> Result<Option<Vec<i32>>> {
    let group_members: Vec<i32> = Members::find()
        .select_only()
        .column(members::Column::Id)
        .filter(members::Column::GroupId.eq(group_id))
        .into_tuple()
        .all(db)
        .await?;

    if all_group_members {
        return Ok(Some(group_members));
    }
    let Some(requested) = requested
    else {
        return Ok(None);
    };

    let known: HashSet<i32> = group_members.into_iter().collect();
    if requested.iter().any(|id| !known.contains(id)) {
        return Err(AppError::bad_request(
            "All shift members must be members of the group.",
        ));
    }
    let mut ids = requested.to_vec();
    ids.sort_unstable();
    ids.dedup();
    Ok(Some(ids))
}

/// Makes the roster exactly `member_ids`.
///
/// People staying on keep their presence rows, newcomers start offline and
/// dropped members lose their row and booking.
async fn set_roster<C: ConnectionTrait>(db: &C, replacement_id: i32, member_ids: &[i32]) -> Result<()> {
    let current = ReplacementMembers::find()
        .filter(replacement_members::Column::ReplacementId.eq(replacement_id))
        .all(db)
        .await?;
    let wanted: HashSet<i32> = member_ids.iter().copied().collect();
    let present: HashSet<i32> = current.iter().map(|m| m.member_id).collect();

    let dropped: Vec<i32> = current
        .iter()
        .filter(|m| !wanted.contains(&m.member_id))
        .map(|m| m.id)
        .collect();
    if !dropped.is_empty() {
        ReplacementMembers::delete_many()
            .filter(replacement_members::Column::Id.is_in(dropped))
            .exec(db)
            .await?;
    }

    let added: Vec<replacement_members::ActiveModel> = member_ids
        .iter()
        .filter(|id| !present.contains(id))
        .map(|&member_id| {
            replacement_members::ActiveModel {
                replacement_id: Set(replacement_id),
                member_id: Set(member_id),
                ..Default::default()
            }
        })
        .collect();
    for row in added {
        row.insert(db).await?;
    }
    Ok(())
}

fn remembered(params: &ShiftParams) -> BreakSettings {
    BreakSettings {
        min_active:         Some(params.min_active),
        break_start:        Some(params.break_start),
        break_end:          Some(params.break_end),
        break_max_duration: Some(params.break_max_duration),
    }
}

/// Shifts of the caller's groups, newest first
pub async fn list_replacements_handler(
    state: &AppState,
    user: AuthenticatedUser,
    query: ReplacementListQuery,
) -> Result<Json<Paginated<ReplacementResponse>>> {
    let (page, per_page) = paging(query.page, query.per_page);
    let today = Now::current().today();
    let group_ids = shift_group_ids(&state.db, user.id).await?;

    let mut select = Replacements::find().filter(replacements::Column::GroupId.is_in(group_ids));
    if let Some(group_id) = query.group {
        select = select.filter(replacements::Column::GroupId.eq(group_id));
    }
    select = match query.category {
        Some(ReplacementCategory::Active) => select.filter(replacements::Column::Date.eq(today)),
        Some(ReplacementCategory::Future) => select.filter(replacements::Column::Date.gt(today)),
        Some(ReplacementCategory::Archive) => select.filter(replacements::Column::Date.lt(today)),
        None => select,
    };

    let paginator = select
        .find_also_related(Groups)
        .order_by_desc(replacements::Column::Date)
        .order_by_desc(replacements::Column::Id)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;

    let items = paginator
        .fetch_page(page - 1)
        .await?
        .into_iter()
        .filter_map(|(replacement, group)| group.map(|g| ReplacementResponse::new(&replacement, group_short(&g))))
        .collect();
    Ok(Json(Paginated::new(items, page, per_page, total)))
}

/// Plan a shift for a group
///
/// Missing parameters fall back to the group's break settings. The shift and
/// its roster are written in one transaction.
pub async fn create_replacement_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateReplacementRequest,
) -> Result<(StatusCode, Json<ReplacementResponse>)> {
    req.validate()?;
    let today = Now::current().today();

    let group = access::visible_group(&state.db, req.group_id, user.id).await?;
    if !access::can_manage_group(&state.db, &group, user.id).await? {
        return Err(AppError::forbidden(
            "You do not have permission to create shifts in this group.",
        ));
    }
    validate_shift_date(req.date, today)?;

    let txn = state.db.begin().await?;
    let defaults = GroupBreakSettings::find_by_id(group.id).one(&txn).await?;
    let params = resolve_shift_params(&req.overrides(), defaults.as_ref())?;
    validate_shift_window(params.break_start, params.break_end)?;
    ensure_day_free(&txn, group.id, req.date, None).await?;
    let roster = resolve_roster(&txn, group.id, req.members.as_deref(), req.all_group_members).await?;

    let replacement = replacements::ActiveModel {
        group_id: Set(group.id),
        date: Set(req.date),
        break_start: Set(params.break_start),
        break_end: Set(params.break_end),
        break_max_duration: Set(params.break_max_duration),
        min_active: Set(params.min_active),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .db_context("create shift")?;

    set_roster(&txn, replacement.id, roster.as_deref().unwrap_or_default()).await?;
    if req.remember_default_data {
        upsert_settings(&txn, group.id, &remembered(&params)).await?;
    }
    txn.commit().await?;

    info!(
        replacement_id = %replacement.id,
        group_id = %group.id,
        date = %replacement.date,
        user_id = %user.id,
        "Shift created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ReplacementResponse::new(&replacement, group_short(&group))),
    ))
}

/// Change a shift's parameters or roster
pub async fn update_replacement_handler(
    state: &AppState,
    user: AuthenticatedUser,
    replacement_id: i32,
    req: UpdateReplacementRequest,
) -> Result<Json<ReplacementResponse>> {
    req.validate()?;
    let today = Now::current().today();

    let (replacement, group) = visible_replacement(&state.db, replacement_id, user.id).await?;
    if !access::can_manage_group(&state.db, &group, user.id).await? {
        return Err(AppError::forbidden("You do not have permission to manage this group."));
    }
    if let Some(date) = req.date {
        validate_shift_date(date, today)?;
    }

    let params = ShiftParams {
        break_start:        req.break_start.unwrap_or(replacement.break_start),
        break_end:          req.break_end.unwrap_or(replacement.break_end),
        break_max_duration: req.break_max_duration.unwrap_or(replacement.break_max_duration),
        min_active:         req.min_active.unwrap_or(replacement.min_active),
    };
    validate_shift_window(params.break_start, params.break_end)?;
    let date = req.date.unwrap_or(replacement.date);

    let txn = state.db.begin().await?;
    ensure_day_free(&txn, group.id, date, Some(replacement.id)).await?;
    let booked: Vec<BookedSlot> = shift_breaks(&txn, replacement.id)
        .await?
        .iter()
        .map(BookedSlot::from)
        .collect();
    validate_bookings_fit(&booked, params.break_start, params.break_end)?;
    // An empty list keeps the current roster
    let requested = req.members.as_deref().filter(|ids| !ids.is_empty());
    let roster = resolve_roster(&txn, group.id, requested, req.all_group_members).await?;

    let mut active = replacement.into_active_model();
    active.date = Set(date);
    active.break_start = Set(params.break_start);
    active.break_end = Set(params.break_end);
    active.break_max_duration = Set(params.break_max_duration);
    active.min_active = Set(params.min_active);
    let replacement = active.update(&txn).await?;

    if let Some(member_ids) = roster {
        set_roster(&txn, replacement.id, &member_ids).await?;
    }
    if req.remember_default_data {
        upsert_settings(&txn, group.id, &remembered(&params)).await?;
    }
    txn.commit().await?;

    info!(replacement_id = %replacement.id, user_id = %user.id, "Shift updated");

    Ok(Json(ReplacementResponse::new(&replacement, group_short(&group))))
}

/// Full shift screen: counters, the caller's own state and the roster
pub async fn get_replacement_handler(
    state: &AppState,
    user: AuthenticatedUser,
    replacement_id: i32,
) -> Result<Json<ReplacementDetailResponse>> {
    let now = Now::current();
    let (replacement, group) = visible_replacement(&state.db, replacement_id, user.id).await?;

    let roster = roster(&state.db, replacement.id).await?;
    let bookings = shift_breaks(&state.db, replacement.id).await?;
    let statuses = replacement_status_map(&state.db).await?;
    let booking_of: HashMap<i32, &breaks::Model> = bookings.iter().map(|b| (b.member_id, b)).collect();

    let own = roster
        .iter()
        .find(|(_, person)| person.id == user.id)
        .map(|(member, _)| member.clone());
    let own_break = own.as_ref().and_then(|m| booking_of.get(&m.id).copied());
    let is_today = replacement.date == now.today();

    let stats = ReplacementStats::collect(
        &roster.iter().map(|(m, _)| m.clone()).collect::<Vec<_>>(),
        bookings.len() as u64,
    );

    let general = ReplacementGeneral {
        id:                 replacement.id,
        group:              group_short(&group),
        date:               dotted_date(replacement.date),
        break_start:        hhmm(replacement.break_start),
        break_end:          hhmm(replacement.break_end),
        break_max_duration: replacement.break_max_duration,
        min_active:         replacement.min_active,
    };

    let personal_stats = own.as_ref().map(|member| {
        PersonalStats {
            time_online:      member.time_online.map(local_hhmm),
            time_break_start: member.time_break_start.map(local_hhmm),
            time_break_end:   member.time_break_end.map(local_hhmm),
            time_offline:     member.time_offline.map(local_hhmm),
            time_until_break: own_break
                .filter(|_| is_today)
                .and_then(|b| time_until_break(b.break_start, now.local.time())),
        }
    });

    let breaks_block = ReplacementBreaks {
        info:   own_break.map(|b| {
            BreakShort {
                id:          b.id,
                break_start: hhmm(b.break_start),
                break_end:   hhmm(b.break_end),
            }
        }),
        button: break_button_for(&replacement, own.as_ref(), own_break, now.today()),
    };

    let members = roster
        .iter()
        .map(|(member, person)| {
            let code = member.status.to_string();
            let status = statuses
                .get(&code)
                .cloned()
                .map(StatusItem::from)
                .unwrap_or_else(|| {
                    StatusItem {
                        name:  code.clone(),
                        code:  code.clone(),
                        color: "#000000".to_string(),
                    }
                });
            let description = booking_of
                .get(&member.id)
                .filter(|_| is_today)
                .and_then(|b| member_description(Some((b.break_start, b.break_end)), now.local));
            ShiftMemberItem {
                id: person.id,
                full_name: person.full_name(),
                email: person.email.clone(),
                status,
                description,
            }
        })
        .collect();

    Ok(Json(ReplacementDetailResponse {
        replacement: ReplacementResponse::new(&replacement, group_short(&group)),
        stats,
        general,
        personal_stats,
        breaks: breaks_block,
        actions: actions(&replacement, own.as_ref(), own_break, now.local),
        members,
    }))
}

/// Lunch timetable of a shift, one row per booking
pub async fn get_schedule_handler(
    state: &AppState,
    user: AuthenticatedUser,
    replacement_id: i32,
) -> Result<Json<Vec<ScheduleRow>>> {
    let (replacement, _) = visible_replacement(&state.db, replacement_id, user.id).await?;

    let people: HashMap<i32, (replacement_members::Model, users::Model)> = roster(&state.db, replacement.id)
        .await?
        .into_iter()
        .map(|(m, u)| (m.id, (m, u)))
        .collect();
    let statuses = replacement_status_map(&state.db).await?;

    let rows = shift_breaks(&state.db, replacement.id)
        .await?
        .iter()
        .filter_map(|booked| {
            let (member, person) = people.get(&booked.member_id)?;
            let color = statuses
                .get(&member.status.to_string())
                .map(|s| s.color.as_str())
                .unwrap_or("#000000");
            Some(schedule_row(&person.full_name(), &replacement, booked, color))
        })
        .collect();

    Ok(Json(rows))
}
