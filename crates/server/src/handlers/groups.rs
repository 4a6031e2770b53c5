//! # Group Handlers
//!
//! Groups belong to an organisation and are run by a manager employee. Each
//! group carries a settings row holding the lunch-break defaults used when
//! planning shifts.

use std::collections::HashSet;

use axum::{http::StatusCode, Json};
use entity::{
    group_break_settings,
    groups,
    members,
    Employees,
    GroupBreakSettings,
    Groups,
    Members,
    Users,
};
use error::{AppError, Paginated, Result, ResultExt};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
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

use crate::{
    access,
    dto::{
        employees::EmployeeShort,
        groups::{
            BreakSettings,
            CreateGroupRequest,
            GroupDetailResponse,
            GroupListQuery,
            GroupResponse,
            UpdateGroupRequest,
        },
        organisations::OrganisationShort,
        UserShort,
    },
    middleware::auth::AuthenticatedUser,
    scheduling::{is_aligned, validate_shift_window},
    utils::{icontains, paging, search_term},
    AppState,
};

const DUPLICATE_NAME: &str = "A group with the same name already exists.";

/// Group ids the caller manages and belongs to, computed once per request.
struct Membership {
    managed: HashSet<i32>,
    member:  HashSet<i32>,
}

impl Membership {
    async fn load<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Self> {
        Ok(Self {
            managed: access::managed_group_ids(db, user_id).await?.into_iter().collect(),
            member:  access::member_group_ids(db, user_id).await?.into_iter().collect(),
        })
    }
}

pub(crate) async fn manager_short<C: ConnectionTrait>(db: &C, employee_id: i32) -> Result<EmployeeShort> {
    let (employee, user) = Employees::find_by_id(employee_id)
        .find_also_related(Users)
        .one(db)
        .await?
        .and_then(|(e, u)| u.map(|u| (e, u)))
        .ok_or_else(|| AppError::internal(format!("Manager employee {} is missing", employee_id)))?;
    Ok(EmployeeShort {
        id:   employee.id,
        user: UserShort::from(&user),
    })
}

async fn to_response<C: ConnectionTrait>(db: &C, group: &groups::Model, membership: &Membership) -> Result<GroupResponse> {
    let organisation = access::find_organisation(db, group.organisation_id).await?;
    let pax = Members::find()
        .filter(members::Column::GroupId.eq(group.id))
        .count(db)
        .await?;

    Ok(GroupResponse {
        id: group.id,
        organisation: OrganisationShort {
            id:   organisation.id,
            name: organisation.name,
        },
        name: group.name.clone(),
        manager: manager_short(db, group.manager_id).await?,
        pax,
        can_manage: membership.managed.contains(&group.id),
        is_member: membership.member.contains(&group.id),
        created_at: group.created_at,
    })
}

async fn settings_of<C: ConnectionTrait>(db: &C, group_id: i32) -> Result<BreakSettings> {
    Ok(GroupBreakSettings::find_by_id(group_id)
        .one(db)
        .await?
        .map(|s| BreakSettings::from(&s))
        .unwrap_or_default())
}

async fn ensure_name_free<C: ConnectionTrait>(
    db: &C,
    organisation_id: i32,
    name: &str,
    exclude: Option<i32>,
) -> Result<()> {
    let mut select = Groups::find()
        .filter(groups::Column::OrganisationId.eq(organisation_id))
        .filter(groups::Column::Name.eq(name));
    if let Some(id) = exclude {
        select = select.filter(groups::Column::Id.ne(id));
    }
    if select.one(db).await?.is_some() {
        return Err(AppError::conflict(DUPLICATE_NAME));
    }
    Ok(())
}

/// Groups of the caller's organisations
pub async fn list_groups_handler(
    state: &AppState,
    user: AuthenticatedUser,
    query: GroupListQuery,
) -> Result<Json<Paginated<GroupResponse>>> {
    let (page, per_page) = paging(query.page, query.per_page);
    let organisation_ids = access::organisation_ids_of(&state.db, user.id).await?;
    let membership = Membership::load(&state.db, user.id).await?;

    let mut select = Groups::find().filter(groups::Column::OrganisationId.is_in(organisation_ids));
    if let Some(organisation_id) = query.organisation {
        select = select.filter(groups::Column::OrganisationId.eq(organisation_id));
    }
    if let Some(manager_id) = query.manager {
        select = select.filter(groups::Column::ManagerId.eq(manager_id));
    }
    match query.is_member {
        Some(true) => select = select.filter(groups::Column::Id.is_in(membership.member.iter().copied())),
        Some(false) => select = select.filter(groups::Column::Id.is_not_in(membership.member.iter().copied())),
        None => {},
    }
    if let Some(term) = search_term(query.search.as_deref()) {
        select = select.filter(icontains(groups::Column::Name, term));
    }

    let paginator = select
        .order_by_asc(groups::Column::Name)
        .order_by_asc(groups::Column::Id)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;

    let mut items = Vec::new();
    for group in paginator.fetch_page(page - 1).await? {
        items.push(to_response(&state.db, &group, &membership).await?);
    }
    Ok(Json(Paginated::new(items, page, per_page, total)))
}

/// Create a group in an organisation the caller directs
pub async fn create_group_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateGroupRequest,
) -> Result<(StatusCode, Json<GroupDetailResponse>)> {
    req.validate()?;

    let (organisation, _) = access::visible_organisation(&state.db, req.organisation_id, user.id).await?;
    if organisation.director_id != user.id {
        return Err(AppError::forbidden(
            "Only the director of the organisation can create groups.",
        ));
    }

    let name = req.name.trim().to_string();
    let txn = state.db.begin().await?;

    let manager = match req.manager_id {
        Some(employee_id) => access::validate_group_manager(&txn, organisation.id, employee_id).await?,
        None => access::director_employee(&txn, &organisation).await?,
    };
    ensure_name_free(&txn, organisation.id, &name, None).await?;

    let group = groups::ActiveModel {
        organisation_id: Set(organisation.id),
        name: Set(name),
        manager_id: Set(manager.id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .db_context("create group")?;

    group_break_settings::ActiveModel {
        group_id: Set(group.id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let membership = Membership::load(&txn, user.id).await?;
    let response = GroupDetailResponse {
        group:       to_response(&txn, &group, &membership).await?,
        breaks_info: BreakSettings::default(),
    };
    txn.commit().await?;

    info!(group_id = %group.id, organisation_id = %organisation.id, user_id = %user.id, "Group created");

    Ok((StatusCode::CREATED, Json(response)))
}

/// One group with its break defaults
pub async fn get_group_handler(
    state: &AppState,
    user: AuthenticatedUser,
    group_id: i32,
) -> Result<Json<GroupDetailResponse>> {
    let group = access::visible_group(&state.db, group_id, user.id).await?;
    let membership = Membership::load(&state.db, user.id).await?;

    Ok(Json(GroupDetailResponse {
        group:       to_response(&state.db, &group, &membership).await?,
        breaks_info: settings_of(&state.db, group.id).await?,
    }))
}

/// Rename a group or hand it to another manager
pub async fn update_group_handler(
    state: &AppState,
    user: AuthenticatedUser,
    group_id: i32,
    req: UpdateGroupRequest,
) -> Result<Json<GroupDetailResponse>> {
    req.validate()?;
    let group = access::managed_group(&state.db, group_id, user.id).await?;
    let organisation_id = group.organisation_id;

    let mut active = group.into_active_model();
    if let Some(name) = req.name {
        let name = name.trim().to_string();
        ensure_name_free(&state.db, organisation_id, &name, Some(group_id)).await?;
        active.name = Set(name);
    }
    if let Some(employee_id) = req.manager_id {
        let manager = access::validate_group_manager(&state.db, organisation_id, employee_id).await?;
        active.manager_id = Set(manager.id);
    }
    let group = active.update(&state.db).await?;

    info!(group_id = %group.id, user_id = %user.id, "Group updated");

    let membership = Membership::load(&state.db, user.id).await?;
    Ok(Json(GroupDetailResponse {
        group:       to_response(&state.db, &group, &membership).await?,
        breaks_info: settings_of(&state.db, group.id).await?,
    }))
}

fn validate_settings_window(settings: &BreakSettings) -> Result<()> {
    match (settings.break_start, settings.break_end) {
        (Some(start), Some(end)) => validate_shift_window(start, end),
        (Some(start), None) if !is_aligned(start) => {
            Err(AppError::bad_request(
                "The start time of the break must be a multiple of 15 minutes.",
            ))
        },
        (None, Some(end)) if !is_aligned(end) => {
            Err(AppError::bad_request(
                "The end time of the break must be a multiple of 15 minutes.",
            ))
        },
        _ => Ok(()),
    }
}

/// Writes the given values into the group's settings row, creating it when missing.
pub(crate) async fn upsert_settings<C: ConnectionTrait>(
    db: &C,
    group_id: i32,
    values: &BreakSettings,
) -> Result<group_break_settings::Model> {
    let existing = GroupBreakSettings::find_by_id(group_id).one(db).await?;
    let insert = existing.is_none();
    let mut active = match existing {
        Some(row) => row.into_active_model(),
        None => {
            group_break_settings::ActiveModel {
                group_id: Set(group_id),
                ..Default::default()
            }
        },
    };

    if let Some(value) = values.min_active {
        active.min_active = Set(Some(value));
    }
    if let Some(value) = values.break_start {
        active.break_start = Set(Some(value));
    }
    if let Some(value) = values.break_end {
        active.break_end = Set(Some(value));
    }
    if let Some(value) = values.break_max_duration {
        active.break_max_duration = Set(Some(value));
    }

    Ok(if insert {
        active.insert(db).await?
    }
    else {
        active.update(db).await?
    })
}

/// Update the lunch-break defaults of a group
pub async fn update_group_settings_handler(
    state: &AppState,
    user: AuthenticatedUser,
    group_id: i32,
    req: BreakSettings,
) -> Result<Json<BreakSettings>> {
    req.validate()?;
    let group = access::managed_group(&state.db, group_id, user.id).await?;

    let current = settings_of(&state.db, group.id).await?;
    let merged = BreakSettings {
        min_active:         req.min_active.or(current.min_active),
        break_start:        req.break_start.or(current.break_start),
        break_end:          req.break_end.or(current.break_end),
        break_max_duration: req.break_max_duration.or(current.break_max_duration),
    };
    validate_settings_window(&merged)?;

    let saved = upsert_settings(&state.db, group.id, &req).await?;

    info!(group_id = %group.id, user_id = %user.id, "Group break settings updated");

    Ok(Json(BreakSettings::from(&saved)))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, 0).unwrap() }

    #[test]
    fn test_settings_window_checks_only_given_times() {
        assert!(validate_settings_window(&BreakSettings::default()).is_ok());
        assert!(validate_settings_window(&BreakSettings {
            break_start: Some(t(12, 0)),
            ..Default::default()
        })
        .is_ok());

        let err = validate_settings_window(&BreakSettings {
            break_end: Some(t(14, 10)),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message(), "The end time of the break must be a multiple of 15 minutes.");

        let err = validate_settings_window(&BreakSettings {
            break_start: Some(t(15, 0)),
            break_end: Some(t(14, 0)),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message(), "The break start time must be less than the end time.");
    }
}
