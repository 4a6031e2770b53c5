//! # Employee Handlers
//!
//! Employees link users to an organisation with a position. Directors can
//! create corporate accounts directly; the director's own row is fixed.

use std::collections::HashMap;

use axum::{http::StatusCode, Json};
use entity::{
    employees,
    groups,
    members,
    positions,
    profiles,
    sea_orm_active_enums::Position,
    users,
    Employees,
    Groups,
    Organisations,
    Positions,
};
use error::{AppError, Paginated, Result, ResultExt};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    ConnectionTrait,
    EntityTrait,
    IntoActiveModel,
    JoinType,
    ModelTrait,
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

use super::auth::{check_password_strength, ensure_contact_unique, hash_raw_password, normalize_email};
use crate::{
    access,
    dto::{
        employees::{
            CreateEmployeeRequest,
            EmployeeListQuery,
            EmployeeResponse,
            EmployeeSearchItem,
            EmployeeUser,
            UpdateEmployeeRequest,
        },
        DictItem,
    },
    middleware::auth::AuthenticatedUser,
    utils::{icontains, join_names, paging, search_term, Now},
    AppState,
};

type EmployeeSelect = sea_orm::SelectTwo<employees::Entity, users::Entity>;

async fn position_names<C: ConnectionTrait>(db: &C) -> Result<HashMap<String, String>> {
    Ok(Positions::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p: positions::Model| (p.code, p.name))
        .collect())
}

fn to_response(employee: &employees::Model, user: &users::Model, names: &HashMap<String, String>) -> EmployeeResponse {
    let code = employee.position.to_string();
    EmployeeResponse {
        id:          employee.id,
        user:        EmployeeUser {
            id:                   user.id,
            full_name:            user.full_name(),
            email:                user.email.clone(),
            is_corporate_account: user.is_corporate_account,
        },
        position:    DictItem {
            name: names.get(&code).cloned().unwrap_or_else(|| code.clone()),
            code,
        },
        date_joined: employee.date_joined,
    }
}

fn filtered(organisation_id: i32, query: &EmployeeListQuery) -> EmployeeSelect {
    let mut select = Employees::find()
        .find_also_related(entity::Users)
        .filter(employees::Column::OrganisationId.eq(organisation_id));

    if let Some(term) = search_term(query.search.as_deref()) {
        select = select.filter(
            Condition::any()
                .add(icontains(users::Column::Email, term))
                .add(icontains(users::Column::FirstName, term))
                .add(icontains(users::Column::LastName, term)),
        );
    }
    if query.only_corporate == Some(true) {
        select = select.filter(users::Column::IsCorporateAccount.eq(true));
    }
    match query.can_be_group_manager {
        Some(true) => {
            select = select.filter(employees::Column::Position.is_in([Position::Director, Position::Manager]));
        },
        Some(false) => select = select.filter(employees::Column::Position.eq(Position::Operator)),
        None => {},
    }

    select
        .order_by_asc(users::Column::LastName)
        .order_by_asc(users::Column::FirstName)
        .order_by_asc(employees::Column::Id)
}

async fn fetch_page(
    state: &AppState,
    select: EmployeeSelect,
    page: u64,
    per_page: u64,
) -> Result<(Vec<(employees::Model, users::Model)>, u64)> {
    let paginator = select.paginate(&state.db, per_page);
    let total = paginator.num_items().await?;
    let rows = paginator
        .fetch_page(page - 1)
        .await?
        .into_iter()
        .filter_map(|(employee, user)| user.map(|u| (employee, u)))
        .collect();
    Ok((rows, total))
}

async fn find_employee<C: ConnectionTrait>(
    db: &C,
    organisation_id: i32,
    employee_id: i32,
) -> Result<(employees::Model, users::Model)> {
    Employees::find_by_id(employee_id)
        .filter(employees::Column::OrganisationId.eq(organisation_id))
        .find_also_related(entity::Users)
        .one(db)
        .await?
        .and_then(|(employee, user)| user.map(|u| (employee, u)))
        .ok_or_else(|| AppError::not_found("Employee not found"))
}

/// Names of the groups the employee manages.
async fn managed_group_names<C: ConnectionTrait>(db: &C, employee_id: i32) -> Result<Vec<String>> {
    Ok(Groups::find()
        .filter(groups::Column::ManagerId.eq(employee_id))
        .all(db)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect())
}

/// Names of the groups the employee is a member of.
async fn member_group_names<C: ConnectionTrait>(db: &C, employee_id: i32) -> Result<Vec<String>> {
    Ok(Groups::find()
        .join(JoinType::InnerJoin, groups::Relation::Members.def())
        .filter(members::Column::EmployeeId.eq(employee_id))
        .all(db)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect())
}

fn is_head(employee: &employees::Model, organisation: &entity::organisations::Model) -> bool {
    employee.position == Position::Director || employee.user_id == organisation.director_id
}

/// Colleagues in an organisation
pub async fn list_employees_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
    query: EmployeeListQuery,
) -> Result<Json<Paginated<EmployeeResponse>>> {
    access::visible_organisation(&state.db, organisation_id, user.id).await?;
    let (page, per_page) = paging(query.page, query.per_page);

    let (rows, total) = fetch_page(state, filtered(organisation_id, &query), page, per_page).await?;
    let names = position_names(&state.db).await?;
    let items = rows.iter().map(|(e, u)| to_response(e, u, &names)).collect();

    Ok(Json(Paginated::new(items, page, per_page, total)))
}

/// Short employee listing for pickers
pub async fn search_employees_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
    query: EmployeeListQuery,
) -> Result<Json<Paginated<EmployeeSearchItem>>> {
    access::visible_organisation(&state.db, organisation_id, user.id).await?;
    let (page, per_page) = paging(query.page, query.per_page);

    let (rows, total) = fetch_page(state, filtered(organisation_id, &query), page, per_page).await?;
    let items = rows
        .into_iter()
        .map(|(employee, user)| {
            EmployeeSearchItem {
                id:        employee.id,
                full_name: user.full_name(),
                email:     user.email,
                position:  employee.position,
            }
        })
        .collect();

    Ok(Json(Paginated::new(items, page, per_page, total)))
}

/// One colleague
pub async fn get_employee_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
    employee_id: i32,
) -> Result<Json<EmployeeResponse>> {
    access::visible_organisation(&state.db, organisation_id, user.id).await?;
    let (employee, account) = find_employee(&state.db, organisation_id, employee_id).await?;
    let names = position_names(&state.db).await?;
    Ok(Json(to_response(&employee, &account, &names)))
}

/// Create a corporate account and hire it
///
/// Director only. User, profile and employee rows are written together.
pub async fn create_employee_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
    req: CreateEmployeeRequest,
) -> Result<(StatusCode, Json<EmployeeResponse>)> {
    req.validate()?;

    let organisation = Organisations::find_by_id(organisation_id)
        .one(&state.db)
        .await?
        .filter(|o| o.director_id == user.id)
        .ok_or_else(|| AppError::not_found("Such organization is not found"))?;

    let position = req.position.unwrap_or(Position::Operator);
    if position == Position::Director {
        return Err(AppError::bad_request("The director position cannot be assigned."));
    }
    check_password_strength(&req.password)?;
    let email = normalize_email(&req.email);

    let txn = state.db.begin().await?;
    ensure_contact_unique(&txn, Some(&email), None, None).await?;

    let account = users::ActiveModel {
        email: Set(email),
        password_hash: Set(hash_raw_password(state, req.password)?),
        first_name: Set(req.first_name.trim().to_string()),
        last_name: Set(req.last_name.trim().to_string()),
        phone_number: Set(None),
        is_corporate_account: Set(true),
        is_superuser: Set(false),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .db_context("create corporate account")?;

    profiles::ActiveModel {
        user_id:     Set(account.id),
        telegram_id: Set(None),
    }
    .insert(&txn)
    .await?;

    let employee = employees::ActiveModel {
        organisation_id: Set(organisation.id),
        user_id: Set(account.id),
        position: Set(position),
        date_joined: Set(Now::current().today()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let names = position_names(&txn).await?;
    txn.commit().await?;

    info!(
        organisation_id = %organisation.id,
        employee_id = %employee.id,
        user_id = %user.id,
        "Corporate employee created"
    );

    Ok((StatusCode::CREATED, Json(to_response(&employee, &account, &names))))
}

/// Change an employee's position
pub async fn update_employee_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
    employee_id: i32,
    req: UpdateEmployeeRequest,
) -> Result<Json<EmployeeResponse>> {
    let (organisation, _) = access::managed_organisation(&state.db, organisation_id, user.id).await?;
    let (employee, account) = find_employee(&state.db, organisation_id, employee_id).await?;

    if is_head(&employee, &organisation) {
        return Err(AppError::bad_request(
            "The head of the organization is unavailable for changes.",
        ));
    }
    if req.position == Position::Director {
        return Err(AppError::bad_request("The director position cannot be assigned."));
    }
    if req.position == Position::Operator {
        let managed = managed_group_names(&state.db, employee.id).await?;
        if !managed.is_empty() {
            return Err(AppError::bad_request(format!(
                "Unable to change position. The employee is the manager in the following groups: {}.",
                join_names(managed)
            )));
        }
    }

    let mut active = employee.into_active_model();
    active.position = Set(req.position);
    let employee = active.update(&state.db).await?;

    info!(employee_id = %employee.id, position = %employee.position, user_id = %user.id, "Employee position changed");

    let names = position_names(&state.db).await?;
    Ok(Json(to_response(&employee, &account, &names)))
}

/// Remove an employee who is in no group
pub async fn delete_employee_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
    employee_id: i32,
) -> Result<StatusCode> {
    let (organisation, _) = access::managed_organisation(&state.db, organisation_id, user.id).await?;
    let (employee, _) = find_employee(&state.db, organisation_id, employee_id).await?;

    if is_head(&employee, &organisation) {
        return Err(AppError::bad_request("You can't remove a leader from an organization"));
    }

    let mut groups = managed_group_names(&state.db, employee.id).await?;
    groups.extend(member_group_names(&state.db, employee.id).await?);
    if !groups.is_empty() {
        return Err(AppError::bad_request(format!(
            "Deletion is not possible. The employee is a member or manager of the following groups: {}.",
            join_names(groups)
        )));
    }

    let employee_id = employee.id;
    employee.delete(&state.db).await?;

    info!(organisation_id = %organisation.id, employee_id = %employee_id, user_id = %user.id, "Employee removed");

    Ok(StatusCode::NO_CONTENT)
}
