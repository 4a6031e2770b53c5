//! # Access Rules
//!
//! Lookups answering "who may see or change what". Visibility failures are
//! reported as 404 so callers cannot probe for foreign rows; missing rights on
//! a visible row are 403.

use entity::{
    employees,
    groups,
    members,
    organisations,
    sea_orm_active_enums::Position,
    Employees,
    Groups,
    Members,
    Organisations,
};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait};

/// Organisation by id.
pub async fn find_organisation<C: ConnectionTrait>(db: &C, organisation_id: i32) -> Result<organisations::Model> {
    Organisations::find_by_id(organisation_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Organisation not found"))
}

/// The caller's employee row in an organisation, if any.
pub async fn employee_of<C: ConnectionTrait>(
    db: &C,
    organisation_id: i32,
    user_id: i32,
) -> Result<Option<employees::Model>> {
    Ok(Employees::find()
        .filter(employees::Column::OrganisationId.eq(organisation_id))
        .filter(employees::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

/// Organisation the caller works in, 404 otherwise.
pub async fn visible_organisation<C: ConnectionTrait>(
    db: &C,
    organisation_id: i32,
    user_id: i32,
) -> Result<(organisations::Model, employees::Model)> {
    let organisation = find_organisation(db, organisation_id).await?;
    let employee = employee_of(db, organisation_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Organisation not found"))?;
    Ok((organisation, employee))
}

/// Organisation where the caller is a director or manager.
///
/// # Errors
///
/// 404 when the caller does not work there, 403 for operators.
pub async fn managed_organisation<C: ConnectionTrait>(
    db: &C,
    organisation_id: i32,
    user_id: i32,
) -> Result<(organisations::Model, employees::Model)> {
    let (organisation, employee) = visible_organisation(db, organisation_id, user_id).await?;
    if !employee.position.can_manage_groups() {
        return Err(AppError::forbidden(
            "Only the director or a manager of the organisation can do this.",
        ));
    }
    Ok((organisation, employee))
}

/// Ids of organisations the user is employed in.
pub async fn organisation_ids_of<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<i32>> {
    Ok(Employees::find()
        .select_only()
        .column(employees::Column::OrganisationId)
        .filter(employees::Column::UserId.eq(user_id))
        .into_tuple::<i32>()
        .all(db)
        .await?)
}

/// Ids of groups the user belongs to as a member.
pub async fn member_group_ids<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<i32>> {
    Ok(Members::find()
        .select_only()
        .column(members::Column::GroupId)
        .join(JoinType::InnerJoin, members::Relation::Employee.def())
        .filter(employees::Column::UserId.eq(user_id))
        .into_tuple::<i32>()
        .all(db)
        .await?)
}

/// Ids of groups the user manages: as group manager or as director of the organisation.
pub async fn managed_group_ids<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<i32>> {
    let as_manager: Vec<i32> = Groups::find()
        .select_only()
        .column(groups::Column::Id)
        .join(JoinType::InnerJoin, groups::Relation::Manager.def())
        .filter(employees::Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;

    let as_director: Vec<i32> = Groups::find()
        .select_only()
        .column(groups::Column::Id)
        .join(JoinType::InnerJoin, groups::Relation::Organisation.def())
        .filter(organisations::Column::DirectorId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;

    let mut ids: Vec<i32> = as_manager.into_iter().chain(as_director).collect();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

/// True when the user manages the group or directs its organisation.
pub async fn can_manage_group<C: ConnectionTrait>(db: &C, group: &groups::Model, user_id: i32) -> Result<bool> {
    let organisation = find_organisation(db, group.organisation_id).await?;
    if organisation.director_id == user_id {
        return Ok(true);
    }
    let manager = Employees::find_by_id(group.manager_id).one(db).await?;
    Ok(manager.is_some_and(|m| m.user_id == user_id))
}

/// Group visible to an employee of its organisation.
pub async fn visible_group<C: ConnectionTrait>(db: &C, group_id: i32, user_id: i32) -> Result<groups::Model> {
    let group = Groups::find_by_id(group_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Group not found"))?;
    if employee_of(db, group.organisation_id, user_id).await?.is_none() {
        return Err(AppError::not_found("Group not found"));
    }
    Ok(group)
}

/// Group the caller may change.
pub async fn managed_group<C: ConnectionTrait>(db: &C, group_id: i32, user_id: i32) -> Result<groups::Model> {
    let group = visible_group(db, group_id, user_id).await?;
    if !can_manage_group(db, &group, user_id).await? {
        return Err(AppError::forbidden("You do not have permission to manage this group."));
    }
    Ok(group)
}

/// Checks a prospective group manager.
///
/// # Errors
///
/// 400 when the employee is from another organisation or is an operator.
pub async fn validate_group_manager<C: ConnectionTrait>(
    db: &C,
    organisation_id: i32,
    employee_id: i32,
) -> Result<employees::Model> {
    Employees::find_by_id(employee_id)
        .one(db)
        .await?
        .filter(|e| e.organisation_id == organisation_id && e.position.can_manage_groups())
        .ok_or_else(|| {
            AppError::bad_request("Only an employee of the organization or a manager can be an administrator.")
        })
}

/// The director's own employee row.
pub async fn director_employee<C: ConnectionTrait>(
    db: &C,
    organisation: &organisations::Model,
) -> Result<employees::Model> {
    Employees::find()
        .filter(employees::Column::OrganisationId.eq(organisation.id))
        .filter(employees::Column::UserId.eq(organisation.director_id))
        .filter(employees::Column::Position.eq(Position::Director))
        .one(db)
        .await?
        .ok_or_else(|| AppError::internal(format!("Organisation {} has no director row", organisation.id)))
}
