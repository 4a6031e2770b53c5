//! # Group Member Handlers

use axum::{http::StatusCode, Json};
use entity::{employees, members, users, Employees, Members, Users};
use error::{AppError, Paginated, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    ConnectionTrait,
    EntityTrait,
    JoinType,
    ModelTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    RelationTrait,
    Select,
    Set,
};
use tracing::info;

use crate::{
    access,
    dto::{
        members::{AddMemberRequest, MemberListQuery, MemberResponse, MemberSearchItem},
        UserShort,
    },
    middleware::auth::AuthenticatedUser,
    utils::{icontains, paging, search_term, Now},
    AppState,
};

fn filtered(group_id: i32, query: &MemberListQuery) -> Select<Members> {
    let mut select = Members::find()
        .join(JoinType::InnerJoin, members::Relation::Employee.def())
        .join(JoinType::InnerJoin, employees::Relation::User.def())
        .filter(members::Column::GroupId.eq(group_id));

    if let Some(term) = search_term(query.search.as_deref()) {
        select = select.filter(
            Condition::any()
                .add(icontains(users::Column::Email, term))
                .add(icontains(users::Column::FirstName, term))
                .add(icontains(users::Column::LastName, term)),
        );
    }

    select
        .order_by_asc(users::Column::LastName)
        .order_by_asc(users::Column::FirstName)
        .order_by_asc(members::Column::Id)
}

async fn with_people<C: ConnectionTrait>(
    db: &C,
    rows: Vec<members::Model>,
) -> Result<Vec<(members::Model, employees::Model, users::Model)>> {
    let mut out = Vec::with_capacity(rows.len());
    for member in rows {
        let (employee, user) = Employees::find_by_id(member.employee_id)
            .find_also_related(Users)
            .one(db)
            .await?
            .and_then(|(e, u)| u.map(|u| (e, u)))
            .ok_or_else(|| AppError::internal(format!("Member {} has no employee", member.id)))?;
        out.push((member, employee, user));
    }
    Ok(out)
}

fn to_response(member: &members::Model, employee: &employees::Model, user: &users::Model) -> MemberResponse {
    MemberResponse {
        id:          member.id,
        employee_id: employee.id,
        user:        UserShort::from(user),
        position:    employee.position,
        date_joined: member.date_joined,
    }
}

/// Members of a group
pub async fn list_members_handler(
    state: &AppState,
    user: AuthenticatedUser,
    group_id: i32,
    query: MemberListQuery,
) -> Result<Json<Paginated<MemberResponse>>> {
    let group = access::visible_group(&state.db, group_id, user.id).await?;
    let (page, per_page) = paging(query.page, query.per_page);

    let paginator = filtered(group.id, &query).paginate(&state.db, per_page);
    let total = paginator.num_items().await?;
    let rows = with_people(&state.db, paginator.fetch_page(page - 1).await?).await?;

    let items = rows.iter().map(|(m, e, u)| to_response(m, e, u)).collect();
    Ok(Json(Paginated::new(items, page, per_page, total)))
}

/// Short member listing for the shift roster picker
pub async fn search_members_handler(
    state: &AppState,
    user: AuthenticatedUser,
    group_id: i32,
    query: MemberListQuery,
) -> Result<Json<Paginated<MemberSearchItem>>> {
    let group = access::visible_group(&state.db, group_id, user.id).await?;
    let (page, per_page) = paging(query.page, query.per_page);

    let paginator = filtered(group.id, &query).paginate(&state.db, per_page);
    let total = paginator.num_items().await?;
    let rows = with_people(&state.db, paginator.fetch_page(page - 1).await?).await?;

    let items = rows
        .into_iter()
        .map(|(member, _, user)| {
            MemberSearchItem {
                id:        member.id,
                full_name: user.full_name(),
                email:     user.email,
            }
        })
        .collect();
    Ok(Json(Paginated::new(items, page, per_page, total)))
}

/// Add an employee of the organisation to a group
pub async fn add_member_handler(
    state: &AppState,
    user: AuthenticatedUser,
    group_id: i32,
    req: AddMemberRequest,
) -> Result<(StatusCode, Json<MemberResponse>)> {
    let group = access::managed_group(&state.db, group_id, user.id).await?;

    let (employee, person) = Employees::find_by_id(req.employee_id)
        .filter(employees::Column::OrganisationId.eq(group.organisation_id))
        .find_also_related(Users)
        .one(&state.db)
        .await?
        .and_then(|(e, u)| u.map(|u| (e, u)))
        .ok_or_else(|| {
            AppError::bad_request("The employee does not belong to the organisation of the group.")
        })?;

    let duplicate = Members::find()
        .filter(members::Column::GroupId.eq(group.id))
        .filter(members::Column::EmployeeId.eq(employee.id))
        .one(&state.db)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::conflict("The employee is already a member of the group."));
    }

    let member = members::ActiveModel {
        group_id: Set(group.id),
        employee_id: Set(employee.id),
        date_joined: Set(Now::current().today()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(group_id = %group.id, member_id = %member.id, user_id = %user.id, "Member added");

    Ok((StatusCode::CREATED, Json(to_response(&member, &employee, &person))))
}

/// Remove a member from a group
///
/// Their participation in shifts of the group goes with them.
pub async fn remove_member_handler(
    state: &AppState,
    user: AuthenticatedUser,
    group_id: i32,
    member_id: i32,
) -> Result<StatusCode> {
    let group = access::managed_group(&state.db, group_id, user.id).await?;

    let member = Members::find_by_id(member_id)
        .filter(members::Column::GroupId.eq(group.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Member not found"))?;
    member.delete(&state.db).await?;

    info!(group_id = %group.id, member_id = %member_id, user_id = %user.id, "Member removed");

    Ok(StatusCode::NO_CONTENT)
}
