//! # Organisation Handlers
//!
//! An organisation is created by its director, who is also registered as
//! its first employee. Only employees see an organisation.

use axum::{http::StatusCode, Json};
use entity::{employees, groups, organisations, sea_orm_active_enums::Position, Employees, Groups, Organisations, Users};
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
        organisations::{
            CreateOrganisationRequest,
            OrganisationListQuery,
            OrganisationResponse,
            OrganisationSearchItem,
            OrganisationSearchQuery,
            UpdateOrganisationRequest,
        },
        UserShort,
    },
    middleware::auth::AuthenticatedUser,
    utils::{icontains, paging, search_term, Now},
    AppState,
};

const DUPLICATE_NAME: &str = "An organization with the same name already exists";

async fn director_of<C: ConnectionTrait>(db: &C, organisation: &organisations::Model) -> Result<UserShort> {
    Users::find_by_id(organisation.director_id)
        .one(db)
        .await?
        .map(|u| UserShort::from(&u))
        .ok_or_else(|| AppError::internal(format!("Organisation {} has no director", organisation.id)))
}

async fn to_response<C: ConnectionTrait>(
    db: &C,
    organisation: &organisations::Model,
    user_id: i32,
) -> Result<OrganisationResponse> {
    let pax = Employees::find()
        .filter(employees::Column::OrganisationId.eq(organisation.id))
        .count(db)
        .await?;
    let groups_count = Groups::find()
        .filter(groups::Column::OrganisationId.eq(organisation.id))
        .count(db)
        .await?;

    Ok(OrganisationResponse {
        id: organisation.id,
        name: organisation.name.clone(),
        director: director_of(db, organisation).await?,
        pax,
        groups_count,
        can_manage: organisation.director_id == user_id,
        created_at: organisation.created_at,
    })
}

async fn ensure_name_free<C: ConnectionTrait>(db: &C, name: &str, exclude: Option<i32>) -> Result<()> {
    let mut select = Organisations::find().filter(organisations::Column::Name.eq(name));
    if let Some(id) = exclude {
        select = select.filter(organisations::Column::Id.ne(id));
    }
    if select.one(db).await?.is_some() {
        return Err(AppError::conflict(DUPLICATE_NAME));
    }
    Ok(())
}

/// Organisations the caller works in
pub async fn list_organisations_handler(
    state: &AppState,
    user: AuthenticatedUser,
    query: OrganisationListQuery,
) -> Result<Json<Paginated<OrganisationResponse>>> {
    let (page, per_page) = paging(query.page, query.per_page);
    let ids = access::organisation_ids_of(&state.db, user.id).await?;

    let mut select = Organisations::find().filter(organisations::Column::Id.is_in(ids));
    if let Some(term) = search_term(query.search.as_deref()) {
        select = select.filter(icontains(organisations::Column::Name, term));
    }
    match query.can_manage {
        Some(true) => select = select.filter(organisations::Column::DirectorId.eq(user.id)),
        Some(false) => select = select.filter(organisations::Column::DirectorId.ne(user.id)),
        None => {},
    }

    let paginator = select
        .order_by_asc(organisations::Column::Name)
        .order_by_asc(organisations::Column::Id)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;

    let mut items = Vec::new();
    for organisation in paginator.fetch_page(page - 1).await? {
        items.push(to_response(&state.db, &organisation, user.id).await?);
    }
    Ok(Json(Paginated::new(items, page, per_page, total)))
}

/// Search all organisations by name
pub async fn search_organisations_handler(
    state: &AppState,
    _user: AuthenticatedUser,
    query: OrganisationSearchQuery,
) -> Result<Json<Paginated<OrganisationSearchItem>>> {
    let (page, per_page) = paging(query.page, query.per_page);

    let mut select = Organisations::find();
    if let Some(term) = search_term(query.search.as_deref()) {
        select = select.filter(icontains(organisations::Column::Name, term));
    }

    let paginator = select
        .order_by_asc(organisations::Column::Name)
        .order_by_asc(organisations::Column::Id)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;

    let mut items = Vec::new();
    for organisation in paginator.fetch_page(page - 1).await? {
        items.push(OrganisationSearchItem {
            id:       organisation.id,
            name:     organisation.name.clone(),
            director: director_of(&state.db, &organisation).await?,
        });
    }
    Ok(Json(Paginated::new(items, page, per_page, total)))
}

/// Create an organisation directed by the caller
pub async fn create_organisation_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateOrganisationRequest,
) -> Result<(StatusCode, Json<OrganisationResponse>)> {
    req.validate()?;
    let name = req.name.trim().to_string();

    let txn = state.db.begin().await?;
    ensure_name_free(&txn, &name, None).await?;

    let organisation = organisations::ActiveModel {
        name: Set(name),
        director_id: Set(user.id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .db_context("create organisation")?;

    employees::ActiveModel {
        organisation_id: Set(organisation.id),
        user_id: Set(user.id),
        position: Set(Position::Director),
        date_joined: Set(Now::current().today()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let response = to_response(&txn, &organisation, user.id).await?;
    txn.commit().await?;

    info!(organisation_id = %organisation.id, user_id = %user.id, "Organisation created");

    Ok((StatusCode::CREATED, Json(response)))
}

/// One organisation, visible to its employees
pub async fn get_organisation_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
) -> Result<Json<OrganisationResponse>> {
    let (organisation, _) = access::visible_organisation(&state.db, organisation_id, user.id).await?;
    Ok(Json(to_response(&state.db, &organisation, user.id).await?))
}

/// Rename an organisation, director only
pub async fn update_organisation_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
    req: UpdateOrganisationRequest,
) -> Result<Json<OrganisationResponse>> {
    req.validate()?;

    let (organisation, _) = access::visible_organisation(&state.db, organisation_id, user.id).await?;
    if organisation.director_id != user.id {
        return Err(AppError::forbidden(
            "Only the director can change the organisation.",
        ));
    }

    let name = req.name.trim().to_string();
    ensure_name_free(&state.db, &name, Some(organisation.id)).await?;

    let mut active = organisation.into_active_model();
    active.name = Set(name);
    let organisation = active.update(&state.db).await?;

    info!(organisation_id = %organisation.id, user_id = %user.id, "Organisation renamed");

    Ok(Json(to_response(&state.db, &organisation, user.id).await?))
}
