//! # Offer Handlers
//!
//! Invitations from organisations and applications from users. Both sides
//! see the same rows through [`OfferView`]; when both flags end up `true`
//! the user is hired as an operator.

use axum::{http::StatusCode, Json};
use entity::{employees, offers, sea_orm_active_enums::Position, Offers, Organisations, Users};
use error::{AppError, Paginated, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    EntityTrait,
    IntoActiveModel,
    QueryFilter,
    QueryOrder,
    Set,
    TransactionTrait,
};
use tracing::info;

use crate::{
    access,
    dto::{
        offers::{
            CreateOrganisationOfferRequest,
            CreateUserOfferRequest,
            DecideOfferRequest,
            OfferListQuery,
            OfferResponse,
            OfferSide,
            OfferView,
        },
        organisations::OrganisationShort,
        UserShort,
    },
    middleware::auth::AuthenticatedUser,
    utils::{paging, Now},
    AppState,
};

async fn to_response<C: ConnectionTrait>(db: &C, offer: &offers::Model, side: OfferSide) -> Result<OfferResponse> {
    let organisation = access::find_organisation(db, offer.organisation_id).await?;
    let user = Users::find_by_id(offer.user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::internal(format!("Offer {} has no user", offer.id)))?;
    let view = OfferView::new(offer, side);

    Ok(OfferResponse {
        id:           offer.id,
        organisation: OrganisationShort {
            id:   organisation.id,
            name: organisation.name,
        },
        user:         UserShort::from(&user),
        offer_type:   view.offer_type,
        decision:     view.decision,
        org_accept:   offer.org_accept,
        user_accept:  offer.user_accept,
        can_accept:   view.can_accept,
        can_reject:   view.can_reject,
        created_at:   offer.created_at,
        updated_at:   offer.updated_at,
    })
}

/// Filters offers in memory by their computed view, then pages the result.
async fn list_offers<C: ConnectionTrait>(
    db: &C,
    rows: Vec<offers::Model>,
    side: OfferSide,
    query: &OfferListQuery,
) -> Result<Paginated<OfferResponse>> {
    let (page, per_page) = paging(query.page, query.per_page);
    let matching: Vec<offers::Model> = rows
        .into_iter()
        .filter(|offer| OfferView::new(offer, side).matches(query))
        .collect();
    let total = matching.len() as u64;

    let mut items = Vec::new();
    let skip = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
    for offer in matching.iter().skip(skip).take(per_page as usize) {
        items.push(to_response(db, offer, side).await?);
    }
    Ok(Paginated::new(items, page, per_page, total))
}

/// Refuses offers to people already hired or with an offer in flight.
async fn ensure_can_offer<C: ConnectionTrait>(db: &C, organisation_id: i32, user_id: i32) -> Result<()> {
    if access::employee_of(db, organisation_id, user_id).await?.is_some() {
        return Err(AppError::conflict("The user is already an employee of the organisation."));
    }
    let pending = Offers::find()
        .filter(offers::Column::OrganisationId.eq(organisation_id))
        .filter(offers::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    if pending.iter().any(offers::Model::is_open) {
        return Err(AppError::conflict("An active offer already exists."));
    }
    Ok(())
}

/// Records one side's answer and hires the user once both agree.
async fn decide(
    state: &AppState,
    offer: offers::Model,
    side: OfferSide,
    accept: bool,
    actor: i32,
) -> Result<Json<OfferResponse>> {
    let view = OfferView::new(&offer, side);
    let allowed = if accept { view.can_accept } else { view.can_reject };
    if !allowed {
        return Err(AppError::conflict("The offer is already closed."));
    }

    let txn = state.db.begin().await?;
    let mut active = offer.into_active_model();
    match side {
        OfferSide::Organisation => active.org_accept = Set(Some(accept)),
        OfferSide::User => active.user_accept = Set(Some(accept)),
    }
    let offer = active.update(&txn).await?;

    if offer.is_accepted() && access::employee_of(&txn, offer.organisation_id, offer.user_id).await?.is_none() {
        let employee = employees::ActiveModel {
            organisation_id: Set(offer.organisation_id),
            user_id: Set(offer.user_id),
            position: Set(Position::Operator),
            date_joined: Set(Now::current().today()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        info!(
            organisation_id = %offer.organisation_id,
            employee_id = %employee.id,
            user_id = %offer.user_id,
            "Offer accepted, employee hired"
        );
    }

    let response = to_response(&txn, &offer, side).await?;
    txn.commit().await?;

    info!(offer_id = %offer.id, accept = accept, actor_id = %actor, side = ?side, "Offer decided");

    Ok(Json(response))
}

/// Offers of an organisation, for its directors and managers
pub async fn list_organisation_offers_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
    query: OfferListQuery,
) -> Result<Json<Paginated<OfferResponse>>> {
    access::managed_organisation(&state.db, organisation_id, user.id).await?;

    let rows = Offers::find()
        .filter(offers::Column::OrganisationId.eq(organisation_id))
        .order_by_desc(offers::Column::CreatedAt)
        .order_by_desc(offers::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(list_offers(&state.db, rows, OfferSide::Organisation, &query).await?))
}

/// Invite a user into the organisation
pub async fn create_organisation_offer_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
    req: CreateOrganisationOfferRequest,
) -> Result<(StatusCode, Json<OfferResponse>)> {
    let (organisation, _) = access::managed_organisation(&state.db, organisation_id, user.id).await?;

    Users::find_by_id(req.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    ensure_can_offer(&state.db, organisation.id, req.user_id).await?;

    let offer = offers::ActiveModel {
        organisation_id: Set(organisation.id),
        user_id: Set(req.user_id),
        org_accept: Set(Some(true)),
        user_accept: Set(None),
        created_by: Set(user.id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(offer_id = %offer.id, organisation_id = %organisation.id, user_id = %req.user_id, "Invitation sent");

    Ok((
        StatusCode::CREATED,
        Json(to_response(&state.db, &offer, OfferSide::Organisation).await?),
    ))
}

/// Answer or withdraw an offer on behalf of the organisation
pub async fn decide_organisation_offer_handler(
    state: &AppState,
    user: AuthenticatedUser,
    organisation_id: i32,
    offer_id: i32,
    req: DecideOfferRequest,
) -> Result<Json<OfferResponse>> {
    access::managed_organisation(&state.db, organisation_id, user.id).await?;

    let offer = Offers::find_by_id(offer_id)
        .filter(offers::Column::OrganisationId.eq(organisation_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Offer not found"))?;

    decide(state, offer, OfferSide::Organisation, req.accept, user.id).await
}

/// The caller's own offers
pub async fn list_user_offers_handler(
    state: &AppState,
    user: AuthenticatedUser,
    query: OfferListQuery,
) -> Result<Json<Paginated<OfferResponse>>> {
    let rows = Offers::find()
        .filter(offers::Column::UserId.eq(user.id))
        .order_by_desc(offers::Column::CreatedAt)
        .order_by_desc(offers::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(list_offers(&state.db, rows, OfferSide::User, &query).await?))
}

/// Apply to join an organisation
pub async fn create_user_offer_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateUserOfferRequest,
) -> Result<(StatusCode, Json<OfferResponse>)> {
    let organisation = Organisations::find_by_id(req.organisation_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Organisation not found"))?;
    ensure_can_offer(&state.db, organisation.id, user.id).await?;

    let offer = offers::ActiveModel {
        organisation_id: Set(organisation.id),
        user_id: Set(user.id),
        org_accept: Set(None),
        user_accept: Set(Some(true)),
        created_by: Set(user.id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(offer_id = %offer.id, organisation_id = %organisation.id, user_id = %user.id, "Application sent");

    Ok((
        StatusCode::CREATED,
        Json(to_response(&state.db, &offer, OfferSide::User).await?),
    ))
}

/// Answer or withdraw one of the caller's offers
pub async fn decide_user_offer_handler(
    state: &AppState,
    user: AuthenticatedUser,
    offer_id: i32,
    req: DecideOfferRequest,
) -> Result<Json<OfferResponse>> {
    let offer = Offers::find_by_id(offer_id)
        .filter(offers::Column::UserId.eq(user.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Offer not found"))?;

    decide(state, offer, OfferSide::User, req.accept, user.id).await
}
