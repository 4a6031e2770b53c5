//! Read-only dictionary listings.

use axum::Json;
use entity::{break_statuses, positions, replacement_statuses, BreakStatuses, Positions, ReplacementStatuses};
use error::Result;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    dto::{DictItem, StatusItem},
    middleware::auth::AuthenticatedUser,
    AppState,
};

/// Active employee positions
pub async fn list_positions_handler(state: &AppState, _user: AuthenticatedUser) -> Result<Json<Vec<DictItem>>> {
    let rows = Positions::find()
        .filter(positions::Column::IsActive.eq(true))
        .order_by_asc(positions::Column::Sort)
        .order_by_asc(positions::Column::Code)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(DictItem::from).collect()))
}

/// Active shift presence statuses with their colours
pub async fn list_replacement_statuses_handler(
    state: &AppState,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<StatusItem>>> {
    let rows = ReplacementStatuses::find()
        .filter(replacement_statuses::Column::IsActive.eq(true))
        .order_by_asc(replacement_statuses::Column::Sort)
        .order_by_asc(replacement_statuses::Column::Code)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(StatusItem::from).collect()))
}

/// Active break statuses
pub async fn list_break_statuses_handler(state: &AppState, _user: AuthenticatedUser) -> Result<Json<Vec<DictItem>>> {
    let rows = BreakStatuses::find()
        .filter(break_statuses::Column::IsActive.eq(true))
        .order_by_asc(break_statuses::Column::Sort)
        .order_by_asc(break_statuses::Column::Code)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(DictItem::from).collect()))
}

/// Display data of one shift status, used by the roster and timetable.
pub(crate) async fn replacement_status_map(
    db: &impl sea_orm::ConnectionTrait,
) -> Result<std::collections::HashMap<String, replacement_statuses::Model>> {
    Ok(ReplacementStatuses::find()
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.code.clone(), s))
        .collect())
}
