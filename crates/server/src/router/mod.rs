//! # API Router Configuration
//!
//! Route table for the Breakroom API. Handlers in [`crate::handlers`] take
//! plain values; the wrappers below do the axum extraction and turn
//! extractor rejections into [`AppError`]s.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension,
        Path,
        Query,
        State,
    },
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json,
    Router,
};
use error::{
    rejection::{handle_json_rejection, handle_path_rejection, handle_query_rejection},
    Paginated,
    Result,
};
use serde::de::DeserializeOwned;

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        breaks::{BreakResponse, CreateBreakRequest, UpdateBreakRequest},
        employees::{CreateEmployeeRequest, EmployeeListQuery, EmployeeResponse, EmployeeSearchItem, UpdateEmployeeRequest},
        groups::{BreakSettings, CreateGroupRequest, GroupDetailResponse, GroupListQuery, GroupResponse, UpdateGroupRequest},
        members::{AddMemberRequest, MemberListQuery, MemberResponse, MemberSearchItem},
        offers::{CreateOrganisationOfferRequest, CreateUserOfferRequest, DecideOfferRequest, OfferListQuery, OfferResponse},
        organisations::{
            CreateOrganisationRequest,
            OrganisationListQuery,
            OrganisationResponse,
            OrganisationSearchItem,
            OrganisationSearchQuery,
            UpdateOrganisationRequest,
        },
        replacements::{
            CreateReplacementRequest,
            ReplacementDetailResponse,
            ReplacementListQuery,
            ReplacementResponse,
            ScheduleRow,
            ShiftMemberResponse,
            UpdateReplacementRequest,
            UpdateShiftMemberRequest,
        },
        users::{ChangePasswordRequest, UpdateMeRequest, UserResponse, UserSearchQuery},
        DictItem,
        StatusItem,
        UserShort,
    },
    handlers::{
        auth,
        breaks,
        dictionaries,
        employees,
        groups,
        health,
        members,
        offers,
        organisations,
        replacements,
        shift_member,
        users,
    },
    middleware::{auth::AuthenticatedUser, auth_middleware, request_id_middleware},
    AppState,
};

type Payload<T> = std::result::Result<Json<T>, JsonRejection>;
type Params<T> = std::result::Result<Query<T>, QueryRejection>;
type Ids<T> = std::result::Result<Path<T>, PathRejection>;
type Caller = Extension<AuthenticatedUser>;

fn body<T>(payload: Payload<T>) -> Result<T> { payload.map(|Json(v)| v).map_err(handle_json_rejection) }

fn params<T: DeserializeOwned>(query: Params<T>) -> Result<T> {
    query.map(|Query(v)| v).map_err(handle_query_rejection)
}

fn ids<T: DeserializeOwned + Send>(path: Ids<T>) -> Result<T> { path.map(|Path(v)| v).map_err(handle_path_rejection) }

/// Creates the API router with all routes
pub fn create_router(state: AppState) -> Router {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .route("/api/v1/users/me", get(get_me).patch(update_me))
        .route("/api/v1/users/change-password", post(change_password))
        .route("/api/v1/users/search", get(search_users))
        .route("/api/v1/organisations", get(list_organisations).post(create_organisation))
        .route("/api/v1/organisations/search", get(search_organisations))
        .route("/api/v1/organisations/positions", get(list_positions))
        .route("/api/v1/organisations/:id", get(get_organisation).patch(update_organisation))
        .route("/api/v1/organisations/:id/employees", get(list_employees).post(create_employee))
        .route("/api/v1/organisations/:id/employees/search", get(search_employees))
        .route(
            "/api/v1/organisations/:id/employees/:employee_id",
            get(get_employee).patch(update_employee).delete(delete_employee),
        )
        .route("/api/v1/organisations/:id/offers", get(list_organisation_offers).post(create_organisation_offer))
        .route("/api/v1/organisations/:id/offers/:offer_id", axum::routing::patch(decide_organisation_offer))
        .route("/api/v1/organisations/offers", get(list_user_offers).post(create_user_offer))
        .route("/api/v1/organisations/offers/:offer_id", axum::routing::patch(decide_user_offer))
        .route("/api/v1/organisations/groups", get(list_groups).post(create_group))
        .route("/api/v1/organisations/groups/:id", get(get_group).patch(update_group))
        .route("/api/v1/organisations/groups/:id/settings", axum::routing::patch(update_group_settings))
        .route("/api/v1/organisations/groups/:id/members", get(list_members).post(add_member))
        .route("/api/v1/organisations/groups/:id/members/search", get(search_members))
        .route("/api/v1/organisations/groups/:id/members/:member_id", axum::routing::delete(remove_member))
        .route("/api/v1/breaks/statuses/replacements", get(list_replacement_statuses))
        .route("/api/v1/breaks/statuses/breaks", get(list_break_statuses))
        .route("/api/v1/breaks/replacements", get(list_replacements).post(create_replacement))
        .route("/api/v1/breaks/replacements/:id", get(get_replacement).patch(update_replacement))
        .route("/api/v1/breaks/replacements/:id/schedule", get(get_schedule))
        .route("/api/v1/breaks/replacements/:id/member", get(get_shift_member).patch(update_shift_member))
        .route("/api/v1/breaks/replacements/:id/break", get(get_break).post(create_break).patch(update_break))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Public routes that don't require authentication
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login));

    public_routes.merge(protected_routes).with_state(state)
}

/// Creates the main application router
///
/// Every response carries an `x-request-id` header.
pub fn create_app_router(state: AppState) -> Router {
    create_router(state).layer(middleware::from_fn(request_id_middleware))
}

async fn health_check(State(state): State<AppState>) -> Json<health::HealthResponse> {
    health::health_handler(&state).await
}

async fn register(State(state): State<AppState>, payload: Payload<RegisterRequest>) -> Result<(StatusCode, Json<UserResponse>)> {
    auth::register_handler(&state, body(payload)?).await
}

async fn login(State(state): State<AppState>, payload: Payload<LoginRequest>) -> Result<Json<LoginResponse>> {
    auth::login_handler(&state, body(payload)?).await
}

async fn get_me(State(state): State<AppState>, Extension(user): Caller) -> Result<Json<UserResponse>> {
    users::get_me_handler(&state, user).await
}

async fn update_me(
    State(state): State<AppState>,
    Extension(user): Caller,
    payload: Payload<UpdateMeRequest>,
) -> Result<Json<UserResponse>> {
    users::update_me_handler(&state, user, body(payload)?).await
}

async fn change_password(
    State(state): State<AppState>,
    Extension(user): Caller,
    payload: Payload<ChangePasswordRequest>,
) -> Result<StatusCode> {
    users::change_password_handler(&state, user, body(payload)?).await
}

async fn search_users(
    State(state): State<AppState>,
    Extension(user): Caller,
    query: Params<UserSearchQuery>,
) -> Result<Json<Paginated<UserShort>>> {
    users::search_users_handler(&state, user, params(query)?).await
}

async fn list_positions(State(state): State<AppState>, Extension(user): Caller) -> Result<Json<Vec<DictItem>>> {
    dictionaries::list_positions_handler(&state, user).await
}

async fn list_replacement_statuses(
    State(state): State<AppState>,
    Extension(user): Caller,
) -> Result<Json<Vec<StatusItem>>> {
    dictionaries::list_replacement_statuses_handler(&state, user).await
}

async fn list_break_statuses(State(state): State<AppState>, Extension(user): Caller) -> Result<Json<Vec<DictItem>>> {
    dictionaries::list_break_statuses_handler(&state, user).await
}

async fn list_organisations(
    State(state): State<AppState>,
    Extension(user): Caller,
    query: Params<OrganisationListQuery>,
) -> Result<Json<Paginated<OrganisationResponse>>> {
    organisations::list_organisations_handler(&state, user, params(query)?).await
}

async fn search_organisations(
    State(state): State<AppState>,
    Extension(user): Caller,
    query: Params<OrganisationSearchQuery>,
) -> Result<Json<Paginated<OrganisationSearchItem>>> {
    organisations::search_organisations_handler(&state, user, params(query)?).await
}

async fn create_organisation(
    State(state): State<AppState>,
    Extension(user): Caller,
    payload: Payload<CreateOrganisationRequest>,
) -> Result<(StatusCode, Json<OrganisationResponse>)> {
    organisations::create_organisation_handler(&state, user, body(payload)?).await
}

async fn get_organisation(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
) -> Result<Json<OrganisationResponse>> {
    organisations::get_organisation_handler(&state, user, ids(path)?).await
}

async fn update_organisation(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<UpdateOrganisationRequest>,
) -> Result<Json<OrganisationResponse>> {
    organisations::update_organisation_handler(&state, user, ids(path)?, body(payload)?).await
}

async fn list_employees(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    query: Params<EmployeeListQuery>,
) -> Result<Json<Paginated<EmployeeResponse>>> {
    employees::list_employees_handler(&state, user, ids(path)?, params(query)?).await
}

async fn search_employees(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    query: Params<EmployeeListQuery>,
) -> Result<Json<Paginated<EmployeeSearchItem>>> {
    employees::search_employees_handler(&state, user, ids(path)?, params(query)?).await
}

async fn create_employee(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeResponse>)> {
    employees::create_employee_handler(&state, user, ids(path)?, body(payload)?).await
}

async fn get_employee(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<(i32, i32)>,
) -> Result<Json<EmployeeResponse>> {
    let (organisation_id, employee_id) = ids(path)?;
    employees::get_employee_handler(&state, user, organisation_id, employee_id).await
}

async fn update_employee(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<(i32, i32)>,
    payload: Payload<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>> {
    let (organisation_id, employee_id) = ids(path)?;
    employees::update_employee_handler(&state, user, organisation_id, employee_id, body(payload)?).await
}

async fn delete_employee(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<(i32, i32)>,
) -> Result<StatusCode> {
    let (organisation_id, employee_id) = ids(path)?;
    employees::delete_employee_handler(&state, user, organisation_id, employee_id).await
}

async fn list_organisation_offers(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    query: Params<OfferListQuery>,
) -> Result<Json<Paginated<OfferResponse>>> {
    offers::list_organisation_offers_handler(&state, user, ids(path)?, params(query)?).await
}

async fn create_organisation_offer(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<CreateOrganisationOfferRequest>,
) -> Result<(StatusCode, Json<OfferResponse>)> {
    offers::create_organisation_offer_handler(&state, user, ids(path)?, body(payload)?).await
}

async fn decide_organisation_offer(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<(i32, i32)>,
    payload: Payload<DecideOfferRequest>,
) -> Result<Json<OfferResponse>> {
    let (organisation_id, offer_id) = ids(path)?;
    offers::decide_organisation_offer_handler(&state, user, organisation_id, offer_id, body(payload)?).await
}

async fn list_user_offers(
    State(state): State<AppState>,
    Extension(user): Caller,
    query: Params<OfferListQuery>,
) -> Result<Json<Paginated<OfferResponse>>> {
    offers::list_user_offers_handler(&state, user, params(query)?).await
}

async fn create_user_offer(
    State(state): State<AppState>,
    Extension(user): Caller,
    payload: Payload<CreateUserOfferRequest>,
) -> Result<(StatusCode, Json<OfferResponse>)> {
    offers::create_user_offer_handler(&state, user, body(payload)?).await
}

async fn decide_user_offer(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<DecideOfferRequest>,
) -> Result<Json<OfferResponse>> {
    offers::decide_user_offer_handler(&state, user, ids(path)?, body(payload)?).await
}

async fn list_groups(
    State(state): State<AppState>,
    Extension(user): Caller,
    query: Params<GroupListQuery>,
) -> Result<Json<Paginated<GroupResponse>>> {
    groups::list_groups_handler(&state, user, params(query)?).await
}

async fn create_group(
    State(state): State<AppState>,
    Extension(user): Caller,
    payload: Payload<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupDetailResponse>)> {
    groups::create_group_handler(&state, user, body(payload)?).await
}

async fn get_group(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
) -> Result<Json<GroupDetailResponse>> {
    groups::get_group_handler(&state, user, ids(path)?).await
}

async fn update_group(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<UpdateGroupRequest>,
) -> Result<Json<GroupDetailResponse>> {
    groups::update_group_handler(&state, user, ids(path)?, body(payload)?).await
}

async fn update_group_settings(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<BreakSettings>,
) -> Result<Json<BreakSettings>> {
    groups::update_group_settings_handler(&state, user, ids(path)?, body(payload)?).await
}

async fn list_members(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    query: Params<MemberListQuery>,
) -> Result<Json<Paginated<MemberResponse>>> {
    members::list_members_handler(&state, user, ids(path)?, params(query)?).await
}

async fn search_members(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    query: Params<MemberListQuery>,
) -> Result<Json<Paginated<MemberSearchItem>>> {
    members::search_members_handler(&state, user, ids(path)?, params(query)?).await
}

async fn add_member(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>)> {
    members::add_member_handler(&state, user, ids(path)?, body(payload)?).await
}

async fn remove_member(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<(i32, i32)>,
) -> Result<StatusCode> {
    let (group_id, member_id) = ids(path)?;
    members::remove_member_handler(&state, user, group_id, member_id).await
}

async fn list_replacements(
    State(state): State<AppState>,
    Extension(user): Caller,
    query: Params<ReplacementListQuery>,
) -> Result<Json<Paginated<ReplacementResponse>>> {
    replacements::list_replacements_handler(&state, user, params(query)?).await
}

async fn create_replacement(
    State(state): State<AppState>,
    Extension(user): Caller,
    payload: Payload<CreateReplacementRequest>,
) -> Result<(StatusCode, Json<ReplacementResponse>)> {
    replacements::create_replacement_handler(&state, user, body(payload)?).await
}

async fn get_replacement(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
) -> Result<Json<ReplacementDetailResponse>> {
    replacements::get_replacement_handler(&state, user, ids(path)?).await
}

async fn update_replacement(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<UpdateReplacementRequest>,
) -> Result<Json<ReplacementResponse>> {
    replacements::update_replacement_handler(&state, user, ids(path)?, body(payload)?).await
}

async fn get_schedule(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
) -> Result<Json<Vec<ScheduleRow>>> {
    replacements::get_schedule_handler(&state, user, ids(path)?).await
}

async fn get_shift_member(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
) -> Result<Json<ShiftMemberResponse>> {
    shift_member::get_shift_member_handler(&state, user, ids(path)?).await
}

async fn update_shift_member(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<UpdateShiftMemberRequest>,
) -> Result<Json<ShiftMemberResponse>> {
    shift_member::update_shift_member_handler(&state, user, ids(path)?, body(payload)?).await
}

async fn get_break(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
) -> Result<Json<BreakResponse>> {
    breaks::get_break_handler(&state, user, ids(path)?).await
}

async fn create_break(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<CreateBreakRequest>,
) -> Result<(StatusCode, Json<BreakResponse>)> {
    breaks::create_break_handler(&state, user, ids(path)?, body(payload)?).await
}

async fn update_break(
    State(state): State<AppState>,
    Extension(user): Caller,
    path: Ids<i32>,
    payload: Payload<UpdateBreakRequest>,
) -> Result<Json<BreakResponse>> {
    breaks::update_break_handler(&state, user, ids(path)?, body(payload)?).await
}

