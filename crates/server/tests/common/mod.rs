//! # Common Test Utilities
//!
//! Shared setup for the server integration tests: an in-memory SQLite
//! database with the real migrations, cheap password hashing and fixture
//! builders that go through the public handlers.

#![allow(dead_code)]

use std::sync::Once;

use auth::{JwtConfig, PasswordConfig};
use axum::http::StatusCode;
use chrono::NaiveTime;
use entity::{employees, sea_orm_active_enums::Position};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DbConn, Set};
use server::{
    dto::{
        auth::RegisterRequest,
        groups::{CreateGroupRequest, GroupDetailResponse},
        members::{AddMemberRequest, MemberResponse},
        organisations::{CreateOrganisationRequest, OrganisationResponse},
        replacements::{CreateReplacementRequest, ReplacementResponse},
    },
    handlers,
    middleware::auth::AuthenticatedUser,
    utils::Now,
    AppState,
};

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

pub const TEST_PASSWORD: &str = "lunchAt1200";

pub const JWT_SECRET: &str = "integration-test-secret-with-at-least-32-bytes";

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Migrated in-memory database.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn test_db() -> DbConn {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await.expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

/// Application state over a fresh database.
pub async fn test_state() -> AppState {
    init_test_env();
    let jwt = JwtConfig::new(JWT_SECRET, 3600, "breakroom-test", "breakroom-api-test").expect("valid jwt config");
    AppState::new(test_db().await, jwt).with_password_config(PasswordConfig {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
        ..Default::default()
    })
}

pub fn t(h: u32, m: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, 0).expect("valid time") }

/// Registers a user and returns them as an authenticated caller.
pub async fn register(state: &AppState, email: &str, first_name: &str, last_name: &str) -> AuthenticatedUser {
    let (status, user) = handlers::auth::register_handler(
        state,
        RegisterRequest {
            email:        email.to_string(),
            password:     TEST_PASSWORD.to_string(),
            first_name:   first_name.to_string(),
            last_name:    last_name.to_string(),
            phone_number: None,
        },
    )
    .await
    .expect("registration succeeds");
    assert_eq!(status, StatusCode::CREATED);

    AuthenticatedUser {
        id:    user.0.id,
        email: user.0.email.clone(),
    }
}

pub async fn create_organisation(state: &AppState, director: &AuthenticatedUser, name: &str) -> OrganisationResponse {
    let (_, organisation) = handlers::organisations::create_organisation_handler(
        state,
        director.clone(),
        CreateOrganisationRequest {
            name: name.to_string(),
        },
    )
    .await
    .expect("organisation is created");
    organisation.0
}

/// Adds an existing user to an organisation directly.
pub async fn hire(state: &AppState, organisation_id: i32, user: &AuthenticatedUser, position: Position) -> employees::Model {
    employees::ActiveModel {
        organisation_id: Set(organisation_id),
        user_id: Set(user.id),
        position: Set(position),
        date_joined: Set(Now::current().today()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .expect("employee is created")
}

pub async fn create_group(
    state: &AppState,
    director: &AuthenticatedUser,
    organisation_id: i32,
    name: &str,
) -> GroupDetailResponse {
    let (_, group) = handlers::groups::create_group_handler(
        state,
        director.clone(),
        CreateGroupRequest {
            organisation_id,
            name: name.to_string(),
            manager_id: None,
        },
    )
    .await
    .expect("group is created");
    group.0
}

pub async fn add_member(
    state: &AppState,
    manager: &AuthenticatedUser,
    group_id: i32,
    employee_id: i32,
) -> MemberResponse {
    let (_, member) = handlers::members::add_member_handler(
        state,
        manager.clone(),
        group_id,
        AddMemberRequest {
            employee_id,
        },
    )
    .await
    .expect("member is added");
    member.0
}

/// Shift request for today with a lunch window covering the whole day, so
/// bookings and break actions do not depend on the wall clock.
pub fn todays_shift(group_id: i32, members: Vec<i32>, min_active: i32) -> CreateReplacementRequest {
    CreateReplacementRequest {
        group_id,
        date: Now::current().today(),
        break_start: Some(t(0, 0)),
        break_end: Some(t(23, 45)),
        break_max_duration: Some(60),
        min_active: Some(min_active),
        members: Some(members),
        all_group_members: false,
        remember_default_data: false,
    }
}

pub async fn create_shift(
    state: &AppState,
    manager: &AuthenticatedUser,
    request: CreateReplacementRequest,
) -> ReplacementResponse {
    let (_, shift) = handlers::replacements::create_replacement_handler(state, manager.clone(), request)
        .await
        .expect("shift is created");
    shift.0
}

/// A director with an organisation and group, plus `operators` registered
/// users hired as operators and added to the group.
pub struct Team {
    pub director:     AuthenticatedUser,
    pub organisation: OrganisationResponse,
    pub group:        GroupDetailResponse,
    pub operators:    Vec<AuthenticatedUser>,
    /// Member ids, in the same order as `operators`
    pub member_ids:   Vec<i32>,
}

pub async fn team(state: &AppState, operators: usize) -> Team {
    let director = register(state, "director@example.com", "Dana", "Director").await;
    let organisation = create_organisation(state, &director, "Call Centre").await;
    let group = create_group(state, &director, organisation.id, "Support").await;

    let mut people = Vec::new();
    let mut member_ids = Vec::new();
    for n in 0 .. operators {
        let user = register(state, &format!("operator{}@example.com", n), "Oper", &format!("Ator{}", n)).await;
        let employee = hire(state, organisation.id, &user, Position::Operator).await;
        let member = add_member(state, &director, group.group.id, employee.id).await;
        people.push(user);
        member_ids.push(member.id);
    }

    Team {
        director,
        organisation,
        group,
        operators: people,
        member_ids,
    }
}
