//! Organisations, their employees, groups and group members.

mod common;

use axum::http::StatusCode;
use common::{add_member, create_group, create_organisation, hire, register, team, test_state, TEST_PASSWORD};
use entity::sea_orm_active_enums::Position;
use server::{
    dto::{
        employees::{CreateEmployeeRequest, EmployeeListQuery, UpdateEmployeeRequest},
        groups::{CreateGroupRequest, GroupListQuery, UpdateGroupRequest},
        members::{AddMemberRequest, MemberListQuery},
        organisations::{CreateOrganisationRequest, OrganisationListQuery, UpdateOrganisationRequest},
    },
    handlers::{employees, groups, members, organisations},
};

#[tokio::test]
async fn test_creating_organisation_makes_caller_director() {
    let state = test_state().await;
    let director = register(&state, "dana@example.com", "Dana", "Director").await;

    let organisation = create_organisation(&state, &director, "Call Centre").await;
    assert_eq!(organisation.director.id, director.id);
    assert_eq!(organisation.pax, 1);
    assert_eq!(organisation.groups_count, 0);
    assert!(organisation.can_manage);

    let staff = employees::list_employees_handler(&state, director.clone(), organisation.id, EmployeeListQuery::default())
        .await
        .unwrap();
    assert_eq!(staff.items.len(), 1);
    assert_eq!(staff.items[0].position.code, "director");

    let err = organisations::create_organisation_handler(
        &state,
        director,
        CreateOrganisationRequest {
            name: "Call Centre".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_only_employees_see_an_organisation() {
    let state = test_state().await;
    let director = register(&state, "dana@example.com", "Dana", "Director").await;
    let stranger = register(&state, "sam@example.com", "Sam", "Stranger").await;
    let organisation = create_organisation(&state, &director, "Call Centre").await;

    let err = organisations::get_organisation_handler(&state, stranger.clone(), organisation.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let mine = organisations::list_organisations_handler(&state, stranger, OrganisationListQuery::default())
        .await
        .unwrap();
    assert!(mine.items.is_empty());
}

#[tokio::test]
async fn test_only_director_renames() {
    let state = test_state().await;
    let director = register(&state, "dana@example.com", "Dana", "Director").await;
    let manager = register(&state, "max@example.com", "Max", "Manager").await;
    let organisation = create_organisation(&state, &director, "Call Centre").await;
    hire(&state, organisation.id, &manager, Position::Manager).await;

    let err = organisations::update_organisation_handler(
        &state,
        manager,
        organisation.id,
        UpdateOrganisationRequest {
            name: "Renamed".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let renamed = organisations::update_organisation_handler(
        &state,
        director,
        organisation.id,
        UpdateOrganisationRequest {
            name: "  Help Desk ".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.name, "Help Desk");
    assert_eq!(renamed.pax, 2);
}

#[tokio::test]
async fn test_director_creates_corporate_employee() {
    let state = test_state().await;
    let director = register(&state, "dana@example.com", "Dana", "Director").await;
    let organisation = create_organisation(&state, &director, "Call Centre").await;

    let request = |position| CreateEmployeeRequest {
        first_name: "Olga".to_string(),
        last_name: "Operator".to_string(),
        email: "olga@callcentre.example".to_string(),
        password: TEST_PASSWORD.to_string(),
        position,
    };

    let err = employees::create_employee_handler(&state, director.clone(), organisation.id, request(Some(Position::Director)))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "The director position cannot be assigned.");

    let (status, employee) = employees::create_employee_handler(&state, director.clone(), organisation.id, request(None))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert!(employee.user.is_corporate_account);
    assert_eq!(employee.position.code, "operator");

    let corporate = employees::list_employees_handler(
        &state,
        director,
        organisation.id,
        EmployeeListQuery {
            only_corporate: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(corporate.items.len(), 1);
    assert_eq!(corporate.items[0].user.email, "olga@callcentre.example");
}

#[tokio::test]
async fn test_manager_cannot_create_corporate_employee() {
    let state = test_state().await;
    let director = register(&state, "dana@example.com", "Dana", "Director").await;
    let manager = register(&state, "max@example.com", "Max", "Manager").await;
    let organisation = create_organisation(&state, &director, "Call Centre").await;
    hire(&state, organisation.id, &manager, Position::Manager).await;

    let err = employees::create_employee_handler(
        &state,
        manager,
        organisation.id,
        CreateEmployeeRequest {
            first_name: "Olga".to_string(),
            last_name:  "Operator".to_string(),
            email:      "olga@callcentre.example".to_string(),
            password:   TEST_PASSWORD.to_string(),
            position:   None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.message(), "Such organization is not found");
}

#[tokio::test]
async fn test_group_manager_cannot_be_demoted() {
    let state = test_state().await;
    let director = register(&state, "dana@example.com", "Dana", "Director").await;
    let manager = register(&state, "max@example.com", "Max", "Manager").await;
    let organisation = create_organisation(&state, &director, "Call Centre").await;
    let employee = hire(&state, organisation.id, &manager, Position::Manager).await;

    groups::create_group_handler(
        &state,
        director.clone(),
        CreateGroupRequest {
            organisation_id: organisation.id,
            name: "Support".to_string(),
            manager_id: Some(employee.id),
        },
    )
    .await
    .unwrap();

    let err = employees::update_employee_handler(
        &state,
        director.clone(),
        organisation.id,
        employee.id,
        UpdateEmployeeRequest {
            position: Position::Operator,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.message(),
        "Unable to change position. The employee is the manager in the following groups: Support."
    );

    let err = employees::delete_employee_handler(&state, director, organisation.id, employee.id)
        .await
        .unwrap_err();
    assert!(err.message().starts_with("Deletion is not possible."));
}

#[tokio::test]
async fn test_head_is_protected() {
    let state = test_state().await;
    let director = register(&state, "dana@example.com", "Dana", "Director").await;
    let organisation = create_organisation(&state, &director, "Call Centre").await;
    let staff = employees::list_employees_handler(&state, director.clone(), organisation.id, EmployeeListQuery::default())
        .await
        .unwrap();
    let head = staff.items[0].id;

    let err = employees::update_employee_handler(
        &state,
        director.clone(),
        organisation.id,
        head,
        UpdateEmployeeRequest {
            position: Position::Manager,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.message(), "The head of the organization is unavailable for changes.");

    let err = employees::delete_employee_handler(&state, director, organisation.id, head)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "You can't remove a leader from an organization");
}

#[tokio::test]
async fn test_free_employee_can_be_removed() {
    let state = test_state().await;
    let director = register(&state, "dana@example.com", "Dana", "Director").await;
    let operator = register(&state, "olga@example.com", "Olga", "Operator").await;
    let organisation = create_organisation(&state, &director, "Call Centre").await;
    let employee = hire(&state, organisation.id, &operator, Position::Operator).await;

    let status = employees::delete_employee_handler(&state, director.clone(), organisation.id, employee.id)
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let err = employees::get_employee_handler(&state, director, organisation.id, employee.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_group_rules() {
    let state = test_state().await;
    let director = register(&state, "dana@example.com", "Dana", "Director").await;
    let operator = register(&state, "olga@example.com", "Olga", "Operator").await;
    let organisation = create_organisation(&state, &director, "Call Centre").await;
    let olga = hire(&state, organisation.id, &operator, Position::Operator).await;

    let group = create_group(&state, &director, organisation.id, "Support").await;
    assert_eq!(group.group.manager.user.id, director.id);
    assert!(group.group.can_manage);
    assert_eq!(group.breaks_info.min_active, None);

    let err = groups::create_group_handler(
        &state,
        director.clone(),
        CreateGroupRequest {
            organisation_id: organisation.id,
            name: "Support".to_string(),
            manager_id: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);

    let err = groups::create_group_handler(
        &state,
        operator.clone(),
        CreateGroupRequest {
            organisation_id: organisation.id,
            name: "Night".to_string(),
            manager_id: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let err = groups::update_group_handler(
        &state,
        director.clone(),
        group.group.id,
        UpdateGroupRequest {
            manager_id: Some(olga.id),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let visible = groups::list_groups_handler(&state, operator, GroupListQuery::default())
        .await
        .unwrap();
    assert_eq!(visible.items.len(), 1);
    assert!(!visible.items[0].can_manage);
    assert!(!visible.items[0].is_member);
}

#[tokio::test]
async fn test_membership() {
    let state = test_state().await;
    let t = team(&state, 2).await;
    let group_id = t.group.group.id;

    let roster = members::list_members_handler(&state, t.operators[0].clone(), group_id, MemberListQuery::default())
        .await
        .unwrap();
    assert_eq!(roster.meta.total_items, 2);

    let joined = groups::list_groups_handler(
        &state,
        t.operators[0].clone(),
        GroupListQuery {
            is_member: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(joined.items.len(), 1);

    let duplicate = members::add_member_handler(
        &state,
        t.director.clone(),
        group_id,
        AddMemberRequest {
            employee_id: roster.items[0].employee_id,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let err = members::remove_member_handler(&state, t.operators[1].clone(), group_id, t.member_ids[0])
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let status = members::remove_member_handler(&state, t.director.clone(), group_id, t.member_ids[0])
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let err = members::remove_member_handler(&state, t.director.clone(), group_id, t.member_ids[0])
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_foreign_employee_cannot_join_group() {
    let state = test_state().await;
    let t = team(&state, 0).await;
    let other_director = register(&state, "oscar@example.com", "Oscar", "Other").await;
    let other = create_organisation(&state, &other_director, "Other Centre").await;
    let outsider = register(&state, "olga@example.com", "Olga", "Operator").await;
    let foreign = hire(&state, other.id, &outsider, Position::Operator).await;

    let err = members::add_member_handler(
        &state,
        t.director.clone(),
        t.group.group.id,
        AddMemberRequest {
            employee_id: foreign.id,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.message(), "The employee does not belong to the organisation of the group.");

    let local = hire(&state, t.organisation.id, &outsider, Position::Operator).await;
    let member = add_member(&state, &t.director, t.group.group.id, local.id).await;
    assert_eq!(member.user.id, outsider.id);
}
