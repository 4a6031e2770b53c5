//! Shift planning, presence and lunch-break booking.

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{create_shift, t, team, test_state, todays_shift};
use entity::sea_orm_active_enums::{BreakStatus, ReplacementStatus};
use server::{
    dto::{
        breaks::{CreateBreakRequest, UpdateBreakRequest},
        groups::BreakSettings,
        replacements::{ReplacementCategory, ReplacementListQuery, UpdateReplacementRequest, UpdateShiftMemberRequest},
    },
    handlers::{breaks, groups, replacements, shift_member},
    scheduling::{BookingButton, BreakButton, ReplacementButton},
    utils::Now,
};

fn booking(start: (u32, u32), end: (u32, u32)) -> CreateBreakRequest {
    CreateBreakRequest {
        break_start: t(start.0, start.1),
        break_end:   t(end.0, end.1),
    }
}

#[tokio::test]
async fn test_missing_parameters_fall_back_to_group_settings() {
    let state = test_state().await;
    let team = team(&state, 1).await;
    let group_id = team.group.group.id;

    let mut request = todays_shift(group_id, team.member_ids.clone(), 0);
    request.break_start = None;
    request.break_end = None;

    let err = replacements::create_replacement_handler(&state, team.director.clone(), request.clone())
        .await
        .unwrap_err();
    assert_eq!(err.message(), "break_start - required field.");

    groups::update_group_settings_handler(
        &state,
        team.director.clone(),
        group_id,
        BreakSettings {
            break_start: Some(t(12, 0)),
            break_end: Some(t(15, 0)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let shift = create_shift(&state, &team.director, request).await;
    assert_eq!(shift.break_start, t(12, 0));
    assert_eq!(shift.break_end, t(15, 0));
    assert_eq!(shift.break_max_duration, 60);
}

#[tokio::test]
async fn test_remembered_parameters_become_group_defaults() {
    let state = test_state().await;
    let team = team(&state, 1).await;
    let group_id = team.group.group.id;

    let mut request = todays_shift(group_id, team.member_ids.clone(), 2);
    request.remember_default_data = true;
    create_shift(&state, &team.director, request).await;

    let group = groups::get_group_handler(&state, team.director.clone(), group_id).await.unwrap();
    assert_eq!(group.breaks_info.min_active, Some(2));
    assert_eq!(group.breaks_info.break_start, Some(t(0, 0)));
    assert_eq!(group.breaks_info.break_max_duration, Some(60));
}

#[tokio::test]
async fn test_shift_date_and_roster_rules() {
    let state = test_state().await;
    let team = team(&state, 2).await;
    let group_id = team.group.group.id;
    let today = Now::current().today();

    let mut past = todays_shift(group_id, team.member_ids.clone(), 0);
    past.date = today - Duration::days(1);
    let err = replacements::create_replacement_handler(&state, team.director.clone(), past)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let stranger_roster = todays_shift(group_id, vec![team.member_ids[0] + 1000], 0);
    let err = replacements::create_replacement_handler(&state, team.director.clone(), stranger_roster)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "All shift members must be members of the group.");

    let err = replacements::create_replacement_handler(
        &state,
        team.operators[0].clone(),
        todays_shift(group_id, team.member_ids.clone(), 0),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    create_shift(&state, &team.director, todays_shift(group_id, team.member_ids.clone(), 0)).await;
    let err = replacements::create_replacement_handler(
        &state,
        team.director.clone(),
        todays_shift(group_id, team.member_ids.clone(), 0),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.message(), "Today there is already an active shift.");
}

#[tokio::test]
async fn test_shift_lists_by_category() {
    let state = test_state().await;
    let team = team(&state, 1).await;
    let group_id = team.group.group.id;

    create_shift(&state, &team.director, todays_shift(group_id, team.member_ids.clone(), 0)).await;
    let mut tomorrow = todays_shift(group_id, team.member_ids.clone(), 0);
    tomorrow.date = Now::current().today() + Duration::days(1);
    create_shift(&state, &team.director, tomorrow).await;

    let list = |category| {
        replacements::list_replacements_handler(
            &state,
            team.operators[0].clone(),
            ReplacementListQuery {
                category,
                ..Default::default()
            },
        )
    };

    assert_eq!(list(None).await.unwrap().meta.total_items, 2);
    assert_eq!(list(Some(ReplacementCategory::Active)).await.unwrap().meta.total_items, 1);
    assert_eq!(list(Some(ReplacementCategory::Future)).await.unwrap().meta.total_items, 1);
    assert_eq!(list(Some(ReplacementCategory::Archive)).await.unwrap().meta.total_items, 0);
}

#[tokio::test]
async fn test_updating_roster_keeps_existing_presence() {
    let state = test_state().await;
    let team = team(&state, 2).await;
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, vec![team.member_ids[0]], 0),
    )
    .await;

    shift_member::update_shift_member_handler(
        &state,
        team.operators[0].clone(),
        shift.id,
        UpdateShiftMemberRequest {
            status: ReplacementStatus::Online,
        },
    )
    .await
    .unwrap();

    let updated = replacements::update_replacement_handler(
        &state,
        team.director.clone(),
        shift.id,
        UpdateReplacementRequest {
            members: Some(team.member_ids.clone()),
            min_active: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.min_active, 1);

    let detail = replacements::get_replacement_handler(&state, team.director.clone(), shift.id)
        .await
        .unwrap();
    assert_eq!(detail.stats.members_count, 2);
    assert_eq!(detail.stats.members_online, 1);
    assert_eq!(detail.stats.members_offline, 1);

    let err = replacements::update_replacement_handler(
        &state,
        team.operators[0].clone(),
        shift.id,
        UpdateReplacementRequest::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_presence_changes() {
    let state = test_state().await;
    let team = team(&state, 1).await;
    let operator = team.operators[0].clone();
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, team.member_ids.clone(), 0),
    )
    .await;

    let status = |target| {
        shift_member::update_shift_member_handler(
            &state,
            operator.clone(),
            shift.id,
            UpdateShiftMemberRequest {
                status: target,
            },
        )
    };

    let current = shift_member::get_shift_member_handler(&state, operator.clone(), shift.id)
        .await
        .unwrap();
    assert_eq!(current.status.code, "offline");

    let err = status(ReplacementStatus::Offline).await.unwrap_err();
    assert_eq!(err.message(), "Unable to end shift. Check all pending shift activities");

    assert_eq!(status(ReplacementStatus::Online).await.unwrap().status.code, "online");
    assert_eq!(status(ReplacementStatus::Offline).await.unwrap().status.code, "offline");

    let err = status(ReplacementStatus::Online).await.unwrap_err();
    assert_eq!(err.message(), "You have already completed your shift.");

    let err = shift_member::get_shift_member_handler(&state, team.director.clone(), shift.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_respects_staffing_floor() {
    let state = test_state().await;
    let team = team(&state, 3).await;
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, team.member_ids.clone(), 1),
    )
    .await;

    for operator in &team.operators[.. 2] {
        let (status, booked) = breaks::create_break_handler(&state, operator.clone(), shift.id, booking((0, 0), (0, 30)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(booked.status, BreakStatus::Created);
    }

    let err = breaks::create_break_handler(&state, team.operators[2].clone(), shift.id, booking((0, 15), (0, 45)))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "There are no available seats for the selected interval.");

    breaks::create_break_handler(&state, team.operators[2].clone(), shift.id, booking((0, 30), (1, 0)))
        .await
        .unwrap();

    let err = breaks::create_break_handler(&state, team.operators[0].clone(), shift.id, booking((2, 0), (2, 30)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_booking_rules() {
    let state = test_state().await;
    let team = team(&state, 1).await;
    let operator = team.operators[0].clone();
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, team.member_ids.clone(), 0),
    )
    .await;

    let err = breaks::create_break_handler(&state, operator.clone(), shift.id, booking((0, 10), (0, 30)))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "The time must be a multiple of 15 minutes.");

    let err = breaks::create_break_handler(&state, operator.clone(), shift.id, booking((1, 0), (2, 15)))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Lunch duration exceeds the maximum set value.");

    let err = breaks::create_break_handler(&state, team.director.clone(), shift.id, booking((1, 0), (1, 30)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let err = breaks::get_break_handler(&state, operator, shift.id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_break_start_and_finish() {
    let state = test_state().await;
    let team = team(&state, 1).await;
    let operator = team.operators[0].clone();
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, team.member_ids.clone(), 0),
    )
    .await;

    breaks::create_break_handler(&state, operator.clone(), shift.id, booking((0, 0), (0, 30)))
        .await
        .unwrap();

    let action = |status: &str| {
        breaks::update_break_handler(
            &state,
            operator.clone(),
            shift.id,
            UpdateBreakRequest {
                status: Some(status.to_string()),
                ..Default::default()
            },
        )
    };

    let err = action("break_start").await.unwrap_err();
    assert_eq!(err.message(), "Unable to start lunch while your status is Offline.");

    shift_member::update_shift_member_handler(
        &state,
        operator.clone(),
        shift.id,
        UpdateShiftMemberRequest {
            status: ReplacementStatus::Online,
        },
    )
    .await
    .unwrap();

    let err = action("break_end").await.unwrap_err();
    assert_eq!(err.message(), "Lunch break hasn't started yet.");
    let err = action("lunch").await.unwrap_err();
    assert_eq!(err.message(), "Status should be break_start or break_end");

    assert_eq!(action("break_start").await.unwrap().status, BreakStatus::Started);
    let detail = replacements::get_replacement_handler(&state, operator.clone(), shift.id)
        .await
        .unwrap();
    assert_eq!(detail.stats.members_break, 1);
    assert_eq!(detail.actions.break_button, Some(BreakButton::Finish));

    let err = action("break_start").await.unwrap_err();
    assert_eq!(err.message(), "The lunch break has already begun.");

    assert_eq!(action("break_end").await.unwrap().status, BreakStatus::Finished);
    let err = action("break_end").await.unwrap_err();
    assert_eq!(err.message(), "The lunch break is already over.");

    let member = shift_member::get_shift_member_handler(&state, operator.clone(), shift.id)
        .await
        .unwrap();
    assert_eq!(member.status.code, "online");

    let detail = replacements::get_replacement_handler(&state, operator, shift.id)
        .await
        .unwrap();
    let personal = detail.personal_stats.as_ref().unwrap();
    assert!(personal.time_online.is_some());
    assert!(personal.time_break_start.is_some());
    assert!(personal.time_break_end.is_some());
    assert_eq!(detail.actions.replacement_button, Some(ReplacementButton::Offline));
    assert_eq!(detail.actions.break_button, None);
}

#[tokio::test]
async fn test_moving_a_booking_does_not_count_itself() {
    let state = test_state().await;
    let team = team(&state, 2).await;
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, team.member_ids.clone(), 1),
    )
    .await;

    breaks::create_break_handler(&state, team.operators[0].clone(), shift.id, booking((0, 0), (0, 30)))
        .await
        .unwrap();

    let moved = breaks::update_break_handler(
        &state,
        team.operators[0].clone(),
        shift.id,
        UpdateBreakRequest {
            break_start: Some(t(0, 15)),
            break_end: Some(t(0, 45)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.break_start, t(0, 15));
    assert_eq!(moved.break_end, t(0, 45));

    let err = breaks::create_break_handler(&state, team.operators[1].clone(), shift.id, booking((0, 30), (1, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shift_detail_and_schedule() {
    let state = test_state().await;
    let team = team(&state, 2).await;
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, team.member_ids.clone(), 0),
    )
    .await;
    breaks::create_break_handler(&state, team.operators[0].clone(), shift.id, booking((0, 0), (0, 30)))
        .await
        .unwrap();

    let detail = replacements::get_replacement_handler(&state, team.operators[0].clone(), shift.id)
        .await
        .unwrap();
    assert_eq!(detail.stats.members_count, 2);
    assert_eq!(detail.stats.breaks_count, 1);
    assert_eq!(detail.general.break_start, "00:00");
    assert_eq!(detail.general.break_end, "23:45");
    assert_eq!(detail.members.len(), 2);
    assert_eq!(detail.breaks.button, Some(BookingButton::Update));
    assert_eq!(detail.breaks.info.as_ref().unwrap().break_end, "00:30");
    assert_eq!(detail.actions.replacement_button, Some(ReplacementButton::Online));
    assert_eq!(detail.actions.break_button, Some(BreakButton::Start));

    let manager_view = replacements::get_replacement_handler(&state, team.director.clone(), shift.id)
        .await
        .unwrap();
    assert!(manager_view.personal_stats.is_none());
    assert_eq!(manager_view.breaks.button, None);

    let schedule = replacements::get_schedule_handler(&state, team.director.clone(), shift.id)
        .await
        .unwrap();
    assert_eq!(schedule.len(), 1);
    let row = &schedule[0];
    assert_eq!(row[0].value, "Oper Ator0");
    assert_eq!(row[1].value, "00:00 - 00:30");
    assert_eq!(row[1].colspan, 2);
    assert_eq!(row[2].colspan, 93);
}

#[tokio::test]
async fn test_whole_group_roster() {
    let state = test_state().await;
    let team = team(&state, 3).await;

    let mut request = todays_shift(team.group.group.id, Vec::new(), 0);
    request.members = None;
    request.all_group_members = true;
    let shift = create_shift(&state, &team.director, request).await;

    let detail = replacements::get_replacement_handler(&state, team.director.clone(), shift.id)
        .await
        .unwrap();
    assert_eq!(detail.stats.members_count, 3);
    assert_eq!(detail.members.len(), 3);
}

#[tokio::test]
async fn test_empty_member_list_keeps_roster_and_bookings() {
    let state = test_state().await;
    let team = team(&state, 2).await;
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, team.member_ids.clone(), 0),
    )
    .await;
    breaks::create_break_handler(&state, team.operators[0].clone(), shift.id, booking((0, 0), (0, 30)))
        .await
        .unwrap();

    replacements::update_replacement_handler(
        &state,
        team.director.clone(),
        shift.id,
        UpdateReplacementRequest {
            members: Some(Vec::new()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let detail = replacements::get_replacement_handler(&state, team.director.clone(), shift.id)
        .await
        .unwrap();
    assert_eq!(detail.stats.members_count, 2);
    assert_eq!(detail.stats.breaks_count, 1);
    breaks::get_break_handler(&state, team.operators[0].clone(), shift.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_moving_shift_date() {
    let state = test_state().await;
    let team = team(&state, 1).await;
    let group_id = team.group.group.id;
    let today = Now::current().today();

    let todays = create_shift(&state, &team.director, todays_shift(group_id, team.member_ids.clone(), 0)).await;
    let mut request = todays_shift(group_id, team.member_ids.clone(), 0);
    request.date = today + Duration::days(1);
    let tomorrows = create_shift(&state, &team.director, request).await;

    let same_day = replacements::update_replacement_handler(
        &state,
        team.director.clone(),
        todays.id,
        UpdateReplacementRequest {
            date: Some(today),
            min_active: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(same_day.date, today);

    let err = replacements::update_replacement_handler(
        &state,
        team.director.clone(),
        tomorrows.id,
        UpdateReplacementRequest {
            date: Some(today),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.message(), "Today there is already an active shift.");

    let later = replacements::update_replacement_handler(
        &state,
        team.director.clone(),
        tomorrows.id,
        UpdateReplacementRequest {
            date: Some(today + Duration::days(2)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(later.date, today + Duration::days(2));
}

#[tokio::test]
async fn test_no_floor_leaves_every_seat_bookable() {
    let state = test_state().await;
    let team = team(&state, 1).await;
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, team.member_ids.clone(), 0),
    )
    .await;

    let (status, _) = breaks::create_break_handler(&state, team.operators[0].clone(), shift.id, booking((0, 0), (0, 30)))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let state = test_state().await;
    let team = common::team(&state, 1).await;
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, team.member_ids.clone(), 1),
    )
    .await;
    let err = breaks::create_break_handler(&state, team.operators[0].clone(), shift.id, booking((0, 0), (0, 30)))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "There are no available seats for the selected interval.");
}

#[tokio::test]
async fn test_narrowing_window_around_bookings() {
    let state = test_state().await;
    let team = team(&state, 1).await;
    let shift = create_shift(
        &state,
        &team.director,
        todays_shift(team.group.group.id, team.member_ids.clone(), 0),
    )
    .await;
    breaks::create_break_handler(&state, team.operators[0].clone(), shift.id, booking((0, 0), (0, 30)))
        .await
        .unwrap();

    let err = replacements::update_replacement_handler(
        &state,
        team.director.clone(),
        shift.id,
        UpdateReplacementRequest {
            break_start: Some(t(1, 0)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), "Some lunch breaks are already booked outside the new break time.");

    let narrowed = replacements::update_replacement_handler(
        &state,
        team.director.clone(),
        shift.id,
        UpdateReplacementRequest {
            break_end: Some(t(0, 30)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(narrowed.break_end, t(0, 30));
}
