//! Entity level behaviour that does not need a database.

use entity::{
    offers,
    sea_orm_active_enums::{BreakStatus, Position, ReplacementStatus},
    users,
};
use sea_orm::{ActiveEnum, Iterable};

#[test]
fn test_position_codes() {
    assert_eq!(Position::Director.to_value(), "director");
    assert_eq!(Position::Manager.to_value(), "manager");
    assert_eq!(Position::Operator.to_value(), "operator");
    assert_eq!(format!("{}", Position::Operator), "operator");
}

#[test]
fn test_only_directors_and_managers_manage_groups() {
    let managing: Vec<Position> = Position::iter().filter(|p| p.can_manage_groups()).collect();
    assert_eq!(managing, vec![Position::Director, Position::Manager]);
}

#[test]
fn test_replacement_status_round_trip() {
    for status in ReplacementStatus::iter() {
        let code = status.to_value();
        assert_eq!(ReplacementStatus::try_from_value(&code).unwrap(), status);
        assert_eq!(code, status.to_string());
    }
    assert!(ReplacementStatus::try_from_value(&"lunch".to_string()).is_err());
}

#[test]
fn test_break_status_display() {
    assert_eq!(BreakStatus::Created.to_string(), "created");
    assert_eq!(BreakStatus::Started.to_string(), "started");
    assert_eq!(BreakStatus::Finished.to_string(), "finished");
}

#[test]
fn test_status_serde_uses_codes() {
    assert_eq!(serde_json::to_string(&ReplacementStatus::Break).unwrap(), "\"break\"");
    let parsed: Position = serde_json::from_str("\"manager\"").unwrap();
    assert_eq!(parsed, Position::Manager);
}

fn offer(org_accept: Option<bool>, user_accept: Option<bool>, created_by: i32) -> offers::Model {
    let now = chrono::Utc::now();
    offers::Model {
        id: 1,
        organisation_id: 1,
        user_id: 10,
        org_accept,
        user_accept,
        created_by,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_offer_states() {
    let application = offer(None, Some(true), 10);
    assert!(application.is_application());
    assert!(application.is_open());

    let invitation = offer(Some(true), None, 2);
    assert!(!invitation.is_application());
    assert!(invitation.is_open());

    assert!(offer(Some(true), Some(true), 2).is_accepted());
    assert!(!offer(Some(true), Some(true), 2).is_open());
    assert!(!offer(Some(false), Some(true), 10).is_open());
}

#[test]
fn test_user_full_name() {
    let now = chrono::Utc::now();
    let user = users::Model {
        id: 1,
        email: "ann@example.com".to_string(),
        password_hash: String::new(),
        first_name: "Ann".to_string(),
        last_name: String::new(),
        phone_number: None,
        is_corporate_account: false,
        is_superuser: false,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    assert_eq!(user.full_name(), "Ann");
    assert!(!serde_json::to_value(&user).unwrap().as_object().unwrap().contains_key("password_hash"));
}
