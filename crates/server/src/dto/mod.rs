//! # Data Transfer Objects Module
//!
//! Request and response types for API endpoints.

use entity::{break_statuses, positions, replacement_statuses};
use serde::Serialize;

pub mod auth;
pub mod breaks;
pub mod employees;
pub mod groups;
pub mod members;
pub mod offers;
pub mod organisations;
pub mod replacements;
pub mod users;

/// Compact user shape embedded in other responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserShort {
    pub id:        i32,
    pub full_name: String,
    pub email:     String,
}

impl From<&entity::users::Model> for UserShort {
    fn from(user: &entity::users::Model) -> Self {
        Self {
            id:        user.id,
            full_name: user.full_name(),
            email:     user.email.clone(),
        }
    }
}

/// A dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictItem {
    pub code: String,
    pub name: String,
}

impl From<positions::Model> for DictItem {
    fn from(model: positions::Model) -> Self {
        Self {
            code: model.code,
            name: model.name,
        }
    }
}

impl From<break_statuses::Model> for DictItem {
    fn from(model: break_statuses::Model) -> Self {
        Self {
            code: model.code,
            name: model.name,
        }
    }
}

/// A shift status with its badge colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusItem {
    pub code:  String,
    pub name:  String,
    pub color: String,
}

impl From<replacement_statuses::Model> for StatusItem {
    fn from(model: replacement_statuses::Model) -> Self {
        Self {
            code:  model.code,
            name:  model.name,
            color: model.color,
        }
    }
}
