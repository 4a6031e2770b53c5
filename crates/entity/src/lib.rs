//! Entity definitions for Breakroom
//!
//! Sea-ORM entities for users, organisations, groups, offers and the
//! shift/break scheduler. Dictionary-backed status columns are exposed as
//! string active enums in [`sea_orm_active_enums`].

pub mod sea_orm_active_enums;

pub mod users;
pub use users::Entity as Users;
pub mod profiles;
pub use profiles::Entity as Profiles;

pub mod positions;
pub use positions::Entity as Positions;
pub mod replacement_statuses;
pub use replacement_statuses::Entity as ReplacementStatuses;
pub mod break_statuses;
pub use break_statuses::Entity as BreakStatuses;

pub mod organisations;
pub use organisations::Entity as Organisations;
pub mod employees;
pub use employees::Entity as Employees;
pub mod groups;
pub use groups::Entity as Groups;
pub mod members;
pub use members::Entity as Members;
pub mod offers;
pub use offers::Entity as Offers;

pub mod group_break_settings;
pub use group_break_settings::Entity as GroupBreakSettings;
pub mod replacements;
pub use replacements::Entity as Replacements;
pub mod replacement_members;
pub use replacement_members::Entity as ReplacementMembers;
pub mod breaks;
pub use breaks::Entity as Breaks;
