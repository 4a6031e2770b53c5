//! # Shift Scheduling
//!
//! Pure rules behind shifts, member presence and lunch-break booking.
//!
//! Nothing in here touches the database or reads the clock: handlers load
//! the rows, take one snapshot of "now" and pass both in. Break times are
//! naive wall-clock values on the shift date, member presence timestamps are
//! UTC instants.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use entity::{
    breaks,
    group_break_settings,
    replacement_members,
    replacements,
    sea_orm_active_enums::{BreakStatus, ReplacementStatus},
};
use error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Width of one booking slot.
pub const SLOT_MINUTES: i64 = 15;

/// A break may be started this early.
const START_GRACE_MINUTES: i64 = 5;

/// New bookings close this long before the lunch window ends.
const BOOKING_CUTOFF_MINUTES: i64 = 30;

/// True when `time` falls on a 15-minute boundary with no seconds.
pub fn is_aligned(time: NaiveTime) -> bool {
    time.minute() % SLOT_MINUTES as u32 == 0 && time.second() == 0 && time.nanosecond() == 0
}

/// Slot starts `t` with `start <= t < end`, stepping by [`SLOT_MINUTES`].
pub fn slot_ticks(start: NaiveTime, end: NaiveTime) -> Vec<NaiveTime> {
    let mut ticks = Vec::new();
    let mut tick = start;
    while tick < end {
        ticks.push(tick);
        let (next, wrapped) = tick.overflowing_add_signed(Duration::minutes(SLOT_MINUTES));
        if wrapped != 0 {
            break;
        }
        tick = next;
    }
    ticks
}

/// An already booked interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedSlot {
    pub id:    i32,
    pub start: NaiveTime,
    pub end:   NaiveTime,
}

impl From<&breaks::Model> for BookedSlot {
    fn from(model: &breaks::Model) -> Self {
        Self {
            id:    model.id,
            start: model.break_start,
            end:   model.break_end,
        }
    }
}

/// Fewest free seats over the slots of `[start, end)`.
///
/// For every slot the free count is the shift headcount minus the breaks
/// covering that slot. `exclude` drops one booking from the count, used when
/// a member moves their own break. An empty interval leaves every seat free.
pub fn free_breaks_available(
    members_count: i64,
    booked: &[BookedSlot],
    start: NaiveTime,
    end: NaiveTime,
    exclude: Option<i32>,
) -> i64 {
    slot_ticks(start, end)
        .into_iter()
        .map(|tick| {
            let taken = booked
                .iter()
                .filter(|b| Some(b.id) != exclude && b.start <= tick && tick < b.end)
                .count();
            members_count - taken as i64
        })
        .min()
        .unwrap_or(members_count)
}

/// Interval a member asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakRequest {
    pub start: NaiveTime,
    pub end:   NaiveTime,
}

/// Headcount and bookings of a shift at validation time.
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    pub members_count: i64,
    pub booked:        &'a [BookedSlot],
    /// Booking being edited, not counted against itself
    pub exclude:       Option<i32>,
}

/// Checks a booking against the shift window and staffing floor.
///
/// Checks run in a fixed order and the first failure wins.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] naming the first violated rule.
pub fn validate_booking(
    request: &BreakRequest,
    shift: &replacements::Model,
    occupancy: &Occupancy<'_>,
    today: NaiveDate,
) -> Result<()> {
    if shift.date != today {
        return Err(AppError::bad_request(
            "The break reservation time has already expired or has not started yet.",
        ));
    }
    if !is_aligned(request.start) || !is_aligned(request.end) {
        return Err(AppError::bad_request("The time must be a multiple of 15 minutes."));
    }
    if request.start < shift.break_start {
        return Err(AppError::bad_request(
            "The start time must not be less than the time specified in the shift.",
        ));
    }
    if request.end > shift.break_end {
        return Err(AppError::bad_request(
            "End time should not be more than the time specified in the shift",
        ));
    }
    if request.start >= request.end {
        return Err(AppError::bad_request(
            "The start time must not be greater than the end time",
        ));
    }
    if (request.end - request.start).num_minutes() > i64::from(shift.break_max_duration) {
        return Err(AppError::bad_request("Lunch duration exceeds the maximum set value."));
    }

    let free = free_breaks_available(
        occupancy.members_count,
        occupancy.booked,
        request.start,
        request.end,
        occupancy.exclude,
    );
    if free <= i64::from(shift.min_active) {
        return Err(AppError::bad_request(
            "There are no available seats for the selected interval.",
        ));
    }
    Ok(())
}

/// Moves a member to `target`, stamping the transition times.
///
/// Timestamps are written once and never overwritten. Returns `false` when
/// the status did not change, in which case nothing is touched.
pub fn apply_status(member: &mut replacement_members::Model, target: ReplacementStatus, now: DateTime<Utc>) -> bool {
    if member.status == target {
        return false;
    }

    match target {
        ReplacementStatus::Online => {
            member.time_online.get_or_insert(now);
            close_open_break(member, now);
        },
        ReplacementStatus::Break => {
            member.time_break_start.get_or_insert(now);
        },
        ReplacementStatus::Offline => {
            member.time_offline.get_or_insert(now);
            close_open_break(member, now);
        },
        ReplacementStatus::Busy => {},
    }
    member.status = target;
    true
}

fn close_open_break(member: &mut replacement_members::Model, now: DateTime<Utc>) {
    if member.time_break_start.is_some() && member.time_break_end.is_none() {
        member.time_break_end = Some(now);
    }
}

/// Checks a self-service presence change.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] when the shift is not today, the member
/// already clocked out, or clocks out from anything but `online`.
pub fn validate_member_status_change(
    shift_date: NaiveDate,
    member: &replacement_members::Model,
    target: ReplacementStatus,
    today: NaiveDate,
) -> Result<()> {
    if shift_date != today {
        return Err(AppError::bad_request(
            "The shift has not yet begun or has already ended.",
        ));
    }
    match target {
        ReplacementStatus::Online if member.time_offline.is_some() => {
            Err(AppError::bad_request("You have already completed your shift."))
        },
        ReplacementStatus::Offline if member.status != ReplacementStatus::Online => {
            Err(AppError::bad_request(
                "Unable to end shift. Check all pending shift activities",
            ))
        },
        _ => Ok(()),
    }
}

/// Start or finish of a booked break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakAction {
    BreakStart,
    BreakEnd,
}

impl std::str::FromStr for BreakAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "break_start" => Ok(Self::BreakStart),
            "break_end" => Ok(Self::BreakEnd),
            _ => Err(AppError::bad_request("Status should be break_start or break_end")),
        }
    }
}

/// Checks that `action` can be applied to the member's break right now.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] for unknown actions, offline members,
/// starting too early or twice, and finishing a break that is not running.
pub fn validate_break_action(
    action: &str,
    member: &replacement_members::Model,
    booked: &breaks::Model,
    shift_date: NaiveDate,
    now: NaiveDateTime,
) -> Result<BreakAction> {
    let action: BreakAction = action.parse()?;

    if member.status == ReplacementStatus::Offline {
        return Err(AppError::bad_request(
            "Unable to start lunch while your status is Offline.",
        ));
    }

    match action {
        BreakAction::BreakStart => {
            let starts_at = shift_date.and_time(booked.break_start);
            if now + Duration::minutes(START_GRACE_MINUTES) < starts_at {
                return Err(AppError::bad_request("Lunch time hasn't started yet."));
            }
            if member.time_break_start.is_some() {
                return Err(AppError::bad_request("The lunch break has already begun."));
            }
        },
        BreakAction::BreakEnd => {
            if member.time_break_start.is_none() {
                return Err(AppError::bad_request("Lunch break hasn't started yet."));
            }
            if member.time_break_end.is_some() {
                return Err(AppError::bad_request("The lunch break is already over."));
            }
        },
    }
    Ok(action)
}

/// Applies a validated action to the member and their break.
pub fn apply_break_action(
    action: BreakAction,
    member: &mut replacement_members::Model,
    booked: &mut breaks::Model,
    now: DateTime<Utc>,
) {
    match action {
        BreakAction::BreakStart => {
            apply_status(member, ReplacementStatus::Break, now);
            booked.status = BreakStatus::Started;
        },
        BreakAction::BreakEnd => {
            apply_status(member, ReplacementStatus::Online, now);
            booked.status = BreakStatus::Finished;
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementButton {
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakButton {
    Create,
    Coming,
    Start,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingButton {
    Create,
    Update,
}

/// Buttons offered to the caller on the shift screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Actions {
    pub replacement_button: Option<ReplacementButton>,
    pub break_button:       Option<BreakButton>,
}

/// Works out which presence and break buttons the caller sees.
///
/// Both are empty unless the shift is today and the caller is on it.
pub fn actions(
    shift: &replacements::Model,
    member: Option<&replacement_members::Model>,
    booked: Option<&breaks::Model>,
    now: NaiveDateTime,
) -> Actions {
    let Some(member) = member.filter(|_| shift.date == now.date())
    else {
        return Actions::default();
    };

    let replacement_button = if member.time_online.is_none() {
        Some(ReplacementButton::Online)
    }
    else if member.time_offline.is_none() {
        Some(ReplacementButton::Offline)
    }
    else {
        None
    };

    let break_button = match booked {
        None => {
            let window_closes = shift.date.and_time(shift.break_end);
            (window_closes - Duration::minutes(BOOKING_CUTOFF_MINUTES) >= now).then_some(BreakButton::Create)
        },
        Some(booked) => {
            let starts_at = now.date().and_time(booked.break_start);
            if member.time_break_start.is_none() {
                if now + Duration::minutes(START_GRACE_MINUTES) < starts_at {
                    Some(BreakButton::Coming)
                }
                else {
                    Some(BreakButton::Start)
                }
            }
            else if member.time_break_end.is_none() {
                Some(BreakButton::Finish)
            }
            else {
                None
            }
        },
    };

    Actions {
        replacement_button,
        break_button,
    }
}

/// Whether the caller may create or edit their booking today.
pub fn break_button_for(
    shift: &replacements::Model,
    member: Option<&replacement_members::Model>,
    booked: Option<&breaks::Model>,
    today: NaiveDate,
) -> Option<BookingButton> {
    if member.is_none() || shift.date != today {
        return None;
    }
    Some(match booked {
        None => BookingButton::Create,
        Some(_) => BookingButton::Update,
    })
}

fn format_minutes(total: i64) -> String { format!("{:02}:{:02}", total / 60, total % 60) }

/// Whole hours and minutes until `break_start`, `None` once it has passed.
pub fn time_until_break(break_start: NaiveTime, now: NaiveTime) -> Option<String> {
    let break_minutes = i64::from(break_start.hour() * 60 + break_start.minute());
    let now_minutes = i64::from(now.hour() * 60 + now.minute());
    let delta = break_minutes - now_minutes;
    (delta >= 0).then(|| format_minutes(delta))
}

/// Countdown shown next to a member in the shift roster.
pub fn member_description(booked: Option<(NaiveTime, NaiveTime)>, now: NaiveDateTime) -> Option<String> {
    let (start, end) = booked?;
    let starts_at = now.date().and_time(start);
    let ends_at = now.date().and_time(end);

    if starts_at > now {
        Some(format!("Lunch starts in {}", format_minutes((starts_at - now).num_minutes())))
    }
    else if ends_at > now {
        Some(format!("Lunch ends in {}", format_minutes((ends_at - now).num_minutes())))
    }
    else {
        None
    }
}

/// One cell of the lunch timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleCell {
    pub value:   String,
    pub color:   String,
    pub colspan: i64,
}

const BLANK_COLOR: &str = "#fff";

impl ScheduleCell {
    fn blank(colspan: i64) -> Self {
        Self {
            value: String::new(),
            color: BLANK_COLOR.to_string(),
            colspan,
        }
    }
}

fn span_count(from: NaiveTime, to: NaiveTime) -> i64 {
    let from_minutes = i64::from(from.hour() * 60 + from.minute());
    let to_minutes = i64::from(to.hour() * 60 + to.minute());
    (to_minutes - from_minutes) / SLOT_MINUTES
}

/// Timetable row for one booked break.
///
/// Name cell, optional leading gap, the break itself in the member's status
/// colour, optional trailing gap. Spans count 15-minute columns.
pub fn schedule_row(
    full_name: &str,
    shift: &replacements::Model,
    booked: &breaks::Model,
    status_color: &str,
) -> Vec<ScheduleCell> {
    let mut row = vec![ScheduleCell {
        value:   full_name.to_string(),
        color:   BLANK_COLOR.to_string(),
        colspan: 2,
    }];

    let before = span_count(shift.break_start, booked.break_start);
    if before > 0 {
        row.push(ScheduleCell::blank(before));
    }

    row.push(ScheduleCell {
        value:   format!(
            "{} - {}",
            booked.break_start.format("%H:%M"),
            booked.break_end.format("%H:%M")
        ),
        color:   status_color.to_string(),
        colspan: span_count(booked.break_start, booked.break_end),
    });

    let after = span_count(booked.break_end, shift.break_end);
    if after > 0 {
        row.push(ScheduleCell::blank(after));
    }
    row
}

/// Shift parameters after falling back to group defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftParams {
    pub break_start:        NaiveTime,
    pub break_end:          NaiveTime,
    pub break_max_duration: i32,
    pub min_active:         i32,
}

/// Values supplied with a create request, any of which may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftOverrides {
    pub break_start:        Option<NaiveTime>,
    pub break_end:          Option<NaiveTime>,
    pub break_max_duration: Option<i32>,
    pub min_active:         Option<i32>,
}

fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| AppError::bad_request(format!("{} - required field.", field)))
}

/// Fills missing request values from the group's break settings.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] naming the first field neither source provides.
pub fn resolve_shift_params(
    overrides: &ShiftOverrides,
    defaults: Option<&group_break_settings::Model>,
) -> Result<ShiftParams> {
    let fallback = defaults.cloned().unwrap_or_default();
    Ok(ShiftParams {
        break_start:        required("break_start", overrides.break_start.or(fallback.break_start))?,
        break_end:          required("break_end", overrides.break_end.or(fallback.break_end))?,
        break_max_duration: required(
            "break_max_duration",
            overrides.break_max_duration.or(fallback.break_max_duration),
        )?,
        min_active:         required("min_active", overrides.min_active.or(fallback.min_active))?,
    })
}

/// Checks the lunch window of a shift.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] for unaligned or inverted windows.
pub fn validate_shift_window(break_start: NaiveTime, break_end: NaiveTime) -> Result<()> {
    if !is_aligned(break_start) {
        return Err(AppError::bad_request(
            "The start time of the break must be a multiple of 15 minutes.",
        ));
    }
    if !is_aligned(break_end) {
        return Err(AppError::bad_request(
            "The end time of the break must be a multiple of 15 minutes.",
        ));
    }
    if break_start >= break_end {
        return Err(AppError::bad_request(
            "The break start time must be less than the end time.",
        ));
    }
    Ok(())
}

/// Bookings already made must still fit a changed lunch window.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] when any booking starts before
/// `break_start` or ends after `break_end`.
pub fn validate_bookings_fit(booked: &[BookedSlot], break_start: NaiveTime, break_end: NaiveTime) -> Result<()> {
    if booked.iter().any(|b| b.start < break_start || b.end > break_end) {
        return Err(AppError::bad_request(
            "Some lunch breaks are already booked outside the new break time.",
        ));
    }
    Ok(())
}

/// Shifts cannot be planned in the past.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] when `date` is before `today`.
pub fn validate_shift_date(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date < today {
        return Err(AppError::bad_request(
            "The change date must be greater than or equal to the current date.",
        ));
    }
    Ok(())
}
