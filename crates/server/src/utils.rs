//! Small helpers shared by handlers.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
    ColumnTrait,
};

/// Escape LIKE wildcards (% and _) in a search string
pub fn escape_like_wildcards(s: &str) -> String { s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_") }

/// Case-insensitive substring match on a column.
pub fn icontains<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(&term.trim().to_lowercase()));
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column)))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Trimmed search term, `None` when blank.
pub fn search_term(search: Option<&str>) -> Option<&str> { search.map(str::trim).filter(|s| !s.is_empty()) }

/// One reading of the clock, in both the local wall clock and UTC.
///
/// Shift dates and break times are local wall-clock values, presence
/// timestamps are stored in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Now {
    pub local: NaiveDateTime,
    pub utc:   DateTime<Utc>,
}

impl Now {
    /// Reads the system clock.
    pub fn current() -> Self {
        let now = Local::now();
        Self {
            local: now.naive_local(),
            utc:   now.with_timezone(&Utc),
        }
    }

    pub fn today(&self) -> NaiveDate { self.local.date() }
}

/// `HH:MM`
pub fn hhmm(time: NaiveTime) -> String { time.format("%H:%M").to_string() }

/// `HH:MM` of a stored instant in local time.
pub fn local_hhmm(instant: DateTime<Utc>) -> String { instant.with_timezone(&Local).format("%H:%M").to_string() }

/// `dd.mm.yyyy`
pub fn dotted_date(date: NaiveDate) -> String { date.format("%d.%m.%Y").to_string() }

/// Page and page size from query parameters.
///
/// Page defaults to 1, size to 20 and is clamped to `1..=100`.
pub fn paging(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    (page.unwrap_or(1).max(1), per_page.unwrap_or(20).clamp(1, 100))
}

/// Sorted, de-duplicated names joined for error messages.
pub fn join_names(mut names: Vec<String>) -> String {
    names.sort();
    names.dedup();
    names.join(", ")
}
