//! # Logging Macros
//!
//! Convenience macros for structured logging with consistent targets.

/// Log an API request with method, path, status and duration.
#[macro_export]
macro_rules! log_api_request {
    ($request_id:expr, $method:expr, $path:expr, $status:expr, $duration:expr) => {
        tracing::info!(
            target: "api",
            request_id = %$request_id,
            method = %$method,
            path = %$path,
            status = %$status,
            duration_ms = %$duration,
            "API request"
        )
    };
}

/// Log an authentication event.
#[macro_export]
macro_rules! log_auth_event {
    ($event:expr, $user_id:expr, $success:expr) => {
        tracing::info!(
            target: "auth",
            event = %$event,
            user_id = %$user_id,
            success = $success,
            "Authentication event"
        )
    };
}

/// Log a change in a shift: member status moves, break bookings and actions.
///
/// # Example
///
/// ```rust
/// use logging::log_shift_event;
///
/// log_shift_event!("break_booked", 7, 42, "12:00-12:30");
/// ```
#[macro_export]
macro_rules! log_shift_event {
    ($event:expr, $replacement_id:expr, $user_id:expr, $details:expr) => {
        tracing::info!(
            target: "shifts",
            event = %$event,
            replacement_id = %$replacement_id,
            user_id = %$user_id,
            details = %$details,
            "Shift event"
        )
    };
}
