pub mod employees;
pub mod health;
pub mod timesheet_sheets;
pub mod users;

use axum::http::HeaderMap;

/// Name of the header carrying the acting user's id.
pub const ACTING_USER_HEADER: &str = "x-acting-user";

/// Reads the acting user id from the request headers.
///
/// Operations that authorize take the acting identity from here instead of
/// any ambient session state.
pub(crate) fn acting_user_id(headers: &HeaderMap) -> Option<i32> {
    headers
        .get(ACTING_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i32>().ok())
}
