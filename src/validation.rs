//! Validation helper functions for tool parameters
//!
//! This module turns the textual parameters received by the MCP tools into
//! domain values, and converts domain errors into MCP errors.

use crate::error::ReminderError;
use crate::reminder::end_of_local_day;
use crate::view_model::TypeFilter;
use chrono::{DateTime, NaiveDate, Utc};
use mcp_attr::{Result as McpResult, bail_public};
use tracing::{error, warn};

fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Parse and validate a type filter parameter
///
/// # Arguments
/// * `filter_str` - "all", "study" or "quiz"; empty means "all"
pub fn parse_type_filter(filter_str: &str) -> McpResult<TypeFilter> {
    let trimmed = filter_str.trim();
    if trimmed.is_empty() {
        return Ok(TypeFilter::All);
    }
    trimmed.parse::<TypeFilter>().map_err(invalid_params)
}

/// Parse a due date parameter
///
/// Accepts an RFC 3339 timestamp (e.g., "2025-03-15T14:00:00Z") or a plain
/// date (e.g., "2025-03-15"), which means the end of that day in local time.
pub fn parse_due_date(date_str: &str) -> McpResult<DateTime<Utc>> {
    let trimmed = date_str.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(end_of_local_day)
        .map_err(|_| {
            invalid_params(format!(
                "Invalid due date '{}'. Use YYYY-MM-DD (e.g., '2025-03-15') or an RFC 3339 timestamp",
                date_str
            ))
        })
}

/// Normalize a reminder ID by trimming surrounding whitespace
pub fn normalize_reminder_id(id: &str) -> String {
    id.trim().to_string()
}

/// Report a domain error to the MCP client with its user-facing message
///
/// Store failures are logged with their full cause first, since the client
/// only sees the short message.
pub fn reject<T>(err: &ReminderError) -> McpResult<T> {
    match err {
        ReminderError::Validation(_) => Err(invalid_params(err.user_message())),
        ReminderError::AuthRequired => {
            warn!("Rejected request without a signed-in user");
            bail_public!(_, "{}", err.user_message())
        }
        ReminderError::Store(store_err) => {
            error!("{}", store_err);
            bail_public!(_, "{}", err.user_message())
        }
    }
}
