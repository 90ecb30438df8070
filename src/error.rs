//! Error types for reminder operations
//!
//! Three kinds of failure reach callers:
//! - validation of form input before anything is written
//! - store failures (missing record, wrong owner, unreadable/unwritable data)
//! - a mutation attempted without a signed-in user

use std::fmt;

/// Form field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Subject,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Subject => "subject",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Subscribe,
    Create,
    Update,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreOperation::Subscribe => "subscribe",
            StoreOperation::Create => "create",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreErrorCause {
    #[error("reminder '{0}' not found")]
    NotFound(String),
    #[error("permission denied")]
    PermissionDenied,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by a reminder store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {cause}")]
pub struct StoreError {
    pub operation: StoreOperation,
    pub cause: StoreErrorCause,
}

impl StoreError {
    pub fn new(operation: StoreOperation, cause: StoreErrorCause) -> Self {
        Self { operation, cause }
    }

    pub fn not_found(operation: StoreOperation, id: &str) -> Self {
        Self::new(operation, StoreErrorCause::NotFound(id.to_string()))
    }

    pub fn permission_denied(operation: StoreOperation) -> Self {
        Self::new(operation, StoreErrorCause::PermissionDenied)
    }

    /// Wrap an IO/serialization failure, keeping the full context chain
    pub fn unavailable(operation: StoreOperation, err: &anyhow::Error) -> Self {
        Self::new(operation, StoreErrorCause::Unavailable(format!("{:#}", err)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReminderError {
    #[error("{} is required", capitalize(.0.as_str()))]
    Validation(Field),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("You must be logged in")]
    AuthRequired,
}

impl ReminderError {
    /// Message suitable for showing to the user
    ///
    /// Store failures are reported without their internal cause; the cause is
    /// logged by whoever handles the error.
    pub fn user_message(&self) -> String {
        match self {
            ReminderError::Validation(_) | ReminderError::AuthRequired => self.to_string(),
            ReminderError::Store(err) => match (&err.cause, err.operation) {
                (StoreErrorCause::NotFound(id), _) => format!("Reminder '{}' not found", id),
                (_, StoreOperation::Subscribe) => "Could not load reminders".to_string(),
                (_, StoreOperation::Create) => {
                    "Could not save reminder. Please try again.".to_string()
                }
                (_, StoreOperation::Update) => "Failed to update reminder".to_string(),
                (_, StoreOperation::Delete) => "Failed to delete reminder".to_string(),
            },
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
