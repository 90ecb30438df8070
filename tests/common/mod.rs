//! Common test utilities for integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use study_reminders::store::{ErrorCallback, SnapshotCallback};
use study_reminders::*;
use tempfile::NamedTempFile;

/// Fixed "now" for deterministic projections
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 9, 0, 0).unwrap()
}

/// Create a test handler signed in as "alice", with temporary storage
pub fn get_test_handler() -> (StudyReminderHandler, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let handler = StudyReminderHandler::new(
        temp_file.path().to_str().unwrap(),
        Some(UserProfile::new("alice", Some("Alice".to_string()))),
    )
    .unwrap();
    (handler, temp_file)
}

/// Create a test handler with nobody signed in
pub fn get_signed_out_handler() -> (StudyReminderHandler, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let handler = StudyReminderHandler::new(temp_file.path().to_str().unwrap(), None).unwrap();
    (handler, temp_file)
}

/// Extract the reminder ID from an add() response
/// Response format: "Reminder created successfully (ID: <id>)"
pub fn extract_id_from_response(response: &str) -> String {
    response
        .split("ID: ")
        .nth(1)
        .unwrap_or("")
        .trim_end_matches(')')
        .trim()
        .to_string()
}

/// Create a test reminder due `days` days after `fixed_now()`
pub fn create_test_reminder(id: &str, title: &str, days: i64, pinned: bool) -> Reminder {
    Reminder {
        id: id.to_string(),
        title: title.to_string(),
        subject: "General".to_string(),
        due_date: fixed_now() + Duration::days(days),
        pinned,
        owner_id: "alice".to_string(),
        ..Default::default()
    }
}

/// Form input with the given title and subject
pub fn create_test_fields(title: &str, subject: &str) -> ReminderFields {
    ReminderFields {
        title: title.to_string(),
        subject: subject.to_string(),
        kind: "study".to_string(),
        due_date: fixed_now() + Duration::days(1),
        notes: None,
    }
}

/// Store that serves a fixed snapshot and fails every write
pub struct FailingStore {
    pub snapshot: Vec<Reminder>,
}

impl FailingStore {
    fn unavailable(operation: StoreOperation) -> StoreError {
        StoreError::new(
            operation,
            StoreErrorCause::Unavailable("network unreachable".to_string()),
        )
    }
}

impl ReminderStore for FailingStore {
    fn subscribe(
        &self,
        _owner_id: &str,
        on_snapshot: SnapshotCallback,
        _on_error: ErrorCallback,
    ) -> Subscription {
        on_snapshot(self.snapshot.clone());
        Subscription::detached()
    }

    fn create(&self, _payload: CreatePayload) -> Result<String, StoreError> {
        Err(Self::unavailable(StoreOperation::Create))
    }

    fn update(
        &self,
        _owner_id: &str,
        _id: &str,
        _update: ReminderUpdate,
    ) -> Result<(), StoreError> {
        Err(Self::unavailable(StoreOperation::Update))
    }

    fn delete(&self, _owner_id: &str, _id: &str) -> Result<(), StoreError> {
        Err(Self::unavailable(StoreOperation::Delete))
    }
}

/// Handler signed in as "alice" over a store whose writes all fail
pub fn get_failing_handler(snapshot: Vec<Reminder>) -> StudyReminderHandler {
    StudyReminderHandler::with_store(
        Arc::new(FailingStore { snapshot }),
        LocalSession::signed_in(UserProfile::new("alice", None)),
    )
}

/// Store that never delivers a snapshot on its own
///
/// Subscriptions stay pending until `fail_subscriptions` reports an error to them.
#[derive(Default)]
pub struct PendingStore {
    on_error: Mutex<Vec<ErrorCallback>>,
}

impl PendingStore {
    pub fn fail_subscriptions(&self) {
        for on_error in self.on_error.lock().unwrap().iter() {
            on_error(StoreError::new(
                StoreOperation::Subscribe,
                StoreErrorCause::Unavailable("network unreachable".to_string()),
            ));
        }
    }
}

impl ReminderStore for PendingStore {
    fn subscribe(
        &self,
        _owner_id: &str,
        _on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription {
        self.on_error.lock().unwrap().push(on_error);
        Subscription::detached()
    }

    fn create(&self, _payload: CreatePayload) -> Result<String, StoreError> {
        Err(StoreError::new(
            StoreOperation::Create,
            StoreErrorCause::Unavailable("network unreachable".to_string()),
        ))
    }

    fn update(
        &self,
        _owner_id: &str,
        _id: &str,
        _update: ReminderUpdate,
    ) -> Result<(), StoreError> {
        Err(StoreError::new(
            StoreOperation::Update,
            StoreErrorCause::Unavailable("network unreachable".to_string()),
        ))
    }

    fn delete(&self, _owner_id: &str, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::new(
            StoreOperation::Delete,
            StoreErrorCause::Unavailable("network unreachable".to_string()),
        ))
    }
}
