//! Pin and complete handlers for the reminder server

use crate::StudyReminderHandler;
use crate::error::{ReminderError, StoreErrorCause, StoreOperation};
use crate::reminder::Reminder;
use crate::validation;
use crate::view_model::{self, ReminderUpdate};
use mcp_attr::{Result as McpResult, bail_public};
use tracing::error;

impl StudyReminderHandler {
    /// Flip `pinned` on a reminder from the latest snapshot and persist only that flag
    ///
    /// # Returns
    /// The reminder as it should look once the store confirms the change
    pub fn flip_pin(&self, id: &str) -> Result<Reminder, ReminderError> {
        let owner_id = self.require_user()?;
        let current = self.find_reminder(id, StoreOperation::Update)?;
        let toggled = view_model::toggle_pin(&current);
        self.store
            .update(&owner_id, id, ReminderUpdate::Pinned(toggled.pinned))?;
        Ok(toggled)
    }

    /// Flip `completed` on a reminder from the latest snapshot and persist only that flag
    pub fn flip_completed(&self, id: &str) -> Result<Reminder, ReminderError> {
        let owner_id = self.require_user()?;
        let current = self.find_reminder(id, StoreOperation::Update)?;
        let toggled = view_model::toggle_completed(&current);
        self.store
            .update(&owner_id, id, ReminderUpdate::Completed(toggled.completed))?;
        Ok(toggled)
    }

    pub async fn handle_toggle_pin(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_reminder_id(&id);
        match self.flip_pin(&id) {
            Ok(r) if r.pinned => Ok(format!("Reminder {} pinned", id)),
            Ok(_) => Ok(format!("Reminder {} unpinned", id)),
            Err(ReminderError::Store(e)) if !matches!(e.cause, StoreErrorCause::NotFound(_)) => {
                error!("{}", e);
                bail_public!(_, "Failed to pin reminder");
            }
            Err(e) => validation::reject(&e),
        }
    }

    pub async fn handle_toggle_complete(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_reminder_id(&id);
        match self.flip_completed(&id) {
            Ok(r) if r.completed => Ok(format!("Reminder {} marked completed", id)),
            Ok(_) => Ok(format!("Reminder {} marked incomplete", id)),
            Err(e) => validation::reject(&e),
        }
    }
}
