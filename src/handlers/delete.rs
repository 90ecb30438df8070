//! Delete handler for the reminder server

use crate::StudyReminderHandler;
use crate::error::ReminderError;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl StudyReminderHandler {
    /// Delete a reminder of the signed-in user
    pub fn remove_reminder(&self, id: &str) -> Result<(), ReminderError> {
        let owner_id = self.require_user()?;
        self.store.delete(&owner_id, id)?;
        Ok(())
    }

    pub async fn handle_delete(&self, id: String, confirm: bool) -> McpResult<String> {
        let id = validation::normalize_reminder_id(&id);

        if !confirm {
            bail_public!(
                _,
                "Deleting reminder '{}' was not confirmed. Call delete again with confirm=true.",
                id
            );
        }

        match self.remove_reminder(&id) {
            Ok(()) => Ok(format!("Reminder {} deleted", id)),
            Err(e) => validation::reject(&e),
        }
    }
}
