//! Session and profile handlers for the reminder server

use crate::StudyReminderHandler;
use crate::session::UserProfile;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::info;

impl StudyReminderHandler {
    pub async fn handle_sign_in(&self, user_id: String, name: Option<String>) -> McpResult<String> {
        let uid = user_id.trim();
        if uid.is_empty() {
            bail_public!(_, "User ID is required");
        }

        let profile = UserProfile::new(uid, name);
        let greeting = format!("Signed in as {} ({})", profile.display_name(), profile.uid);
        self.switch_user(profile);
        info!("Signed in as {}", uid);

        Ok(greeting)
    }

    pub async fn handle_sign_out(&self) -> McpResult<String> {
        match self.sign_out_user() {
            Some(profile) => {
                info!("Signed out {}", profile.uid);
                Ok(format!("Signed out {}", profile.display_name()))
            }
            None => Ok("Not signed in".to_string()),
        }
    }

    pub async fn handle_profile(&self) -> McpResult<String> {
        let Some(profile) = self.session.profile() else {
            return validation::reject(&crate::ReminderError::AuthRequired);
        };

        let state = self.snapshot_state();
        let completed = state.reminders.iter().filter(|r| r.completed).count();

        Ok(format!(
            "Name: {}\nUser ID: {}\nReminders: {} ({} completed)\n",
            profile.display_name(),
            profile.uid,
            state.reminders.len(),
            completed
        ))
    }

    pub async fn handle_refresh(&self) -> McpResult<String> {
        if let Err(e) = self.require_user() {
            return validation::reject(&e);
        }
        if let Err(e) = self.store.refresh() {
            return validation::reject(&e.into());
        }

        let count = self.snapshot_state().reminders.len();
        Ok(format!("Reloaded {} reminder(s)", count))
    }
}
