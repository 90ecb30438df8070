//! Add and edit handlers for the reminder server

use crate::StudyReminderHandler;
use crate::error::{ReminderError, StoreOperation};
use crate::validation;
use crate::view_model::{self, ReminderFields, ReminderUpdate};
use mcp_attr::Result as McpResult;

impl StudyReminderHandler {
    /// Validate form input and store it as a new reminder of the signed-in user
    ///
    /// # Returns
    /// The ID the store assigned
    pub fn create_reminder(&self, fields: &ReminderFields) -> Result<String, ReminderError> {
        let owner_id = self.require_user()?;
        let payload = view_model::build_create_payload(fields, &owner_id)?;
        Ok(self.store.create(payload)?)
    }

    /// Validate form input and store it as the new content of reminder `id`
    pub fn edit_reminder(&self, id: &str, fields: &ReminderFields) -> Result<(), ReminderError> {
        let owner_id = self.require_user()?;
        let payload = view_model::build_update_payload(fields)?;
        self.store
            .update(&owner_id, id, ReminderUpdate::Fields(payload))?;
        Ok(())
    }

    pub async fn handle_add(
        &self,
        title: String,
        subject: String,
        due_date: String,
        reminder_type: Option<String>,
        notes: Option<String>,
    ) -> McpResult<String> {
        let due_date = validation::parse_due_date(&due_date)?;
        let fields = ReminderFields {
            title,
            subject,
            kind: reminder_type.unwrap_or_default(),
            due_date,
            notes,
        };

        match self.create_reminder(&fields) {
            Ok(id) => Ok(format!("Reminder created successfully (ID: {})", id)),
            Err(e) => validation::reject(&e),
        }
    }

    /// Full-field edit; omitted fields keep the value from the latest snapshot.
    pub async fn handle_update(
        &self,
        id: String,
        title: Option<String>,
        subject: Option<String>,
        due_date: Option<String>,
        reminder_type: Option<String>,
        notes: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_reminder_id(&id);

        if let Err(e) = self.require_user() {
            return validation::reject(&e);
        }
        let current = match self.find_reminder(&id, StoreOperation::Update) {
            Ok(r) => r,
            Err(e) => return validation::reject(&e),
        };

        // Start from the stored values, as the edit form does
        let mut fields = view_model::fields_from(&current);
        if let Some(new_title) = title {
            fields.title = new_title;
        }
        if let Some(new_subject) = subject {
            fields.subject = new_subject;
        }
        if let Some(date_str) = due_date {
            fields.due_date = validation::parse_due_date(&date_str)?;
        }
        if let Some(new_type) = reminder_type {
            fields.kind = new_type;
        }
        if let Some(new_notes) = notes {
            fields.notes = Some(new_notes);
        }

        match self.edit_reminder(&id, &fields) {
            Ok(()) => Ok(format!("Reminder {} updated successfully", id)),
            Err(e) => validation::reject(&e),
        }
    }
}
