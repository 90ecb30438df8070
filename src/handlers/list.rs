//! List handler for the reminder server

use crate::StudyReminderHandler;
use crate::formatting;
use crate::validation;
use crate::view_model::{self, Filters, TypeFilter};
use chrono::Utc;
use mcp_attr::Result as McpResult;

impl StudyReminderHandler {
    /// Handles list/filter operations - projects the latest snapshot and formats it for display.
    pub async fn handle_list(
        &self,
        search: Option<String>,
        reminder_type: Option<String>,
        expanded_id: Option<String>,
    ) -> McpResult<String> {
        // Parse and validate type filter
        let type_filter = match reminder_type {
            Some(ref filter_str) => validation::parse_type_filter(filter_str)?,
            None => TypeFilter::All,
        };

        if let Err(e) = self.require_user() {
            return validation::reject(&e);
        }

        let state = self.snapshot_state();
        if state.loading {
            return Ok("Loading reminders...".to_string());
        }

        let filters = Filters {
            search: search.unwrap_or_default(),
            type_filter,
            expanded_id: expanded_id.map(|id| validation::normalize_reminder_id(&id)),
        };
        let items = view_model::project_with(&state.reminders, &filters, Utc::now());

        Ok(formatting::format_projection(
            &items,
            filters.expanded_id.as_deref(),
        ))
    }
}
