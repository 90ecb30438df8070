//! Formatting helper functions for the reminder server
//!
//! This module renders projected reminder lists as text for display.

use crate::view_model::AnnotatedReminder;
use chrono::{DateTime, Local, Utc};

/// Format a due date the way the list shows it (e.g., "Mar 15, 2025")
pub fn format_due_date(due_date: DateTime<Utc>) -> String {
    due_date.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

/// Format a projection into a display string
///
/// # Arguments
/// * `items` - Projected reminders, already in display order
/// * `expanded_id` - Reminder whose notes are shown; notes of other reminders stay hidden
///
/// # Returns
/// Formatted string representation of the list
pub fn format_projection(items: &[AnnotatedReminder], expanded_id: Option<&str>) -> String {
    if items.is_empty() {
        return "No reminders yet. Use add to create your first study reminder.".to_string();
    }

    let mut result = format!("Found {} reminder(s):\n\n", items.len());
    for item in items {
        let reminder = &item.reminder;
        let title = if reminder.title.is_empty() {
            "Untitled"
        } else {
            reminder.title.as_str()
        };
        let checkbox = if reminder.completed { "[x]" } else { "[ ]" };

        result.push_str(&format!(
            "- {} [{}] {} ({})",
            checkbox,
            reminder.id,
            title,
            reminder.kind.label()
        ));
        if reminder.pinned {
            result.push_str(" [pinned]");
        }
        if item.overdue {
            result.push_str(" [overdue]");
        }
        result.push('\n');

        if !reminder.subject.is_empty() {
            result.push_str(&format!("  Subject: {}\n", reminder.subject));
        }
        result.push_str(&format!("  Due: {}\n", format_due_date(reminder.due_date)));

        if expanded_id == Some(reminder.id.as_str())
            && let Some(ref notes) = reminder.notes
        {
            result.push_str(&format!("  Notes: {}\n", notes));
        }
    }

    result
}
