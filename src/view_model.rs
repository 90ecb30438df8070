//! Reminder list projection and mutation payload shaping
//!
//! Everything here is a pure function of its inputs: the current instant is
//! always passed in, and nothing is retained between calls. Callers re-run
//! [`project`] on every snapshot the store delivers.

use crate::error::{Field, ReminderError};
use crate::reminder::{Reminder, ReminderType};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::str::FromStr;

/// Text form of [`TypeFilter::All`]
pub const TYPE_FILTER_ALL: &str = "all";

/// Type restriction applied to the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    /// No type restriction
    #[default]
    All,
    Only(ReminderType),
}

impl TypeFilter {
    pub fn matches(self, kind: ReminderType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => wanted == kind,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == TYPE_FILTER_ALL {
            return Ok(TypeFilter::All);
        }
        s.parse::<ReminderType>().map(TypeFilter::Only).map_err(|_| {
            format!(
                "Invalid type filter '{}'. Valid options are: all, study, quiz",
                s
            )
        })
    }
}

/// Filter state selected in the list view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search: String,
    pub type_filter: TypeFilter,
    /// Reminder whose details are shown; has no effect on filtering or order
    pub expanded_id: Option<String>,
}

/// A reminder ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedReminder {
    pub reminder: Reminder,
    pub overdue: bool,
}

/// Raw add/edit form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderFields {
    pub title: String,
    pub subject: String,
    /// Type as entered; unrecognised text becomes `study`
    pub kind: String,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Validated payload for creating a reminder
///
/// The store assigns the id and both timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePayload {
    pub title: String,
    pub subject: String,
    pub kind: ReminderType,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub completed: bool,
    pub pinned: bool,
    pub owner_id: String,
}

/// Validated payload for a full-field edit
///
/// Ownership, lifecycle flags and creation time are not part of an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePayload {
    pub title: String,
    pub subject: String,
    pub kind: ReminderType,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Partial update sent to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderUpdate {
    Fields(UpdatePayload),
    Pinned(bool),
    Completed(bool),
}

/// An incomplete reminder whose due date has passed
pub fn classify_overdue(reminder: &Reminder, now: DateTime<Utc>) -> bool {
    reminder.due_date < now && !reminder.completed
}

/// Check a reminder against the search text and type filter
///
/// The search is a case-insensitive substring match over title, subject and
/// notes. Empty search text matches everything.
pub fn matches_filters(reminder: &Reminder, search_text: &str, type_filter: TypeFilter) -> bool {
    type_filter.matches(reminder.kind) && matches_search(reminder, search_text)
}

fn matches_search(reminder: &Reminder, search_text: &str) -> bool {
    if search_text.is_empty() {
        return true;
    }
    let needle = search_text.to_lowercase();
    [
        reminder.title.as_str(),
        reminder.subject.as_str(),
        reminder.notes_text(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Display order: pinned first, then earliest due date
///
/// Equal keys compare equal so a stable sort keeps input order.
fn display_order(a: &Reminder, b: &Reminder) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| a.due_date.cmp(&b.due_date))
}

/// Filter, order and annotate a snapshot for display
pub fn project(
    reminders: &[Reminder],
    search_text: &str,
    type_filter: TypeFilter,
    now: DateTime<Utc>,
) -> Vec<AnnotatedReminder> {
    let mut kept: Vec<&Reminder> = reminders
        .iter()
        .filter(|r| matches_filters(r, search_text, type_filter))
        .collect();

    // sort_by is stable
    kept.sort_by(|a, b| display_order(a, b));

    kept.into_iter()
        .map(|r| AnnotatedReminder {
            reminder: r.clone(),
            overdue: classify_overdue(r, now),
        })
        .collect()
}

/// [`project`] driven by a [`Filters`] value
pub fn project_with(
    reminders: &[Reminder],
    filters: &Filters,
    now: DateTime<Utc>,
) -> Vec<AnnotatedReminder> {
    project(reminders, &filters.search, filters.type_filter, now)
}

struct ShapedFields {
    title: String,
    subject: String,
    kind: ReminderType,
    notes: Option<String>,
}

fn shape_fields(fields: &ReminderFields) -> Result<ShapedFields, ReminderError> {
    let title = fields.title.trim();
    if title.is_empty() {
        return Err(ReminderError::Validation(Field::Title));
    }
    let subject = fields.subject.trim();
    if subject.is_empty() {
        return Err(ReminderError::Validation(Field::Subject));
    }
    let notes = fields
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Ok(ShapedFields {
        title: title.to_string(),
        subject: subject.to_string(),
        kind: ReminderType::parse_lenient(&fields.kind),
        notes,
    })
}

/// Validate form input and shape it into a new reminder owned by `owner_id`
pub fn build_create_payload(
    fields: &ReminderFields,
    owner_id: &str,
) -> Result<CreatePayload, ReminderError> {
    let shaped = shape_fields(fields)?;
    Ok(CreatePayload {
        title: shaped.title,
        subject: shaped.subject,
        kind: shaped.kind,
        due_date: fields.due_date,
        notes: shaped.notes,
        completed: false,
        pinned: false,
        owner_id: owner_id.to_string(),
    })
}

/// Validate form input and shape it into an edit of an existing reminder
pub fn build_update_payload(fields: &ReminderFields) -> Result<UpdatePayload, ReminderError> {
    let shaped = shape_fields(fields)?;
    Ok(UpdatePayload {
        title: shaped.title,
        subject: shaped.subject,
        kind: shaped.kind,
        due_date: fields.due_date,
        notes: shaped.notes,
    })
}

/// Copy of the reminder with `pinned` flipped
pub fn toggle_pin(reminder: &Reminder) -> Reminder {
    Reminder {
        pinned: !reminder.pinned,
        ..reminder.clone()
    }
}

/// Copy of the reminder with `completed` flipped
pub fn toggle_completed(reminder: &Reminder) -> Reminder {
    Reminder {
        completed: !reminder.completed,
        ..reminder.clone()
    }
}

/// Form fields pre-filled from an existing reminder, as the edit form starts
pub fn fields_from(reminder: &Reminder) -> ReminderFields {
    ReminderFields {
        title: reminder.title.clone(),
        subject: reminder.subject.clone(),
        kind: reminder.kind.as_str().to_string(),
        due_date: reminder.due_date,
        notes: reminder.notes.clone(),
    }
}
