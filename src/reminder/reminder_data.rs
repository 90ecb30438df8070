use crate::reminder::model::Reminder;
use serde::{Deserialize, Serialize};

/// Current format version of the data file
pub const FORMAT_VERSION: u32 = 1;

/// Persisted reminder collection
///
/// Reminders are kept in a Vec in insertion order so the TOML file stays
/// stable between saves. Every user's reminders live in the same file;
/// per-user views are produced by [`ReminderData::snapshot_for`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderData {
    /// Format version for the TOML file
    pub format_version: u32,

    /// Counter for generating unique reminder IDs
    pub reminder_counter: u64,

    pub(crate) reminders: Vec<Reminder>,
}

impl Default for ReminderData {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            reminder_counter: 0,
            reminders: Vec::new(),
        }
    }
}

impl ReminderData {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new unique reminder ID
    pub fn generate_id(&mut self) -> String {
        self.reminder_counter += 1;
        format!("r-{}", self.reminder_counter)
    }

    /// Number of reminders across all users
    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    /// Find a reminder by its ID
    pub fn find_by_id(&self, id: &str) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    /// Find a reminder by its ID and return a mutable reference
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Reminder> {
        self.reminders.iter_mut().find(|r| r.id == id)
    }

    /// Add a reminder to the collection
    pub fn add(&mut self, reminder: Reminder) {
        self.reminders.push(reminder);
    }

    /// Remove a reminder from the collection and return it
    pub fn remove(&mut self, id: &str) -> Option<Reminder> {
        let pos = self.reminders.iter().position(|r| r.id == id)?;
        Some(self.reminders.remove(pos))
    }

    /// Snapshot of one user's reminders, ordered by due date ascending
    ///
    /// Reminders with equal due dates keep their insertion order.
    pub fn snapshot_for(&self, owner_id: &str) -> Vec<Reminder> {
        let mut snapshot: Vec<Reminder> = self
            .reminders
            .iter()
            .filter(|r| r.is_owned_by(owner_id))
            .cloned()
            .collect();
        snapshot.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        snapshot
    }
}
