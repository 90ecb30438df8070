use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resolve a calendar date to the last second of that day in the local timezone
///
/// Date-only due dates use this so a reminder due today is not overdue
/// until the day is over.
pub fn end_of_local_day(date: NaiveDate) -> DateTime<Utc> {
    let naive = date
        .and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => naive.and_utc(),
    }
}

/// Kind of reminder
///
/// Uses lowercase naming to match the stored document format.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ReminderType {
    /// A study session
    #[default]
    study,
    /// A quiz or exam
    quiz,
}

impl ReminderType {
    /// Parse a type leniently, falling back to `study` for anything unrecognised
    pub fn parse_lenient(s: &str) -> Self {
        s.trim().parse().unwrap_or_default()
    }

    /// Name as stored and accepted in filters
    pub fn as_str(self) -> &'static str {
        match self {
            ReminderType::study => "study",
            ReminderType::quiz => "quiz",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            ReminderType::study => "Study Session",
            ReminderType::quiz => "Quiz/Exam",
        }
    }
}

impl fmt::Display for ReminderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "study" => Ok(ReminderType::study),
            "quiz" => Ok(ReminderType::quiz),
            _ => Err(format!(
                "Invalid type '{}'. Valid options are: study, quiz",
                s
            )),
        }
    }
}

// Stored documents may carry types written by older clients; read them as study sessions
impl<'de> Deserialize<'de> for ReminderType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ReminderType::parse_lenient(&s))
    }
}

/// A dated study or quiz reminder
///
/// Owned by the store; everything outside the store treats a reminder as an
/// immutable snapshot value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Store-assigned identifier (e.g., "r-12")
    pub id: String,
    /// Short description, never blank
    pub title: String,
    /// Subject the reminder belongs to, never blank
    pub subject: String,
    /// Study session or quiz
    #[serde(rename = "type", default)]
    pub kind: ReminderType,
    /// When the reminder is due
    pub due_date: DateTime<Utc>,
    /// Optional free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub pinned: bool,
    /// Identity of the user who created the reminder
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Reminder {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            title: String::new(),
            subject: String::new(),
            kind: ReminderType::study,
            due_date: now,
            notes: None,
            completed: false,
            pinned: false,
            owner_id: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Reminder {
    /// Notes as text, with absent notes read as the empty string
    pub fn notes_text(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    /// Check whether the reminder belongs to the given user
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}
