//! Reminder domain models
//!
//! This module contains the reminder entity and the collection the file store
//! persists. It is split into submodules:
//! - `model`: the `Reminder` record and its `ReminderType`
//! - `reminder_data`: the persisted collection with lookup and mutation helpers

mod model;
mod reminder_data;

// Re-export all public types
pub use model::{Reminder, ReminderType, end_of_local_day};
pub use reminder_data::ReminderData;
