//! Study Reminders MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for dated study
//! and quiz reminders. Users create, edit, filter, pin, complete and delete
//! reminders; the list view shows pinned reminders first, then the earliest
//! due date, and flags overdue ones.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `StudyReminderHandler` - Handles MCP protocol communication
//! - **View Layer**: `view_model` module - Pure filtering, ordering and payload shaping
//! - **Persistence Layer**: `store` module - Snapshot-pushing store backed by a TOML file
//!
//! # Example
//!
//! ```no_run
//! use study_reminders::{StudyReminderHandler, UserProfile};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let user = UserProfile::new("alice", Some("Alice".to_string()));
//!     let handler = StudyReminderHandler::new("reminders.toml", Some(user))?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod formatting;
mod handlers;
pub mod reminder;
pub mod session;
pub mod storage;
pub mod store;
pub mod validation;
pub mod view_model;

use anyhow::Result;
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::sync::{Arc, Mutex};
use tracing::{error, warn};

// Re-export commonly used types
pub use error::{Field, ReminderError, StoreError, StoreErrorCause, StoreOperation};
pub use reminder::{Reminder, ReminderData, ReminderType};
pub use session::{LocalSession, SessionProvider, UserProfile};
pub use store::{FileStore, ReminderStore, Subscription};
pub use view_model::{
    AnnotatedReminder, CreatePayload, Filters, ReminderFields, ReminderUpdate, TypeFilter,
    UpdatePayload,
};

/// Latest snapshot received from the store
#[derive(Debug, Clone)]
pub struct SnapshotState {
    pub reminders: Vec<Reminder>,
    /// True until the first snapshot (or subscription error) arrives
    pub loading: bool,
}

impl Default for SnapshotState {
    fn default() -> Self {
        Self {
            reminders: Vec::new(),
            loading: true,
        }
    }
}

/// MCP Server handler for study reminders
///
/// Holds the signed-in session and a live subscription to that user's
/// reminders. Every snapshot pushed by the store replaces the previous one;
/// tools project the latest snapshot on demand and send mutations straight to
/// the store.
pub struct StudyReminderHandler {
    pub(crate) session: LocalSession,
    pub(crate) store: Arc<dyn ReminderStore>,
    pub(crate) snapshot: Arc<Mutex<SnapshotState>>,
    subscription: Mutex<Option<Subscription>>,
}

impl StudyReminderHandler {
    /// Create a new handler backed by a TOML file
    ///
    /// # Arguments
    /// * `storage_path` - Path to the reminders data file (TOML format)
    /// * `user` - User to start signed in as, if any
    ///
    /// # Example
    /// ```no_run
    /// # use study_reminders::StudyReminderHandler;
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = StudyReminderHandler::new("reminders.toml", None)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(storage_path: &str, user: Option<UserProfile>) -> Result<Self> {
        let store = FileStore::open(storage_path)?;
        let session = match user {
            Some(profile) => LocalSession::signed_in(profile),
            None => LocalSession::new(),
        };
        Ok(Self::with_store(Arc::new(store), session))
    }

    /// Create a handler over any store implementation
    pub fn with_store(store: Arc<dyn ReminderStore>, session: LocalSession) -> Self {
        let handler = Self {
            session,
            store,
            snapshot: Arc::new(Mutex::new(SnapshotState::default())),
            subscription: Mutex::new(None),
        };
        if let Some(uid) = handler.session.current_user_id() {
            handler.watch(&uid);
        }
        handler
    }

    /// Subscribe to `owner_id`'s reminders, replacing any previous subscription
    pub(crate) fn watch(&self, owner_id: &str) {
        let mut slot = self.subscription.lock().unwrap();
        self.attach(&mut slot, owner_id);
    }

    /// Sign `profile` in and watch their reminders
    ///
    /// The session and the subscription change under the subscription lock,
    /// so concurrent sign-ins cannot leave them on different users.
    pub(crate) fn switch_user(&self, profile: UserProfile) {
        let mut slot = self.subscription.lock().unwrap();
        let uid = profile.uid.clone();
        self.session.sign_in(profile);
        self.attach(&mut slot, &uid);
    }

    /// Sign out and drop the subscription, returning who was signed in
    pub(crate) fn sign_out_user(&self) -> Option<UserProfile> {
        let mut slot = self.subscription.lock().unwrap();
        let profile = self.session.sign_out()?;
        slot.take();
        *self.snapshot.lock().unwrap() = SnapshotState::default();
        Some(profile)
    }

    fn attach(&self, slot: &mut Option<Subscription>, owner_id: &str) {
        // old handle unsubscribes on drop
        slot.take();
        *self.snapshot.lock().unwrap() = SnapshotState::default();

        let snapshot_state = Arc::clone(&self.snapshot);
        let error_state = Arc::clone(&self.snapshot);
        let subscription = self.store.subscribe(
            owner_id,
            Box::new(move |reminders| {
                let mut state = snapshot_state.lock().unwrap();
                state.reminders = reminders;
                state.loading = false;
            }),
            Box::new(move |err| {
                error!("Error fetching reminders: {}", err);
                error_state.lock().unwrap().loading = false;
            }),
        );
        if !subscription.is_active() {
            warn!("No live subscription for {}", owner_id);
        }
        *slot = Some(subscription);
    }

    /// Copy of the latest snapshot state
    pub fn snapshot_state(&self) -> SnapshotState {
        self.snapshot.lock().unwrap().clone()
    }

    /// Identity of the signed-in user, or `AuthRequired`
    pub(crate) fn require_user(&self) -> Result<String, ReminderError> {
        self.session
            .current_user_id()
            .ok_or(ReminderError::AuthRequired)
    }

    /// Look up a reminder in the latest snapshot
    pub(crate) fn find_reminder(
        &self,
        id: &str,
        operation: StoreOperation,
    ) -> Result<Reminder, ReminderError> {
        let state = self.snapshot.lock().unwrap();
        state
            .reminders
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(operation, id).into())
    }
}

/// Study reminder server for planning study sessions and quizzes.
///
/// Reminders have a title, a subject, a type (study or quiz), a due date and
/// optional notes. Each reminder can be pinned (always listed first) and
/// marked completed. Incomplete reminders past their due date are flagged
/// as overdue.
///
/// Reminder IDs use format: r-1, r-2, r-3
/// Dates: YYYY-MM-DD (end of that day) or RFC 3339 timestamps
#[mcp_server]
impl McpServer for StudyReminderHandler {
    /// **Dashboard**: List your reminders. Pinned first, then by due date. Overdue ones are marked.
    /// **Filter**: search matches title, subject and notes (case-insensitive); type narrows to study or quiz.
    /// **Details**: pass expanded_id to show the notes of one reminder.
    #[tool]
    async fn list(
        &self,
        /// Search text (optional)
        search: Option<String>,
        /// Type filter: all/study/quiz. Empty=all (optional)
        reminder_type: Option<String>,
        /// ID of the reminder whose notes to show (optional)
        expanded_id: Option<String>,
    ) -> McpResult<String> {
        self.handle_list(search, reminder_type, expanded_id).await
    }

    /// **New Reminder**: Create a study session or quiz reminder.
    /// **Required**: title, subject and due_date. Type defaults to study.
    #[tool]
    async fn add(
        &self,
        /// Title: e.g., "Study Calculus Chapter 3"
        title: String,
        /// Subject: e.g., "Mathematics"
        subject: String,
        /// Due date: YYYY-MM-DD or RFC 3339
        due_date: String,
        /// Type: study/quiz (optional, default study)
        reminder_type: Option<String>,
        /// Notes: topics to cover (optional)
        notes: Option<String>,
    ) -> McpResult<String> {
        self.handle_add(title, subject, due_date, reminder_type, notes)
            .await
    }

    /// **Edit Reminder**: Change a reminder's details. Omitted fields keep their current value.
    /// **Note**: pinned/completed are changed with toggle_pin/toggle_complete.
    #[tool]
    async fn update(
        &self,
        /// ID of reminder to edit
        id: String,
        /// New title (optional)
        title: Option<String>,
        /// New subject (optional)
        subject: Option<String>,
        /// New due date YYYY-MM-DD or RFC 3339 (optional)
        due_date: Option<String>,
        /// New type study/quiz (optional)
        reminder_type: Option<String>,
        /// New notes, ""=clear (optional)
        notes: Option<String>,
    ) -> McpResult<String> {
        self.handle_update(id, title, subject, due_date, reminder_type, notes)
            .await
    }

    /// **Pin**: Pin or unpin a reminder. Pinned reminders are listed first.
    #[tool]
    async fn toggle_pin(
        &self,
        /// Reminder ID
        id: String,
    ) -> McpResult<String> {
        self.handle_toggle_pin(id).await
    }

    /// **Complete**: Mark a reminder completed, or back to incomplete.
    #[tool]
    async fn toggle_complete(
        &self,
        /// Reminder ID
        id: String,
    ) -> McpResult<String> {
        self.handle_toggle_complete(id).await
    }

    /// **Delete**: Permanently delete a reminder. Requires confirm=true.
    #[tool]
    async fn delete(
        &self,
        /// Reminder ID
        id: String,
        /// Must be true to delete
        confirm: bool,
    ) -> McpResult<String> {
        self.handle_delete(id, confirm).await
    }

    /// **Refresh**: Reload reminders changed outside this server.
    #[tool]
    async fn refresh(&self) -> McpResult<String> {
        self.handle_refresh().await
    }

    /// **Profile**: Show the signed-in user.
    #[tool]
    async fn profile(&self) -> McpResult<String> {
        self.handle_profile().await
    }

    /// **Sign in**: Switch to another user's reminders.
    #[tool]
    async fn sign_in(
        &self,
        /// User ID
        user_id: String,
        /// Display name (optional)
        name: Option<String>,
    ) -> McpResult<String> {
        self.handle_sign_in(user_id, name).await
    }

    /// **Sign out**: End the session. Reminders are unavailable until the next sign in.
    #[tool]
    async fn sign_out(&self) -> McpResult<String> {
        self.handle_sign_out().await
    }
}
