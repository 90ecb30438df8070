//! Reminder document store
//!
//! [`ReminderStore`] is the contract every backing store fulfils: whole
//! snapshots pushed to subscribers, plus create/update/delete. [`FileStore`]
//! implements it on top of the TOML file in [`crate::storage`].

use crate::error::{StoreError, StoreOperation};
use crate::reminder::{Reminder, ReminderData};
use crate::storage::Storage;
use crate::view_model::{CreatePayload, ReminderUpdate};
use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, info, warn};

/// Receives a complete replacement of the subscriber's reminders
pub type SnapshotCallback = Box<dyn Fn(Vec<Reminder>) + Send + Sync>;

/// Receives failures of the subscription itself
pub type ErrorCallback = Box<dyn Fn(StoreError) + Send + Sync>;

/// Backing store for reminders
///
/// Every write names the acting user; a store rejects writes to reminders
/// owned by someone else. Snapshots are ordered by due date ascending, but
/// consumers must not rely on that order.
pub trait ReminderStore: Send + Sync {
    /// Watch one user's reminders
    ///
    /// Callbacks may run while the store holds internal locks and must not
    /// call back into the store.
    fn subscribe(
        &self,
        owner_id: &str,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription;

    /// Persist a new reminder and return its id
    fn create(&self, payload: CreatePayload) -> Result<String, StoreError>;

    fn update(&self, owner_id: &str, id: &str, update: ReminderUpdate) -> Result<(), StoreError>;

    fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError>;

    /// Re-read the backing data and push fresh snapshots
    ///
    /// Stores that are always current have nothing to do.
    fn refresh(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

struct Subscriber {
    id: u64,
    owner_id: String,
    on_snapshot: SnapshotCallback,
    on_error: ErrorCallback,
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<Subscriber>,
}

/// Handle that keeps a subscription alive
///
/// Dropping the handle unsubscribes.
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    /// Handle not attached to any store, for subscriptions that failed to start
    pub fn detached() -> Self {
        Self {
            id: 0,
            registry: Weak::new(),
        }
    }

    pub fn unsubscribe(self) {}

    /// Whether the store still delivers snapshots through this handle
    ///
    /// False for a detached handle, or once the store is gone.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| r.lock().unwrap().entries.iter().any(|s| s.id == self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().unwrap().entries.retain(|s| s.id != self.id);
        }
    }
}

/// Store backed by a single TOML file
///
/// The whole collection is held in memory and rewritten on every mutation.
/// A write that fails leaves both the file and the in-memory state as they
/// were.
pub struct FileStore {
    storage: Storage,
    data: Mutex<ReminderData>,
    subscribers: Arc<Mutex<Subscribers>>,
}

impl FileStore {
    /// Open the store, loading the file if it exists
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self> {
        let storage = Storage::new(file_path);
        let data = storage.load()?;
        info!(
            "Loaded {} reminder(s) from {}",
            data.len(),
            storage.file_path().display()
        );
        Ok(Self {
            storage,
            data: Mutex::new(data),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
        })
    }

    /// Re-read the file and push fresh snapshots to every subscriber
    ///
    /// A read failure is reported to every subscriber and leaves the
    /// in-memory collection untouched.
    pub fn reload(&self) -> Result<(), StoreError> {
        let mut data = self.data.lock().unwrap();
        match self.storage.load() {
            Ok(fresh) => {
                *data = fresh;
                debug!("Reloaded {} reminder(s)", data.len());
                let subscribers = self.subscribers.lock().unwrap();
                for subscriber in &subscribers.entries {
                    (subscriber.on_snapshot)(data.snapshot_for(&subscriber.owner_id));
                }
                Ok(())
            }
            Err(e) => {
                let err = StoreError::unavailable(StoreOperation::Subscribe, &e);
                warn!("Reload failed: {:#}", e);
                let subscribers = self.subscribers.lock().unwrap();
                for subscriber in &subscribers.entries {
                    (subscriber.on_error)(err.clone());
                }
                Err(err)
            }
        }
    }

    /// Write the collection, restoring `previous` if the write fails
    fn persist(
        &self,
        data: &mut ReminderData,
        previous: ReminderData,
        operation: StoreOperation,
    ) -> Result<(), StoreError> {
        if let Err(e) = self.storage.save(data) {
            *data = previous;
            warn!("Failed to {} reminder: {:#}", operation, e);
            return Err(StoreError::unavailable(operation, &e));
        }
        Ok(())
    }

    fn notify(&self, data: &ReminderData, owner_id: &str) {
        let subscribers = self.subscribers.lock().unwrap();
        let watching: Vec<&Subscriber> = subscribers
            .entries
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .collect();
        if watching.is_empty() {
            return;
        }
        let snapshot = data.snapshot_for(owner_id);
        debug!(
            "Delivering snapshot of {} reminder(s) to {} subscriber(s) of {}",
            snapshot.len(),
            watching.len(),
            owner_id
        );
        for subscriber in watching {
            (subscriber.on_snapshot)(snapshot.clone());
        }
    }
}

impl ReminderStore for FileStore {
    fn subscribe(
        &self,
        owner_id: &str,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription {
        if owner_id.is_empty() {
            on_error(StoreError::permission_denied(StoreOperation::Subscribe));
            return Subscription::detached();
        }

        let data = self.data.lock().unwrap();
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.next_id += 1;
        let id = subscribers.next_id;

        on_snapshot(data.snapshot_for(owner_id));
        subscribers.entries.push(Subscriber {
            id,
            owner_id: owner_id.to_string(),
            on_snapshot,
            on_error,
        });
        debug!("Subscription {} opened for {}", id, owner_id);

        Subscription {
            id,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    fn create(&self, payload: CreatePayload) -> Result<String, StoreError> {
        if payload.owner_id.is_empty() {
            return Err(StoreError::permission_denied(StoreOperation::Create));
        }

        let mut data = self.data.lock().unwrap();
        let previous = data.clone();

        let now = Utc::now();
        let id = data.generate_id();
        data.add(Reminder {
            id: id.clone(),
            title: payload.title,
            subject: payload.subject,
            kind: payload.kind,
            due_date: payload.due_date,
            notes: payload.notes,
            completed: payload.completed,
            pinned: payload.pinned,
            owner_id: payload.owner_id.clone(),
            created_at: now,
            updated_at: now,
        });

        self.persist(&mut data, previous, StoreOperation::Create)?;
        info!("Created reminder {} for {}", id, payload.owner_id);
        self.notify(&data, &payload.owner_id);
        Ok(id)
    }

    fn update(&self, owner_id: &str, id: &str, update: ReminderUpdate) -> Result<(), StoreError> {
        let mut data = self.data.lock().unwrap();
        let previous = data.clone();

        let reminder = data
            .find_by_id_mut(id)
            .ok_or_else(|| StoreError::not_found(StoreOperation::Update, id))?;
        if !reminder.is_owned_by(owner_id) {
            return Err(StoreError::permission_denied(StoreOperation::Update));
        }

        match update {
            ReminderUpdate::Fields(fields) => {
                reminder.title = fields.title;
                reminder.subject = fields.subject;
                reminder.kind = fields.kind;
                reminder.due_date = fields.due_date;
                reminder.notes = fields.notes;
            }
            ReminderUpdate::Pinned(pinned) => reminder.pinned = pinned,
            ReminderUpdate::Completed(completed) => reminder.completed = completed,
        }
        reminder.updated_at = Utc::now();

        self.persist(&mut data, previous, StoreOperation::Update)?;
        info!("Updated reminder {}", id);
        self.notify(&data, owner_id);
        Ok(())
    }

    fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock().unwrap();

        match data.find_by_id(id) {
            None => return Err(StoreError::not_found(StoreOperation::Delete, id)),
            Some(r) if !r.is_owned_by(owner_id) => {
                return Err(StoreError::permission_denied(StoreOperation::Delete));
            }
            Some(_) => {}
        }

        let previous = data.clone();
        data.remove(id);
        self.persist(&mut data, previous, StoreOperation::Delete)?;
        info!("Deleted reminder {}", id);
        self.notify(&data, owner_id);
        Ok(())
    }

    fn refresh(&self) -> Result<(), StoreError> {
        self.reload()
    }
}
