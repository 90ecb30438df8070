//! Session provider
//!
//! Reminders are always read and written on behalf of the signed-in user.
//! Credential checks belong to an external identity provider; this module
//! only tracks who is currently signed in.

use std::sync::Mutex;

/// Source of the current user's identity
pub trait SessionProvider {
    /// Identity of the signed-in user, or `None` when nobody is signed in
    fn current_user_id(&self) -> Option<String>;
}

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub uid: String,
    pub name: Option<String>,
}

impl UserProfile {
    pub fn new(uid: impl Into<String>, name: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }

    /// Name to greet the user with, "Student" when none is set
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Student")
    }
}

/// In-process session
#[derive(Debug, Default)]
pub struct LocalSession {
    user: Mutex<Option<UserProfile>>,
}

impl LocalSession {
    /// Session with nobody signed in
    pub fn new() -> Self {
        Self::default()
    }

    /// Session already signed in as `profile`
    pub fn signed_in(profile: UserProfile) -> Self {
        Self {
            user: Mutex::new(Some(profile)),
        }
    }

    /// Replace the signed-in user
    pub fn sign_in(&self, profile: UserProfile) {
        *self.user.lock().unwrap() = Some(profile);
    }

    /// Sign out, returning the user that was signed in
    pub fn sign_out(&self) -> Option<UserProfile> {
        self.user.lock().unwrap().take()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.user.lock().unwrap().clone()
    }
}

impl SessionProvider for LocalSession {
    fn current_user_id(&self) -> Option<String> {
        self.user.lock().unwrap().as_ref().map(|u| u.uid.clone())
    }
}
