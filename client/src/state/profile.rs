//! Optimistic profile editing.
//!
//! The profile page shows the edited profile as soon as the user hits save and
//! restores the previous one if the backend rejects the write. A save is the
//! `profiles` row write, followed by an email change when one was entered;
//! the row is kept once stored even if the email change fails.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use crate::net::types::UserProfile;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileEditor {
    shown: Option<UserProfile>,
    /// Set while a save is in flight: what was shown before it.
    previous: Option<Option<UserProfile>>,
}

impl ProfileEditor {
    #[must_use]
    pub fn new(profile: Option<UserProfile>) -> Self {
        Self { shown: profile, previous: None }
    }

    /// Profile currently displayed.
    #[must_use]
    pub fn shown(&self) -> Option<&UserProfile> {
        self.shown.as_ref()
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.previous.is_some()
    }

    /// Replace the displayed profile with `draft`, remembering the old one.
    /// Returns `false` (and changes nothing) while another save is pending.
    pub fn begin_save(&mut self, draft: UserProfile) -> bool {
        if self.is_saving() {
            return false;
        }
        self.previous = Some(self.shown.replace(draft));
        true
    }

    /// The backend accepted the write.
    pub fn confirm(&mut self) {
        self.previous = None;
    }

    /// The backend rejected the write; show the profile from before
    /// `begin_save`.
    pub fn rollback(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.shown = previous;
        }
    }

    /// Point the displayed profile at a freshly uploaded avatar.
    pub fn set_avatar(&mut self, url: Option<String>) {
        if let Some(profile) = self.shown.as_mut() {
            profile.avatar_url = url;
        }
    }
}

/// How a save ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Row stored, no email change requested.
    Saved,
    /// Row stored and the auth service accepted the new address.
    EmailPending,
    /// Row stored, email change rejected.
    EmailFailed(String),
    /// Row rejected; the email change was not attempted.
    Failed(String),
}

impl SaveOutcome {
    /// Whether the signed-in user changed, so auth should be re-checked.
    #[must_use]
    pub fn changes_user(&self) -> bool {
        matches!(self, Self::EmailPending)
    }
}

/// Settle a pending save from the row write result and, when an email
/// change was sent, its result. Confirms the draft unless the row write
/// itself failed.
pub fn settle_save<E: std::fmt::Display>(
    editor: &mut ProfileEditor,
    row: Result<(), E>,
    email: Option<Result<(), E>>,
) -> SaveOutcome {
    if let Err(e) = row {
        editor.rollback();
        return SaveOutcome::Failed(e.to_string());
    }
    editor.confirm();
    match email {
        None => SaveOutcome::Saved,
        Some(Ok(())) => SaveOutcome::EmailPending,
        Some(Err(e)) => SaveOutcome::EmailFailed(e.to_string()),
    }
}

/// Whether the email field differs from the account email.
#[must_use]
pub fn email_changed(current: Option<&str>, entered: &str) -> bool {
    let entered = entered.trim();
    !entered.is_empty() && current.is_none_or(|c| !c.eq_ignore_ascii_case(entered))
}
