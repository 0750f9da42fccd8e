//! Blocking user dialogs: confirmations and notices.

/// The user-facing side of a board session.
pub trait UserPrompt: Send + Sync {
    /// Asks a yes/no question. Called at most once per delete trigger.
    fn confirm(&self, message: &str) -> bool;

    /// Shows a notice the user has to acknowledge.
    fn notify(&self, message: &str);
}
