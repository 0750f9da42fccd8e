//! A board session: the rendered document plus the collaborators every
//! action goes through.
//!
//! Actions are dispatched by [`ActionKey`] (see [`Board::dispatch`]); list
//! refreshes live in the `sync` module and mutations in `coordinator`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::auth::{AuthGate, Identity};
use crate::client::RemoteStore;
use crate::error::ActionError;
use crate::guard::InFlight;
use crate::prompt::UserPrompt;
use crate::view::{Document, Input, Rendered};

/// How a triggered action ended.
#[derive(Debug)]
pub enum Outcome {
    /// The mutation reached the store and the view was refreshed
    Applied,
    /// The target was already gone on the server; the view was reconciled
    Reconciled,
    /// A local VIEW/EDIT transition
    Toggled,
    /// The user answered "no" to the confirmation
    Declined,
    /// The same control already has a call in flight
    Suppressed,
    /// The control no longer exists or is not shown in the entity's mode
    Stale,
    Failed(ActionError),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

pub struct Board {
    pub(crate) store: Arc<dyn RemoteStore>,
    pub(crate) auth: Arc<dyn AuthGate>,
    pub(crate) prompt: Arc<dyn UserPrompt>,
    document: Mutex<Document>,
    pub(crate) in_flight: InFlight,
}

impl Board {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        auth: Arc<dyn AuthGate>,
        prompt: Arc<dyn UserPrompt>,
    ) -> Self {
        Self {
            store,
            auth,
            prompt,
            document: Mutex::new(Document::new()),
            in_flight: InFlight::new(),
        }
    }

    /// Applies typed input. Returns `false` if the input is not on screen.
    pub fn input(&self, input: Input) -> bool {
        self.doc().apply_input(input)
    }

    /// Runs `f` against the current document.
    pub fn view<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.doc())
    }

    pub fn render(&self) -> Vec<Rendered> {
        self.doc().render()
    }

    /// The document is never locked across a suspension point.
    pub(crate) fn doc(&self) -> MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks the auth gate, showing a blocking notice when nobody is signed in.
    pub(crate) fn require_identity(&self) -> Result<Identity, ActionError> {
        self.auth.check_auth().ok_or(ActionError::Unauthenticated)
    }

    /// Reports `err` to the user and wraps it as the action's outcome.
    pub(crate) fn fail(&self, err: impl Into<ActionError>) -> Outcome {
        let err = err.into();
        tracing::warn!(error = %err, "action failed");
        self.prompt.notify(&err.user_message());
        Outcome::Failed(err)
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("document", &*self.doc())
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}
