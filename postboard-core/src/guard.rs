//! One-shot in-flight guards, scoped per action control.
//!
//! A slot is held from the moment a trigger is accepted until its call
//! resolves. A second trigger on the same slot while it is held is
//! suppressed; triggers on other slots are unaffected.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::view::ActionKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The new-post form
    Compose,
    Action(ActionKey),
}

#[derive(Debug, Default)]
pub struct InFlight {
    held: Mutex<HashSet<Slot>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes `slot`, or returns `None` if it is already held.
    pub fn try_acquire(&self, slot: Slot) -> Option<InFlightGuard<'_>> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if held.insert(slot) {
            Some(InFlightGuard { owner: self, slot })
        } else {
            None
        }
    }

    pub fn is_held(&self, slot: Slot) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&slot)
    }
}

/// Releases its slot when dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    slot: Slot,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.slot);
    }
}
