//! Action registry keyed by `(entity kind, action, entity id)`.
//!
//! Every control a rendered entity exposes is registered under its own key,
//! so a trigger is routed to exactly the entity that owns it. A comment's
//! delete key can never resolve to its enclosing post.

use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use super::node::{ModeKind, NodeId};
use crate::models::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Edit,
    Cancel,
    Save,
    Delete,
    AddComment,
    RemoveImage,
}

impl ActionKind {
    /// Controls registered for an entity of `kind`.
    pub fn supported_by(kind: EntityKind) -> &'static [ActionKind] {
        match kind {
            EntityKind::Post => &[
                ActionKind::Edit,
                ActionKind::Save,
                ActionKind::Cancel,
                ActionKind::Delete,
                ActionKind::AddComment,
                ActionKind::RemoveImage,
            ],
            EntityKind::Comment => &[
                ActionKind::Edit,
                ActionKind::Save,
                ActionKind::Cancel,
                ActionKind::Delete,
            ],
        }
    }

    /// Controls of a `kind` entity that are on screen in `mode`.
    pub fn shown(kind: EntityKind, mode: ModeKind) -> impl Iterator<Item = ActionKind> {
        Self::supported_by(kind)
            .iter()
            .copied()
            .filter(move |action| action.visible_in(mode))
    }

    /// Whether the control is on screen while the entity is in `mode`.
    ///
    /// Delete works in either mode.
    pub fn visible_in(&self, mode: ModeKind) -> bool {
        match self {
            ActionKind::Edit | ActionKind::AddComment | ActionKind::RemoveImage => {
                mode == ModeKind::View
            }
            ActionKind::Save | ActionKind::Cancel => mode == ModeKind::Edit,
            ActionKind::Delete => true,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Edit => "edit",
            ActionKind::Cancel => "cancel",
            ActionKind::Save => "save",
            ActionKind::Delete => "delete",
            ActionKind::AddComment => "add-comment",
            ActionKind::RemoveImage => "remove-image",
        };
        f.write_str(name)
    }
}

/// A user trigger: which control of which entity was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub kind: EntityKind,
    pub action: ActionKind,
    pub id: Uuid,
}

impl ActionKey {
    pub fn post(action: ActionKind, id: Uuid) -> Self {
        Self {
            kind: EntityKind::Post,
            action,
            id,
        }
    }

    pub fn comment(action: ActionKind, id: Uuid) -> Self {
        Self {
            kind: EntityKind::Comment,
            action,
            id,
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.action, self.id)
    }
}

/// What a registered key resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub node_id: NodeId,
    /// The post the entity lives under (the post itself for post keys)
    pub post_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    entries: HashMap<ActionKey, Capability>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every control of one entity.
    pub fn register_entity(&mut self, kind: EntityKind, id: Uuid, post_id: Uuid) {
        let node_id = NodeId::new(kind, id);
        for action in ActionKind::supported_by(kind) {
            self.entries.insert(
                ActionKey {
                    kind,
                    action: *action,
                    id,
                },
                Capability {
                    node_id: node_id.clone(),
                    post_id,
                },
            );
        }
    }

    pub fn unregister_entity(&mut self, kind: EntityKind, id: Uuid) {
        self.entries.retain(|key, _| !(key.kind == kind && key.id == id));
    }

    /// Drops every comment registered under `post_id`.
    pub fn unregister_comments_of(&mut self, post_id: Uuid) {
        self.entries
            .retain(|key, cap| !(key.kind == EntityKind::Comment && cap.post_id == post_id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn resolve(&self, key: &ActionKey) -> Option<&Capability> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
