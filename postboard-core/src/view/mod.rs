//! Client-side view model of the board.
//!
//! - [`node`]: per-entity VIEW/EDIT state (the edit-mode controller)
//! - [`fragment`]: the entity renderer
//! - [`registry`]: action registry keyed by `(kind, action, id)`
//! - [`document`]: the list container holding everything rendered

pub mod document;
pub mod fragment;
pub mod node;
pub mod registry;

pub use document::{ComposeForm, Document, Input, PostNode};
pub use fragment::{
    render_comment, render_post, EditField, EditFragment, FieldName, Rendered, ViewFragment,
    Visible,
};
pub use node::{CommentDraft, Entity, EntityNode, Mode, ModeKind, NodeId, PostDraft};
pub use registry::{ActionKey, ActionKind, ActionRegistry, Capability};
