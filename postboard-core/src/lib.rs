//! Postboard Core Library
//!
//! Data model, remote store client and the client-side view synchronization
//! used by Postboard front ends.

pub mod auth;
pub mod board;
pub mod client;
pub mod coordinator;
pub mod error;
pub mod guard;
pub mod image;
pub mod models;
pub mod prompt;
pub mod sync;
pub mod view;

#[cfg(test)]
mod testing;

pub use auth::{AuthGate, Identity, StaticAuth};
pub use board::{Board, Outcome};
pub use client::{ClientError, HttpStore, RemoteStore};
pub use error::ActionError;
pub use guard::{InFlight, InFlightGuard, Slot};
pub use image::{encode_data_uri, inline_image, ImageError};
pub use models::{
    Comment, CommentUpdate, DateText, EntityKind, NewComment, NewPost, Post, PostUpdate,
};
pub use prompt::UserPrompt;
pub use sync::Collection;
pub use view::{ActionKey, ActionKind, Document, Input, Rendered};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
