mod comment;
mod config_cmd;
mod post;

pub use comment::CommentCommand;
pub use config_cmd::ConfigCommand;
pub use post::PostCommand;

use clap::ValueEnum;
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

use postboard::config::Config;
use postboard_core::{Board, HttpStore, Outcome, StaticAuth};

use crate::prompt::TerminalPrompt;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// A board session against the configured server.
pub fn open_board(config: &Config, assume_yes: bool) -> Board {
    Board::new(
        Arc::new(HttpStore::new(config.server_url.value.clone())),
        Arc::new(StaticAuth::from_user_id(config.user_id.value.as_deref())),
        Arc::new(TerminalPrompt::new(assume_yes)),
    )
}

/// Finds the single id among `ids` that is, or starts with, `identifier`.
pub fn resolve_id(
    identifier: &str,
    ids: impl IntoIterator<Item = Uuid>,
    kind: &str,
) -> Result<Uuid, Box<dyn Error>> {
    let needle = identifier.trim().to_lowercase();
    if needle.is_empty() {
        return Err(format!("{} id is required", kind).into());
    }

    let matches: Vec<Uuid> = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("{} not found: {}", kind, identifier).into()),
        _ => Err(format!("{} id '{}' is ambiguous", kind, identifier).into()),
    }
}

/// Turns a board outcome into the command's result.
///
/// `Failed` notices have already been shown by the prompt.
pub fn finish(outcome: Outcome, what: &str) -> Result<bool, Box<dyn Error>> {
    match outcome {
        Outcome::Applied | Outcome::Toggled => Ok(true),
        Outcome::Reconciled => {
            println!("The {} no longer exists; board refreshed.", what);
            Ok(false)
        }
        Outcome::Declined => {
            println!("Cancelled.");
            Ok(false)
        }
        Outcome::Suppressed => Err(format!("{} is busy, try again", what).into()),
        Outcome::Stale => Err(format!("{} is not available", what).into()),
        Outcome::Failed(_) => Err(format!("{} was not changed", what).into()),
    }
}
