use clap::{Args, Subcommand};
use std::error::Error;
use uuid::Uuid;

use postboard::config::Config;
use postboard_core::{ActionKey, ActionKind, Board, Input};

use super::{finish, open_board, resolve_id, OutputFormat};

#[derive(Args)]
pub struct CommentCommand {
    #[command(subcommand)]
    pub command: CommentSubcommand,
}

#[derive(Subcommand)]
pub enum CommentSubcommand {
    /// List a post's comments, oldest first
    List {
        /// Post ID (or a unique prefix)
        post: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Comment on a post
    Add {
        /// Post ID (or a unique prefix)
        post: String,

        /// Comment text
        content: String,
    },

    /// Edit a comment
    Edit {
        /// Comment ID (or a unique prefix)
        id: String,

        /// New comment text
        content: String,
    },

    /// Delete a comment
    Delete {
        /// Comment ID (or a unique prefix)
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

fn resolve_comment(board: &Board, identifier: &str) -> Result<Uuid, Box<dyn Error>> {
    let ids: Vec<Uuid> = board.view(|doc| {
        doc.posts()
            .iter()
            .flat_map(|p| p.comments.iter().map(|c| c.id()))
            .collect()
    });
    resolve_id(identifier, ids, "comment")
}

fn resolve_post(board: &Board, identifier: &str) -> Result<Uuid, Box<dyn Error>> {
    let ids: Vec<Uuid> = board.view(|doc| doc.posts().iter().map(|p| p.id()).collect());
    resolve_id(identifier, ids, "post")
}

impl CommentCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn Error>> {
        let force = matches!(self.command, CommentSubcommand::Delete { force: true, .. });
        let board = open_board(config, force);
        board.refresh_posts().await?;

        match &self.command {
            CommentSubcommand::List { post, format } => {
                let post_id = resolve_post(&board, post)?;
                let comments = board.view(|doc| {
                    doc.post(post_id)
                        .map(|p| p.comments.iter().map(|c| c.record().clone()).collect::<Vec<_>>())
                        .unwrap_or_default()
                });

                if comments.is_empty() {
                    println!("No comments found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&comments)?);
                    }
                    OutputFormat::Text => {
                        for comment in &comments {
                            println!("{}  {}", comment.id, comment);
                        }
                        println!("\nTotal: {} comment(s)", comments.len());
                    }
                }
                Ok(())
            }

            CommentSubcommand::Add { post, content } => {
                let post_id = resolve_post(&board, post)?;
                board.input(Input::CommentInput {
                    post_id,
                    content: content.clone(),
                });

                if finish(board.submit_comment(post_id).await, "comment")? {
                    let latest = board.view(|doc| {
                        doc.post(post_id)
                            .and_then(|p| p.comments.last())
                            .map(|c| c.record().to_string())
                    });
                    if let Some(latest) = latest {
                        println!("Added comment: {}", latest);
                    }
                }
                Ok(())
            }

            CommentSubcommand::Edit { id, content } => {
                let comment_id = resolve_comment(&board, id)?;

                finish(
                    board
                        .dispatch(ActionKey::comment(ActionKind::Edit, comment_id))
                        .await,
                    "comment",
                )?;
                board.input(Input::EditCommentContent {
                    comment_id,
                    content: content.clone(),
                });

                let saved = board
                    .dispatch(ActionKey::comment(ActionKind::Save, comment_id))
                    .await;
                if finish(saved, "comment")? {
                    let updated =
                        board.view(|doc| doc.comment(comment_id).map(|c| c.record().to_string()));
                    if let Some(updated) = updated {
                        println!("Updated comment: {}", updated);
                    }
                }
                Ok(())
            }

            CommentSubcommand::Delete { id, .. } => {
                let comment_id = resolve_comment(&board, id)?;

                let outcome = board
                    .dispatch(ActionKey::comment(ActionKind::Delete, comment_id))
                    .await;
                if finish(outcome, "comment")? {
                    println!("Deleted comment {}", comment_id);
                }
                Ok(())
            }
        }
    }
}
