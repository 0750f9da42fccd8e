use clap::{Args, Subcommand};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use uuid::Uuid;

use postboard::config::Config;
use postboard_core::{ActionKey, ActionKind, Board, Comment, Input, Post};

use super::{finish, open_board, resolve_id, OutputFormat};

#[derive(Args)]
pub struct PostCommand {
    #[command(subcommand)]
    pub command: PostSubcommand,
}

#[derive(Subcommand)]
pub enum PostSubcommand {
    /// List posts with their comments, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Publish a new post
    Create {
        /// Post title
        #[arg(long)]
        title: String,

        /// Post body
        #[arg(long)]
        content: String,

        /// Image file to inline into the post
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Edit an existing post
    Edit {
        /// Post ID (or a unique prefix)
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body
        #[arg(long)]
        content: Option<String>,

        /// Replacement image file
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete a post and its comments
    Delete {
        /// Post ID (or a unique prefix)
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Remove a post's image
    RemoveImage {
        /// Post ID (or a unique prefix)
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Serialize)]
struct PostListing<'a> {
    #[serde(flatten)]
    post: &'a Post,
    comments: Vec<&'a Comment>,
}

fn resolve_post(board: &Board, identifier: &str) -> Result<Uuid, Box<dyn Error>> {
    let ids: Vec<Uuid> = board.view(|doc| doc.posts().iter().map(|p| p.id()).collect());
    resolve_id(identifier, ids, "post")
}

fn print_post(board: &Board, id: Uuid) {
    if let Some(text) = board.view(|doc| doc.post(id).map(|p| p.render().to_string())) {
        println!("{}", text);
    }
}

impl PostCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn Error>> {
        match &self.command {
            PostSubcommand::List { format } => {
                let board = open_board(config, false);
                board.refresh_posts().await?;

                if board.view(|doc| doc.posts().is_empty()) {
                    println!("No posts found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        let json = board.view(|doc| {
                            let listings: Vec<PostListing> = doc
                                .posts()
                                .iter()
                                .map(|p| PostListing {
                                    post: p.node.record(),
                                    comments: p.comments.iter().map(|c| c.record()).collect(),
                                })
                                .collect();
                            serde_json::to_string_pretty(&listings)
                        })?;
                        println!("{}", json);
                    }
                    OutputFormat::Text => {
                        let rendered = board.render();
                        for post in &rendered {
                            println!("{}\n", post);
                        }
                        println!("Total: {} post(s)", rendered.len());
                    }
                }
                Ok(())
            }

            PostSubcommand::Create {
                title,
                content,
                image,
            } => {
                let board = open_board(config, false);
                board.input(Input::ComposeTitle(title.clone()));
                board.input(Input::ComposeContent(content.clone()));
                board.input(Input::ComposeImage(image.clone()));

                if finish(board.submit_post().await, "post")? {
                    println!("Created post:");
                    if let Some(id) = board.view(|doc| doc.posts().first().map(|p| p.id())) {
                        print_post(&board, id);
                    }
                }
                Ok(())
            }

            PostSubcommand::Edit {
                id,
                title,
                content,
                image,
            } => {
                if title.is_none() && content.is_none() && image.is_none() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let board = open_board(config, false);
                board.refresh_posts().await?;
                let post_id = resolve_post(&board, id)?;

                finish(
                    board.dispatch(ActionKey::post(ActionKind::Edit, post_id)).await,
                    "post",
                )?;
                if let Some(title) = title {
                    board.input(Input::EditTitle {
                        post_id,
                        title: title.clone(),
                    });
                }
                if let Some(content) = content {
                    board.input(Input::EditPostContent {
                        post_id,
                        content: content.clone(),
                    });
                }
                if image.is_some() {
                    board.input(Input::EditImage {
                        post_id,
                        file: image.clone(),
                    });
                }

                let saved = board.dispatch(ActionKey::post(ActionKind::Save, post_id)).await;
                if finish(saved, "post")? {
                    println!("Updated post:");
                    print_post(&board, post_id);
                }
                Ok(())
            }

            PostSubcommand::Delete { id, force } => {
                let board = open_board(config, *force);
                board.refresh_posts().await?;
                let post_id = resolve_post(&board, id)?;
                let title = board
                    .view(|doc| doc.post(post_id).map(|p| p.node.record().title.clone()))
                    .unwrap_or_default();

                let outcome = board
                    .dispatch(ActionKey::post(ActionKind::Delete, post_id))
                    .await;
                if finish(outcome, "post")? {
                    println!("Deleted post: {}", title);
                }
                Ok(())
            }

            PostSubcommand::RemoveImage { id, force } => {
                let board = open_board(config, *force);
                board.refresh_posts().await?;
                let post_id = resolve_post(&board, id)?;

                let outcome = board
                    .dispatch(ActionKey::post(ActionKind::RemoveImage, post_id))
                    .await;
                if finish(outcome, "post image")? {
                    println!("Removed image from post {}", post_id);
                }
                Ok(())
            }
        }
    }
}
