//! Entity renderer: turns a node into a paired view/edit fragment.

use std::fmt;
use std::path::PathBuf;

use super::node::{Entity, EntityNode, ModeKind, NodeId};
use super::registry::ActionKind;
use crate::models::{Comment, DateText, EntityKind, Post};

/// Read-only rendering of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFragment {
    pub node_id: NodeId,
    /// Posts only
    pub title: Option<String>,
    pub content: String,
    pub date: DateText,
    pub image_url: Option<String>,
    pub actions: Vec<ActionKind>,
    /// Comment-add control (posts only)
    pub comment_input: Option<String>,
    /// Embedded comment sub-list (posts only)
    pub comments: Vec<Rendered>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    Title,
    Content,
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldName::Title => write!(f, "title"),
            FieldName::Content => write!(f, "content"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditField {
    pub name: FieldName,
    pub value: String,
}

/// Editable rendering of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EditFragment {
    pub node_id: NodeId,
    pub fields: Vec<EditField>,
    /// Image kept unless a replacement is picked
    pub current_image: Option<String>,
    pub image_file: Option<PathBuf>,
    /// Whether the file-replacement control is shown
    pub accepts_image: bool,
    pub actions: Vec<ActionKind>,
}

impl EditFragment {
    pub fn field(&self, name: FieldName) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Both fragments of an entity; only the one matching `mode` is visible.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub node_id: NodeId,
    pub mode: ModeKind,
    pub view: ViewFragment,
    pub edit: EditFragment,
}

pub enum Visible<'a> {
    View(&'a ViewFragment),
    Edit(&'a EditFragment),
}

impl Rendered {
    pub fn visible(&self) -> Visible<'_> {
        match self.mode {
            ModeKind::View => Visible::View(&self.view),
            ModeKind::Edit => Visible::Edit(&self.edit),
        }
    }

    pub fn is_view_visible(&self) -> bool {
        self.mode == ModeKind::View
    }

    pub fn is_edit_visible(&self) -> bool {
        self.mode == ModeKind::Edit
    }
}

pub fn render_post(
    node: &EntityNode<Post>,
    comment_input: &str,
    comments: &[EntityNode<Comment>],
) -> Rendered {
    let post = node.record();

    // Remove-image only makes sense while there is an image
    let actions = ActionKind::shown(EntityKind::Post, ModeKind::View)
        .filter(|a| *a != ActionKind::RemoveImage || post.image_url.is_some())
        .collect();

    let view = ViewFragment {
        node_id: node.node_id(),
        title: Some(post.title.clone()),
        content: post.content.clone(),
        date: post.date_text(),
        image_url: post.image_url.clone(),
        actions,
        comment_input: Some(comment_input.to_string()),
        comments: comments.iter().map(render_comment).collect(),
    };

    let draft = node.draft().cloned().unwrap_or_else(|| post.draft());
    let edit = EditFragment {
        node_id: node.node_id(),
        fields: vec![
            EditField {
                name: FieldName::Title,
                value: draft.title,
            },
            EditField {
                name: FieldName::Content,
                value: draft.content,
            },
        ],
        current_image: post.image_url.clone(),
        image_file: draft.image_file,
        accepts_image: true,
        actions: ActionKind::shown(EntityKind::Post, ModeKind::Edit).collect(),
    };

    Rendered {
        node_id: node.node_id(),
        mode: node.mode(),
        view,
        edit,
    }
}

pub fn render_comment(node: &EntityNode<Comment>) -> Rendered {
    let comment = node.record();

    let view = ViewFragment {
        node_id: node.node_id(),
        title: None,
        content: comment.content.clone(),
        date: comment.date_text(),
        image_url: None,
        actions: ActionKind::shown(EntityKind::Comment, ModeKind::View).collect(),
        comment_input: None,
        comments: Vec::new(),
    };

    let content = node
        .draft()
        .map(|d| d.content.clone())
        .unwrap_or_else(|| comment.content.clone());
    let edit = EditFragment {
        node_id: node.node_id(),
        fields: vec![EditField {
            name: FieldName::Content,
            value: content,
        }],
        current_image: None,
        image_file: None,
        accepts_image: false,
        actions: ActionKind::shown(EntityKind::Comment, ModeKind::Edit).collect(),
    };

    Rendered {
        node_id: node.node_id(),
        mode: node.mode(),
        view,
        edit,
    }
}

/// Long inlined images are cut down for terminal output.
fn shorten(url: &str, max: usize) -> String {
    if url.chars().count() <= max {
        url.to_string()
    } else {
        let head: String = url.chars().take(max).collect();
        format!("{}...", head)
    }
}

fn join_actions(actions: &[ActionKind]) -> String {
    actions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.visible() {
            Visible::View(view) => write!(f, "{}", view),
            Visible::Edit(edit) => write!(f, "{}", edit),
        }
    }
}

impl fmt::Display for ViewFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => {
                writeln!(f, "[{}] {}", self.node_id, title)?;
                writeln!(f, "{}", self.content)?;
            }
            None => writeln!(f, "[{}] {}", self.node_id, self.content)?,
        }
        if let Some(image) = &self.image_url {
            writeln!(f, "image: {}", shorten(image, 48))?;
        }
        writeln!(f, "{}", self.date)?;
        write!(f, "actions: {}", join_actions(&self.actions))?;

        if self.comment_input.is_some() {
            if self.comments.is_empty() {
                write!(f, "\n  (no comments)")?;
            }
            for comment in &self.comments {
                for line in comment.to_string().lines() {
                    write!(f, "\n  {}", line)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for EditFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] editing", self.node_id)?;
        for field in &self.fields {
            writeln!(f, "  {}: {}", field.name, field.value)?;
        }
        if self.accepts_image {
            match (&self.image_file, &self.current_image) {
                (Some(file), _) => writeln!(f, "  image: {} (replacement)", file.display())?,
                (None, Some(current)) => writeln!(f, "  image: {}", shorten(current, 48))?,
                (None, None) => writeln!(f, "  image: none")?,
            }
        }
        write!(f, "actions: {}", join_actions(&self.actions))
    }
}
