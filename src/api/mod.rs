use crate::{
    domain::{Assignee, BoardId, Card, CardId, ColumnId, Comment, CommentId, Tag, TagId, UserId},
    error::Result,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

pub mod http;

#[cfg(test)]
pub(crate) mod mock;

/// Server-side length limits, mirrored from the board forms. The server stays
/// authoritative; these exist so client code and tests can agree on them.
pub mod limits {
    pub const CARD_TITLE_MAX: usize = 150;
    pub const CARD_DESCRIPTION_MAX: usize = 1000;
    pub const COMMENT_TEXT_MAX: usize = 1000;
    pub const TAG_NAME_MAX: usize = 50;
}

/// Per-field validation messages from a 400-class response, keyed by the wire
/// field name (`title`, `text`, `name`, ...)
pub type FieldErrors = HashMap<String, String>;

/// The outcome of submitting a validated form.
///
/// Validation failures are data, not errors: they are shown inline next to
/// the offending input and the action simply does not happen.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome<T> {
    Accepted(T),
    Invalid(FieldErrors),
}

impl<T> FormOutcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FormOutcome::Accepted(_))
    }

    pub fn invalid_fields(&self) -> Option<&FieldErrors> {
        match self {
            FormOutcome::Invalid(errors) => Some(errors),
            FormOutcome::Accepted(_) => None,
        }
    }
}

/// The card payload returned by the edit endpoint: the card plus the id lists
/// the edit form preselects.
#[derive(Debug, Clone, Deserialize)]
pub struct CardPayload {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee_ids: Vec<UserId>,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl CardPayload {
    pub fn into_card(self) -> Card {
        Card {
            id: self.id,
            title: self.title,
            description: self.description,
            assignees: self.assignees,
            tags: self.tags,
        }
    }
}

/// Everything the card detail overlay needs to open: the card itself and the
/// board's tag list for the tag selector.
#[derive(Debug, Clone, Deserialize)]
pub struct CardDetailPayload {
    pub card: CardPayload,
    #[serde(default)]
    pub board_tags: Vec<Tag>,
}

/// The editable card fields, posted as form data on save
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardForm {
    pub title: String,
    pub description: String,
    pub assignee_ids: Vec<UserId>,
    pub tag_ids: Vec<TagId>,
}

/// The tag create/edit form fields
#[derive(Debug, Clone, PartialEq)]
pub struct TagFields {
    pub name: String,
    pub color: crate::domain::TagColor,
}

/// The board server's AJAX surface.
///
/// One operation per endpoint; implementations decide transport and token
/// handling. Mutating operations require the per-session anti-forgery token
/// and must fail locally, without sending, when it is absent.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Fetches a card and the board tag list for the detail overlay
    async fn fetch_card(&self, id: CardId) -> Result<CardDetailPayload>;

    /// Saves the card edit form; validation failures come back per-field
    async fn save_card(&self, id: CardId, form: &CardForm) -> Result<FormOutcome<CardPayload>>;

    /// Deletes a card (and, server-side, its comments)
    async fn delete_card(&self, id: CardId) -> Result<()>;

    /// Confirms a drag move to a new column
    async fn move_card(&self, id: CardId, new_column: ColumnId) -> Result<()>;

    /// Lists a card's comments, oldest first
    async fn list_comments(&self, card: CardId) -> Result<Vec<Comment>>;

    async fn add_comment(&self, card: CardId, text: &str) -> Result<FormOutcome<Comment>>;

    async fn edit_comment(&self, id: CommentId, text: &str) -> Result<FormOutcome<Comment>>;

    async fn delete_comment(&self, id: CommentId) -> Result<()>;

    /// Lists the tags defined on a board
    async fn list_board_tags(&self, board: BoardId) -> Result<Vec<Tag>>;

    async fn create_tag(&self, board: BoardId, fields: &TagFields) -> Result<FormOutcome<Tag>>;

    async fn edit_tag(&self, id: TagId, fields: &TagFields) -> Result<FormOutcome<Tag>>;

    async fn delete_tag(&self, id: TagId) -> Result<()>;
}
