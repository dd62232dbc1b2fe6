use crate::api::{BoardApi, CardForm, CardPayload, FieldErrors, FormOutcome, TagFields};
use crate::domain::{
    Assignee, BoardId, Card, CardId, Comment, CommentId, Tag, TagColor, TagId, UserId,
};
use crate::error::Result;
use crate::view::{BoardView, RenderPass};

/// Whether the tag form creates a new tag or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagFormMode {
    #[default]
    Create,
    Edit(TagId),
}

/// The create/edit tag form at the bottom of the overlay's tag manager
#[derive(Debug, Clone, Default)]
pub struct TagFormState {
    mode: TagFormMode,
    pub name: String,
    pub color: TagColor,
    errors: FieldErrors,
}

impl TagFormState {
    pub fn mode(&self) -> TagFormMode {
        self.mode
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Back to an empty create form with the default color
    pub fn reset(&mut self) {
        *self = TagFormState::default();
    }

    fn load_for_edit(&mut self, tag: &Tag) {
        self.mode = TagFormMode::Edit(tag.id);
        self.name = tag.name.clone();
        self.color = tag.color.clone();
        self.errors.clear();
    }

    fn fields(&self) -> TagFields {
        TagFields {
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

/// The card detail overlay: the edit form, the comment thread, and the board
/// tag manager.
///
/// Created when the overlay opens and dropped when it closes; a fresh open
/// always starts from server state with no leftover validation errors.
#[derive(Debug)]
pub struct CardDetailView {
    board_id: BoardId,
    card_id: CardId,

    // Card edit form
    pub title: String,
    pub description: String,
    selected_assignees: Vec<UserId>,
    selected_tags: Vec<TagId>,
    assignees: Vec<Assignee>,
    field_errors: FieldErrors,

    // Comment thread
    comments: Vec<Comment>,
    composer_error: Option<String>,
    editing_comment: Option<CommentId>,
    editor_error: Option<String>,

    // Board tag manager
    board_tags: Vec<Tag>,
    tag_form: TagFormState,
}

impl CardDetailView {
    /// Opens the overlay: loads the card edit payload, the board tag list,
    /// and the comment thread.
    ///
    /// The tag list refresh is best-effort; when it fails the payload's own
    /// copy stands in until the next reconciliation.
    pub async fn open(api: &dyn BoardApi, board_id: BoardId, card_id: CardId) -> Result<Self> {
        let detail = api.fetch_card(card_id).await?;
        let comments = api.list_comments(card_id).await?;

        let board_tags = match api.list_board_tags(board_id).await {
            Ok(tags) => tags,
            Err(err) => {
                tracing::warn!(%err, "board tag list refresh failed; using card payload copy");
                detail.board_tags.clone()
            }
        };

        let card = detail.card;
        Ok(Self {
            board_id,
            card_id,
            title: card.title,
            description: card.description,
            selected_assignees: card.assignee_ids,
            selected_tags: card.tag_ids,
            assignees: card.assignees,
            field_errors: FieldErrors::new(),
            comments,
            composer_error: None,
            editing_comment: None,
            editor_error: None,
            board_tags,
            tag_form: TagFormState::default(),
        })
    }

    pub fn card_id(&self) -> CardId {
        self.card_id
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn board_tags(&self) -> &[Tag] {
        &self.board_tags
    }

    pub fn tag_form(&self) -> &TagFormState {
        &self.tag_form
    }

    pub fn tag_form_mut(&mut self) -> &mut TagFormState {
        &mut self.tag_form
    }

    pub fn selected_tag_ids(&self) -> &[TagId] {
        &self.selected_tags
    }

    pub fn selected_assignee_ids(&self) -> &[UserId] {
        &self.selected_assignees
    }

    /// The avatar strip under the assignee selector
    pub fn selected_assignee_preview(&self) -> Vec<&Assignee> {
        self.assignees
            .iter()
            .filter(|a| self.selected_assignees.contains(&a.id))
            .collect()
    }

    /// The colored chips under the tag selector, in board tag order
    pub fn selected_tag_preview(&self) -> Vec<&Tag> {
        self.board_tags
            .iter()
            .filter(|t| self.selected_tags.contains(&t.id))
            .collect()
    }

    pub fn toggle_assignee_selection(&mut self, id: UserId) {
        if let Some(pos) = self.selected_assignees.iter().position(|a| *a == id) {
            self.selected_assignees.remove(pos);
        } else {
            self.selected_assignees.push(id);
        }
    }

    pub fn toggle_tag_selection(&mut self, id: TagId) {
        if let Some(pos) = self.selected_tags.iter().position(|t| *t == id) {
            self.selected_tags.remove(pos);
        } else {
            self.selected_tags.push(id);
        }
    }

    fn form(&self) -> CardForm {
        CardForm {
            title: self.title.clone(),
            description: self.description.clone(),
            assignee_ids: self.selected_assignees.clone(),
            tag_ids: self.selected_tags.clone(),
        }
    }

    /// Saves the card edit form.
    ///
    /// Returns the board-wide render pass on success, `None` when the server
    /// answered with per-field validation errors (stored for inline display).
    pub async fn save(
        &mut self,
        api: &dyn BoardApi,
        view: &mut BoardView,
    ) -> Result<Option<RenderPass>> {
        match api.save_card(self.card_id, &self.form()).await? {
            FormOutcome::Accepted(payload) => {
                self.field_errors.clear();
                let card = self.card_from_payload(payload);
                self.title = card.title.clone();
                self.description = card.description.clone();
                self.selected_assignees = card.assignees.iter().map(|a| a.id).collect();
                self.selected_tags = card.tags.iter().map(|t| t.id).collect();
                self.assignees = card.assignees.clone();
                let pass = view.apply_saved_card(card)?;
                Ok(Some(pass))
            }
            FormOutcome::Invalid(errors) => {
                self.field_errors = errors;
                Ok(None)
            }
        }
    }

    /// Deletes the card and closes the overlay
    pub async fn delete(self, api: &dyn BoardApi, view: &mut BoardView) -> Result<RenderPass> {
        api.delete_card(self.card_id).await?;
        Ok(view.remove_card(self.card_id))
    }

    /// The save payload may omit the tag list; the current selection mapped
    /// through the board tag list fills the gap.
    fn card_from_payload(&self, payload: CardPayload) -> Card {
        let tag_ids = payload.tag_ids.clone();
        let mut card = payload.into_card();
        if card.tags.is_empty() {
            let ids = if tag_ids.is_empty() {
                &self.selected_tags
            } else {
                &tag_ids
            };
            card.tags = self
                .board_tags
                .iter()
                .filter(|t| ids.contains(&t.id))
                .cloned()
                .collect();
        }
        card
    }

    // --- Comment thread ---

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn has_comments(&self) -> bool {
        !self.comments.is_empty()
    }

    pub fn composer_error(&self) -> Option<&str> {
        self.composer_error.as_deref()
    }

    pub fn editor_error(&self) -> Option<&str> {
        self.editor_error.as_deref()
    }

    pub fn editing_comment(&self) -> Option<CommentId> {
        self.editing_comment
    }

    /// Opens the inline edit form for one comment; any other open edit form
    /// closes first.
    pub fn begin_comment_edit(&mut self, id: CommentId) -> Result<()> {
        if !self.comments.iter().any(|c| c.id == id) {
            return Err(crate::error::KardoError::CommentNotFound(id.to_string()));
        }
        self.editing_comment = Some(id);
        self.editor_error = None;
        Ok(())
    }

    pub fn cancel_comment_edit(&mut self) {
        self.editing_comment = None;
        self.editor_error = None;
    }

    /// Posts a new comment. Returns whether it was accepted; a validation
    /// failure stores the message for the composer.
    pub async fn add_comment(&mut self, api: &dyn BoardApi, text: &str) -> Result<bool> {
        match api.add_comment(self.card_id, text).await? {
            FormOutcome::Accepted(comment) => {
                self.composer_error = None;
                self.comments.push(comment);
                Ok(true)
            }
            FormOutcome::Invalid(errors) => {
                self.composer_error = Some(text_error(&errors));
                Ok(false)
            }
        }
    }

    /// Saves the open inline edit. The edit form stays open (with the error
    /// shown) when the server rejects the text.
    pub async fn save_comment_edit(
        &mut self,
        api: &dyn BoardApi,
        id: CommentId,
        text: &str,
    ) -> Result<bool> {
        match api.edit_comment(id, text).await? {
            FormOutcome::Accepted(updated) => {
                if let Some(comment) = self.comments.iter_mut().find(|c| c.id == id) {
                    comment.text = updated.text;
                    comment.timestamp = updated.timestamp;
                }
                self.cancel_comment_edit();
                Ok(true)
            }
            FormOutcome::Invalid(errors) => {
                self.editor_error = Some(text_error(&errors));
                Ok(false)
            }
        }
    }

    pub async fn delete_comment(&mut self, api: &dyn BoardApi, id: CommentId) -> Result<()> {
        api.delete_comment(id).await?;
        self.comments.retain(|c| c.id != id);
        if self.editing_comment == Some(id) {
            self.cancel_comment_edit();
        }
        Ok(())
    }

    // --- Board tag manager ---

    /// Loads a tag into the form for editing
    pub fn begin_tag_edit(&mut self, tag_id: TagId) -> Result<()> {
        let tag = self
            .board_tags
            .iter()
            .find(|t| t.id == tag_id)
            .ok_or_else(|| crate::error::KardoError::TagNotFound(tag_id.to_string()))?;
        let tag = tag.clone();
        self.tag_form.load_for_edit(&tag);
        Ok(())
    }

    pub fn reset_tag_form(&mut self) {
        self.tag_form.reset();
    }

    /// Submits the tag form (create or edit, depending on its mode).
    ///
    /// On success the server's tag lands in the local list immediately (a
    /// created tag is also selected for this card), then the list refreshes
    /// from the server best-effort. Returns the board render pass, or `None`
    /// when validation failed and the errors were stored on the form.
    pub async fn submit_tag_form(
        &mut self,
        api: &dyn BoardApi,
        view: &mut BoardView,
    ) -> Result<Option<RenderPass>> {
        let fields = self.tag_form.fields();
        match self.tag_form.mode() {
            TagFormMode::Create => match api.create_tag(self.board_id, &fields).await? {
                FormOutcome::Accepted(tag) => {
                    self.tag_form.reset();
                    if !self.board_tags.iter().any(|t| t.id == tag.id) {
                        self.board_tags.push(tag.clone());
                    }
                    if !self.selected_tags.contains(&tag.id) {
                        self.selected_tags.push(tag.id);
                    }
                    self.refresh_board_tags(api).await;
                    Ok(Some(view.recompute()))
                }
                FormOutcome::Invalid(errors) => {
                    self.tag_form.errors = errors;
                    Ok(None)
                }
            },
            TagFormMode::Edit(tag_id) => match api.edit_tag(tag_id, &fields).await? {
                FormOutcome::Accepted(tag) => {
                    self.tag_form.reset();
                    if let Some(existing) = self.board_tags.iter_mut().find(|t| t.id == tag.id) {
                        *existing = tag.clone();
                    }
                    self.refresh_board_tags(api).await;
                    Ok(Some(view.apply_tag_edited(&tag)))
                }
                FormOutcome::Invalid(errors) => {
                    self.tag_form.errors = errors;
                    Ok(None)
                }
            },
        }
    }

    /// Deletes a board tag.
    ///
    /// Card displays change only after the server confirms: a failed delete
    /// leaves every card, the tag list, and the selection untouched.
    pub async fn delete_tag(
        &mut self,
        api: &dyn BoardApi,
        view: &mut BoardView,
        tag_id: TagId,
    ) -> Result<RenderPass> {
        api.delete_tag(tag_id).await?;
        self.board_tags.retain(|t| t.id != tag_id);
        self.selected_tags.retain(|t| *t != tag_id);
        if self.tag_form.mode() == TagFormMode::Edit(tag_id) {
            self.tag_form.reset();
        }
        self.refresh_board_tags(api).await;
        Ok(view.apply_tag_deleted(tag_id))
    }

    /// Best-effort reconciliation of the tag list with the server. A failure
    /// leaves the local list stale; the current selection is kept either way.
    async fn refresh_board_tags(&mut self, api: &dyn BoardApi) {
        match api.list_board_tags(self.board_id).await {
            Ok(tags) => self.board_tags = tags,
            Err(err) => {
                tracing::warn!(%err, "board tag list refresh failed; keeping stale list");
            }
        }
    }
}

fn text_error(errors: &FieldErrors) -> String {
    errors
        .get("text")
        .cloned()
        .unwrap_or_else(|| "Comment was rejected".to_string())
}
