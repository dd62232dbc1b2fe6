//! A scripted [`BoardApi`] double for exercising the view layer without a
//! server.

use crate::{
    api::{
        BoardApi, CardDetailPayload, CardForm, CardPayload, FormOutcome, TagFields,
    },
    domain::{BoardId, CardId, ColumnId, Comment, CommentId, Tag, TagId},
    error::{KardoError, Result},
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A pre-scripted response for an operation without a payload
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Ok,
    Rejected(String),
    Transport(String),
    MissingToken,
}

impl Scripted {
    fn into_result(self) -> Result<()> {
        match self {
            Scripted::Ok => Ok(()),
            Scripted::Rejected(msg) => Err(KardoError::Rejected(msg)),
            Scripted::Transport(msg) => Err(KardoError::Transport(msg)),
            Scripted::MissingToken => Err(KardoError::MissingCsrfToken),
        }
    }
}

#[derive(Default)]
struct Inner {
    detail: Option<CardDetailPayload>,
    comments: Vec<Comment>,
    board_tags: Vec<Tag>,
    tag_list_fails: bool,
    move_plan: VecDeque<Scripted>,
    move_calls: Vec<(CardId, ColumnId)>,
    save_outcome: Option<FormOutcome<CardPayload>>,
    add_comment_outcome: Option<FormOutcome<Comment>>,
    edit_comment_outcome: Option<FormOutcome<Comment>>,
    create_tag_outcome: Option<FormOutcome<Tag>>,
    edit_tag_outcome: Option<FormOutcome<Tag>>,
    delete_tag_plan: Option<Scripted>,
}

pub(crate) struct MockApi {
    inner: Mutex<Inner>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_detail(self, detail: CardDetailPayload) -> Self {
        self.inner.lock().unwrap().detail = Some(detail);
        self
    }

    pub fn with_comments(self, comments: Vec<Comment>) -> Self {
        self.inner.lock().unwrap().comments = comments;
        self
    }

    pub fn with_board_tags(self, tags: Vec<Tag>) -> Self {
        self.inner.lock().unwrap().board_tags = tags;
        self
    }

    /// Replaces the tag list served by `list_board_tags` mid-test
    pub fn set_board_tags(&self, tags: Vec<Tag>) {
        self.inner.lock().unwrap().board_tags = tags;
    }

    pub fn fail_tag_list(&self) {
        self.inner.lock().unwrap().tag_list_fails = true;
    }

    /// Queues the result of the next `move_card` call (FIFO; default Ok)
    pub fn queue_move(&self, scripted: Scripted) {
        self.inner.lock().unwrap().move_plan.push_back(scripted);
    }

    pub fn move_calls(&self) -> Vec<(CardId, ColumnId)> {
        self.inner.lock().unwrap().move_calls.clone()
    }

    pub fn script_save(&self, outcome: FormOutcome<CardPayload>) {
        self.inner.lock().unwrap().save_outcome = Some(outcome);
    }

    pub fn script_add_comment(&self, outcome: FormOutcome<Comment>) {
        self.inner.lock().unwrap().add_comment_outcome = Some(outcome);
    }

    pub fn script_edit_comment(&self, outcome: FormOutcome<Comment>) {
        self.inner.lock().unwrap().edit_comment_outcome = Some(outcome);
    }

    pub fn script_create_tag(&self, outcome: FormOutcome<Tag>) {
        self.inner.lock().unwrap().create_tag_outcome = Some(outcome);
    }

    pub fn script_edit_tag(&self, outcome: FormOutcome<Tag>) {
        self.inner.lock().unwrap().edit_tag_outcome = Some(outcome);
    }

    pub fn script_delete_tag(&self, scripted: Scripted) {
        self.inner.lock().unwrap().delete_tag_plan = Some(scripted);
    }
}

#[async_trait]
impl BoardApi for MockApi {
    async fn fetch_card(&self, id: CardId) -> Result<CardDetailPayload> {
        self.inner
            .lock()
            .unwrap()
            .detail
            .clone()
            .ok_or_else(|| KardoError::CardNotFound(id.to_string()))
    }

    async fn save_card(&self, _id: CardId, _form: &CardForm) -> Result<FormOutcome<CardPayload>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .save_outcome
            .clone()
            .expect("save_card not scripted"))
    }

    async fn delete_card(&self, _id: CardId) -> Result<()> {
        Ok(())
    }

    async fn move_card(&self, id: CardId, new_column: ColumnId) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.move_calls.push((id, new_column));
        inner
            .move_plan
            .pop_front()
            .unwrap_or(Scripted::Ok)
            .into_result()
    }

    async fn list_comments(&self, _card: CardId) -> Result<Vec<Comment>> {
        Ok(self.inner.lock().unwrap().comments.clone())
    }

    async fn add_comment(&self, _card: CardId, _text: &str) -> Result<FormOutcome<Comment>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .add_comment_outcome
            .clone()
            .expect("add_comment not scripted"))
    }

    async fn edit_comment(&self, _id: CommentId, _text: &str) -> Result<FormOutcome<Comment>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .edit_comment_outcome
            .clone()
            .expect("edit_comment not scripted"))
    }

    async fn delete_comment(&self, _id: CommentId) -> Result<()> {
        Ok(())
    }

    async fn list_board_tags(&self, _board: BoardId) -> Result<Vec<Tag>> {
        let inner = self.inner.lock().unwrap();
        if inner.tag_list_fails {
            return Err(KardoError::Transport("connection reset".to_string()));
        }
        Ok(inner.board_tags.clone())
    }

    async fn create_tag(&self, _board: BoardId, _fields: &TagFields) -> Result<FormOutcome<Tag>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .create_tag_outcome
            .clone()
            .expect("create_tag not scripted"))
    }

    async fn edit_tag(&self, _id: TagId, _fields: &TagFields) -> Result<FormOutcome<Tag>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .edit_tag_outcome
            .clone()
            .expect("edit_tag not scripted"))
    }

    async fn delete_tag(&self, _id: TagId) -> Result<()> {
        let plan = self.inner.lock().unwrap().delete_tag_plan.take();
        plan.unwrap_or(Scripted::Ok).into_result()
    }
}
