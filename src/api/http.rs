use crate::{
    api::{
        BoardApi, CardDetailPayload, CardForm, CardPayload, FieldErrors, FormOutcome, TagFields,
    },
    domain::{BoardId, CardId, ColumnId, Comment, CommentId, Tag, TagId},
    error::{KardoError, Result},
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

const XHR_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");
const CSRF_HEADER: &str = "X-CSRFToken";

/// The HTTP implementation of [`BoardApi`].
///
/// Form-posting endpoints carry the anti-forgery token as the `csrf_token`
/// form field; delete and move endpoints carry it as the `X-CSRFToken`
/// header. When no token was found on the page, mutating calls abort locally
/// and nothing is sent.
pub struct HttpBoardApi {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl HttpBoardApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            csrf_token: None,
        }
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn csrf(&self) -> Result<&str> {
        self.csrf_token.as_deref().ok_or(KardoError::MissingCsrfToken)
    }

    async fn get_json(&self, path: &str) -> Result<(StatusCode, Value)> {
        let response = self
            .client
            .get(self.url(path))
            .header(XHR_HEADER.0, XHR_HEADER.1)
            .send()
            .await?;
        read_json(response).await
    }

    async fn post_form(&self, path: &str, pairs: &[(&str, String)]) -> Result<(StatusCode, Value)> {
        let response = self
            .client
            .post(self.url(path))
            .header(XHR_HEADER.0, XHR_HEADER.1)
            .form(pairs)
            .send()
            .await?;
        read_json(response).await
    }

    /// POST with the token in the header and no body (delete endpoints)
    async fn post_with_token_header(&self, path: &str) -> Result<(StatusCode, Value)> {
        let token = self.csrf()?.to_string();
        let response = self
            .client
            .post(self.url(path))
            .header(XHR_HEADER.0, XHR_HEADER.1)
            .header(CSRF_HEADER, token)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn fetch_card(&self, id: CardId) -> Result<CardDetailPayload> {
        let (status, value) = self.get_json(&format!("/cards/{}/edit", id)).await?;
        let value = expect_success(status, value)?;
        decode(value)
    }

    async fn save_card(&self, id: CardId, form: &CardForm) -> Result<FormOutcome<CardPayload>> {
        let mut pairs = vec![
            ("csrf_token", self.csrf()?.to_string()),
            ("title", form.title.clone()),
            ("description", form.description.clone()),
        ];
        for assignee in &form.assignee_ids {
            pairs.push(("assignees", assignee.to_string()));
        }
        for tag in &form.tag_ids {
            pairs.push(("tags", tag.to_string()));
        }
        let (status, value) = self.post_form(&format!("/cards/{}/edit", id), &pairs).await?;
        form_outcome(status, value, "card")
    }

    async fn delete_card(&self, id: CardId) -> Result<()> {
        let (status, value) = self
            .post_with_token_header(&format!("/cards/{}/delete", id))
            .await?;
        expect_success(status, value).map(|_| ())
    }

    async fn move_card(&self, id: CardId, new_column: ColumnId) -> Result<()> {
        let token = self.csrf()?.to_string();
        let response = self
            .client
            .post(self.url(&format!("/api/cards/{}/move", id)))
            .header(CSRF_HEADER, token)
            .json(&json!({ "new_column_id": new_column.value() }))
            .send()
            .await?;
        let (status, value) = read_json(response).await?;
        expect_success(status, value).map(|_| ())
    }

    async fn list_comments(&self, card: CardId) -> Result<Vec<Comment>> {
        let (status, value) = self.get_json(&format!("/cards/{}/comments", card)).await?;
        let value = expect_success(status, value)?;
        decode_field(&value, "comments")
    }

    async fn add_comment(&self, card: CardId, text: &str) -> Result<FormOutcome<Comment>> {
        let pairs = [
            ("csrf_token", self.csrf()?.to_string()),
            ("text", text.to_string()),
        ];
        let (status, value) = self
            .post_form(&format!("/cards/{}/comments/add", card), &pairs)
            .await?;
        form_outcome(status, value, "comment")
    }

    async fn edit_comment(&self, id: CommentId, text: &str) -> Result<FormOutcome<Comment>> {
        let pairs = [
            ("csrf_token", self.csrf()?.to_string()),
            ("text", text.to_string()),
        ];
        let (status, value) = self
            .post_form(&format!("/comments/{}/edit", id), &pairs)
            .await?;
        form_outcome(status, value, "comment")
    }

    async fn delete_comment(&self, id: CommentId) -> Result<()> {
        let (status, value) = self
            .post_with_token_header(&format!("/comments/{}/delete", id))
            .await?;
        expect_success(status, value).map(|_| ())
    }

    async fn list_board_tags(&self, board: BoardId) -> Result<Vec<Tag>> {
        let (status, value) = self.get_json(&format!("/api/boards/{}/tags", board)).await?;
        let value = expect_success(status, value)?;
        decode_field(&value, "tags")
    }

    async fn create_tag(&self, board: BoardId, fields: &TagFields) -> Result<FormOutcome<Tag>> {
        let pairs = [
            ("csrf_token", self.csrf()?.to_string()),
            ("name", fields.name.clone()),
            ("color", fields.color.as_str().to_string()),
        ];
        let (status, value) = self
            .post_form(&format!("/api/boards/{}/tags/create", board), &pairs)
            .await?;
        form_outcome(status, value, "tag")
    }

    async fn edit_tag(&self, id: TagId, fields: &TagFields) -> Result<FormOutcome<Tag>> {
        let pairs = [
            ("csrf_token", self.csrf()?.to_string()),
            ("name", fields.name.clone()),
            ("color", fields.color.as_str().to_string()),
        ];
        let (status, value) = self
            .post_form(&format!("/api/tags/{}/edit", id), &pairs)
            .await?;
        form_outcome(status, value, "tag")
    }

    async fn delete_tag(&self, id: TagId) -> Result<()> {
        let (status, value) = self
            .post_with_token_header(&format!("/api/tags/{}/delete", id))
            .await?;
        expect_success(status, value).map(|_| ())
    }
}

async fn read_json(response: Response) -> Result<(StatusCode, Value)> {
    let status = response.status();
    let text = response.text().await?;
    match serde_json::from_str(&text) {
        Ok(value) => Ok((status, value)),
        Err(_) => {
            tracing::warn!(status = status.as_u16(), "server returned a non-JSON body");
            Err(KardoError::UnexpectedResponse(format!(
                "status {}: body was not JSON",
                status.as_u16()
            )))
        }
    }
}

fn success_flag(value: &Value) -> bool {
    value.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// The server reports failures as `error` or, in older handlers, `message`
fn rejection_message(value: &Value) -> String {
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown server error")
        .to_string()
}

fn field_errors(value: &Value) -> Option<FieldErrors> {
    let errors = value.get("errors")?;
    serde_json::from_value(errors.clone()).ok()
}

/// 2xx with `success: true`, or the failure mapped to `Rejected`
fn expect_success(status: StatusCode, value: Value) -> Result<Value> {
    if status.is_success() && success_flag(&value) {
        Ok(value)
    } else {
        Err(KardoError::Rejected(rejection_message(&value)))
    }
}

/// Decodes a validated-form response: 400 with per-field errors is a normal
/// `Invalid` outcome, success unwraps the named payload field.
fn form_outcome<T: DeserializeOwned>(
    status: StatusCode,
    value: Value,
    key: &str,
) -> Result<FormOutcome<T>> {
    if status == StatusCode::BAD_REQUEST {
        if let Some(errors) = field_errors(&value) {
            return Ok(FormOutcome::Invalid(errors));
        }
    }
    let value = expect_success(status, value)?;
    decode_field(&value, key).map(FormOutcome::Accepted)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| {
        tracing::warn!(%err, "response payload had an unexpected shape");
        KardoError::UnexpectedResponse(err.to_string())
    })
}

fn decode_field<T: DeserializeOwned>(value: &Value, key: &str) -> Result<T> {
    match value.get(key) {
        Some(field) => decode(field.clone()),
        None => Err(KardoError::UnexpectedResponse(format!(
            "missing '{}' in response",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let api = HttpBoardApi::new("https://kardo.example/");
        assert_eq!(api.url("/cards/5/edit"), "https://kardo.example/cards/5/edit");
    }

    #[test]
    fn test_csrf_precondition() {
        let api = HttpBoardApi::new("https://kardo.example");
        assert!(matches!(api.csrf(), Err(KardoError::MissingCsrfToken)));

        let api = api.with_csrf_token("tok-123");
        assert_eq!(api.csrf().unwrap(), "tok-123");
    }

    #[tokio::test]
    async fn test_mutating_calls_abort_locally_without_token() {
        // Port 9 (discard) would fail if a request were attempted; the local
        // precondition must fire first.
        let api = HttpBoardApi::new("http://127.0.0.1:9");
        let err = api
            .move_card(CardId::new(1), ColumnId::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err, KardoError::MissingCsrfToken));

        let err = api.delete_card(CardId::new(1)).await.unwrap_err();
        assert!(matches!(err, KardoError::MissingCsrfToken));
    }

    #[test]
    fn test_expect_success_rejects_failure_body() {
        let body = json!({"success": false, "error": "locked"});
        let err = expect_success(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, KardoError::Rejected(msg) if msg == "locked"));
    }

    #[test]
    fn test_expect_success_falls_back_to_message() {
        let body = json!({"success": false, "message": "no access"});
        let err = expect_success(StatusCode::FORBIDDEN, body).unwrap_err();
        assert!(matches!(err, KardoError::Rejected(msg) if msg == "no access"));
    }

    #[test]
    fn test_expect_success_requires_success_flag() {
        let body = json!({"ok": true});
        assert!(expect_success(StatusCode::OK, body).is_err());
    }

    #[test]
    fn test_form_outcome_maps_400_to_invalid() {
        let body = json!({"success": false, "errors": {"title": "Required"}});
        let outcome: FormOutcome<Tag> =
            form_outcome(StatusCode::BAD_REQUEST, body, "tag").unwrap();
        assert_eq!(
            outcome.invalid_fields().unwrap().get("title").unwrap(),
            "Required"
        );
    }

    #[test]
    fn test_form_outcome_unwraps_payload_field() {
        let body = json!({
            "success": true,
            "tag": {"id": 3, "name": "bug", "color": "#ff0000"}
        });
        let outcome: FormOutcome<Tag> = form_outcome(StatusCode::CREATED, body, "tag").unwrap();
        match outcome {
            FormOutcome::Accepted(tag) => assert_eq!(tag.name, "bug"),
            FormOutcome::Invalid(_) => panic!("expected accepted"),
        }
    }

    #[test]
    fn test_form_outcome_missing_payload_is_unexpected() {
        let body = json!({"success": true});
        let result: Result<FormOutcome<Tag>> = form_outcome(StatusCode::OK, body, "tag");
        assert!(matches!(result, Err(KardoError::UnexpectedResponse(_))));
    }

    #[test]
    fn test_decode_comments_list() {
        let body = json!({
            "success": true,
            "comments": [{
                "id": 1,
                "text": "first",
                "timestamp": "01.02.2025 10:15",
                "author": {"id": 2, "username": "anna", "avatar_url": "/a/2.png"},
                "can_edit": false,
                "can_delete": false
            }]
        });
        let comments: Vec<Comment> = decode_field(&body, "comments").unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "first");
    }
}
