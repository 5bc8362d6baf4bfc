//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// What the login page would show: where to send the user afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPrompt {
    pub login_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Groups and posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Request to create a group (administrators only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

/// A post as shown in feeds and on its own page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub text: String,
    /// First characters of the text, used wherever a post is named.
    pub label: String,
    pub pub_date: DateTime<Utc>,
    pub author: AuthorResponse,
    pub group: Option<GroupResponse>,
}

/// Body of a post form submission.
///
/// Missing keys deserialize to an empty form and `group` is taken as any
/// JSON value, so that validation, not the JSON extractor, reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub group: Option<serde_json::Value>,
}

impl PostFormRequest {
    /// The submitted group as raw text; `null` and a missing key are `None`.
    pub fn group_input(&self) -> Option<String> {
        match self.group.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(raw) => Some(raw.clone()),
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Page contexts
// ---------------------------------------------------------------------------

/// One page of a listing with its navigation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageObj<T> {
    pub object_list: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    /// Total number of objects across all pages.
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexContext {
    pub page_obj: PageObj<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupListContext {
    pub group: GroupResponse,
    pub page_obj: PageObj<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileContext {
    pub author: AuthorResponse,
    pub posts_count: u64,
    pub page_obj: PageObj<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailContext {
    pub post: PostResponse,
    pub posts_count: u64,
}

/// A selectable option of a choice field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceResponse {
    pub value: Uuid,
    pub label: String,
}

/// One rendered form field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormFieldResponse {
    pub name: String,
    pub label: String,
    pub help_text: String,
    pub required: bool,
    pub widget: String,
    pub value: serde_json::Value,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<ChoiceResponse>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub fields: Vec<FormFieldResponse>,
    pub is_valid: bool,
}

/// Context of the post editor, shared by the create and edit pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormContext {
    pub form: FormResponse,
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_form_request_defaults_missing_fields() {
        let form: PostFormRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(form.text, "");
        assert_eq!(form.group_input(), None);

        let form: PostFormRequest = serde_json::from_str(r#"{"text": "hi", "group": null}"#).unwrap();
        assert_eq!(form.text, "hi");
        assert_eq!(form.group_input(), None);
    }

    #[test]
    fn test_post_form_request_accepts_any_group_value() {
        let form: PostFormRequest =
            serde_json::from_str(r#"{"text": "hi", "group": "not-a-uuid"}"#).unwrap();
        assert_eq!(form.group_input().as_deref(), Some("not-a-uuid"));

        let form: PostFormRequest = serde_json::from_str(r#"{"text": "hi", "group": 7}"#).unwrap();
        assert_eq!(form.group_input().as_deref(), Some("7"));
    }

    #[test]
    fn test_edit_context_includes_post_id_only_when_editing() {
        let form = FormResponse {
            fields: Vec::new(),
            is_valid: true,
        };
        let create = FormContext {
            form: form.clone(),
            is_edit: false,
            post_id: None,
        };
        let value = serde_json::to_value(&create).unwrap();
        assert!(value.get("post_id").is_none());
        assert_eq!(value["is_edit"], false);

        let id = Uuid::new_v4();
        let edit = FormContext {
            form,
            is_edit: true,
            post_id: Some(id),
        };
        let value = serde_json::to_value(&edit).unwrap();
        assert_eq!(value["post_id"], id.to_string());
    }
}
