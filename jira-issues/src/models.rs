//! # Jira Records
//!
//! Serde models for the resources exchanged with the Jira REST API. Absent
//! values are omitted from serialized output so that partially populated
//! records can be sent back to the server.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::FieldError;
use crate::fields::JiraIssueFields;

/// Represents Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

/// Custom fields of an issue flattened to strings, keyed by `customfield_*`
pub type CustomFields = BTreeMap<String, String>;

/// Decode `null` the same way as a missing value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Represents a Jira issue
///
/// `id`, `key` and `self` are assigned by the server and are absent on an
/// issue that has not been created yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraIssue {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub expand: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fields: Option<JiraIssueFields>,
}

impl JiraIssue {
  /// Decode an issue, splitting `fields` directly so that a malformed known
  /// field keeps its [`FieldError`] variant instead of becoming a serde message.
  pub fn from_value(mut value: Value) -> Result<Self, FieldError> {
    let raw_fields = value.as_object_mut().and_then(|issue| issue.shift_remove("fields"));
    let mut issue = Self::deserialize(&value).map_err(|e| FieldError::decode("Jira issue", e))?;
    issue.fields = match raw_fields {
      Some(Value::Null) | None => None,
      Some(raw) => Some(JiraIssueFields::split(&raw)?),
    };
    Ok(issue)
  }
}

/// Represents a Jira user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email_address: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avatar_urls: Option<AvatarUrls>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub display_name: Option<String>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub active: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub time_zone: Option<String>,
}

impl JiraUser {
  /// A user reference carrying only a name
  pub fn named(name: &str) -> Self {
    Self {
      name: Some(name.to_string()),
      ..Default::default()
    }
  }
}

/// Avatar images in the sizes Jira serves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarUrls {
  #[serde(rename = "48x48", skip_serializing_if = "Option::is_none")]
  pub large: Option<String>,
  #[serde(rename = "32x32", skip_serializing_if = "Option::is_none")]
  pub medium: Option<String>,
  #[serde(rename = "24x24", skip_serializing_if = "Option::is_none")]
  pub small: Option<String>,
  #[serde(rename = "16x16", skip_serializing_if = "Option::is_none")]
  pub xsmall: Option<String>,
}

/// A component of a project, defined per Jira instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraComponent {
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

impl JiraComponent {
  pub fn named(name: &str) -> Self {
    Self {
      name: Some(name.to_string()),
      ..Default::default()
    }
  }
}

/// Priority of an issue, e.g. "Major" or "Blocker"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraPriority {
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub icon_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
}

impl JiraPriority {
  pub fn named(name: &str) -> Self {
    Self {
      name: Some(name.to_string()),
      ..Default::default()
    }
  }
}

/// Resolution of an issue, e.g. "Fixed" or "Won't Fix"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraResolution {
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

/// Type of an issue, e.g. "Bug" or "Story"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueType {
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub icon_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub subtask: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avatar_id: Option<i64>,
}

impl JiraIssueType {
  pub fn named(name: &str) -> Self {
    Self {
      name: Some(name.to_string()),
      ..Default::default()
    }
  }
}

/// Reference to the project an issue belongs to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraProject {
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

/// Represents a Jira issue status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueStatus {
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub icon_url: Option<String>,
  #[serde(default)]
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status_category: Option<StatusCategory>,
}

/// Category a status belongs to, e.g. "To Do", "In Progress", "Done"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCategory {
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color_name: Option<String>,
}

/// Represents a comment on an issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraComment {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<JiraUser>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub body: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub update_author: Option<JiraUser>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub visibility: Option<CommentVisibility>,
}

impl JiraComment {
  /// A new comment with the given body
  pub fn with_body(body: &str) -> Self {
    Self {
      body: Some(body.to_string()),
      ..Default::default()
    }
  }
}

/// Restricts who can see a comment, e.g. type "role" with value "Administrators"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentVisibility {
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value: Option<String>,
}

/// The `comment` field of an issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraComments {
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
  pub comments: Vec<JiraComment>,
}

/// Represents a file attached to an issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraAttachment {
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filename: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<JiraUser>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub size: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mime_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub thumbnail: Option<String>,
}

/// Epic an issue belongs to
///
/// The `color` value returned by the server is not modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraEpic {
  pub id: i64,
  pub key: String,
  #[serde(rename = "self")]
  pub self_link: String,
  pub name: String,
  pub summary: String,
  pub done: bool,
}

/// A software release in which an issue is fixed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraFixVersion {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub archived: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub project_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub release_date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub released: Option<bool>,
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_release_date: Option<String>,
}

/// A sub-task of a parent issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraSubtask {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub key: String,
  #[serde(rename = "self", default)]
  pub self_link: String,
  #[serde(default)]
  pub fields: JiraIssueFields,
}

/// A link between two issues
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueLink {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(rename = "type")]
  pub link_type: JiraIssueLinkType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub outward_issue: Option<JiraIssue>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub inward_issue: Option<JiraIssue>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comment: Option<JiraComment>,
}

/// Type of a link, e.g. "Duplicate" or "Blocks"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraIssueLinkType {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(default)]
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub inward: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub outward: Option<String>,
}

/// Represents a Jira transition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JiraTransition {
  pub id: String,
  pub name: String,
  /// Fields that can be set during the transition, keyed by field key
  #[serde(default, deserialize_with = "null_as_default")]
  pub fields: BTreeMap<String, TransitionField>,
}

/// Describes one field of a transition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionField {
  #[serde(default)]
  pub required: bool,
}

/// Represents a list of Jira transitions
#[derive(Debug, Deserialize)]
pub struct JiraTransitions {
  pub transitions: Vec<JiraTransition>,
}

/// Represents a transition request payload
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
  pub transition: TransitionId,
}

/// Represents a transition ID for the request
#[derive(Debug, Serialize)]
pub struct TransitionId {
  pub id: String,
}

/// Paging parameters for a JQL search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
  /// Index of the first issue to return, starting at 0
  pub start_at: u32,
  /// Maximum number of issues to return per page
  pub max_results: u32,
}

/// One page of JQL search results
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
  #[serde(default, deserialize_with = "null_as_default")]
  pub issues: Vec<JiraIssue>,
  #[serde(default)]
  pub start_at: u32,
  #[serde(default)]
  pub max_results: u32,
  #[serde(default)]
  pub total: u32,
}

impl SearchResult {
  /// Decode a search page, each issue through [`JiraIssue::from_value`]
  pub fn from_value(mut value: Value) -> Result<Self, FieldError> {
    let raw_issues = value.as_object_mut().and_then(|page| page.shift_remove("issues"));
    let mut result = Self::deserialize(&value).map_err(|e| FieldError::decode("Jira search result", e))?;
    result.issues = match raw_issues {
      Some(Value::Array(issues)) => issues.into_iter().map(JiraIssue::from_value).collect::<Result<_, _>>()?,
      Some(Value::Null) | None => Vec::new(),
      Some(other) => Vec::deserialize(&other).map_err(|e| FieldError::decode("Jira search result", e))?,
    };
    Ok(result)
  }
}

/// Body of an issue edit: `{"update": {field: [{operation: value}]}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateIssueRequest {
  pub update: BTreeMap<String, Vec<BTreeMap<String, Value>>>,
}

impl UpdateIssueRequest {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append an operation such as `add`, `remove` or `set` for `field`
  pub fn operation(mut self, field: &str, operation: &str, value: impl Into<Value>) -> Self {
    let mut op = BTreeMap::new();
    op.insert(operation.to_string(), value.into());
    self.update.entry(field.to_string()).or_default().push(op);
    self
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_jira_auth() {
    let auth = JiraAuth {
      username: "test_user".to_string(),
      api_token: "test_token".to_string(),
    };

    assert_eq!(auth.username, "test_user");
    assert_eq!(auth.api_token, "test_token");
  }

  #[test]
  fn test_jira_issue_deserialization() {
    let json = json!({
        "id": "10000",
        "key": "PROJ-123",
        "self": "https://jira.example.com/rest/api/2/issue/10000",
        "fields": {
            "summary": "Test issue",
            "description": "This is a test issue",
            "status": {
                "name": "In Progress"
            }
        }
    });

    let issue: JiraIssue = serde_json::from_value(json).unwrap();

    assert_eq!(issue.id.as_deref(), Some("10000"));
    assert_eq!(issue.key.as_deref(), Some("PROJ-123"));
    assert_eq!(
      issue.self_link.as_deref(),
      Some("https://jira.example.com/rest/api/2/issue/10000")
    );
    let fields = issue.fields.unwrap();
    assert_eq!(fields.known.summary.as_deref(), Some("Test issue"));
    assert_eq!(fields.known.description.as_deref(), Some("This is a test issue"));
    assert_eq!(fields.known.status.unwrap().name, "In Progress");
    assert!(fields.unknowns.is_empty());
  }

  #[test]
  fn test_new_issue_omits_server_identity() {
    let issue = JiraIssue::default();
    assert_eq!(serde_json::to_value(&issue).unwrap(), json!({}));
  }

  #[test]
  fn test_user_reference_serialization() {
    assert_eq!(
      serde_json::to_value(JiraUser::named("alice")).unwrap(),
      json!({ "name": "alice" })
    );
    assert_eq!(
      serde_json::to_value(JiraUser::named(crate::consts::ASSIGNEE_AUTOMATIC)).unwrap(),
      json!({ "name": "-1" })
    );
  }

  #[test]
  fn test_jira_transitions_deserialization() {
    let json = json!({
        "transitions": [
            {
                "id": "11",
                "name": "To Do"
            },
            {
                "id": "21",
                "name": "In Progress",
                "fields": {
                    "resolution": { "required": true },
                    "comment": { "required": false }
                }
            },
            {
                "id": "31",
                "name": "Done",
                "fields": null
            }
        ]
    });

    let transitions: JiraTransitions = serde_json::from_value(json).unwrap();

    assert_eq!(transitions.transitions.len(), 3);
    assert_eq!(transitions.transitions[0].id, "11");
    assert_eq!(transitions.transitions[0].name, "To Do");
    assert!(transitions.transitions[0].fields.is_empty());
    assert!(transitions.transitions[1].fields["resolution"].required);
    assert!(!transitions.transitions[1].fields["comment"].required);
    assert_eq!(transitions.transitions[2].id, "31");
    assert!(transitions.transitions[2].fields.is_empty());
  }

  #[test]
  fn test_jira_transition_request_serialization() {
    let request = TransitionRequest {
      transition: TransitionId { id: "21".to_string() },
    };

    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(
      json,
      json!({
          "transition": {
              "id": "21"
          }
      })
    );
  }

  #[test]
  fn test_update_issue_request_serialization() {
    let request = UpdateIssueRequest::new()
      .operation("labels", "add", "triaged")
      .operation("labels", "remove", "needs-info")
      .operation("summary", "set", "New summary");

    assert_eq!(
      serde_json::to_value(&request).unwrap(),
      json!({
          "update": {
              "labels": [{ "add": "triaged" }, { "remove": "needs-info" }],
              "summary": [{ "set": "New summary" }]
          }
      })
    );
  }

  #[test]
  fn test_link_type_reference_omits_absent_names() {
    let link_type = JiraIssueLinkType {
      name: "Duplicate".to_string(),
      ..Default::default()
    };
    assert_eq!(serde_json::to_value(&link_type).unwrap(), json!({ "name": "Duplicate" }));

    let decoded: JiraIssueLinkType = serde_json::from_value(json!({
        "id": "10002",
        "name": "Duplicate",
        "inward": "is duplicated by",
        "outward": "duplicates"
    }))
    .unwrap();
    assert_eq!(decoded.inward.as_deref(), Some("is duplicated by"));
    assert_eq!(decoded.outward.as_deref(), Some("duplicates"));
  }

  #[test]
  fn test_issue_from_value_splits_fields() {
    let issue = JiraIssue::from_value(json!({
        "id": "1",
        "key": "PROJ-1",
        "fields": { "summary": "x", "created": "2024-03-01T09:15:00.5+0000", "customfield_1": 1 }
    }))
    .unwrap();

    let fields = issue.fields.unwrap();
    assert_eq!(issue.key.as_deref(), Some("PROJ-1"));
    assert_eq!(fields.known.created.unwrap().as_str(), "2024-03-01T09:15:00.5+0000");
    assert_eq!(fields.unknowns["customfield_1"], json!(1));

    let bare = JiraIssue::from_value(json!({ "id": "2", "fields": null })).unwrap();
    assert!(bare.fields.is_none());
  }

  #[test]
  fn test_issue_from_value_keeps_parse_error() {
    let err = JiraIssue::from_value(json!({ "fields": { "updated": "tomorrow" } })).unwrap_err();
    assert!(matches!(err, FieldError::Parse { ref field, .. } if field == "updated"));

    let err = JiraIssue::from_value(json!("PROJ-1")).unwrap_err();
    assert!(matches!(err, FieldError::Decode { .. }));
  }

  #[test]
  fn test_search_result_deserialization() {
    let json = json!({
        "startAt": 50,
        "maxResults": 25,
        "total": 120,
        "issues": [
            { "id": "1", "key": "PROJ-1", "fields": { "summary": "First" } },
            { "id": "2", "key": "PROJ-2", "fields": { "summary": "Second", "customfield_1": 1 } }
        ]
    });

    let result: SearchResult = serde_json::from_value(json).unwrap();

    assert_eq!(result.start_at, 50);
    assert_eq!(result.max_results, 25);
    assert_eq!(result.total, 120);
    assert_eq!(result.issues.len(), 2);
    assert_eq!(result.issues[1].key.as_deref(), Some("PROJ-2"));
    assert_eq!(result.issues[1].fields.as_ref().unwrap().unknowns["customfield_1"], json!(1));
  }
}
