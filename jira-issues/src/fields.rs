//! # Issue Fields
//!
//! Jira issues carry a fixed set of well-known fields plus any number of
//! instance specific custom fields (`customfield_10218`, ...). Both travel in
//! a single flat JSON object. [`JiraIssueFields`] keeps the well-known fields
//! in a typed [`KnownFields`] record and everything else in an ordered
//! key/value map, and converts between that pair and the flat wire object:
//!
//! - flatten: known fields that hold a value, then every dynamic entry at the
//!   same level (a dynamic entry wins on key collision)
//! - split: the flat object is decoded twice, once into [`KnownFields`] and
//!   once into a generic map; every key in the known-field registry is removed
//!   from the map and the rest becomes the dynamic store

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::FieldError;
use crate::models::{
  CustomFields, JiraAttachment, JiraComments, JiraComponent, JiraEpic, JiraFixVersion, JiraIssueLink, JiraIssueStatus,
  JiraIssueType, JiraPriority, JiraProject, JiraResolution, JiraSubtask, JiraUser, null_as_default,
};
use crate::registry::{self, KNOWN_FIELDS};
use crate::time::JiraTime;

/// Ordered map of field key to raw JSON value
pub type FieldMap = Map<String, Value>;

/// Well-known issue fields
///
/// Serde names here must match the keys in [`KNOWN_FIELDS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnownFields {
  #[serde(rename = "issuetype", skip_serializing_if = "Option::is_none")]
  pub issue_type: Option<JiraIssueType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub project: Option<JiraProject>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub resolution: Option<JiraResolution>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub priority: Option<JiraPriority>,
  #[serde(rename = "resolutiondate", skip_serializing_if = "Option::is_none")]
  pub resolution_date: Option<JiraTime>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created: Option<JiraTime>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated: Option<JiraTime>,
  #[serde(rename = "duedate", skip_serializing_if = "Option::is_none")]
  pub due_date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignee: Option<JiraUser>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reporter: Option<JiraUser>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub creator: Option<JiraUser>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
  pub components: Vec<JiraComponent>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<JiraIssueStatus>,
  #[serde(
    rename = "issuelinks",
    default,
    deserialize_with = "null_as_default",
    skip_serializing_if = "Vec::is_empty"
  )]
  pub issue_links: Vec<JiraIssueLink>,
  #[serde(rename = "comment", skip_serializing_if = "Option::is_none")]
  pub comments: Option<JiraComments>,
  #[serde(
    rename = "fixVersions",
    default,
    deserialize_with = "null_as_default",
    skip_serializing_if = "Vec::is_empty"
  )]
  pub fix_versions: Vec<JiraFixVersion>,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
  pub labels: Vec<String>,
  #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
  pub subtasks: Vec<JiraSubtask>,
  #[serde(
    rename = "attachment",
    default,
    deserialize_with = "null_as_default",
    skip_serializing_if = "Vec::is_empty"
  )]
  pub attachments: Vec<JiraAttachment>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub epic: Option<JiraEpic>,
}

/// Fields of a Jira issue: typed well-known fields plus dynamic fields
///
/// The dynamic store never holds a key that [`registry::is_known`] accepts
/// after a split, but values placed there directly (see
/// [`build_issue`](crate::builder::build_issue)) are allowed to shadow known
/// fields until the next flatten/split cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JiraIssueFields {
  pub known: KnownFields,
  pub unknowns: FieldMap,
}

impl JiraIssueFields {
  /// Merge known and dynamic fields into one flat wire object.
  pub fn flatten(&self) -> Result<FieldMap, FieldError> {
    let mut flat = serde_json::to_value(&self.known)
      .and_then(FieldMap::deserialize)
      .map_err(|source| FieldError::Encode {
        field: "fields".to_string(),
        source,
      })?;
    let known_count = flat.len();

    for (key, value) in &self.unknowns {
      flat.insert(key.clone(), value.clone());
    }

    trace!(known = known_count, dynamic = self.unknowns.len(), "Flattened issue fields");
    Ok(flat)
  }

  /// Split a flat wire object into known and dynamic fields.
  ///
  /// Fails without partial results if either decode fails or a known
  /// timestamp field is malformed.
  pub fn split(raw: &Value) -> Result<Self, FieldError> {
    let mut unknowns = FieldMap::deserialize(raw).map_err(|e| FieldError::decode("issue fields", e))?;
    check_timestamps(&unknowns)?;
    let known = KnownFields::deserialize(raw).map_err(|e| FieldError::decode("issue fields", e))?;

    for field in KNOWN_FIELDS {
      // Only the leading name of a tag is a wire key; a field without one
      // has nothing to match.
      let key = field.key.split(',').next().unwrap_or_default();
      if key.is_empty() {
        continue;
      }
      unknowns.shift_remove(key);
    }

    trace!(dynamic = unknowns.len(), "Split issue fields");
    Ok(Self { known, unknowns })
  }

  /// Decode issue fields from JSON text.
  pub fn from_json(text: &str) -> Result<Self, FieldError> {
    let raw: Value = serde_json::from_str(text).map_err(|e| FieldError::decode("issue fields", e))?;
    Self::split(&raw)
  }

  /// Custom fields of this issue flattened to strings
  pub fn custom_fields(&self) -> CustomFields {
    extract_custom_fields(&self.unknowns)
  }
}

impl Serialize for JiraIssueFields {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self
      .flatten()
      .map_err(serde::ser::Error::custom)?
      .serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for JiraIssueFields {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Self::split(&raw).map_err(serde::de::Error::custom)
  }
}

/// Reject malformed timestamps in known date-time fields, naming the field.
fn check_timestamps(raw: &FieldMap) -> Result<(), FieldError> {
  for key in registry::timestamp_keys() {
    if let Some(Value::String(value)) = raw.get(key) {
      JiraTime::parse(value).map_err(|source| FieldError::Parse {
        field: key.to_string(),
        value: value.clone(),
        source,
      })?;
    }
  }
  Ok(())
}

/// Collect every `customfield` entry as a string.
///
/// An object with a `value` member is replaced by that member first.
pub fn extract_custom_fields(fields: &FieldMap) -> CustomFields {
  fields
    .iter()
    .filter(|(key, _)| key.contains("customfield"))
    .map(|(key, value)| {
      let value = match value {
        Value::Object(object) => object.get("value").unwrap_or(value),
        _ => value,
      };
      (key.clone(), stringify(value))
    })
    .collect()
}

fn stringify(value: &Value) -> String {
  match value {
    Value::String(text) => text.clone(),
    Value::Null => String::new(),
    other => other.to_string(),
  }
}
