//! # Create Metadata
//!
//! Per-project, per-issue-type field metadata as returned by Jira's create
//! metadata resource. Fetching it is left to the caller; these types only
//! decode and query it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::FieldError;
use crate::fields::FieldMap;

/// Nested metadata addressed by path segments, e.g. `["summary", "schema", "type"]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaTree(FieldMap);

impl MetaTree {
  pub const fn new(map: FieldMap) -> Self {
    Self(map)
  }

  /// Value at `path`, or `None` if any segment is missing or not an object
  pub fn get(&self, path: &[&str]) -> Option<&Value> {
    let (first, rest) = path.split_first()?;
    let mut current = self.0.get(*first)?;
    for segment in rest {
      current = current.as_object()?.get(*segment)?;
    }
    Some(current)
  }

  /// String at `path`
  pub fn string_at(&self, path: &[&str]) -> Result<&str, FieldError> {
    self
      .get(path)
      .and_then(Value::as_str)
      .ok_or_else(|| FieldError::MetadataMissing { path: path.join("/") })
  }

  /// Top level entries of the tree
  pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
    self.0.iter()
  }
}

/// Metadata of one issue type within a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaIssueType {
  #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub fields: MetaTree,
}

impl MetaIssueType {
  /// Map of display name to internal field key.
  ///
  /// Fields without a `name` are left out.
  pub fn field_names(&self) -> BTreeMap<String, String> {
    let mut names = BTreeMap::new();
    for (key, definition) in self.fields.entries() {
      match definition.get("name").and_then(Value::as_str) {
        Some(name) => {
          names.insert(name.to_string(), key.clone());
        }
        None => debug!("Field {} has no display name", key),
      }
    }
    names
  }

  /// Declared `schema/type` of a field
  pub fn schema_type(&self, key: &str) -> Result<&str, FieldError> {
    self.fields.string_at(&[key, "schema", "type"])
  }

  /// Declared `schema/items` of an array field
  pub fn schema_items(&self, key: &str) -> Result<&str, FieldError> {
    self.fields.string_at(&[key, "schema", "items"])
  }
}

/// Metadata of a project and the issue types that can be created in it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaProject {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub expand: Option<String>,
  #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
  pub self_link: Option<String>,
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub key: String,
  #[serde(default)]
  pub name: String,
  #[serde(rename = "issuetypes", default)]
  pub issue_types: Vec<MetaIssueType>,
}

impl MetaProject {
  /// Issue type with the given name, compared case-insensitively
  pub fn issue_type(&self, name: &str) -> Option<&MetaIssueType> {
    self
      .issue_types
      .iter()
      .find(|issue_type| issue_type.name.eq_ignore_ascii_case(name))
  }
}

/// Body of the create metadata resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateMetaInfo {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub expand: Option<String>,
  #[serde(default)]
  pub projects: Vec<MetaProject>,
}

impl CreateMetaInfo {
  /// Project with the given key, compared case-insensitively
  pub fn project_with_key(&self, key: &str) -> Option<&MetaProject> {
    self
      .projects
      .iter()
      .find(|project| project.key.eq_ignore_ascii_case(key))
  }

  /// Project with the given name, compared case-insensitively
  pub fn project_with_name(&self, name: &str) -> Option<&MetaProject> {
    self
      .projects
      .iter()
      .find(|project| project.name.eq_ignore_ascii_case(name))
  }
}
