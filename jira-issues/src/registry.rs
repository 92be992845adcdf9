//! # Known Field Registry
//!
//! The fixed part of the Jira issue schema: every field key that has a
//! dedicated slot in [`KnownFields`](crate::fields::KnownFields), together
//! with the semantic kind of value it holds. Any key missing from this table
//! is treated as a dynamic field.

/// Semantic kind of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  /// Plain text
  String,
  /// List of plain strings, e.g. labels
  StringArray,
  /// List of component references
  ComponentArray,
  /// Calendar date, e.g. `2024-05-01`
  Date,
  /// Server timestamp, e.g. `2024-05-01T10:00:00.000+0000`
  DateTime,
  /// Reference to a user by name
  User,
  /// Reference to a project
  Project,
  /// Reference to a priority by name
  Priority,
  /// Reference to an issue type by name
  IssueType,
  /// Opaque value with no declared shape
  Any,
}

impl FieldKind {
  /// Map a create-metadata `schema/type` value to a kind.
  ///
  /// `array` is not handled here because its kind depends on the element
  /// type; see [`FieldKind::array_of`].
  pub fn from_schema_type(schema_type: &str) -> Option<Self> {
    match schema_type {
      "string" => Some(Self::String),
      "date" => Some(Self::Date),
      "any" => Some(Self::Any),
      "project" => Some(Self::Project),
      "priority" => Some(Self::Priority),
      "user" => Some(Self::User),
      "issuetype" => Some(Self::IssueType),
      _ => None,
    }
  }

  /// Kind of an `array` field given its `schema/items` value
  pub fn array_of(items: &str) -> Self {
    match items {
      "component" => Self::ComponentArray,
      _ => Self::StringArray,
    }
  }
}

/// A field with a dedicated slot in the issue schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownField {
  /// External key as it appears on the wire
  pub key: &'static str,
  pub kind: FieldKind,
}

const fn known(key: &'static str, kind: FieldKind) -> KnownField {
  KnownField { key, kind }
}

/// Every well-known issue field, in wire order.
///
/// Must stay in sync with the serde names on `KnownFields`.
pub const KNOWN_FIELDS: &[KnownField] = &[
  known("issuetype", FieldKind::IssueType),
  known("project", FieldKind::Project),
  known("resolution", FieldKind::Any),
  known("priority", FieldKind::Priority),
  known("resolutiondate", FieldKind::DateTime),
  known("created", FieldKind::DateTime),
  known("updated", FieldKind::DateTime),
  known("duedate", FieldKind::Date),
  known("assignee", FieldKind::User),
  known("reporter", FieldKind::User),
  known("creator", FieldKind::User),
  known("description", FieldKind::String),
  known("summary", FieldKind::String),
  known("components", FieldKind::ComponentArray),
  known("status", FieldKind::Any),
  known("issuelinks", FieldKind::Any),
  known("comment", FieldKind::Any),
  known("fixVersions", FieldKind::Any),
  known("labels", FieldKind::StringArray),
  known("subtasks", FieldKind::Any),
  known("attachment", FieldKind::Any),
  known("epic", FieldKind::Any),
];

/// Look up the declared kind of a known field
pub fn lookup(key: &str) -> Option<FieldKind> {
  KNOWN_FIELDS.iter().find(|field| field.key == key).map(|field| field.kind)
}

/// Whether `key` has a dedicated slot in the issue schema
pub fn is_known(key: &str) -> bool {
  lookup(key).is_some()
}

/// Keys of known fields holding server timestamps
pub fn timestamp_keys() -> impl Iterator<Item = &'static str> {
  KNOWN_FIELDS
    .iter()
    .filter(|field| field.kind == FieldKind::DateTime)
    .map(|field| field.key)
}
