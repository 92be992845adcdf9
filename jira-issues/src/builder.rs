//! # Issue Builder
//!
//! Turns a map of field display names to string values, as a user would type
//! them, into an issue ready to be created. Display names are resolved to
//! internal keys through the issue type's create metadata, and each value is
//! shaped according to the field's declared schema type.
//!
//! Every value lands in the dynamic store of the new issue's fields, keyed by
//! internal key, including keys that also have a known slot. Serializing the
//! issue puts them at the right place on the wire; a later split moves known
//! keys into their typed slots.
//!
//! The builder does not check that required fields are present.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::FieldError;
use crate::fields::JiraIssueFields;
use crate::metadata::{MetaIssueType, MetaProject};
use crate::models::{JiraComponent, JiraIssue, JiraIssueType, JiraPriority, JiraProject, JiraUser};
use crate::registry::FieldKind;

/// Build an issue from display-name/value pairs.
///
/// Fails with [`FieldError::FieldNotFound`] for a name missing from the issue
/// type's metadata and [`FieldError::UnsupportedType`] for a schema type that
/// cannot be built from a string.
#[instrument(skip_all, fields(project = %project.key, issue_type = %issue_type.name), level = "debug")]
pub fn build_issue<I, K, V>(project: &MetaProject, issue_type: &MetaIssueType, fields_config: I) -> Result<JiraIssue, FieldError>
where
  I: IntoIterator<Item = (K, V)>,
  K: AsRef<str>,
  V: AsRef<str>,
{
  let names = issue_type.field_names();
  let mut fields = JiraIssueFields::default();

  for (name, value) in fields_config {
    let (name, value) = (name.as_ref(), value.as_ref());
    let key = names
      .get(name)
      .ok_or_else(|| FieldError::FieldNotFound { name: name.to_string() })?;

    let kind = resolve_kind(issue_type, key, name)?;
    let coerced = coerce(kind, value, project, key)?;
    debug!("Mapped field '{}' to {} as {:?}", name, key, kind);
    fields.unknowns.insert(key.clone(), coerced);
  }

  Ok(JiraIssue {
    fields: Some(fields),
    ..Default::default()
  })
}

fn resolve_kind(issue_type: &MetaIssueType, key: &str, name: &str) -> Result<FieldKind, FieldError> {
  let schema_type = issue_type.schema_type(key)?;
  if schema_type == "array" {
    return Ok(FieldKind::array_of(issue_type.schema_items(key)?));
  }

  FieldKind::from_schema_type(schema_type).ok_or_else(|| FieldError::UnsupportedType {
    kind: schema_type.to_string(),
    field: name.to_string(),
  })
}

fn coerce(kind: FieldKind, value: &str, project: &MetaProject, key: &str) -> Result<Value, FieldError> {
  match kind {
    FieldKind::String | FieldKind::Date | FieldKind::DateTime | FieldKind::Any => Ok(Value::from(value)),
    FieldKind::StringArray => Ok(Value::from(vec![value])),
    FieldKind::ComponentArray => encode(key, vec![JiraComponent::named(value)]),
    FieldKind::Project => encode(
      key,
      JiraProject {
        id: Some(project.id.clone()),
        name: Some(project.name.clone()),
        ..Default::default()
      },
    ),
    FieldKind::Priority => encode(key, JiraPriority::named(value)),
    FieldKind::User => encode(key, JiraUser::named(value)),
    FieldKind::IssueType => encode(key, JiraIssueType::named(value)),
  }
}

fn encode<T: Serialize>(key: &str, value: T) -> Result<Value, FieldError> {
  serde_json::to_value(value).map_err(|source| FieldError::Encode {
    field: key.to_string(),
    source,
  })
}
