//! Jira server timestamps.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Format used when a timestamp is built from a `DateTime`, e.g. `2024-03-01T09:15:00.000+0000`
pub const JIRA_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Accepted on input: any number of fractional digits (or none), offset with or without a colon.
const PARSE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

/// A timestamp as reported by the Jira server
///
/// The text received from the server is kept and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JiraTime {
  value: DateTime<FixedOffset>,
  raw: String,
}

impl JiraTime {
  /// Parse a server timestamp such as `2024-03-01T09:15:00.000+0000`
  pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
    let mut result = DateTime::parse_from_str(raw, PARSE_FORMATS[0]);
    if result.is_err() {
      result = DateTime::parse_from_str(raw, PARSE_FORMATS[1]);
    }
    result.map(|value| Self {
      value,
      raw: raw.to_string(),
    })
  }

  pub const fn as_datetime(&self) -> &DateTime<FixedOffset> {
    &self.value
  }

  /// The timestamp exactly as it appears on the wire
  pub fn as_str(&self) -> &str {
    &self.raw
  }
}

impl From<DateTime<FixedOffset>> for JiraTime {
  fn from(value: DateTime<FixedOffset>) -> Self {
    Self {
      raw: value.format(JIRA_TIME_FORMAT).to_string(),
      value,
    }
  }
}

impl fmt::Display for JiraTime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.raw)
  }
}

impl Serialize for JiraTime {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.raw)
  }
}

impl<'de> Deserialize<'de> for JiraTime {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Self::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
  }
}
