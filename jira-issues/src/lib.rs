//! # Jira Issues
//!
//! Jira REST API client built around a lossless issue field model: the
//! well-known fields of an issue are strongly typed, while every other field
//! (custom fields in particular) is kept in an ordered dynamic store and
//! written back exactly as it was received. Issues can also be assembled from
//! display-name/value pairs using the server's create metadata.

mod builder;
mod client;
mod config;
mod consts;
mod endpoints;
mod error;
mod fields;
mod metadata;
pub mod models;
pub mod registry;
mod time;

pub use builder::build_issue;
// Re-export the client
pub use client::{JiraClient, create_jira_client};
pub use config::{JiraConfig, ensure_url_scheme};
pub use consts::ASSIGNEE_AUTOMATIC;
pub use error::FieldError;
pub use fields::{FieldMap, JiraIssueFields, KnownFields, extract_custom_fields};
pub use metadata::{CreateMetaInfo, MetaIssueType, MetaProject, MetaTree};
// Re-export models
pub use models::{
  CustomFields, JiraAttachment, JiraAuth, JiraComment, JiraIssue, JiraIssueLink, JiraIssueLinkType, JiraIssueStatus,
  JiraTransition, SearchOptions, SearchResult, UpdateIssueRequest,
};
pub use registry::FieldKind;
pub use time::JiraTime;
