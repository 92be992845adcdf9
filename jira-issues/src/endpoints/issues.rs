//! # Jira Issue Endpoints
//!
//! Jira API endpoint implementations for issue operations,
//! including fetching, creating, and updating Jira issues.

use anyhow::{Context, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::client::{JiraClient, decode_body, error_for_status};
use crate::fields::extract_custom_fields;
use crate::models::{CustomFields, JiraIssue, UpdateIssueRequest};

impl JiraClient {
  /// Get a Jira issue by id or key
  #[instrument(skip(self), level = "debug")]
  pub async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue> {
    info!("Fetching Jira issue {}", issue_key);
    let url = format!("{}/rest/api/2/issue/{}", self.base_url, issue_key);

    let response = self
      .request(Method::GET, &url)
      .send()
      .await
      .context("Failed to fetch Jira issue")?;

    debug!("Jira API response status: {}", response.status());
    match response.status() {
      status if status.is_success() => {
        let value: Value = decode_body(response, "Jira issue").await?;
        Ok(JiraIssue::from_value(value)?)
      }
      _ => Err(error_for_status(response, &format!("Issue {issue_key}")).await),
    }
  }

  /// Create an issue or sub-task.
  ///
  /// The response body is decoded on its own; a malformed body surfaces as a
  /// [`FieldError::Decode`](crate::FieldError::Decode) rather than a
  /// transport error.
  #[instrument(skip_all, level = "debug")]
  pub async fn create_issue(&self, issue: &JiraIssue) -> Result<JiraIssue> {
    info!("Creating Jira issue");
    let url = format!("{}/rest/api/2/issue/", self.base_url);

    let response = self
      .request(Method::POST, &url)
      .json(issue)
      .send()
      .await
      .context("Failed to create Jira issue")?;

    debug!("Jira API response status: {}", response.status());
    match response.status() {
      status if status.is_success() => {
        let value: Value = decode_body(response, "created Jira issue").await?;
        let created = JiraIssue::from_value(value)?;
        info!("Created Jira issue {}", created.key.as_deref().unwrap_or("<unknown>"));
        Ok(created)
      }
      _ => Err(error_for_status(response, "Issue create").await),
    }
  }

  /// Edit an issue with field operations
  #[instrument(skip(self, update), level = "debug")]
  pub async fn update_issue(&self, issue_key: &str, update: &UpdateIssueRequest) -> Result<()> {
    info!("Updating Jira issue {}", issue_key);
    let url = format!("{}/rest/api/2/issue/{}", self.base_url, issue_key);

    let response = self
      .request(Method::PUT, &url)
      .json(update)
      .send()
      .await
      .context("Failed to update Jira issue")?;

    debug!("Jira API response status: {}", response.status());
    match response.status() {
      status if status.is_success() => Ok(()),
      _ => Err(error_for_status(response, &format!("Issue {issue_key}")).await),
    }
  }

  /// Get the custom fields of an issue flattened to strings
  #[instrument(skip(self), level = "debug")]
  pub async fn get_custom_fields(&self, issue_key: &str) -> Result<CustomFields> {
    info!("Fetching custom fields of Jira issue {}", issue_key);
    let url = format!("{}/rest/api/2/issue/{}", self.base_url, issue_key);

    let response = self
      .request(Method::GET, &url)
      .send()
      .await
      .context("Failed to fetch Jira issue")?;

    debug!("Jira API response status: {}", response.status());
    match response.status() {
      status if status.is_success() => {
        let issue: Value = decode_body(response, "Jira issue").await?;
        Ok(
          issue
            .get("fields")
            .and_then(Value::as_object)
            .map(extract_custom_fields)
            .unwrap_or_default(),
        )
      }
      _ => Err(error_for_status(response, &format!("Issue {issue_key}")).await),
    }
  }
}
