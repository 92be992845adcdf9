//! Comment and issue link endpoints.

use anyhow::{Context, Result};
use reqwest::Method;
use tracing::{debug, info, instrument};

use crate::client::{JiraClient, decode_body, error_for_status};
use crate::models::{JiraComment, JiraIssueLink};

impl JiraClient {
  /// Add a comment to an issue
  #[instrument(skip(self, comment), level = "debug")]
  pub async fn add_comment(&self, issue_key: &str, comment: &JiraComment) -> Result<JiraComment> {
    info!("Adding comment to Jira issue {}", issue_key);
    let url = format!("{}/rest/api/2/issue/{}/comment", self.base_url, issue_key);

    let response = self
      .request(Method::POST, &url)
      .json(comment)
      .send()
      .await
      .context("Failed to add Jira comment")?;

    debug!("Jira API response status: {}", response.status());
    match response.status() {
      status if status.is_success() => decode_body(response, "Jira comment").await,
      _ => Err(error_for_status(response, &format!("Issue {issue_key}")).await),
    }
  }

  /// Link two issues
  #[instrument(skip_all, level = "debug")]
  pub async fn add_link(&self, link: &JiraIssueLink) -> Result<()> {
    info!("Linking Jira issues with '{}'", link.link_type.name);
    let url = format!("{}/rest/api/2/issueLink", self.base_url);

    let response = self
      .request(Method::POST, &url)
      .json(link)
      .send()
      .await
      .context("Failed to link Jira issues")?;

    debug!("Jira API response status: {}", response.status());
    match response.status() {
      status if status.is_success() => Ok(()),
      _ => Err(error_for_status(response, "Linked issue").await),
    }
  }
}
