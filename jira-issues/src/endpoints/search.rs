//! JQL search endpoint.

use anyhow::{Context, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::client::{JiraClient, decode_body, error_for_status};
use crate::models::{SearchOptions, SearchResult};

impl JiraClient {
  /// Search issues with JQL.
  ///
  /// Without `options` the server's default paging applies.
  #[instrument(skip(self), level = "debug")]
  pub async fn search(&self, jql: &str, options: Option<SearchOptions>) -> Result<SearchResult> {
    info!("Searching Jira issues");
    let url = format!("{}/rest/api/2/search", self.base_url);

    let mut request = self.request(Method::GET, &url).query(&[("jql", jql)]);
    if let Some(options) = options {
      request = request.query(&[("startAt", options.start_at), ("maxResults", options.max_results)]);
    }

    let response = request.send().await.context("Failed to search Jira issues")?;

    debug!("Jira API response status: {}", response.status());
    match response.status() {
      status if status.is_success() => {
        let value: Value = decode_body(response, "Jira search result").await?;
        let result = SearchResult::from_value(value)?;
        debug!("Search returned {} of {} issues", result.issues.len(), result.total);
        Ok(result)
      }
      _ => Err(error_for_status(response, "Search").await),
    }
  }
}
