//! # Jira HTTP Client
//!
//! HTTP client for the Jira REST API: authentication, request building, and
//! the status and body handling shared by every endpoint.

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::config::JiraConfig;
use crate::consts::USER_AGENT;
use crate::error::FieldError;
use crate::models::JiraAuth;

/// Represents a Jira API client
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: JiraAuth,
}

impl JiraClient {
  /// Create a new Jira client
  pub fn new(base_url: &str, auth: JiraAuth) -> Self {
    let client = Client::new();
    Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
    }
  }

  /// Create a Jira client from loaded configuration
  pub fn from_config(config: &JiraConfig) -> Self {
    Self::new(&config.host, config.auth())
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Start an authenticated request to `url`
  pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
    trace!("Jira API URL: {} {}", method, url);
    self
      .client
      .request(method, url)
      .header(ACCEPT, "application/json")
      .header(USER_AGENT_HEADER, USER_AGENT)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
  }
}

/// Create a Jira client from credentials
pub fn create_jira_client(base_url: &str, username: &str, api_token: &str) -> JiraClient {
  let auth = JiraAuth {
    username: username.to_string(),
    api_token: api_token.to_string(),
  };

  JiraClient::new(base_url, auth)
}

/// Turn a non-success response into an error describing `subject`
pub(crate) async fn error_for_status(response: Response, subject: &str) -> anyhow::Error {
  let status = response.status();
  match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
      warn!("Authentication failed when accessing Jira API");
      anyhow::anyhow!("Authentication failed. Please check your Jira credentials.")
    }
    StatusCode::NOT_FOUND => anyhow::anyhow!("{} not found", subject),
    StatusCode::BAD_REQUEST => {
      let error_text = response.text().await.unwrap_or_default();
      anyhow::anyhow!("Invalid request for {}: {}", subject, error_text)
    }
    _ => {
      let error_text = response.text().await.unwrap_or_default();
      warn!("Unexpected Jira API error: HTTP {} - {}", status, error_text);
      anyhow::anyhow!("Unexpected error: HTTP {status} - {error_text}")
    }
  }
}

/// Read the full body and decode it, independent of reqwest's JSON support.
///
/// A malformed body yields [`FieldError::Decode`], distinct from transport
/// failures.
pub(crate) async fn decode_body<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
  let body = response.text().await.context("Failed to read response body")?;
  trace!("Decoding {} ({} bytes)", context, body.len());
  let value = serde_json::from_str(&body).map_err(|e| FieldError::decode(context, e))?;
  Ok(value)
}
