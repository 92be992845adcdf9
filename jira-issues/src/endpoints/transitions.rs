//! Workflow transition endpoints.

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use tracing::{debug, info, instrument};

use crate::client::{JiraClient, decode_body, error_for_status};
use crate::models::{JiraTransition, JiraTransitions, TransitionId, TransitionRequest};

impl JiraClient {
  /// Get available transitions for an issue, including their fields
  #[instrument(skip(self), level = "debug")]
  pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>> {
    info!("Fetching transitions for Jira issue {}", issue_key);
    let url = format!("{}/rest/api/2/issue/{}/transitions", self.base_url, issue_key);

    let response = self
      .request(Method::GET, &url)
      .query(&[("expand", "transitions.fields")])
      .send()
      .await
      .context("Failed to fetch Jira transitions")?;

    debug!("Jira API response status: {}", response.status());
    match response.status() {
      status if status.is_success() => {
        let transitions: JiraTransitions = decode_body(response, "Jira transitions").await?;
        debug!("Found {} transitions", transitions.transitions.len());
        Ok(transitions.transitions)
      }
      _ => Err(error_for_status(response, &format!("Issue {issue_key}")).await),
    }
  }

  /// Transition an issue to a new status
  #[instrument(skip(self), level = "debug")]
  pub async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<()> {
    info!("Transitioning Jira issue {} with transition {}", issue_key, transition_id);
    let url = format!("{}/rest/api/2/issue/{}/transitions", self.base_url, issue_key);

    let payload = TransitionRequest {
      transition: TransitionId {
        id: transition_id.to_string(),
      },
    };

    let response = self
      .request(Method::POST, &url)
      .json(&payload)
      .send()
      .await
      .context("Failed to transition Jira issue")?;

    debug!("Jira API response status: {}", response.status());
    match response.status() {
      status if status.is_success() => Ok(()),
      StatusCode::BAD_REQUEST => {
        let error_text = response.text().await.unwrap_or_default();
        Err(anyhow::anyhow!(
          "Invalid transition. The transition may not be available for the current status: {}",
          error_text
        ))
      }
      _ => Err(error_for_status(response, &format!("Issue {issue_key}")).await),
    }
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::JiraClient;
  use crate::models::JiraAuth;

  fn test_client(base_url: &str, api_token: &str) -> JiraClient {
    let auth = JiraAuth {
      username: "test_user".to_string(),
      api_token: api_token.to_string(),
    };
    JiraClient::new(base_url, auth)
  }

  #[tokio::test]
  async fn test_get_transitions() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri(), "test_token");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123/transitions"))
      .and(query_param("expand", "transitions.fields"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "transitions": [
              {
                  "id": "11",
                  "name": "To Do"
              },
              {
                  "id": "21",
                  "name": "In Progress"
              },
              {
                  "id": "31",
                  "name": "Done",
                  "fields": {
                      "resolution": { "required": true }
                  }
              }
          ]
      })))
      .mount(&mock_server)
      .await;

    let transitions = client.get_transitions("TEST-123").await?;
    assert_eq!(transitions.len(), 3);
    assert_eq!(transitions[0].id, "11");
    assert_eq!(transitions[0].name, "To Do");
    assert_eq!(transitions[2].id, "31");
    assert_eq!(transitions[2].name, "Done");
    assert!(transitions[2].fields["resolution"].required);

    Ok(())
  }

  #[tokio::test]
  async fn test_transition_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri(), "test_token");

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/TEST-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .and(body_json(serde_json::json!({
          "transition": {
              "id": "21"
          }
      })))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client.transition_issue("TEST-123", "21").await?;

    Ok(())
  }

  #[tokio::test]
  async fn test_transition_issue_invalid_transition() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri(), "test_token");

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/TEST-123/transitions"))
      .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
          "errorMessages": ["The requested transition is not available for the current status."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let err = client.transition_issue("TEST-123", "invalid").await.unwrap_err().to_string();
    assert!(err.contains("Invalid transition"));
    assert!(err.contains("The requested transition is not available for the current status."));

    Ok(())
  }

  #[tokio::test]
  async fn test_transitions_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri(), "test_token");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/NONEXISTENT-123/transitions"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.get_transitions("NONEXISTENT-123").await;
    assert!(result.unwrap_err().to_string().contains("Issue NONEXISTENT-123 not found"));

    Ok(())
  }

  #[tokio::test]
  async fn test_transitions_unauthorized() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri(), "invalid_token");

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123/transitions"))
      .respond_with(ResponseTemplate::new(401))
      .mount(&mock_server)
      .await;

    let result = client.get_transitions("TEST-123").await;
    assert!(result.unwrap_err().to_string().contains("Authentication failed"));

    Ok(())
  }
}
