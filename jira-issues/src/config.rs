//! # Client Configuration
//!
//! Where to find the Jira server and which credentials to use, loaded either
//! from the environment or from a TOML file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::{Position, Url};

use crate::consts::{ENV_JIRA_API_TOKEN, ENV_JIRA_HOST, ENV_JIRA_USERNAME};
use crate::models::JiraAuth;

/// Connection settings for a Jira server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JiraConfig {
  /// Base URL of the server, e.g. `https://company.atlassian.net`
  pub host: String,
  pub username: String,
  pub api_token: String,
}

impl JiraConfig {
  /// Load settings from `JIRA_HOST`, `JIRA_USERNAME` and `JIRA_API_TOKEN`.
  pub fn from_env() -> Result<Self> {
    let host = require_env(ENV_JIRA_HOST)?;
    Ok(Self {
      host: ensure_url_scheme(&host)?,
      username: require_env(ENV_JIRA_USERNAME)?,
      api_token: require_env(ENV_JIRA_API_TOKEN)?,
    })
  }

  /// Load settings from a TOML file with `host`, `username` and `api_token` keys.
  pub fn from_file(path: &Path) -> Result<Self> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read Jira config at {}", path.display()))?;
    let config: Self =
      toml::from_str(&content).with_context(|| format!("Failed to parse Jira config at {}", path.display()))?;

    Ok(Self {
      host: ensure_url_scheme(&config.host)?,
      ..config
    })
  }

  pub fn auth(&self) -> JiraAuth {
    JiraAuth {
      username: self.username.clone(),
      api_token: self.api_token.clone(),
    }
  }
}

fn require_env(name: &str) -> Result<String> {
  std::env::var(name).with_context(|| format!("Jira environment variable '{name}' not set"))
}

/// Ensure a host has a scheme, assuming `https://` when none is given.
///
/// A bare trailing `/` is dropped so paths can be appended directly.
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("Host cannot be empty"));
  }

  let url = match Url::parse(trimmed) {
    Ok(url) if url.has_host() => url,
    _ => Url::parse(&format!("https://{trimmed}"))
      .with_context(|| format!("Failed to parse URL: '{input}'. Ensure it has a valid scheme."))?,
  };

  let mut normalized = url[..Position::BeforePath].to_string();
  if url.path() != "/" {
    normalized.push_str(url.path().trim_end_matches('/'));
  }
  Ok(normalized)
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use jira_test_utils::EnvVarGuard;
  use tempfile::NamedTempFile;

  use super::*;

  #[test]
  fn test_ensure_url_scheme() {
    assert_eq!(
      ensure_url_scheme("company.atlassian.net").unwrap(),
      "https://company.atlassian.net"
    );
    assert_eq!(
      ensure_url_scheme("https://company.atlassian.net/").unwrap(),
      "https://company.atlassian.net"
    );
    assert_eq!(
      ensure_url_scheme("http://localhost:8080/jira/").unwrap(),
      "http://localhost:8080/jira"
    );
    assert_eq!(
      ensure_url_scheme("  jira.example.com:8443 ").unwrap(),
      "https://jira.example.com:8443"
    );
  }

  #[test]
  fn test_ensure_url_scheme_rejects_empty() {
    assert!(ensure_url_scheme("   ").is_err());
  }

  // Env vars are process-wide, so every env case lives in this one test.
  #[test]
  fn test_config_from_env() {
    let host = EnvVarGuard::new(ENV_JIRA_HOST);
    let username = EnvVarGuard::new(ENV_JIRA_USERNAME);
    let token = EnvVarGuard::new(ENV_JIRA_API_TOKEN);
    host.set("company.atlassian.net");
    username.set("alice@example.com");
    token.set("secret");

    let config = JiraConfig::from_env().unwrap();

    assert_eq!(config.host, "https://company.atlassian.net");
    assert_eq!(config.auth().username, "alice@example.com");
    assert_eq!(config.auth().api_token, "secret");

    token.remove();
    let err = JiraConfig::from_env().unwrap_err();
    assert!(err.to_string().contains(ENV_JIRA_API_TOKEN));
  }

  #[test]
  fn test_config_from_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "host = \"jira.example.com/\"")?;
    writeln!(file, "username = \"bob\"")?;
    writeln!(file, "api_token = \"token\"")?;

    let config = JiraConfig::from_file(file.path())?;

    assert_eq!(
      config,
      JiraConfig {
        host: "https://jira.example.com".to_string(),
        username: "bob".to_string(),
        api_token: "token".to_string(),
      }
    );
    Ok(())
  }

  #[test]
  fn test_config_from_file_missing_key() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "host = \"jira.example.com\"")?;

    let err = JiraConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse Jira config"));
    Ok(())
  }
}
