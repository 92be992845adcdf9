//! Constants for the jira-issues client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// User name that selects "Assignee: Automatic"
pub const ASSIGNEE_AUTOMATIC: &str = "-1";

/// Environment variable storing the Jira host
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Environment variable storing the Jira user name
pub const ENV_JIRA_USERNAME: &str = "JIRA_USERNAME";

/// Environment variable storing the Jira API token
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
