//! Canned Jira payloads
//!
//! These mirror the shapes returned by the Jira REST API closely enough to
//! exercise decoding, including instance specific `customfield_*` entries.

use serde_json::{Value, json};

/// Fields of a typical bug, mixing well-known and custom fields
pub fn bug_fields() -> Value {
  json!({
    "issuetype": {
      "id": "1",
      "name": "Bug",
      "subtask": false
    },
    "project": {
      "id": "10000",
      "key": "PROJ",
      "name": "Project"
    },
    "priority": {
      "id": "3",
      "name": "Major"
    },
    "created": "2024-03-01T09:15:00.000+0000",
    "updated": "2024-03-02T17:45:30.250+0100",
    "summary": "Login page crashes",
    "description": "Clicking login twice crashes the page",
    "assignee": {
      "name": "alice",
      "displayName": "Alice",
      "active": true
    },
    "components": [
      { "id": "100", "name": "Backend" }
    ],
    "labels": ["regression", "login"],
    "status": {
      "id": "10001",
      "name": "In Progress",
      "statusCategory": {
        "id": 4,
        "key": "indeterminate",
        "name": "In Progress"
      }
    },
    "customfield_10218": "because",
    "customfield_10220": { "value": "Roll back the deploy", "id": "20001" },
    "customfield_10300": 5
  })
}

/// A complete issue wrapping [`bug_fields`]
pub fn bug_issue() -> Value {
  json!({
    "expand": "renderedFields,names,schema",
    "id": "10042",
    "self": "https://jira.example.com/rest/api/2/issue/10042",
    "key": "PROJ-42",
    "fields": bug_fields()
  })
}

/// Create metadata for project `PROJ` with a single `Bug` issue type
pub fn create_meta() -> Value {
  json!({
    "projects": [
      {
        "id": "10000",
        "key": "PROJ",
        "name": "Project",
        "issuetypes": [
          {
            "id": "1",
            "name": "Bug",
            "fields": {
              "summary": {
                "name": "Summary",
                "required": true,
                "schema": { "type": "string", "system": "summary" }
              },
              "project": {
                "name": "Project",
                "required": true,
                "schema": { "type": "project", "system": "project" }
              },
              "issuetype": {
                "name": "Issue Type",
                "required": true,
                "schema": { "type": "issuetype", "system": "issuetype" }
              },
              "priority": {
                "name": "Priority",
                "required": false,
                "schema": { "type": "priority", "system": "priority" }
              },
              "assignee": {
                "name": "Assignee",
                "required": false,
                "schema": { "type": "user", "system": "assignee" }
              },
              "components": {
                "name": "Component/s",
                "required": false,
                "schema": { "type": "array", "items": "component", "system": "components" }
              },
              "labels": {
                "name": "Labels",
                "required": false,
                "schema": { "type": "array", "items": "string", "system": "labels" }
              },
              "duedate": {
                "name": "Due Date",
                "required": false,
                "schema": { "type": "date", "system": "duedate" }
              },
              "customfield_10218": {
                "name": "Justification",
                "required": false,
                "schema": { "type": "any", "custom": "com.example:justification", "customId": 10218 }
              },
              "customfield_10400": {
                "name": "Severity Score",
                "required": false,
                "schema": { "type": "unsupported-kind", "customId": 10400 }
              }
            }
          }
        ]
      }
    ]
  })
}
