//! # Jira API Endpoints
//!
//! Organized endpoint implementations for different Jira API resource types:
//! issues, comments and links, search, transitions, and attachments.

pub mod attachments;
pub mod comments;
pub mod issues;
pub mod search;
pub mod transitions;
