//! # Attachment Endpoints
//!
//! Upload and download of issue attachments. Both directions stream through a
//! caller-supplied reader or writer.

use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

use crate::client::{JiraClient, decode_body, error_for_status};
use crate::models::JiraAttachment;

impl JiraClient {
  /// Attach the contents of `reader` to an issue as `file_name`.
  ///
  /// The reader is consumed to the end before the upload starts.
  #[instrument(skip(self, reader), level = "debug")]
  pub async fn post_attachment<R>(&self, issue_key: &str, mut reader: R, file_name: &str) -> Result<Vec<JiraAttachment>>
  where
    R: AsyncRead + Unpin,
  {
    info!("Attaching {} to Jira issue {}", file_name, issue_key);
    let url = format!("{}/rest/api/2/issue/{}/attachments", self.base_url, issue_key);

    let mut content = Vec::new();
    reader
      .read_to_end(&mut content)
      .await
      .with_context(|| format!("Failed to read attachment {file_name}"))?;
    drop(reader);
    debug!("Read {} bytes for attachment {}", content.len(), file_name);

    let form = Form::new().part("file", Part::bytes(content).file_name(file_name.to_string()));

    let response = self
      .request(Method::POST, &url)
      .header("X-Atlassian-Token", "no-check")
      .multipart(form)
      .send()
      .await
      .context("Failed to upload Jira attachment")?;

    debug!("Jira API response status: {}", response.status());
    match response.status() {
      status if status.is_success() => decode_body(response, "Jira attachments").await,
      _ => Err(error_for_status(response, &format!("Issue {issue_key}")).await),
    }
  }

  /// Stream an attachment's content into `writer`, returning the bytes written
  #[instrument(skip(self, writer), level = "debug")]
  pub async fn download_attachment<W>(&self, attachment_id: &str, writer: &mut W) -> Result<u64>
  where
    W: AsyncWrite + Unpin,
  {
    info!("Downloading Jira attachment {}", attachment_id);
    let url = format!("{}/secure/attachment/{}/", self.base_url, attachment_id);

    let mut response = self
      .request(Method::GET, &url)
      .send()
      .await
      .context("Failed to download Jira attachment")?;

    debug!("Jira API response status: {}", response.status());
    if !response.status().is_success() {
      return Err(error_for_status(response, &format!("Attachment {attachment_id}")).await);
    }

    let mut written = 0u64;
    while let Some(chunk) = response
      .chunk()
      .await
      .context("Failed to read Jira attachment body")?
    {
      writer
        .write_all(&chunk)
        .await
        .context("Failed to write Jira attachment")?;
      written += chunk.len() as u64;
    }
    writer.flush().await.context("Failed to write Jira attachment")?;

    debug!("Downloaded {} bytes", written);
    Ok(written)
  }
}

#[cfg(test)]
mod tests {
  use std::io;
  use std::pin::Pin;
  use std::task::{Context, Poll};

  use serde_json::json;
  use tokio::io::{AsyncRead, ReadBuf};
  use wiremock::matchers::{body_string_contains, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::create_jira_client;

  struct BrokenReader;

  impl AsyncRead for BrokenReader {
    fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
      Poll::Ready(Err(io::Error::other("disk went away")))
    }
  }

  #[tokio::test]
  async fn test_post_attachment() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token");

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/PROJ-42/attachments"))
      .and(header("X-Atlassian-Token", "no-check"))
      .and(body_string_contains("name=\"file\"; filename=\"crash.log\""))
      .and(body_string_contains("panic at login"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
          "id": "7001",
          "filename": "crash.log",
          "size": 14,
          "mimeType": "text/plain",
          "content": "https://jira.example.com/secure/attachment/7001/crash.log"
      }])))
      .expect(1)
      .mount(&mock_server)
      .await;

    let attachments = client
      .post_attachment("PROJ-42", &b"panic at login"[..], "crash.log")
      .await?;

    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].id.as_deref(), Some("7001"));
    assert_eq!(attachments[0].size, Some(14));
    assert_eq!(attachments[0].mime_type.as_deref(), Some("text/plain"));

    Ok(())
  }

  #[tokio::test]
  async fn test_post_attachment_read_failure() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token");

    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200))
      .expect(0)
      .mount(&mock_server)
      .await;

    let err = client
      .post_attachment("PROJ-42", BrokenReader, "crash.log")
      .await
      .unwrap_err();
    assert!(err.to_string().contains("Failed to read attachment crash.log"));

    Ok(())
  }

  #[tokio::test]
  async fn test_download_attachment() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token");

    let content = vec![0xABu8; 64 * 1024];
    Mock::given(method("GET"))
      .and(path("/secure/attachment/7001/"))
      .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
      .mount(&mock_server)
      .await;

    let mut out = Vec::new();
    let written = client.download_attachment("7001", &mut out).await?;

    assert_eq!(written, content.len() as u64);
    assert_eq!(out, content);

    Ok(())
  }

  #[tokio::test]
  async fn test_download_attachment_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token");

    Mock::given(method("GET"))
      .and(path("/secure/attachment/404/"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&mock_server)
      .await;

    let mut out = Vec::new();
    let err = client.download_attachment("404", &mut out).await.unwrap_err();

    assert!(err.to_string().contains("Attachment 404 not found"));
    assert!(out.is_empty());

    Ok(())
  }
}
