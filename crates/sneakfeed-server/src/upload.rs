//! [`HttpUploader`]: pushes base64 content to the image host.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use sneakfeed_core::{Error, Result, external::ObjectUploader};

/// Uploads with a form `POST` of `file` (base64) and `fileName`,
/// authenticated by the private key as the Basic-auth user. The host answers
/// with JSON carrying the public `url`.
#[derive(Clone)]
pub struct HttpUploader {
  client:      Client,
  endpoint:    String,
  private_key: String,
}

#[derive(Deserialize)]
struct UploadResponse {
  url: String,
}

impl HttpUploader {
  pub fn new(endpoint: String, private_key: String) -> anyhow::Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, endpoint, private_key })
  }
}

fn file_name() -> String {
  format!("{}.png", chrono::Utc::now().timestamp_millis())
}

impl ObjectUploader for HttpUploader {
  async fn upload<'a>(&'a self, base64_content: &'a str) -> Result<String> {
    if self.endpoint.is_empty() {
      return Err(Error::upstream("no upload endpoint configured"));
    }

    let name = file_name();
    let resp = self
      .client
      .post(&self.endpoint)
      .basic_auth(&self.private_key, Some(""))
      .form(&[("file", base64_content), ("fileName", name.as_str())])
      .send()
      .await
      .map_err(|e| Error::upstream(format!("upload request failed: {e}")))?;

    if !resp.status().is_success() {
      return Err(Error::upstream(format!("upload → {}", resp.status())));
    }

    let body: UploadResponse = resp
      .json()
      .await
      .map_err(|e| Error::upstream(format!("decoding upload response: {e}")))?;
    tracing::info!(url = %body.url, "uploaded object");
    Ok(body.url)
  }
}
