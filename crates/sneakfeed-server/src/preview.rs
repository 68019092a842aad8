//! [`HttpPreviewFetcher`]: asks the metadata service for a link's Open
//! Graph fields.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use sneakfeed_core::{
  Error, Result,
  external::{LinkMetadata, LinkPreviewFetcher},
};

#[derive(Clone)]
pub struct HttpPreviewFetcher {
  client:   Client,
  endpoint: String,
}

#[derive(Deserialize)]
struct MetadataResponse {
  metadata: LinkMetadata,
}

impl HttpPreviewFetcher {
  pub fn new(endpoint: String) -> anyhow::Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
    Ok(Self { client, endpoint })
  }

  /// `{endpoint}/api/metadata/{link}`, with `link` escaped as one segment.
  fn metadata_url(&self, link: &str) -> Result<Url> {
    let mut url = Url::parse(&self.endpoint).map_err(|e| {
      Error::upstream(format!("bad metadata endpoint {:?}: {e}", self.endpoint))
    })?;
    url
      .path_segments_mut()
      .map_err(|()| Error::upstream("metadata endpoint cannot be a base URL"))?
      .pop_if_empty()
      .extend(["api", "metadata", link]);
    Ok(url)
  }
}

impl LinkPreviewFetcher for HttpPreviewFetcher {
  async fn fetch_metadata<'a>(&'a self, url: &'a str) -> Result<LinkMetadata> {
    let target = self.metadata_url(url)?;
    let resp = self
      .client
      .get(target)
      .send()
      .await
      .map_err(|e| Error::upstream(format!("metadata request failed: {e}")))?;

    if !resp.status().is_success() {
      return Err(Error::upstream(format!("metadata → {}", resp.status())));
    }

    let body: MetadataResponse = resp
      .json()
      .await
      .map_err(|e| Error::upstream(format!("decoding metadata: {e}")))?;
    Ok(body.metadata)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn link_is_escaped_as_one_segment() {
    let f = HttpPreviewFetcher::new("https://meta.example/".into()).unwrap();
    let url = f.metadata_url("https://rust-lang.org/learn?x=1").unwrap();
    assert_eq!(
      url.as_str(),
      "https://meta.example/api/metadata/https:%2F%2Frust-lang.org%2Flearn%3Fx=1"
    );
  }

  #[test]
  fn wrapped_response_decodes() {
    let body: MetadataResponse = serde_json::from_str(
      r#"{"metadata":{"ogTitle":"Rust","ogDescription":"d","domain":"rust-lang.org","fullUrl":"https://rust-lang.org","image":""}}"#,
    )
    .unwrap();
    assert_eq!(body.metadata.title, "Rust");
    assert_eq!(body.metadata.full_url, "https://rust-lang.org");
  }

  #[test]
  fn bad_endpoint_is_upstream() {
    let f = HttpPreviewFetcher::new("not a url".into()).unwrap();
    assert_eq!(
      f.metadata_url("x").unwrap_err().kind(),
      sneakfeed_core::ErrorKind::Upstream
    );
  }
}
