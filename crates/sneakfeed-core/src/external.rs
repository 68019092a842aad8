//! Collaborators reached over the network: the object uploader and the
//! link-preview fetcher.
//!
//! Implementations report every failure as [`crate::Error::Upstream`]. The
//! service calls them before any write, so a failed upload never leaves a
//! half-written post behind.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Stores binary content somewhere public and hands back its URL.
pub trait ObjectUploader: Send + Sync {
  /// Upload base64-encoded content; returns the public URL.
  fn upload<'a>(
    &'a self,
    base64_content: &'a str,
  ) -> impl Future<Output = Result<String>> + Send + 'a;
}

/// Open Graph metadata for an external link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMetadata {
  #[serde(rename = "ogTitle", default)]
  pub title:       String,
  #[serde(rename = "ogDescription", default)]
  pub description: String,
  #[serde(default)]
  pub domain:      String,
  #[serde(default)]
  pub full_url:    String,
  #[serde(default)]
  pub image:       String,
}

/// Resolves a URL into [`LinkMetadata`].
pub trait LinkPreviewFetcher: Send + Sync {
  fn fetch_metadata<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<LinkMetadata>> + Send + 'a;
}
