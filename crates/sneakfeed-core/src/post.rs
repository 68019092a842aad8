//! Posts and their read-time enrichment.
//!
//! A post row is immutable once written. Like and comment counts are never
//! stored on the row; they are derived from the membership tables every time
//! a post is read, so they cannot drift from the rows they count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::external::LinkMetadata;

// ─── Link preview ────────────────────────────────────────────────────────────

/// Open Graph fields captured once, when the post is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPreview {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub link:        Option<String>,
  pub image:       Option<String>,
  pub domain:      Option<String>,
}

impl LinkPreview {
  pub fn is_empty(&self) -> bool {
    self.title.is_none()
      && self.description.is_none()
      && self.link.is_none()
      && self.image.is_none()
      && self.domain.is_none()
  }
}

impl From<LinkMetadata> for LinkPreview {
  fn from(m: LinkMetadata) -> Self {
    fn non_empty(s: String) -> Option<String> {
      if s.is_empty() { None } else { Some(s) }
    }
    Self {
      title:       non_empty(m.title),
      description: non_empty(m.description),
      link:        non_empty(m.full_url),
      image:       non_empty(m.image),
      domain:      non_empty(m.domain),
    }
  }
}

// ─── Post ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  pub post_id:    Uuid,
  pub author_id:  Uuid,
  pub content:    String,
  /// Server-assigned; the feed is ordered on this field.
  pub created_at: DateTime<Utc>,
  pub image_url:  Option<String>,
  pub preview:    LinkPreview,
}

/// Input to [`crate::store::SocialStore::create_post`]. The id and
/// `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPost {
  pub author_id: Uuid,
  pub content:   String,
  pub image_url: Option<String>,
  pub preview:   LinkPreview,
}

impl NewPost {
  pub fn new(author_id: Uuid, content: impl Into<String>) -> Self {
    Self {
      author_id,
      content: content.into(),
      image_url: None,
      preview: LinkPreview::default(),
    }
  }
}

// ─── Enriched read model ─────────────────────────────────────────────────────

/// Author identity joined onto posts and comments at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
  pub user_id:       Uuid,
  pub username:      String,
  pub display_name:  String,
  pub profile_image: String,
}

/// A post as seen by one viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
  #[serde(flatten)]
  pub post:           Post,
  pub author:         AuthorSummary,
  pub total_likes:    u64,
  pub total_comments: u64,
  /// The viewer has a like row on this post.
  pub is_liked:       bool,
  /// The viewer authored at least one comment on this post.
  pub has_commented:  bool,
}
