//! Comments: append-only rows referencing a post by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::post::AuthorSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  pub comment_id: Uuid,
  pub post_id:    Uuid,
  pub author_id:  Uuid,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::SocialStore::add_comment`].
#[derive(Debug, Clone)]
pub struct NewComment {
  pub post_id:   Uuid,
  pub author_id: Uuid,
  pub content:   String,
}

/// A comment joined with its author's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
  #[serde(flatten)]
  pub comment: Comment,
  pub author:  AuthorSummary,
}
