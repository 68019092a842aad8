//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed microsecond
//! precision and a `Z` suffix, so text order equals time order and the feed
//! can sort and compare `created_at` directly. UUIDs are stored as hyphenated
//! lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use sneakfeed_core::{
  comment::{Comment, CommentView},
  post::{AuthorSummary, LinkPreview, Post, PostSummary},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time, truncated to the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub display_name:  String,
  pub profile_image: String,
  pub created_at:    String,
}

impl RawUser {
  pub const COLUMNS: &'static str = "user_id, username, email, password_hash, \
                                     display_name, profile_image, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      display_name:  row.get(4)?,
      profile_image: row.get(5)?,
      created_at:    row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      email:         self.email,
      password_hash: self.password_hash,
      display_name:  self.display_name,
      profile_image: self.profile_image,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `posts` row.
pub struct RawPost {
  pub post_id:        String,
  pub author_id:      String,
  pub content:        String,
  pub created_at:     String,
  pub image_url:      Option<String>,
  pub og_title:       Option<String>,
  pub og_description: Option<String>,
  pub og_link:        Option<String>,
  pub og_image:       Option<String>,
  pub og_domain:      Option<String>,
}

impl RawPost {
  pub const COLUMNS: &'static str = "p.post_id AS post_id, \
                                     p.author_id AS author_id, \
                                     p.content AS content, \
                                     p.created_at AS created_at, \
                                     p.image_url AS image_url, \
                                     p.og_title AS og_title, \
                                     p.og_description AS og_description, \
                                     p.og_link AS og_link, \
                                     p.og_image AS og_image, \
                                     p.og_domain AS og_domain";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:        row.get("post_id")?,
      author_id:      row.get("author_id")?,
      content:        row.get("content")?,
      created_at:     row.get("created_at")?,
      image_url:      row.get("image_url")?,
      og_title:       row.get("og_title")?,
      og_description: row.get("og_description")?,
      og_link:        row.get("og_link")?,
      og_image:       row.get("og_image")?,
      og_domain:      row.get("og_domain")?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:    decode_uuid(&self.post_id)?,
      author_id:  decode_uuid(&self.author_id)?,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      image_url:  self.image_url,
      preview:    LinkPreview {
        title:       self.og_title,
        description: self.og_description,
        link:        self.og_link,
        image:       self.og_image,
        domain:      self.og_domain,
      },
    })
  }
}

/// One row of a compiled feed query: the post, its enrichment columns, and
/// the window total.
pub struct RawPostSummary {
  pub post:           RawPost,
  pub username:       String,
  pub display_name:   String,
  pub profile_image:  String,
  pub total_likes:    i64,
  pub total_comments: i64,
  pub is_liked:       bool,
  pub has_commented:  bool,
  pub total:          i64,
}

impl RawPostSummary {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post:           RawPost::from_row(row)?,
      username:       row.get("username")?,
      display_name:   row.get("display_name")?,
      profile_image:  row.get("profile_image")?,
      total_likes:    row.get("total_likes")?,
      total_comments: row.get("total_comments")?,
      is_liked:       row.get("is_liked")?,
      has_commented:  row.get("has_commented")?,
      total:          row.get("total")?,
    })
  }

  pub fn into_summary(self) -> Result<PostSummary> {
    let post = self.post.into_post()?;
    Ok(PostSummary {
      author:         AuthorSummary {
        user_id:       post.author_id,
        username:      self.username,
        display_name:  self.display_name,
        profile_image: self.profile_image,
      },
      post,
      total_likes:    count(self.total_likes),
      total_comments: count(self.total_comments),
      is_liked:       self.is_liked,
      has_commented:  self.has_commented,
    })
  }
}

/// A `comments` row joined with its author.
pub struct RawCommentView {
  pub comment_id:    String,
  pub post_id:       String,
  pub author_id:     String,
  pub content:       String,
  pub created_at:    String,
  pub username:      String,
  pub display_name:  String,
  pub profile_image: String,
}

impl RawCommentView {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id:    row.get(0)?,
      post_id:       row.get(1)?,
      author_id:     row.get(2)?,
      content:       row.get(3)?,
      created_at:    row.get(4)?,
      username:      row.get(5)?,
      display_name:  row.get(6)?,
      profile_image: row.get(7)?,
    })
  }

  pub fn into_view(self) -> Result<CommentView> {
    let author_id = decode_uuid(&self.author_id)?;
    Ok(CommentView {
      comment: Comment {
        comment_id: decode_uuid(&self.comment_id)?,
        post_id: decode_uuid(&self.post_id)?,
        author_id,
        content: self.content,
        created_at: decode_dt(&self.created_at)?,
      },
      author:  AuthorSummary {
        user_id:       author_id,
        username:      self.username,
        display_name:  self.display_name,
        profile_image: self.profile_image,
      },
    })
  }
}

fn count(n: i64) -> u64 { u64::try_from(n).unwrap_or(0) }
