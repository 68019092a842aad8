//! Feed plans.
//!
//! A feed request is turned into an ordered list of [`Stage`]s:
//!
//! ```text
//! sort → cursor → scope → likes → comments → author → paginate
//! ```
//!
//! The [`FeedMode`] only decides which scope stage is inserted; every other
//! stage is shared by all modes and by the single-post lookup. Storage
//! backends compile a plan stage by stage, so each stage can be exercised on
//! its own.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  cursor::{Cursor, PageLimit},
  post::PostSummary,
};

// ─── Mode ────────────────────────────────────────────────────────────────────

/// Which posts a feed request may see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeedMode {
  /// Every post, newest first.
  #[default]
  Global,
  /// Posts by the viewer or by anyone the viewer follows.
  Following,
  /// Posts by the user with this username.
  ByAuthor(String),
}

impl FeedMode {
  /// Select a mode from the raw `filter` and `author` query parameters.
  ///
  /// An `author` parameter wins, even when blank, so that an empty handle is
  /// reported instead of silently widening to the global feed. Handles are
  /// lower-cased, as usernames are stored.
  pub fn from_params(filter: Option<&str>, author: Option<&str>) -> Self {
    if let Some(author) = author {
      return Self::ByAuthor(author.trim().to_lowercase());
    }
    match filter.map(str::trim) {
      Some(f)
        if f.eq_ignore_ascii_case("FOLLOWING")
          || f.eq_ignore_ascii_case("FOLLOWING_POST") =>
      {
        Self::Following
      }
      _ => Self::Global,
    }
  }
}

// ─── Stages ──────────────────────────────────────────────────────────────────

/// Restriction on which authors' posts are eligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
  /// The given user plus everyone they follow.
  ViewerAndFollowees(Uuid),
  /// The author with this username.
  AuthorHandle(String),
  /// Exactly one post.
  Post(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
  /// Newest first by `created_at`.
  Sort,
  /// Drop posts newer than the cursor boundary.
  Cursor(Cursor),
  Scope(Scope),
  /// Like count plus the viewer's like flag.
  Likes,
  /// Comment count plus the viewer's has-commented flag.
  Comments,
  /// Author username, display name and profile image.
  Author,
  Paginate(PageLimit),
}

// ─── Request / plan ──────────────────────────────────────────────────────────

/// A parsed feed request.
#[derive(Debug, Clone)]
pub struct FeedRequest {
  pub viewer: Uuid,
  pub limit:  PageLimit,
  pub cursor: Option<Cursor>,
  pub mode:   FeedMode,
}

/// The composed stage list for one read, plus the viewer the per-post flags
/// are computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPlan {
  viewer: Uuid,
  stages: Vec<Stage>,
}

impl FeedPlan {
  /// Plan a paginated feed read.
  pub fn for_feed(request: &FeedRequest) -> Result<Self> {
    let scope = match &request.mode {
      FeedMode::Global => None,
      FeedMode::Following => Some(Scope::ViewerAndFollowees(request.viewer)),
      FeedMode::ByAuthor(handle) if handle.trim().is_empty() => {
        return Err(Error::invalid("author handle cannot be empty"));
      }
      FeedMode::ByAuthor(handle) => {
        Some(Scope::AuthorHandle(handle.trim().to_lowercase()))
      }
    };

    let mut stages = vec![Stage::Sort];
    stages.extend(request.cursor.map(Stage::Cursor));
    stages.extend(scope.map(Stage::Scope));
    stages.extend(enrichment());
    stages.push(Stage::Paginate(request.limit));

    Ok(Self { viewer: request.viewer, stages })
  }

  /// Plan the single-post lookup: the same enrichment, scoped to one id.
  pub fn for_post(viewer: Uuid, post_id: Uuid) -> Self {
    let mut stages = vec![Stage::Scope(Scope::Post(post_id))];
    stages.extend(enrichment());
    Self { viewer, stages }
  }

  pub fn viewer(&self) -> Uuid { self.viewer }

  pub fn stages(&self) -> &[Stage] { &self.stages }

  /// The page size, if this plan paginates.
  pub fn limit(&self) -> Option<PageLimit> {
    self.stages.iter().find_map(|s| match s {
      Stage::Paginate(limit) => Some(*limit),
      _ => None,
    })
  }
}

fn enrichment() -> [Stage; 3] { [Stage::Likes, Stage::Comments, Stage::Author] }

// ─── Result page ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  /// Posts matching the scope and cursor, including this page.
  pub total:       u64,
  pub limit:       usize,
  /// Pass back as `from` to fetch the next, older page. `None` on the last
  /// page.
  pub next_cursor: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
  pub pagination: Pagination,
  pub posts:      Vec<PostSummary>,
}

impl FeedPage {
  /// Assemble a page. `total` and `posts` must come from the same read.
  pub fn new(posts: Vec<PostSummary>, total: u64, limit: usize) -> Self {
    let next_cursor = if total > posts.len() as u64 {
      posts.last().map(|p| p.post.created_at)
    } else {
      None
    };
    Self { pagination: Pagination { total, limit, next_cursor }, posts }
  }
}
