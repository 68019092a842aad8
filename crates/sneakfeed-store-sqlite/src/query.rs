//! Compiles a [`FeedPlan`] into a single SQL statement.
//!
//! Each [`Stage`] contributes its own fragment (an ORDER BY, a WHERE
//! condition, a block of enrichment columns, a LIMIT) to a
//! [`SelectBuilder`]. Enrichment stages that are absent from a plan are
//! filled with neutral defaults so the row shape never changes.
//!
//! The total is a `COUNT(*) OVER ()` window column: it is evaluated over the
//! filtered set before LIMIT, in the same statement as the page.

use rusqlite::types::Value;
use sneakfeed_core::feed::{FeedPlan, Scope, Stage};

use crate::encode::{RawPost, encode_dt, encode_uuid};

const LIKE_COLUMNS: &str = "\
(SELECT COUNT(*) FROM likes l WHERE l.post_id = p.post_id) AS total_likes,
EXISTS (SELECT 1 FROM likes l
        WHERE l.post_id = p.post_id AND l.user_id = :viewer) AS is_liked";

const NO_LIKE_COLUMNS: &str = "0 AS total_likes, 0 AS is_liked";

const COMMENT_COLUMNS: &str = "\
(SELECT COUNT(*) FROM comments c WHERE c.post_id = p.post_id) AS total_comments,
EXISTS (SELECT 1 FROM comments c
        WHERE c.post_id = p.post_id AND c.author_id = :viewer) AS has_commented";

const NO_COMMENT_COLUMNS: &str = "0 AS total_comments, 0 AS has_commented";

const AUTHOR_COLUMNS: &str = "\
COALESCE(u.username, '')      AS username,
COALESCE(u.display_name, '')  AS display_name,
COALESCE(u.profile_image, '') AS profile_image";

const NO_AUTHOR_COLUMNS: &str =
  "'' AS username, '' AS display_name, '' AS profile_image";

const AUTHOR_JOIN: &str = "LEFT JOIN users u ON u.user_id = p.author_id";

const FOLLOWING_FILTER: &str = "\
(p.author_id = :scope_user
 OR p.author_id IN (SELECT f.followee_id FROM follows f
                    WHERE f.follower_id = :scope_user))";

const AUTHOR_HANDLE_FILTER: &str =
  "p.author_id IN (SELECT a.user_id FROM users a WHERE a.username = :author)";

// ─── Builder ─────────────────────────────────────────────────────────────────

/// The SQL text and named parameters of a compiled plan.
#[derive(Debug)]
pub struct CompiledQuery {
  pub sql:    String,
  pub params: Vec<(&'static str, Value)>,
}

#[derive(Debug, Default)]
struct SelectBuilder {
  order:    Option<&'static str>,
  filters:  Vec<&'static str>,
  likes:    bool,
  comments: bool,
  author:   bool,
  limit:    Option<i64>,
  params:   Vec<(&'static str, Value)>,
}

impl SelectBuilder {
  /// Bind a named parameter once; later binds of the same name are ignored.
  fn bind(&mut self, name: &'static str, value: Value) {
    if !self.params.iter().any(|(n, _)| *n == name) {
      self.params.push((name, value));
    }
  }

  fn apply(&mut self, stage: &Stage, plan: &FeedPlan) {
    let viewer = || Value::Text(encode_uuid(plan.viewer()));
    match stage {
      Stage::Sort => self.order = Some("p.created_at DESC"),
      Stage::Cursor(cursor) => {
        self.filters.push("p.created_at <= :cursor");
        self.bind(":cursor", Value::Text(encode_dt(cursor.boundary())));
      }
      Stage::Scope(Scope::ViewerAndFollowees(user)) => {
        self.filters.push(FOLLOWING_FILTER);
        self.bind(":scope_user", Value::Text(encode_uuid(*user)));
      }
      Stage::Scope(Scope::AuthorHandle(handle)) => {
        self.filters.push(AUTHOR_HANDLE_FILTER);
        self.bind(":author", Value::Text(handle.clone()));
      }
      Stage::Scope(Scope::Post(id)) => {
        self.filters.push("p.post_id = :post_id");
        self.bind(":post_id", Value::Text(encode_uuid(*id)));
      }
      Stage::Likes => {
        self.likes = true;
        self.bind(":viewer", viewer());
      }
      Stage::Comments => {
        self.comments = true;
        self.bind(":viewer", viewer());
      }
      Stage::Author => self.author = true,
      Stage::Paginate(limit) => {
        let n = i64::try_from(limit.get()).unwrap_or(i64::MAX);
        self.limit = Some(n);
        self.bind(":limit", Value::Integer(n));
      }
    }
  }

  fn finish(self) -> CompiledQuery {
    let columns = [
      RawPost::COLUMNS,
      if self.author { AUTHOR_COLUMNS } else { NO_AUTHOR_COLUMNS },
      if self.likes { LIKE_COLUMNS } else { NO_LIKE_COLUMNS },
      if self.comments { COMMENT_COLUMNS } else { NO_COMMENT_COLUMNS },
      "COUNT(*) OVER () AS total",
    ]
    .join(",\n");

    let mut sql = format!("SELECT {columns}\nFROM posts p");
    if self.author {
      sql.push('\n');
      sql.push_str(AUTHOR_JOIN);
    }
    if !self.filters.is_empty() {
      sql.push_str("\nWHERE ");
      sql.push_str(&self.filters.join("\n  AND "));
    }
    if let Some(order) = self.order {
      sql.push_str("\nORDER BY ");
      sql.push_str(order);
    }
    if self.limit.is_some() {
      sql.push_str("\nLIMIT :limit");
    }

    CompiledQuery { sql, params: self.params }
  }
}

/// Compile every stage of `plan`, in order, into one statement.
pub fn compile(plan: &FeedPlan) -> CompiledQuery {
  let mut builder = SelectBuilder::default();
  for stage in plan.stages() {
    builder.apply(stage, plan);
  }
  builder.finish()
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use sneakfeed_core::{
    cursor::{Cursor, PageLimit},
    feed::{FeedMode, FeedRequest},
  };
  use uuid::Uuid;

  use super::*;

  fn plan(mode: FeedMode, cursor: Option<Cursor>) -> FeedPlan {
    FeedPlan::for_feed(&FeedRequest {
      viewer: Uuid::new_v4(),
      limit: PageLimit::parse(Some("3"), 100),
      cursor,
      mode,
    })
    .unwrap()
  }

  fn names(q: &CompiledQuery) -> Vec<&'static str> {
    q.params.iter().map(|(n, _)| *n).collect()
  }

  #[test]
  fn global_feed_sorts_and_limits_without_filters() {
    let q = compile(&plan(FeedMode::Global, None));
    assert!(q.sql.contains("ORDER BY p.created_at DESC"));
    assert!(q.sql.ends_with("LIMIT :limit"));
    assert!(!q.sql.contains("WHERE"));
    assert_eq!(names(&q), vec![":viewer", ":limit"]);
    assert!(matches!(q.params[1].1, Value::Integer(3)));
  }

  #[test]
  fn cursor_stage_binds_boundary() {
    let cursor = Cursor::older_than(Utc::now());
    let q = compile(&plan(FeedMode::Global, Some(cursor)));
    assert!(q.sql.contains("p.created_at <= :cursor"));
    let bound = q.params.iter().find(|(n, _)| *n == ":cursor").unwrap();
    assert_eq!(bound.1, Value::Text(encode_dt(cursor.boundary())));
  }

  #[test]
  fn following_scope_adds_follow_subquery() {
    let q = compile(&plan(FeedMode::Following, None));
    assert!(q.sql.contains("WHERE (p.author_id = :scope_user"));
    assert!(q.sql.contains("FROM follows f"));
    assert!(names(&q).contains(&":scope_user"));
  }

  #[test]
  fn author_scope_matches_username() {
    let q = compile(&plan(FeedMode::ByAuthor("bob0001".into()), None));
    assert!(q.sql.contains("a.username = :author"));
    let bound = q.params.iter().find(|(n, _)| *n == ":author").unwrap();
    assert_eq!(bound.1, Value::Text("bob0001".into()));
  }

  #[test]
  fn single_post_has_no_order_or_limit() {
    let id = Uuid::new_v4();
    let q = compile(&FeedPlan::for_post(Uuid::new_v4(), id));
    assert!(q.sql.contains("p.post_id = :post_id"));
    assert!(!q.sql.contains("ORDER BY"));
    assert!(!q.sql.contains("LIMIT"));
    assert!(q.sql.contains(AUTHOR_JOIN));
  }

  #[test]
  fn viewer_is_bound_once() {
    let q = compile(&plan(FeedMode::Global, None));
    let viewer_binds = names(&q).iter().filter(|n| **n == ":viewer").count();
    assert_eq!(viewer_binds, 1);
  }

  #[test]
  fn missing_enrichment_falls_back_to_defaults() {
    let mut builder = SelectBuilder::default();
    let p = plan(FeedMode::Global, None);
    builder.apply(&Stage::Sort, &p);
    let q = builder.finish();
    assert!(q.sql.contains(NO_LIKE_COLUMNS));
    assert!(q.sql.contains(NO_COMMENT_COLUMNS));
    assert!(q.sql.contains(NO_AUTHOR_COLUMNS));
    assert!(!q.sql.contains("LEFT JOIN"));
    assert!(q.params.is_empty());
  }
}
