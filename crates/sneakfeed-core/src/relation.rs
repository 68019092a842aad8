//! Membership rows: a row's existence encodes the relation, its absence the
//! negative.
//!
//! At most one [`Like`] exists per `(user_id, post_id)` and at most one
//! [`Follow`] per `(follower_id, followee_id)`. A follow never points at its
//! own follower.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
  pub like_id:    Uuid,
  pub user_id:    Uuid,
  pub post_id:    Uuid,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
  pub follow_id:   Uuid,
  pub follower_id: Uuid,
  pub followee_id: Uuid,
  pub created_at:  DateTime<Utc>,
}

/// Result of flipping a membership relation.
#[derive(Debug, Clone)]
pub enum Toggle<T> {
  /// No row existed; this one was inserted.
  Added(T),
  /// An existing row was deleted.
  Removed,
}

impl<T> Toggle<T> {
  /// Whether the relation holds after the toggle.
  pub fn is_on(&self) -> bool { matches!(self, Self::Added(_)) }
}
