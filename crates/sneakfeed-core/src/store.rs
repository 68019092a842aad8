//! The `SocialStore` trait.
//!
//! Implemented by storage backends (e.g. `sneakfeed-store-sqlite`). The
//! service layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  comment::{Comment, CommentView, NewComment},
  feed::{FeedPage, FeedPlan},
  post::{NewPost, Post},
  relation::{Follow, Like, Toggle},
  user::{NewUser, ProfileUpdate, User},
};

/// Abstraction over a Sneakfeed storage backend.
///
/// Posts and comments are append-only. Likes and follows are membership
/// rows, flipped by the toggle methods. Counts are never stored; they are
/// derived when a feed plan runs.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SocialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails if the username or the email is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Apply a partial profile update. Returns `None` if the user does not
  /// exist.
  fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Posts and comments ────────────────────────────────────────────────

  /// Persist a post; the id and `created_at` are assigned by the store.
  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Run a feed plan. The page and its total come from one read.
  fn query_posts<'a>(
    &'a self,
    plan: &'a FeedPlan,
  ) -> impl Future<Output = Result<FeedPage, Self::Error>> + Send + 'a;

  fn add_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// All comments on a post, oldest first, joined with their authors.
  /// Rows that cannot be decoded are skipped rather than failing the read.
  fn list_comments(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CommentView>, Self::Error>> + Send + '_;

  // ── Membership toggles ────────────────────────────────────────────────

  /// Flip the like relation for `(user_id, post_id)`. Concurrent calls for
  /// the same pair must serialise: the pair never holds two rows.
  fn toggle_like(
    &self,
    user_id: Uuid,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Toggle<Like>, Self::Error>> + Send + '_;

  /// Flip the follow relation for `(follower_id, followee_id)`, with the
  /// same guarantees as [`SocialStore::toggle_like`].
  fn toggle_follow(
    &self,
    follower_id: Uuid,
    followee_id: Uuid,
  ) -> impl Future<Output = Result<Toggle<Follow>, Self::Error>> + Send + '_;

  fn is_following(
    &self,
    follower_id: Uuid,
    followee_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
