//! User accounts and the profile view other users see.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. Username and email are unique across all users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  pub email:         String,
  /// Argon2 PHC string; never serialised.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub display_name:  String,
  pub profile_image: String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::SocialStore::create_user`]. The password must
/// already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
}

/// Partial profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
  pub display_name:  Option<String>,
  pub profile_image: Option<String>,
}

impl ProfileUpdate {
  pub fn is_empty(&self) -> bool {
    self.display_name.is_none() && self.profile_image.is_none()
  }
}

/// A user's profile as seen by another (or the same) user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
  pub user:        User,
  /// The viewer currently follows this user.
  pub is_followed: bool,
  pub is_yourself: bool,
}
