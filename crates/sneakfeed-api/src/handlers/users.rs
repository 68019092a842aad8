//! Handlers for account and profile endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/register` | Body: `{"username","email","password"}`; no auth |
//! | `POST`  | `/login` | Body: `{"username","password"}`; no auth |
//! | `GET`   | `/profile` | The authenticated user |
//! | `PATCH` | `/profile` | Body: `{"displayName"?, "profileImage"?}` (image is base64) |
//! | `GET`   | `/users/{username}` | Profile plus `isFollowed` / `isYourself` |
//! | `POST`  | `/users/{id}/follow` | Toggles; 400 on self-follow |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use sneakfeed_core::{
  external::{LinkPreviewFetcher, ObjectUploader},
  store::SocialStore,
  user::{User, UserView},
};

use super::{Data, data};
use crate::{
  auth::Viewer,
  error::ApiError,
  service::{FollowState, ProfileChanges, Registration, Social},
};

// ─── Register / login ────────────────────────────────────────────────────────

/// `POST /register`
pub async fn register<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Json(body): Json<Registration>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let user = social.create_user(body).await?;
  Ok((StatusCode::CREATED, data(user)))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /login`
pub async fn login<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Data<User>>, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let user = social.login(&body.username, &body.password).await?;
  Ok(data(user))
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// `GET /profile`
pub async fn profile(Viewer(viewer): Viewer) -> Json<Data<User>> { data(viewer) }

/// `PATCH /profile`
pub async fn update_profile<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(viewer): Viewer,
  Json(body): Json<ProfileChanges>,
) -> Result<Json<Data<User>>, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let user = social.update_profile(&viewer, body).await?;
  Ok(data(user))
}

/// `GET /users/{username}`
pub async fn view<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(viewer): Viewer,
  Path(username): Path<String>,
) -> Result<Json<Data<UserView>>, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let view = social.find_user_view(&viewer, &username).await?;
  Ok(data(view))
}

/// `POST /users/{id}/follow`
pub async fn follow<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(viewer): Viewer,
  Path(id): Path<String>,
) -> Result<Json<Data<FollowState>>, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let state = social.toggle_follow(&viewer, &id).await?;
  tracing::info!(follower = %viewer.user_id, followee = %state.user_id, following = state.following, "follow toggled");
  Ok(data(state))
}
