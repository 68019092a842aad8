//! Handlers for posts, comments, likes and link previews.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/posts` | `?limit=&from=<rfc3339>&filter=FOLLOWING&author=<username>` |
//! | `POST` | `/posts` | Body: `{"content", "image"?, "link"?, "preview"?}` |
//! | `GET`  | `/posts/{id}` | 404 if not found or malformed |
//! | `GET`  | `/posts/{id}/comments` | Oldest first |
//! | `POST` | `/posts/{id}/comments` | Body: `{"content"}` |
//! | `POST` | `/posts/{id}/like` | Toggles |
//! | `POST` | `/metadata` | Body: `{"url"}` |
//! | `POST` | `/image/upload` | Body: `{"file"}` (base64); returns the URL |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use sneakfeed_core::{
  comment::CommentView,
  external::{LinkMetadata, LinkPreviewFetcher, ObjectUploader},
  feed::{FeedMode, FeedPage},
  post::PostSummary,
  store::SocialStore,
};

use super::{Data, data};
use crate::{
  auth::Viewer,
  error::ApiError,
  service::{LikeState, PostDraft, Social},
};

// ─── Feed ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
  pub limit:  Option<String>,
  /// Only posts older than this timestamp.
  pub from:   Option<String>,
  pub filter: Option<String>,
  pub author: Option<String>,
}

/// `GET /posts`
pub async fn feed<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(viewer): Viewer,
  Query(params): Query<FeedParams>,
) -> Result<Json<Data<FeedPage>>, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let mode =
    FeedMode::from_params(params.filter.as_deref(), params.author.as_deref());
  let page = social
    .get_feed(&viewer, params.limit.as_deref(), params.from.as_deref(), mode)
    .await?;
  Ok(data(page))
}

// ─── Posts ───────────────────────────────────────────────────────────────────

/// `POST /posts`
pub async fn create<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(viewer): Viewer,
  Json(body): Json<PostDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let post = social.create_post(&viewer, body).await?;
  Ok((StatusCode::CREATED, data(post)))
}

/// `GET /posts/{id}`
pub async fn get_one<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(viewer): Viewer,
  Path(id): Path<String>,
) -> Result<Json<Data<PostSummary>>, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let post = social.get_post_by_id(&viewer, &id).await?;
  Ok(data(post))
}

// ─── Comments ────────────────────────────────────────────────────────────────

/// `GET /posts/{id}/comments`
pub async fn comments<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(_): Viewer,
  Path(id): Path<String>,
) -> Result<Json<Data<Vec<CommentView>>>, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let comments = social.get_comments_for_post(&id).await?;
  Ok(data(comments))
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub content: String,
}

/// `POST /posts/{id}/comments`
pub async fn add_comment<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(viewer): Viewer,
  Path(id): Path<String>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let comment = social.add_comment(&viewer, &id, &body.content).await?;
  Ok((StatusCode::CREATED, data(comment)))
}

// ─── Likes ───────────────────────────────────────────────────────────────────

/// `POST /posts/{id}/like`
pub async fn like<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(viewer): Viewer,
  Path(id): Path<String>,
) -> Result<Json<Data<LikeState>>, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let state = social.toggle_like(&viewer, &id).await?;
  Ok(data(state))
}

// ─── Link preview ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MetadataBody {
  pub url: String,
}

/// `POST /metadata`
pub async fn metadata<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(_): Viewer,
  Json(body): Json<MetadataBody>,
) -> Result<Json<Data<LinkMetadata>>, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let metadata = social.fetch_link_preview(&body.url).await?;
  Ok(data(metadata))
}

// ─── Image upload ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadBody {
  #[serde(default)]
  pub file: String,
}

/// `POST /image/upload`
pub async fn upload_image<S, U, P>(
  State(social): State<Arc<Social<S, U, P>>>,
  Viewer(_): Viewer,
  Json(body): Json<UploadBody>,
) -> Result<Json<Data<String>>, ApiError>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  let url = social.upload_image(&body.file).await?;
  Ok(data(url))
}
