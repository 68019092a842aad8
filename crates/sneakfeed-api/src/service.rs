//! [`Social`]: every operation the HTTP layer exposes, written against the
//! store and collaborator traits only.
//!
//! Identifiers arrive as raw strings so that each operation decides how a
//! malformed one is reported: a bad post id is `NotFound`, a bad user id on
//! follow is `InvalidArgument`.

use serde::{Deserialize, Serialize};
use sneakfeed_core::{
  Error, Result,
  comment::{Comment, CommentView, NewComment},
  cursor::{Cursor, MAX_PAGE_SIZE, PageLimit},
  external::{LinkMetadata, LinkPreviewFetcher, ObjectUploader},
  feed::{FeedMode, FeedPage, FeedPlan, FeedRequest},
  post::{LinkPreview, NewPost, Post, PostSummary},
  store::SocialStore,
  user::{NewUser, ProfileUpdate, User, UserView},
};
use uuid::Uuid;

use crate::{password, validate};

// ─── Inputs / outputs ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
  pub username: String,
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
  pub display_name:  Option<String>,
  /// Base64 image content; uploaded before the profile row is touched.
  pub profile_image: Option<String>,
}

/// A post as submitted by its author.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
  pub content: String,
  /// Base64 image content.
  #[serde(default)]
  pub image:   Option<String>,
  /// A bare link; its preview is fetched when `preview` is absent.
  #[serde(default)]
  pub link:    Option<String>,
  #[serde(default)]
  pub preview: Option<LinkPreview>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
  pub post_id: Uuid,
  pub liked:   bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowState {
  pub user_id:   Uuid,
  pub following: bool,
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct Social<S, U, P> {
  store:         S,
  uploader:      U,
  previews:      P,
  max_page_size: usize,
}

impl<S, U, P> Social<S, U, P>
where
  S: SocialStore,
  U: ObjectUploader,
  P: LinkPreviewFetcher,
{
  pub fn new(store: S, uploader: U, previews: P) -> Self {
    Self { store, uploader, previews, max_page_size: MAX_PAGE_SIZE }
  }

  /// Cap applied to every requested feed page size.
  pub fn with_max_page_size(mut self, max: usize) -> Self {
    self.max_page_size = max.max(1);
    self
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  /// `CreateUser`: validate, hash, insert. A taken username or email is a
  /// `Conflict`.
  pub async fn create_user(&self, input: Registration) -> Result<User> {
    let username = input.username.trim().to_lowercase();
    let email = input.email.trim().to_lowercase();
    validate::username(&username)?;
    validate::email(&email)?;
    validate::password(&input.password)?;

    let password_hash = password::hash(&input.password)?;
    self
      .store
      .create_user(NewUser { username, email, password_hash })
      .await
      .map_err(store_err)
  }

  /// `Login`: an unknown user and a wrong password are indistinguishable.
  pub async fn login(&self, username: &str, pass: &str) -> Result<User> {
    let username = username.trim().to_lowercase();
    let user = self
      .store
      .find_user_by_username(&username)
      .await
      .map_err(store_err)?
      .ok_or(Error::Unauthorized)?;

    if password::verify(pass, &user.password_hash) {
      Ok(user)
    } else {
      Err(Error::Unauthorized)
    }
  }

  /// `UpdateProfile`. Blank fields are ignored; an upload failure aborts
  /// before anything is written.
  pub async fn update_profile(
    &self,
    viewer: &User,
    changes: ProfileChanges,
  ) -> Result<User> {
    let display_name = non_blank(changes.display_name);
    let profile_image = match non_blank(changes.profile_image) {
      Some(content) => Some(self.uploader.upload(&content).await?),
      None => None,
    };

    let update = ProfileUpdate { display_name, profile_image };
    if update.is_empty() {
      return Ok(viewer.clone());
    }

    self
      .store
      .update_profile(viewer.user_id, update)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::not_found("user", viewer.user_id))
  }

  /// `FindUserView`: another user's profile plus the viewer's relation to it.
  pub async fn find_user_view(
    &self,
    viewer: &User,
    username: &str,
  ) -> Result<UserView> {
    let username = username.trim().to_lowercase();
    let user = self
      .store
      .find_user_by_username(&username)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::not_found("user", &username))?;

    let is_yourself = user.user_id == viewer.user_id;
    let is_followed = !is_yourself
      && self
        .store
        .is_following(viewer.user_id, user.user_id)
        .await
        .map_err(store_err)?;

    Ok(UserView { user, is_followed, is_yourself })
  }

  // ── Authoring ─────────────────────────────────────────────────────────────

  /// `CreatePost`. The image upload and the link-preview fetch both run
  /// before the insert; either failing aborts the post.
  pub async fn create_post(&self, viewer: &User, draft: PostDraft) -> Result<Post> {
    let content = draft.content.trim();
    if content.is_empty() {
      return Err(Error::invalid("post content cannot be empty"));
    }

    let image_url = match non_blank(draft.image) {
      Some(content) => Some(self.uploader.upload(&content).await?),
      None => None,
    };

    let preview = match (draft.preview, non_blank(draft.link)) {
      (Some(preview), _) if !preview.is_empty() => preview,
      (_, Some(link)) => {
        let mut preview =
          LinkPreview::from(self.previews.fetch_metadata(&link).await?);
        preview.link.get_or_insert(link);
        preview
      }
      _ => LinkPreview::default(),
    };

    let mut input = NewPost::new(viewer.user_id, content);
    input.image_url = image_url;
    input.preview = preview;
    self.store.create_post(input).await.map_err(store_err)
  }

  /// `AddComment`: the post must exist and the content must be non-blank.
  pub async fn add_comment(
    &self,
    viewer: &User,
    post_id: &str,
    content: &str,
  ) -> Result<Comment> {
    let post_id = self.existing_post(post_id).await?;
    let content = content.trim();
    if content.is_empty() {
      return Err(Error::invalid("comment content cannot be empty"));
    }

    self
      .store
      .add_comment(NewComment {
        post_id,
        author_id: viewer.user_id,
        content: content.to_owned(),
      })
      .await
      .map_err(store_err)
  }

  /// `UploadImage`: push base64 content to the object host and hand back
  /// its public URL.
  pub async fn upload_image(&self, content: &str) -> Result<String> {
    let content = content.trim();
    if content.is_empty() {
      return Err(Error::invalid("cannot upload an empty file"));
    }
    self.uploader.upload(content).await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// `GetFeed`. `limit` and `cursor` are the raw client strings.
  pub async fn get_feed(
    &self,
    viewer: &User,
    limit: Option<&str>,
    cursor: Option<&str>,
    mode: FeedMode,
  ) -> Result<FeedPage> {
    let request = FeedRequest {
      viewer: viewer.user_id,
      limit: PageLimit::parse(limit, self.max_page_size),
      cursor: Cursor::parse(cursor)?,
      mode,
    };
    let plan = FeedPlan::for_feed(&request)?;
    self.store.query_posts(&plan).await.map_err(store_err)
  }

  /// `GetPostByID`: one post with the same enrichment as the feed.
  pub async fn get_post_by_id(
    &self,
    viewer: &User,
    post_id: &str,
  ) -> Result<PostSummary> {
    let id = parse_post_id(post_id)?;
    let plan = FeedPlan::for_post(viewer.user_id, id);
    self
      .store
      .query_posts(&plan)
      .await
      .map_err(store_err)?
      .posts
      .into_iter()
      .next()
      .ok_or_else(|| Error::not_found("post", id))
  }

  /// `GetCommentsForPost`: oldest first, with authors.
  pub async fn get_comments_for_post(
    &self,
    post_id: &str,
  ) -> Result<Vec<CommentView>> {
    let post_id = self.existing_post(post_id).await?;
    self.store.list_comments(post_id).await.map_err(store_err)
  }

  /// `FetchLinkPreview`: proxy to the metadata collaborator.
  pub async fn fetch_link_preview(&self, url: &str) -> Result<LinkMetadata> {
    let url = url.trim();
    if url.is_empty() {
      return Err(Error::invalid("url cannot be empty"));
    }
    self.previews.fetch_metadata(url).await
  }

  // ── Toggles ───────────────────────────────────────────────────────────────

  /// `ToggleLike`. The post must exist.
  pub async fn toggle_like(&self, viewer: &User, post_id: &str) -> Result<LikeState> {
    let post_id = self.existing_post(post_id).await?;
    let toggle = self
      .store
      .toggle_like(viewer.user_id, post_id)
      .await
      .map_err(store_err)?;
    Ok(LikeState { post_id, liked: toggle.is_on() })
  }

  /// `ToggleFollow`. Following yourself is refused before the store is
  /// touched.
  pub async fn toggle_follow(
    &self,
    viewer: &User,
    target_id: &str,
  ) -> Result<FollowState> {
    let target = Uuid::parse_str(target_id.trim())
      .map_err(|_| Error::invalid(format!("invalid user id {target_id:?}")))?;
    if target == viewer.user_id {
      return Err(Error::invalid("cannot follow yourself"));
    }
    self
      .store
      .get_user(target)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::not_found("user", target))?;

    let toggle = self
      .store
      .toggle_follow(viewer.user_id, target)
      .await
      .map_err(store_err)?;
    Ok(FollowState { user_id: target, following: toggle.is_on() })
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn existing_post(&self, raw: &str) -> Result<Uuid> {
    let id = parse_post_id(raw)?;
    self
      .store
      .get_post(id)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::not_found("post", id))?;
    Ok(id)
  }
}

/// Lift a backend error into the core error type.
fn store_err<E: Into<Error>>(e: E) -> Error { e.into() }

fn parse_post_id(raw: &str) -> Result<Uuid> {
  Uuid::parse_str(raw.trim()).map_err(|_| Error::not_found("post", raw))
}

fn non_blank(s: Option<String>) -> Option<String> {
  s.filter(|s| !s.trim().is_empty())
}
