//! JSON REST API for Sneakfeed.
//!
//! [`Social`] implements every operation against any
//! [`sneakfeed_core::store::SocialStore`] plus the two network collaborators;
//! [`api_router`] exposes it over axum. Every route except `/register` and
//! `/login` needs HTTP Basic credentials. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let social = Arc::new(Social::new(store, uploader, previews));
//! axum::serve(listener, sneakfeed_api::api_router(social)).await?;
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod password;
pub mod service;
pub mod validate;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use sneakfeed_core::{
  external::{LinkPreviewFetcher, ObjectUploader},
  store::SocialStore,
};

pub use error::ApiError;
pub use service::Social;

use handlers::{posts, users};

/// Build a fully-materialised API router for `social`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, U, P>(social: Arc<Social<S, U, P>>) -> Router<()>
where
  S: SocialStore + 'static,
  U: ObjectUploader + 'static,
  P: LinkPreviewFetcher + 'static,
{
  Router::new()
    // Accounts
    .route("/register", post(users::register::<S, U, P>))
    .route("/login", post(users::login::<S, U, P>))
    .route(
      "/profile",
      get(users::profile).patch(users::update_profile::<S, U, P>),
    )
    .route("/users/{user}", get(users::view::<S, U, P>))
    .route("/users/{user}/follow", post(users::follow::<S, U, P>))
    // Posts
    .route("/posts", get(posts::feed::<S, U, P>).post(posts::create::<S, U, P>))
    .route("/posts/{id}", get(posts::get_one::<S, U, P>))
    .route(
      "/posts/{id}/comments",
      get(posts::comments::<S, U, P>).post(posts::add_comment::<S, U, P>),
    )
    .route("/posts/{id}/like", post(posts::like::<S, U, P>))
    .route("/metadata", post(posts::metadata::<S, U, P>))
    .route("/image/upload", post(posts::upload_image::<S, U, P>))
    .with_state(social)
}
