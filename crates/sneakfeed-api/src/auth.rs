//! HTTP Basic-auth extractor.
//!
//! Credentials are checked against the stored argon2 hash of the named user
//! on every request; the resolved [`User`] becomes the viewer.

use std::sync::Arc;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use sneakfeed_core::{
  external::{LinkPreviewFetcher, ObjectUploader},
  store::SocialStore,
  user::User,
};

use crate::{error::ApiError, service::Social};

/// The authenticated user making the request.
#[derive(Debug, Clone)]
pub struct Viewer(pub User);

/// Pull `(username, password)` out of an `Authorization: Basic` header.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::MissingCredentials)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::MissingCredentials)?;

  let decoded = B64
    .decode(encoded.trim())
    .map_err(|_| ApiError::MissingCredentials)?;
  let creds =
    String::from_utf8(decoded).map_err(|_| ApiError::MissingCredentials)?;

  let (username, password) =
    creds.split_once(':').ok_or(ApiError::MissingCredentials)?;
  Ok((username.to_owned(), password.to_owned()))
}

impl<S, U, P> FromRequestParts<Arc<Social<S, U, P>>> for Viewer
where
  S: SocialStore + 'static,
  U: ObjectUploader + 'static,
  P: LinkPreviewFetcher + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    social: &Arc<Social<S, U, P>>,
  ) -> Result<Self, Self::Rejection> {
    let (username, password) = basic_credentials(&parts.headers)?;
    let user = social.login(&username, &password).await?;
    Ok(Viewer(user))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn decodes_basic_header() {
    let value = format!("Basic {}", B64.encode("alice01:pa:ss"));
    let (user, pass) = basic_credentials(&headers(&value)).unwrap();
    assert_eq!(user, "alice01");
    assert_eq!(pass, "pa:ss");
  }

  #[test]
  fn rejects_missing_header() {
    assert!(matches!(
      basic_credentials(&HeaderMap::new()),
      Err(ApiError::MissingCredentials)
    ));
  }

  #[test]
  fn rejects_other_schemes_and_bad_base64() {
    assert!(basic_credentials(&headers("Bearer abc")).is_err());
    assert!(basic_credentials(&headers("Basic !!!not-base64!!!")).is_err());
    let no_colon = format!("Basic {}", B64.encode("alice01"));
    assert!(basic_credentials(&headers(&no_colon)).is_err());
  }
}
