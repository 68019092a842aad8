//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use sneakfeed_core::ErrorKind;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No usable `Authorization: Basic` header on a protected route.
  #[error("missing or malformed credentials")]
  MissingCredentials,

  #[error(transparent)]
  Core(#[from] sneakfeed_core::Error),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    let kind = match self {
      ApiError::MissingCredentials => return StatusCode::UNAUTHORIZED,
      ApiError::Core(e) => e.kind(),
    };
    match kind {
      ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
      ErrorKind::NotFound => StatusCode::NOT_FOUND,
      ErrorKind::Conflict => StatusCode::CONFLICT,
      ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
      ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
      ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!(error = %self, "request failed");
      "internal server error".to_string()
    } else {
      self.to_string()
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"sneakfeed\""),
      );
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use sneakfeed_core::Error;

  use super::*;

  #[test]
  fn kinds_map_to_statuses() {
    let cases = [
      (Error::invalid("x"), StatusCode::BAD_REQUEST),
      (Error::not_found("post", "x"), StatusCode::NOT_FOUND),
      (Error::Conflict("x".into()), StatusCode::CONFLICT),
      (Error::Unauthorized, StatusCode::UNAUTHORIZED),
      (Error::upstream("x"), StatusCode::BAD_GATEWAY),
      (Error::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).status(), status);
    }
  }

  #[tokio::test]
  async fn internal_details_stay_out_of_the_body() {
    let res = ApiError::from(Error::internal("database error: /var/db/feed.db"))
      .into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
      .await
      .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "internal server error");
    assert!(!String::from_utf8_lossy(&bytes).contains("/var/db"));
  }

  #[tokio::test]
  async fn client_errors_keep_their_message() {
    let res = ApiError::from(Error::invalid("url cannot be empty")).into_response();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
      .await
      .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "invalid argument: url cannot be empty");
  }

  #[test]
  fn unauthorized_carries_challenge() {
    let res = ApiError::MissingCredentials.into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));

    let res = ApiError::from(Error::Unauthorized).into_response();
    assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
  }
}
