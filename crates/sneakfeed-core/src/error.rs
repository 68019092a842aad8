//! Error types for `sneakfeed-core`.
//!
//! Every failure surfaced by the core carries one of the [`ErrorKind`]s
//! below. Translating a kind into a transport status is the caller's job.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed identifier, empty required field, or a disallowed
  /// self-reference.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: String },

  /// Username or email already registered.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("invalid credentials")]
  Unauthorized,

  /// A collaborator (uploader, metadata fetcher) failed or answered with a
  /// non-success status.
  #[error("upstream failure: {0}")]
  Upstream(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The category of an [`Error`], independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  InvalidArgument,
  NotFound,
  Conflict,
  Unauthorized,
  Upstream,
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
      Self::NotFound { .. } => ErrorKind::NotFound,
      Self::Conflict(_) => ErrorKind::Conflict,
      Self::Unauthorized => ErrorKind::Unauthorized,
      Self::Upstream(_) => ErrorKind::Upstream,
      Self::Internal(_) => ErrorKind::Internal,
    }
  }

  pub fn invalid(message: impl Into<String>) -> Self {
    Self::InvalidArgument(message.into())
  }

  pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
    Self::NotFound { entity, id: id.to_string() }
  }

  pub fn upstream(message: impl Into<String>) -> Self {
    Self::Upstream(message.into())
  }

  pub fn internal(
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::Internal(source.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
