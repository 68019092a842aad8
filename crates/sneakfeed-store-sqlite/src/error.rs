//! Error type for `sneakfeed-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("username already taken: {0}")]
  UsernameTaken(String),

  #[error("email already taken: {0}")]
  EmailTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for sneakfeed_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::UsernameTaken(_) => Self::Conflict("username already taken".into()),
      Error::EmailTaken(_) => Self::Conflict("email already taken".into()),
      other => Self::internal(other),
    }
  }
}
