//! Route handlers. Every successful body is wrapped as `{"data": …}`.

pub mod posts;
pub mod users;

use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Data<T> {
  pub data: T,
}

pub fn data<T>(data: T) -> Json<Data<T>> { Json(Data { data }) }
