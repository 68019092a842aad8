//! Server configuration, deserialised from `config.toml` layered under
//! `SNEAKFEED_*` environment variables.

use std::path::PathBuf;

use serde::Deserialize;
use sneakfeed_core::cursor::MAX_PAGE_SIZE;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// Object uploader endpoint (`POST`). Image uploads fail while unset.
  pub upload_endpoint:    String,
  /// Sent as the Basic-auth user on upload requests.
  pub upload_private_key: String,
  /// Base URL of the link metadata service.
  pub metadata_endpoint:  String,
  pub max_page_size:      usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "127.0.0.1".to_string(),
      port:               8080,
      store_path:         PathBuf::from("sneakfeed.db"),
      upload_endpoint:    String::new(),
      upload_private_key: String::new(),
      metadata_endpoint:  String::new(),
      max_page_size:      MAX_PAGE_SIZE,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_keys_take_defaults() {
    let cfg: ServerConfig =
      serde_json::from_str(r#"{ "port": 9000, "max_page_size": 20 }"#).unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.store_path, PathBuf::from("sneakfeed.db"));
    assert_eq!(cfg.max_page_size, 20);
    assert!(cfg.upload_endpoint.is_empty());
  }
}
