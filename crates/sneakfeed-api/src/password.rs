//! Argon2 password hashing.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;
use sneakfeed_core::{Error, Result};

/// Hash `password` into an argon2 PHC string, e.g. `$argon2id$v=19$…`.
pub fn hash(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::internal(format!("argon2 error: {e}")))
}

/// Check `password` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let phc = hash("s3cret!").unwrap();
    assert!(phc.starts_with("$argon2"));
    assert!(verify("s3cret!", &phc));
    assert!(!verify("wrong", &phc));
  }

  #[test]
  fn salts_differ() {
    assert_ne!(hash("same").unwrap(), hash("same").unwrap());
  }

  #[test]
  fn garbage_hash_does_not_verify() {
    assert!(!verify("anything", "not-a-phc-string"));
  }
}
