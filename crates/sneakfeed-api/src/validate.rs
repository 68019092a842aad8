//! Registration input rules.
//!
//! | Field | Accepted |
//! |-------|----------|
//! | username | 5–15 of `[0-9a-z]` |
//! | password | 6–16 of `[a-zA-Z0-9!@#$%^&*]` |
//! | email | `local@domain.tld`; local `[a-zA-Z0-9._-]+`, domain `[a-zA-Z0-9.-]+`, tld 2–4 letters |
//!
//! Callers lower-case usernames and emails before checking them.

use sneakfeed_core::{Error, Result};

const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

pub fn username(s: &str) -> Result<()> {
  let ok = (5..=15).contains(&s.len())
    && s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
  if ok {
    Ok(())
  } else {
    Err(Error::invalid(
      "username must be 5 to 15 lowercase letters or digits",
    ))
  }
}

pub fn password(s: &str) -> Result<()> {
  let ok = (6..=16).contains(&s.len())
    && s
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
  if ok {
    Ok(())
  } else {
    Err(Error::invalid(format!(
      "password must be 6 to 16 letters, digits or any of {PASSWORD_SYMBOLS}"
    )))
  }
}

pub fn email(s: &str) -> Result<()> {
  if is_email(s) {
    Ok(())
  } else {
    Err(Error::invalid(format!("invalid email address {s:?}")))
  }
}

fn is_email(s: &str) -> bool {
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  let Some((host, tld)) = domain.rsplit_once('.') else {
    return false;
  };

  let local_ok = !local.is_empty()
    && local
      .bytes()
      .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
  let host_ok = !host.is_empty()
    && host
      .bytes()
      .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-'));
  let tld_ok =
    (2..=4).contains(&tld.len()) && tld.bytes().all(|b| b.is_ascii_alphabetic());

  local_ok && host_ok && tld_ok
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn usernames() {
    assert!(username("alice01").is_ok());
    assert!(username("abcde").is_ok());
    assert!(username("abcd").is_err());
    assert!(username("a23456789012345x").is_err());
    assert!(username("Alice01").is_err());
    assert!(username("alice_01").is_err());
  }

  #[test]
  fn passwords() {
    assert!(password("hunter2!").is_ok());
    assert!(password("Ab1!@#$%^&*").is_ok());
    assert!(password("short").is_err());
    assert!(password("seventeen-chars!!").is_err());
    assert!(password("has space").is_err());
  }

  #[test]
  fn emails() {
    assert!(email("alice@example.com").is_ok());
    assert!(email("a.b_c-d@mail.example.io").is_ok());
    assert!(email("alice@example").is_err());
    assert!(email("alice@example.c").is_err());
    assert!(email("alice@example.museum").is_err());
    assert!(email("@example.com").is_err());
    assert!(email("alice@.com").is_err());
    assert!(email("al ice@example.com").is_err());
    assert!(email("alice@example.c0m").is_err());
    assert!(email("alice@ex@ample.com").is_err());
  }
}
