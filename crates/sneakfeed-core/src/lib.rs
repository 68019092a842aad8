//! Core types and trait definitions for the Sneakfeed social backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::SocialStore`]; the service layer and
//! the HTTP surface depend only on the abstractions defined here.

pub mod comment;
pub mod cursor;
pub mod error;
pub mod external;
pub mod feed;
pub mod post;
pub mod relation;
pub mod store;
pub mod user;

pub use error::{Error, ErrorKind, Result};
