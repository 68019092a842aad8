//! SQL schema for the Sneakfeed SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    display_name  TEXT NOT NULL DEFAULT '',
    profile_image TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL
);

-- Posts are never updated or deleted. Like and comment counts are not
-- columns here; they are derived from the membership tables on read.
CREATE TABLE IF NOT EXISTS posts (
    post_id        TEXT PRIMARY KEY,
    author_id      TEXT NOT NULL REFERENCES users(user_id),
    content        TEXT NOT NULL,
    created_at     TEXT NOT NULL,   -- fixed-width RFC 3339; sorts as text
    image_url      TEXT,
    og_title       TEXT,
    og_description TEXT,
    og_link        TEXT,
    og_image       TEXT,
    og_domain      TEXT
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    post_id    TEXT NOT NULL REFERENCES posts(post_id),
    author_id  TEXT NOT NULL REFERENCES users(user_id),
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS likes (
    like_id    TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    post_id    TEXT NOT NULL REFERENCES posts(post_id),
    created_at TEXT NOT NULL,
    UNIQUE (user_id, post_id)
);

CREATE TABLE IF NOT EXISTS follows (
    follow_id   TEXT PRIMARY KEY,
    follower_id TEXT NOT NULL REFERENCES users(user_id),
    followee_id TEXT NOT NULL REFERENCES users(user_id),
    created_at  TEXT NOT NULL,
    UNIQUE (follower_id, followee_id),
    CHECK  (follower_id != followee_id)
);

CREATE INDEX IF NOT EXISTS posts_created_idx  ON posts(created_at);
CREATE INDEX IF NOT EXISTS posts_author_idx   ON posts(author_id);
CREATE INDEX IF NOT EXISTS comments_post_idx  ON comments(post_id);
CREATE INDEX IF NOT EXISTS likes_post_idx     ON likes(post_id);
CREATE INDEX IF NOT EXISTS follows_followee_idx ON follows(followee_id);

PRAGMA user_version = 1;
";
