//! [`SqliteStore`]: the SQLite implementation of [`SocialStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, TransactionBehavior};
use sneakfeed_core::{
  comment::{Comment, CommentView, NewComment},
  feed::{FeedPage, FeedPlan},
  post::{NewPost, Post},
  relation::{Follow, Like, Toggle},
  store::SocialStore,
  user::{NewUser, ProfileUpdate, User},
};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawCommentView, RawPost, RawPostSummary, RawUser, encode_dt, encode_uuid,
    now,
  },
  query::{CompiledQuery, compile},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Sneakfeed store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every call
/// runs on the connection's own thread, one at a time; multi-statement
/// sequences additionally run inside an `IMMEDIATE` transaction so they stay
/// atomic against other processes sharing the file.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }

  /// Fetch at most one user matching `column = value`.
  async fn select_user(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql =
          format!("SELECT {} FROM users WHERE {column} = ?1", RawUser::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

/// Delete the membership row for `key` if present, otherwise insert `row`.
/// Returns `true` when a row was inserted.
///
/// Runs in one `IMMEDIATE` transaction: the write lock is taken before the
/// delete, so two toggles for the same key can never both observe "absent".
fn toggle_row(
  conn: &mut rusqlite::Connection,
  delete_sql: &str,
  insert_sql: &str,
  key: [&str; 2],
  row: [&str; 4],
) -> rusqlite::Result<bool> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let removed = tx.execute(delete_sql, rusqlite::params![key[0], key[1]])?;
  if removed == 0 {
    tx.execute(insert_sql, rusqlite::params![row[0], row[1], row[2], row[3]])?;
  }
  tx.commit()?;
  Ok(removed == 0)
}

/// The `users` column named by a UNIQUE constraint failure, if `e` is one.
pub(crate) fn taken_column(e: &rusqlite::Error) -> Option<&'static str> {
  let rusqlite::Error::SqliteFailure(failure, Some(msg)) = e else {
    return None;
  };
  if failure.code != rusqlite::ErrorCode::ConstraintViolation {
    return None;
  }
  if msg.contains("users.username") {
    Some("username")
  } else if msg.contains("users.email") {
    Some("email")
  } else {
    None
  }
}

// ─── SocialStore impl ────────────────────────────────────────────────────────

impl SocialStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:       Uuid::new_v4(),
      username:      input.username,
      email:         input.email,
      password_hash: input.password_hash,
      display_name:  String::new(),
      profile_image: String::new(),
      created_at:    now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let at_str   = encode_dt(user.created_at);
    let username = user.username.clone();
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();

    // The pre-check and the insert share one transaction. A UNIQUE violation
    // on the insert reports the same column the pre-check would have.
    let taken: Option<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let taken: Option<String> = tx
          .query_row(
            "SELECT CASE WHEN username = ?1 THEN 'username' ELSE 'email' END
             FROM users WHERE username = ?1 OR email = ?2
             ORDER BY username = ?1 DESC LIMIT 1",
            rusqlite::params![username, email],
            |r| r.get(0),
          )
          .optional()?;
        if taken.is_some() {
          return Ok(taken);
        }
        let inserted = tx.execute(
          "INSERT INTO users (
             user_id, username, email, password_hash,
             display_name, profile_image, created_at
           ) VALUES (?1, ?2, ?3, ?4, '', '', ?5)",
          rusqlite::params![id_str, username, email, hash, at_str],
        );
        if let Err(e) = inserted {
          return match taken_column(&e) {
            Some(column) => Ok(Some(column.to_owned())),
            None => Err(e.into()),
          };
        }
        tx.commit()?;
        Ok(None)
      })
      .await?;

    match taken.as_deref() {
      Some("username") => Err(Error::UsernameTaken(user.username)),
      Some(_) => Err(Error::EmailTaken(user.email)),
      None => {
        tracing::info!(user_id = %user.user_id, username = %user.username, "registered user");
        Ok(user)
      }
    }
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.select_user("user_id", encode_uuid(id)).await
  }

  async fn find_user_by_username<'a>(&'a self, username: &'a str) -> Result<Option<User>> {
    self.select_user("username", username.to_owned()).await
  }

  async fn find_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>> {
    self.select_user("email", email.to_owned()).await
  }

  async fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users
             SET display_name  = COALESCE(?2, display_name),
                 profile_image = COALESCE(?3, profile_image)
           WHERE user_id = ?1",
          rusqlite::params![id_str, update.display_name, update.profile_image],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_user(id).await
  }

  // ── Posts and comments ────────────────────────────────────────────────────

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let post = Post {
      post_id:    Uuid::new_v4(),
      author_id:  input.author_id,
      content:    input.content,
      created_at: now(),
      image_url:  input.image_url,
      preview:    input.preview,
    };

    let post_id_str   = encode_uuid(post.post_id);
    let author_id_str = encode_uuid(post.author_id);
    let at_str        = encode_dt(post.created_at);
    let content       = post.content.clone();
    let image_url     = post.image_url.clone();
    let preview       = post.preview.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (
             post_id, author_id, content, created_at, image_url,
             og_title, og_description, og_link, og_image, og_domain
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            post_id_str,
            author_id_str,
            content,
            at_str,
            image_url,
            preview.title,
            preview.description,
            preview.link,
            preview.image,
            preview.domain,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::info!(post_id = %post.post_id, author_id = %post.author_id, "created post");
    Ok(post)
  }

  async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM posts p WHERE p.post_id = ?1",
          RawPost::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawPost::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn query_posts<'a>(&'a self, plan: &'a FeedPlan) -> Result<FeedPage> {
    let CompiledQuery { sql, params } = compile(plan);
    tracing::debug!(%sql, "compiled feed query");

    let raws: Vec<RawPostSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let named: Vec<(&str, &dyn rusqlite::ToSql)> = params
          .iter()
          .map(|(name, value)| (*name, value as &dyn rusqlite::ToSql))
          .collect();
        let rows = stmt
          .query_map(named.as_slice(), RawPostSummary::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let total = raws.first().map_or(0, |r| u64::try_from(r.total).unwrap_or(0));
    let posts = raws
      .into_iter()
      .map(RawPostSummary::into_summary)
      .collect::<Result<Vec<_>>>()?;
    let limit = plan.limit().map_or(posts.len(), |l| l.get());

    Ok(FeedPage::new(posts, total, limit))
  }

  async fn add_comment(&self, input: NewComment) -> Result<Comment> {
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      post_id:    input.post_id,
      author_id:  input.author_id,
      content:    input.content,
      created_at: now(),
    };

    let comment_id_str = encode_uuid(comment.comment_id);
    let post_id_str    = encode_uuid(comment.post_id);
    let author_id_str  = encode_uuid(comment.author_id);
    let at_str         = encode_dt(comment.created_at);
    let content        = comment.content.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (comment_id, post_id, author_id, content, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![comment_id_str, post_id_str, author_id_str, content, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentView>> {
    let post_id_str = encode_uuid(post_id);

    let raws: Vec<RawCommentView> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             c.comment_id, c.post_id, c.author_id, c.content, c.created_at,
             COALESCE(u.username, ''),
             COALESCE(u.display_name, ''),
             COALESCE(u.profile_image, '')
           FROM comments c
           LEFT JOIN users u ON u.user_id = c.author_id
           WHERE c.post_id = ?1
           ORDER BY c.created_at ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![post_id_str], RawCommentView::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // A row that fails to decode is dropped, not fatal to the whole read.
    Ok(
      raws
        .into_iter()
        .filter_map(|raw| {
          let id = raw.comment_id.clone();
          raw
            .into_view()
            .inspect_err(|e| {
              tracing::warn!(comment_id = %id, error = %e, "skipping undecodable comment")
            })
            .ok()
        })
        .collect(),
    )
  }

  // ── Membership toggles ────────────────────────────────────────────────────

  async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> Result<Toggle<Like>> {
    let like = Like { like_id: Uuid::new_v4(), user_id, post_id, created_at: now() };

    let like_id_str = encode_uuid(like.like_id);
    let user_id_str = encode_uuid(user_id);
    let post_id_str = encode_uuid(post_id);
    let at_str      = encode_dt(like.created_at);

    let added = self
      .conn
      .call(move |conn| {
        Ok(toggle_row(
          conn,
          "DELETE FROM likes WHERE user_id = ?1 AND post_id = ?2",
          "INSERT INTO likes (like_id, user_id, post_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          [user_id_str.as_str(), post_id_str.as_str()],
          [
            like_id_str.as_str(),
            user_id_str.as_str(),
            post_id_str.as_str(),
            at_str.as_str(),
          ],
        )?)
      })
      .await?;

    tracing::debug!(%user_id, %post_id, liked = added, "toggled like");
    Ok(if added { Toggle::Added(like) } else { Toggle::Removed })
  }

  async fn toggle_follow(
    &self,
    follower_id: Uuid,
    followee_id: Uuid,
  ) -> Result<Toggle<Follow>> {
    let follow = Follow {
      follow_id: Uuid::new_v4(),
      follower_id,
      followee_id,
      created_at: now(),
    };

    let follow_id_str   = encode_uuid(follow.follow_id);
    let follower_id_str = encode_uuid(follower_id);
    let followee_id_str = encode_uuid(followee_id);
    let at_str          = encode_dt(follow.created_at);

    let added = self
      .conn
      .call(move |conn| {
        Ok(toggle_row(
          conn,
          "DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2",
          "INSERT INTO follows (follow_id, follower_id, followee_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          [follower_id_str.as_str(), followee_id_str.as_str()],
          [
            follow_id_str.as_str(),
            follower_id_str.as_str(),
            followee_id_str.as_str(),
            at_str.as_str(),
          ],
        )?)
      })
      .await?;

    tracing::debug!(%follower_id, %followee_id, following = added, "toggled follow");
    Ok(if added { Toggle::Added(follow) } else { Toggle::Removed })
  }

  async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
    let follower_id_str = encode_uuid(follower_id);
    let followee_id_str = encode_uuid(followee_id);

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT 1 FROM follows WHERE follower_id = ?1 AND followee_id = ?2",
                rusqlite::params![follower_id_str, followee_id_str],
                |_| Ok(true),
              )
              .optional()?
              .unwrap_or(false),
          )
        })
        .await?,
    )
  }
}
