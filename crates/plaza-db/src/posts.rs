use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Row};
use tracing::warn;

use plaza_types::models::{InteractionCounts, InteractionType, Post};

use crate::models::{PostRow, format_date};
use crate::{Database, Result};

/// Parameterized statements over `post`, plus the read-only interaction counts.
/// Every read skips removed posts.
pub struct PostRepository<'a> {
    db: &'a Database,
}

impl<'a> PostRepository<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn insert(&self, post: &Post) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO post (id, account_id, content, created_at, updated_at, removed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    post.id,
                    post.account_id,
                    post.content,
                    format_date(post.created_at),
                    format_date(post.updated_at),
                    post.removed,
                ],
            )?;
            Ok(())
        })
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Post>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, content, created_at, updated_at, removed
                 FROM post
                 WHERE id = ?1 AND removed = 0",
            )?;

            let row = stmt.query_row([id], map_row).optional()?;

            row.map(Post::try_from).transpose()
        })
    }

    /// Live posts of one account, newest first.
    pub fn find_by_account_id(&self, account_id: &str) -> Result<Vec<Post>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, content, created_at, updated_at, removed
                 FROM post
                 WHERE account_id = ?1 AND removed = 0
                 ORDER BY created_at DESC, rowid DESC",
            )?;

            let rows = stmt
                .query_map([account_id], map_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(Post::try_from).collect()
        })
    }

    pub fn exists_by_id(&self, id: &str) -> Result<bool> {
        self.db.with_conn(|conn| {
            let found = conn
                .query_row("SELECT 1 FROM post WHERE id = ?1 AND removed = 0", [id], |_| Ok(()))
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn exists_by_id_and_account_id(&self, id: &str, account_id: &str) -> Result<bool> {
        self.db.with_conn(|conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM post WHERE id = ?1 AND account_id = ?2 AND removed = 0",
                    [id, account_id],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Returns false when no live post of `account_id` matched.
    pub fn update_content(
        &self,
        id: &str,
        account_id: &str,
        content: &str,
        updated_at: NaiveDate,
    ) -> Result<bool> {
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE post SET content = ?1, updated_at = ?2
                 WHERE id = ?3 AND account_id = ?4 AND removed = 0",
                rusqlite::params![content, format_date(updated_at), id, account_id],
            )?;
            Ok(changed > 0)
        })
    }

    /// Flag the post as removed. One-way: removed posts are never restored.
    pub fn remove(&self, id: &str, account_id: &str) -> Result<bool> {
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE post SET removed = 1 WHERE id = ?1 AND account_id = ?2 AND removed = 0",
                [id, account_id],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn count_interactions(&self, post_id: &str, kind: InteractionType) -> Result<i64> {
        self.db.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM interaction WHERE post_id = ?1 AND type = ?2",
                rusqlite::params![post_id, kind.index()],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    pub fn interaction_counts(&self, post_id: &str) -> Result<InteractionCounts> {
        Ok(InteractionCounts {
            like: self.count_interactions(post_id, InteractionType::Liked)?,
            dislike: self.count_interactions(post_id, InteractionType::Disliked)?,
        })
    }

    /// Interaction counts for every live post of `account_id`, gathered with
    /// one grouped query. Posts without interactions are left out of the map.
    pub fn interaction_counts_for_account(&self, account_id: &str) -> Result<HashMap<String, InteractionCounts>> {
        let rows = self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT i.post_id, i.type, COUNT(*)
                 FROM interaction i
                 JOIN post p ON p.id = i.post_id
                 WHERE p.account_id = ?1 AND p.removed = 0
                 GROUP BY i.post_id, i.type",
            )?;

            let rows = stmt
                .query_map([account_id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })?;

        let mut counts: HashMap<String, InteractionCounts> = HashMap::new();
        for (post_id, kind, count) in rows {
            match InteractionType::from_index(kind) {
                Some(kind) => counts.entry(post_id).or_default().add(kind, count),
                None => warn!("Unknown interaction type {} on post '{}'", kind, post_id),
            }
        }

        Ok(counts)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        account_id: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        removed: row.get(5)?,
    })
}
