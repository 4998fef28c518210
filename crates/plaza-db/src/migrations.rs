use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub const LATEST: i64 = 1;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (accounts, posts, interactions)");
        conn.execute_batch(
            "
            CREATE TABLE account (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL,
                name        TEXT NOT NULL,
                description TEXT NOT NULL,
                email       TEXT NOT NULL,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL,
                deleted     INTEGER NOT NULL DEFAULT 0
            );

            -- Uniqueness only binds live accounts
            CREATE UNIQUE INDEX idx_account_username
                ON account(username) WHERE deleted = 0;
            CREATE UNIQUE INDEX idx_account_email
                ON account(email) WHERE deleted = 0;

            CREATE TABLE post (
                id          TEXT PRIMARY KEY,
                account_id  TEXT NOT NULL REFERENCES account(id),
                content     TEXT,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL,
                removed     INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX idx_post_account
                ON post(account_id, removed);

            -- Written by other services; read here for like/dislike counts
            CREATE TABLE interaction (
                id          TEXT PRIMARY KEY,
                post_id     TEXT NOT NULL REFERENCES post(id),
                type        INTEGER NOT NULL
            );

            CREATE INDEX idx_interaction_post
                ON interaction(post_id, type);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    Ok(())
}
