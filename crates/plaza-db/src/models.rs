//! Database row types. These map directly to SQLite rows,
//! distinct from plaza-types models to keep the DB layer independent.

use chrono::NaiveDate;
use plaza_types::models::{Account, Post};

use crate::{DbError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct AccountRow {
    pub id: String,
    pub username: String,
    pub name: String,
    pub description: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted: bool,
}

pub struct PostRow {
    pub id: String,
    pub account_id: String,
    pub content: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub removed: bool,
}

/// Columns written by a partial account update. `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(id: &str, column: &str, value: &str) -> Result<NaiveDate> {
    // Older rows may carry a full timestamp; only the day matters.
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map_err(|e| DbError::Corrupt(format!("{column} '{value}' on row '{id}': {e}")))
}

impl TryFrom<AccountRow> for Account {
    type Error = DbError;

    fn try_from(row: AccountRow) -> Result<Self> {
        let created_at = parse_date(&row.id, "created_at", &row.created_at)?;
        let updated_at = parse_date(&row.id, "updated_at", &row.updated_at)?;
        Ok(Account {
            id: row.id,
            username: row.username,
            name: row.name,
            description: row.description,
            email: row.email,
            password_hash: row.password,
            created_at,
            updated_at,
            deleted: row.deleted,
        })
    }
}

impl TryFrom<PostRow> for Post {
    type Error = DbError;

    fn try_from(row: PostRow) -> Result<Self> {
        let created_at = parse_date(&row.id, "created_at", &row.created_at)?;
        let updated_at = parse_date(&row.id, "updated_at", &row.updated_at)?;
        Ok(Post {
            id: row.id,
            account_id: row.account_id,
            content: row.content,
            created_at,
            updated_at,
            removed: row.removed,
        })
    }
}
