use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row};

use plaza_types::models::Account;

use crate::models::{AccountChanges, AccountRow, format_date};
use crate::{Database, Result};

const ACCOUNT_COLUMNS: &str =
    "id, username, name, description, email, password, created_at, updated_at, deleted";

/// Parameterized statements over the `account` table.
/// Every read skips soft-deleted rows.
pub struct AccountRepository<'a> {
    db: &'a Database,
}

impl<'a> AccountRepository<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn insert(&self, account: &Account) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO account (id, username, name, description, email, password, created_at, updated_at, deleted)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    account.id,
                    account.username,
                    account.name,
                    account.description,
                    account.email,
                    account.password_hash,
                    format_date(account.created_at),
                    format_date(account.updated_at),
                    account.deleted,
                ],
            )?;
            Ok(())
        })
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        self.db.with_conn(|conn| query_one(conn, "id", id))
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.db.with_conn(|conn| query_one(conn, "email", email))
    }

    pub fn exists_by_id(&self, id: &str) -> Result<bool> {
        self.db.with_conn(|conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM account WHERE id = ?1 AND deleted = 0",
                    [id],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Write only the columns present in `changes`, plus `updated_at`.
    /// Returns false when no live account matched.
    pub fn update(&self, id: &str, changes: &AccountChanges, updated_at: NaiveDate) -> Result<bool> {
        let updated_at = format_date(updated_at);
        let mut sets: Vec<&str> = Vec::new();
        let mut params: Vec<&dyn rusqlite::types::ToSql> = Vec::new();

        let columns = [
            ("username", &changes.username),
            ("name", &changes.name),
            ("description", &changes.description),
            ("email", &changes.email),
            ("password", &changes.password_hash),
        ];
        for (column, value) in &columns {
            if let Some(value) = value {
                sets.push(*column);
                params.push(value);
            }
        }
        sets.push("updated_at");
        params.push(&updated_at);
        params.push(&id);

        let assignments: Vec<String> = sets
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE account SET {} WHERE id = ?{} AND deleted = 0",
            assignments.join(", "),
            params.len()
        );

        self.db.with_conn(|conn| {
            let changed = conn.execute(&sql, params.as_slice())?;
            Ok(changed > 0)
        })
    }

    /// Flag the account as deleted. The row is kept.
    pub fn soft_delete(&self, id: &str, updated_at: NaiveDate) -> Result<bool> {
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE account SET deleted = 1, updated_at = ?1 WHERE id = ?2 AND deleted = 0",
                rusqlite::params![format_date(updated_at), id],
            )?;
            Ok(changed > 0)
        })
    }
}

fn query_one(conn: &Connection, column: &str, value: &str) -> Result<Option<Account>> {
    let sql = format!(
        "SELECT {ACCOUNT_COLUMNS} FROM account WHERE {column} = ?1 AND deleted = 0"
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt.query_row([value], map_row).optional()?;

    row.map(Account::try_from).transpose()
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        email: row.get(4)?,
        password: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        deleted: row.get(8)?,
    })
}
