use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Today's date in UTC. Accounts and posts only track day granularity.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Fresh opaque identifier for a new account or post.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// -- Accounts --

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub name: String,
    pub description: String,
    pub email: String,
    /// Argon2 PHC string, never the submitted password.
    pub password_hash: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub deleted: bool,
}

/// Public view of an account. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub description: String,
    pub email: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
}

impl Account {
    pub fn to_response(&self) -> AccountResponse {
        AccountResponse {
            id: self.id.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// -- Posts --

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub account_id: String,
    pub content: Option<String>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub removed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub account_id: String,
    pub content: Option<String>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub like: i64,
    pub dislike: i64,
}

impl Post {
    pub fn to_response(&self, counts: InteractionCounts) -> PostResponse {
        PostResponse {
            id: self.id.clone(),
            account_id: self.account_id.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            like: counts.like,
            dislike: counts.dislike,
        }
    }
}

// -- Interactions --

/// Discriminant stored in `interaction.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionType {
    Liked,
    Disliked,
}

impl InteractionType {
    pub fn index(self) -> i64 {
        match self {
            InteractionType::Liked => 0,
            InteractionType::Disliked => 1,
        }
    }

    pub fn from_index(value: i64) -> Option<Self> {
        match value {
            0 => Some(InteractionType::Liked),
            1 => Some(InteractionType::Disliked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionCounts {
    pub like: i64,
    pub dislike: i64,
}

impl InteractionCounts {
    pub fn add(&mut self, kind: InteractionType, count: i64) {
        match kind {
            InteractionType::Liked => self.like += count,
            InteractionType::Disliked => self.dislike += count,
        }
    }
}
