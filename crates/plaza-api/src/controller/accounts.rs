use argon2::Argon2;
use tracing::info;

use plaza_db::Database;
use plaza_db::models::AccountChanges;
use plaza_types::api::{CreateAccountRequest, UpdateAccountRequest};
use plaza_types::models::{Account, new_id, today};
use plaza_types::validation::{AccountFields, check};
use plaza_types::{FieldError, Patch};

use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;

pub struct AccountController<'a> {
    db: &'a Database,
    hasher: &'a Argon2<'static>,
}

impl<'a> AccountController<'a> {
    pub fn new(db: &'a Database, hasher: &'a Argon2<'static>) -> Self {
        Self { db, hasher }
    }

    /// Register a new account. Nothing is written when validation fails.
    pub fn create(&self, req: CreateAccountRequest) -> Result<Account, ApiError> {
        let fields = AccountFields {
            username: req.username,
            name: req.name,
            description: req.description,
            email: req.email,
            password: Some(req.password),
        };
        check(&fields).map_err(ApiError::ValidationFailed)?;

        let password = fields.password.as_deref().unwrap_or_default();
        let now = today();
        let account = Account {
            id: new_id(),
            password_hash: hash_password(self.hasher, password)?,
            username: fields.username,
            name: fields.name,
            description: fields.description,
            email: fields.email,
            created_at: now,
            updated_at: now,
            deleted: false,
        };

        self.db.accounts().insert(&account)?;

        info!("Account {} registered as '{}'", account.id, account.username);
        Ok(account)
    }

    pub fn get(&self, id: &str) -> Result<Account, ApiError> {
        self.db
            .accounts()
            .find_by_id(id)?
            .ok_or(ApiError::NotFoundAccountId)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<Account, ApiError> {
        let account = self
            .db
            .accounts()
            .find_by_email(email)?
            .ok_or(ApiError::NotFoundEmail)?;

        if !verify_password(self.hasher, password, &account.password_hash)? {
            return Err(ApiError::UnauthorizedPassword);
        }
        Ok(account)
    }

    /// Merge the sent fields onto the stored account, validate the result and
    /// persist only what was sent. An absent password keeps the stored one.
    pub fn update(&self, id: &str, req: UpdateAccountRequest) -> Result<Account, ApiError> {
        let current = self.get(id)?;

        let mut errors = Vec::new();
        let changes = AccountChanges {
            username: take("username", req.username, &mut errors),
            name: take("name", req.name, &mut errors),
            description: take("description", req.description, &mut errors),
            email: take("email", req.email, &mut errors),
            password_hash: None,
        };
        let password = take("password", req.password, &mut errors);

        let merged = AccountFields {
            username: changes.username.clone().unwrap_or(current.username),
            name: changes.name.clone().unwrap_or(current.name),
            description: changes.description.clone().unwrap_or(current.description),
            email: changes.email.clone().unwrap_or(current.email),
            password,
        };
        if let Err(mut invalid) = check(&merged) {
            errors.append(&mut invalid);
        }
        if !errors.is_empty() {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(ApiError::ValidationFailed(errors));
        }

        let changes = AccountChanges {
            password_hash: merged
                .password
                .as_deref()
                .map(|p| hash_password(self.hasher, p))
                .transpose()?,
            ..changes
        };

        let now = today();
        if !self.db.accounts().update(id, &changes, now)? {
            return Err(ApiError::NotFoundAccountId);
        }

        info!("Account {} updated", id);
        Ok(Account {
            id: current.id,
            username: merged.username,
            name: merged.name,
            description: merged.description,
            email: merged.email,
            password_hash: changes.password_hash.unwrap_or(current.password_hash),
            created_at: current.created_at,
            updated_at: now,
            deleted: false,
        })
    }

    /// Soft-delete the account, returning it as it was.
    pub fn delete(&self, id: &str) -> Result<Account, ApiError> {
        let account = self.get(id)?;

        if !self.db.accounts().soft_delete(id, today())? {
            return Err(ApiError::NotFoundAccountId);
        }

        info!("Account {} deleted", id);
        Ok(account)
    }
}

/// Unwrap a patch field; account columns are not nullable.
fn take(field: &str, patch: Patch<String>, errors: &mut Vec<FieldError>) -> Option<String> {
    if patch.is_null() {
        errors.push(FieldError::new(field, "must not be null"));
    }
    patch.into_value()
}
