use tracing::info;

use plaza_db::Database;
use plaza_types::api::{CreatePostRequest, RemovePostRequest, UpdatePostRequest};
use plaza_types::models::{InteractionCounts, Post, PostResponse, new_id, today};
use plaza_types::validation::check;

use crate::error::ApiError;

pub struct PostController<'a> {
    db: &'a Database,
}

impl<'a> PostController<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn create(&self, account_id: &str, req: CreatePostRequest) -> Result<PostResponse, ApiError> {
        check(&req).map_err(ApiError::ValidationFailed)?;

        if !self.db.accounts().exists_by_id(account_id)? {
            return Err(ApiError::NotFoundAccountId);
        }

        let now = today();
        let post = Post {
            id: new_id(),
            account_id: account_id.to_string(),
            content: req.content,
            created_at: now,
            updated_at: now,
            removed: false,
        };
        self.db.posts().insert(&post)?;

        info!("Account {} created post {}", account_id, post.id);
        Ok(post.to_response(InteractionCounts::default()))
    }

    /// Live posts of `account_id`, or of the caller when no account is given.
    pub fn list(&self, caller: &str, account_id: Option<String>) -> Result<Vec<PostResponse>, ApiError> {
        let target = account_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| caller.to_string());

        if !self.db.accounts().exists_by_id(&target)? {
            return Err(ApiError::NotFoundAccountId);
        }

        let posts = self.db.posts().find_by_account_id(&target)?;
        let counts = self.db.posts().interaction_counts_for_account(&target)?;

        Ok(posts
            .iter()
            .map(|p| p.to_response(counts.get(&p.id).copied().unwrap_or_default()))
            .collect())
    }

    pub fn update(&self, caller: &str, req: UpdatePostRequest) -> Result<PostResponse, ApiError> {
        check(&req).map_err(ApiError::ValidationFailed)?;
        // Both fields are `required`, so `check` has already rejected `None`.
        let id = req.id.unwrap_or_default();
        let content = req.content.unwrap_or_default();

        self.owned(caller, &id)?;

        if !self.db.posts().update_content(&id, caller, &content, today())? {
            return Err(ApiError::NotFoundPostId);
        }

        info!("Account {} updated post {}", caller, id);
        self.projection(&id)
    }

    /// Mark the post removed, returning it as it was.
    pub fn remove(&self, caller: &str, req: RemovePostRequest) -> Result<PostResponse, ApiError> {
        check(&req).map_err(ApiError::ValidationFailed)?;
        let id = req.id.unwrap_or_default();

        self.owned(caller, &id)?;
        let before = self.projection(&id)?;

        if !self.db.posts().remove(&id, caller)? {
            return Err(ApiError::NotFoundPostId);
        }

        info!("Account {} removed post {}", caller, id);
        Ok(before)
    }

    fn owned(&self, caller: &str, id: &str) -> Result<(), ApiError> {
        let posts = self.db.posts();
        if !posts.exists_by_id(id)? {
            return Err(ApiError::NotFoundPostId);
        }
        if !posts.exists_by_id_and_account_id(id, caller)? {
            return Err(ApiError::UnauthorizedAccountId);
        }
        Ok(())
    }

    fn projection(&self, id: &str) -> Result<PostResponse, ApiError> {
        let posts = self.db.posts();
        let post = posts.find_by_id(id)?.ok_or(ApiError::NotFoundPostId)?;
        let counts = posts.interaction_counts(id)?;
        Ok(post.to_response(counts))
    }
}

#[cfg(test)]
mod tests {
    use plaza_types::api::CreateAccountRequest;
    use plaza_types::models::InteractionType;

    use super::*;
    use crate::auth::{AppStateInner, testing};

    fn register(state: &AppStateInner, username: &str) -> String {
        state
            .accounts()
            .create(CreateAccountRequest {
                username: username.into(),
                name: "Some Person".into(),
                description: "Just here to post".into(),
                email: format!("{username}@example.com"),
                password: "secret1".into(),
            })
            .unwrap()
            .id
    }

    fn publish(state: &AppStateInner, account_id: &str, content: &str) -> PostResponse {
        state
            .posts()
            .create(
                account_id,
                CreatePostRequest {
                    content: Some(content.into()),
                },
            )
            .unwrap()
    }

    fn interact(state: &AppStateInner, post_id: &str, kind: InteractionType) {
        state
            .db
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO interaction (id, post_id, type) VALUES (?1, ?2, ?3)",
                    (new_id(), post_id, kind.index()),
                )?;
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn create_returns_zero_counts() {
        let state = testing::state();
        let owner = register(&state, "owner");

        let post = publish(&state, &owner, "hello plaza");
        assert_eq!(post.account_id, owner);
        assert_eq!(post.content.as_deref(), Some("hello plaza"));
        assert_eq!((post.like, post.dislike), (0, 0));
        assert_eq!(post.created_at, today());
    }

    #[test]
    fn create_rejects_empty_content_and_unknown_account() {
        let state = testing::state();
        let owner = register(&state, "owner");

        let err = state
            .posts()
            .create(&owner, CreatePostRequest { content: None })
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationFailed(_)));

        let err = state
            .posts()
            .create(
                "missing",
                CreatePostRequest {
                    content: Some("hi".into()),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFoundAccountId));
    }

    #[test]
    fn non_owner_update_leaves_content() {
        let state = testing::state();
        let owner = register(&state, "owner");
        let other = register(&state, "other");
        let post = publish(&state, &owner, "original");

        let err = state
            .posts()
            .update(
                &other,
                UpdatePostRequest {
                    id: Some(post.id.clone()),
                    content: Some("hijacked".into()),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::UnauthorizedAccountId));

        let listed = state.posts().list(&owner, None).unwrap();
        assert_eq!(listed[0].content.as_deref(), Some("original"));
    }

    #[test]
    fn owner_update_changes_content() {
        let state = testing::state();
        let owner = register(&state, "owner");
        let post = publish(&state, &owner, "original");

        let updated = state
            .posts()
            .update(
                &owner,
                UpdatePostRequest {
                    id: Some(post.id.clone()),
                    content: Some("edited".into()),
                },
            )
            .unwrap();
        assert_eq!(updated.id, post.id);
        assert_eq!(updated.content.as_deref(), Some("edited"));

        let err = state
            .posts()
            .update(
                &owner,
                UpdatePostRequest {
                    id: Some("missing".into()),
                    content: Some("edited".into()),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFoundPostId));
    }

    #[test]
    fn update_and_remove_require_fields() {
        let state = testing::state();
        let owner = register(&state, "owner");

        match state.posts().update(&owner, UpdatePostRequest::default()) {
            Err(ApiError::ValidationFailed(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["content", "id"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(matches!(
            state.posts().remove(&owner, RemovePostRequest { id: None }),
            Err(ApiError::ValidationFailed(_))
        ));
    }

    #[test]
    fn removed_post_leaves_listing() {
        let state = testing::state();
        let owner = register(&state, "owner");
        let post = publish(&state, &owner, "short lived");

        assert!(state.db.posts().find_by_id(&post.id).unwrap().is_some());

        let removed = state
            .posts()
            .remove(
                &owner,
                RemovePostRequest {
                    id: Some(post.id.clone()),
                },
            )
            .unwrap();
        assert_eq!(removed, post);

        assert!(state.posts().list(&owner, None).unwrap().is_empty());
        let again = state.posts().remove(
            &owner,
            RemovePostRequest {
                id: Some(post.id.clone()),
            },
        );
        assert!(matches!(again, Err(ApiError::NotFoundPostId)));
    }

    #[test]
    fn list_reports_interaction_counts() {
        let state = testing::state();
        let owner = register(&state, "owner");
        let reader = register(&state, "reader");
        let post = publish(&state, &owner, "rate me");

        interact(&state, &post.id, InteractionType::Liked);
        interact(&state, &post.id, InteractionType::Liked);
        interact(&state, &post.id, InteractionType::Disliked);

        let listed = state.posts().list(&reader, Some(owner.clone())).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!((listed[0].like, listed[0].dislike), (2, 1));

        // Empty filter falls back to the caller
        assert!(state.posts().list(&reader, Some(String::new())).unwrap().is_empty());
    }

    #[test]
    fn list_handles_large_accounts() {
        let state = testing::state();
        let owner = register(&state, "owner");
        state
            .db
            .with_conn(|conn| {
                conn.execute(
                    "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < 33000)
                     INSERT INTO post (id, account_id, content, created_at, updated_at, removed)
                     SELECT 'bulk-' || i, ?1, 'filler', '2024-01-02', '2024-01-02', 0 FROM n",
                    [&owner],
                )?;
                Ok(())
            })
            .unwrap();
        interact(&state, "bulk-7", InteractionType::Disliked);

        let listed = state.posts().list(&owner, None).unwrap();
        assert_eq!(listed.len(), 33000);
        let post = listed.iter().find(|p| p.id == "bulk-7").unwrap();
        assert_eq!((post.like, post.dislike), (0, 1));
    }

    #[test]
    fn list_for_unknown_account() {
        let state = testing::state();
        let reader = register(&state, "reader");

        assert!(matches!(
            state.posts().list(&reader, Some("missing".into())),
            Err(ApiError::NotFoundAccountId)
        ));
    }
}
