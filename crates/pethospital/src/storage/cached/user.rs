//! Cached user repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use pethospital_core::cache::{active_users_key, user_by_email_key, user_key, Cache};
use pethospital_core::hospital::{User, UserUpdate};
use pethospital_core::storage::{Result, UserRepository};

use super::ReadThrough;

/// Cached user repository decorator.
///
/// Single-user lookups are cached only when the user exists. Writes
/// invalidate the by-id, by-email and active-listing keys they can reach.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedUserRepository<R, C>
where
    R: UserRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: ReadThrough<C>,
}

impl<R, C> CachedUserRepository<R, C>
where
    R: UserRepository,
    C: Cache,
{
    /// Creates a new cached user repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The shared cache
    /// * `ttl` - Time-to-live for cached lookups
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            cache: ReadThrough::new(cache, ttl),
        }
    }
}

#[async_trait]
impl<R, C> UserRepository for CachedUserRepository<R, C>
where
    R: UserRepository + 'static,
    C: Cache + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.cache
            .get_or_load_some(&user_key(id), || self.repository.find_by_id(id))
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.cache
            .get_or_load_some(&user_by_email_key(email), || {
                self.repository.find_by_email(email)
            })
            .await
    }

    async fn list_active(&self) -> Result<Vec<User>> {
        self.cache
            .get_or_load(&active_users_key(), || self.repository.list_active())
            .await
    }

    async fn create(&self, user: &User) -> Result<()> {
        self.repository.create(user).await?;

        self.cache
            .invalidate([user_by_email_key(&user.email), active_users_key()])
            .await;

        tracing::debug!(user_id = %user.id, "User created");
        Ok(())
    }

    async fn update_by_id(&self, id: Uuid, update: &UserUpdate) -> Result<User> {
        // An email change strands the old by-email key unless we know it.
        let previous_email = match &update.email {
            Some(_) => self.repository.find_by_id(id).await?.map(|u| u.email),
            None => None,
        };

        let user = self.repository.update_by_id(id, update).await?;

        let mut keys = vec![user_key(id), user_by_email_key(&user.email), active_users_key()];
        if let Some(email) = previous_email {
            keys.push(user_by_email_key(&email));
        }
        self.cache.invalidate(keys).await;

        tracing::debug!(user_id = %id, "User updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    use pethospital_core::storage::RepositoryError;

    use crate::storage::cached::testing::MockCache;

    struct MockUserRepository {
        users: RwLock<HashMap<Uuid, User>>,
        find_by_id_calls: AtomicUsize,
        find_by_email_calls: AtomicUsize,
        list_active_calls: AtomicUsize,
    }

    impl MockUserRepository {
        fn new() -> Self {
            Self {
                users: RwLock::new(HashMap::new()),
                find_by_id_calls: AtomicUsize::new(0),
                find_by_email_calls: AtomicUsize::new(0),
                list_active_calls: AtomicUsize::new(0),
            }
        }

        async fn insert(&self, user: User) {
            self.users.write().await.insert(user.id, user);
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
            self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.users.read().await.get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
            self.find_by_email_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .users
                .read()
                .await
                .values()
                .find(|u| u.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        async fn list_active(&self) -> Result<Vec<User>> {
            self.list_active_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .users
                .read()
                .await
                .values()
                .filter(|u| u.is_listed())
                .cloned()
                .collect())
        }

        async fn create(&self, user: &User) -> Result<()> {
            self.users.write().await.insert(user.id, user.clone());
            Ok(())
        }

        async fn update_by_id(&self, id: Uuid, update: &UserUpdate) -> Result<User> {
            let mut users = self.users.write().await;
            let user = users
                .get_mut(&id)
                .ok_or_else(|| RepositoryError::not_found("User", id))?;
            update.apply(user);
            Ok(user.clone())
        }
    }

    fn setup() -> (
        Arc<MockUserRepository>,
        Arc<MockCache>,
        CachedUserRepository<MockUserRepository, MockCache>,
    ) {
        let repo = Arc::new(MockUserRepository::new());
        let cache = Arc::new(MockCache::new());
        let cached = CachedUserRepository::new(repo.clone(), cache.clone(), Duration::from_secs(60));
        (repo, cache, cached)
    }

    #[tokio::test]
    async fn test_find_by_id_read_through() {
        let (repo, cache, cached) = setup();
        let user = User::new("Alice", "alice@example.com");
        repo.insert(user.clone()).await;

        let first = cached.find_by_id(user.id).await.unwrap();
        let second = cached.find_by_id(user.id).await.unwrap();

        assert_eq!(first, Some(user.clone()));
        assert_eq!(second, first);
        assert_eq!(repo.find_by_id_calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains(&user_key(user.id)).await);
    }

    #[tokio::test]
    async fn test_absent_user_is_not_cached() {
        let (repo, cache, cached) = setup();
        let id = Uuid::new_v4();

        assert!(cached.find_by_id(id).await.unwrap().is_none());
        assert!(cached.find_by_id(id).await.unwrap().is_none());

        assert_eq!(repo.find_by_id_calls.load(Ordering::SeqCst), 2);
        assert!(!cache.contains(&user_key(id)).await);
    }

    #[tokio::test]
    async fn test_email_lookups_share_key_across_case() {
        let (repo, _cache, cached) = setup();
        repo.insert(User::new("Alice", "alice@example.com")).await;

        cached.find_by_email("alice@example.com").await.unwrap();
        cached.find_by_email("ALICE@example.com").await.unwrap();

        assert_eq!(repo.find_by_email_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_ascii_email_case_matches_the_store() {
        let store = Arc::new(crate::storage::InMemoryRepository::new());
        let cache = Arc::new(crate::cache::MemoryCache::new(100));
        let cached = CachedUserRepository::new(store.clone(), cache, Duration::from_secs(60));
        cached
            .create(&User::new("Émile", "Émile@example.com"))
            .await
            .unwrap();

        let hit = cached.find_by_email("Émile@example.com").await.unwrap();
        let other = cached.find_by_email("émile@example.com").await.unwrap();

        assert_eq!(hit.map(|u| u.email), Some("Émile@example.com".to_string()));
        assert_eq!(other, store.find_by_email("émile@example.com").await.unwrap());
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_create_invalidates_email_and_listing() {
        let (repo, cache, cached) = setup();
        let user = User::new("Bob", "bob@example.com");

        // A miss on the email before the account exists is not cached, but
        // the active listing is.
        assert!(cached.find_by_email(&user.email).await.unwrap().is_none());
        assert!(cached.list_active().await.unwrap().is_empty());

        cached.create(&user).await.unwrap();

        let listed = cached.list_active().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(repo.list_active_calls.load(Ordering::SeqCst), 2);
        assert!(!cache.contains(&user_by_email_key(&user.email)).await);
    }

    #[tokio::test]
    async fn test_update_invalidates_old_and_new_email() {
        let (repo, cache, cached) = setup();
        let user = User::new("Cora", "cora@old.example");
        repo.insert(user.clone()).await;

        cached.find_by_id(user.id).await.unwrap();
        cached.find_by_email("cora@old.example").await.unwrap();
        assert!(cache.contains(&user_by_email_key("cora@old.example")).await);

        let update = UserUpdate {
            email: Some("cora@new.example".to_string()),
            ..UserUpdate::default()
        };
        let updated = cached.update_by_id(user.id, &update).await.unwrap();

        assert_eq!(updated.email, "cora@new.example");
        assert!(!cache.contains(&user_key(user.id)).await);
        assert!(!cache.contains(&user_by_email_key("cora@old.example")).await);

        // The fresh read sees the new address.
        let reread = cached.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(reread.email, "cora@new.example");
    }

    #[tokio::test]
    async fn test_failed_update_leaves_cache_untouched() {
        let (_repo, cache, cached) = setup();
        let ghost = Uuid::new_v4();
        cache
            .set(&active_users_key(), b"[]", None)
            .await
            .unwrap();

        let result = cached.update_by_id(ghost, &UserUpdate::default()).await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert!(cache.contains(&active_users_key()).await);
    }

    #[tokio::test]
    async fn test_broken_cache_falls_back_to_repository() {
        let (repo, cache, cached) = setup();
        let user = User::new("Dee", "dee@example.com");
        repo.insert(user.clone()).await;
        cache.break_connection();

        let found = cached.find_by_id(user.id).await.unwrap();
        cached.create(&User::new("Eve", "eve@example.com")).await.unwrap();

        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert_eq!(cached.list_active().await.unwrap().len(), 2);
    }
}
