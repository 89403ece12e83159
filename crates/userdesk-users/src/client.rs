//! Async access to the user store.
//!
//! `UserClient` is cheap to clone and runs every query on the blocking
//! thread pool so request handlers never block the runtime.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::duplicates::find_duplicate_names;
use crate::error::UserStoreResult;
use crate::store::SqliteUserStore;
use crate::types::{DuplicateName, NewUser, User};

#[derive(Clone)]
pub struct UserClient {
    store: Arc<Mutex<SqliteUserStore>>,
}

impl UserClient {
    pub fn new(store: SqliteUserStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    async fn run<T, F>(&self, op: F) -> UserStoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteUserStore) -> UserStoreResult<T> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(&store.lock())).await?
    }

    pub async fn create_user(&self, request: NewUser) -> UserStoreResult<User> {
        self.run(move |store| store.create(&request)).await
    }

    pub async fn list_users(&self, active: Option<bool>) -> UserStoreResult<Vec<User>> {
        self.run(move |store| store.list(active)).await
    }

    pub async fn list_by_country(
        &self,
        country: &str,
        active: Option<bool>,
    ) -> UserStoreResult<Vec<User>> {
        let country = country.to_string();
        self.run(move |store| store.list_by_country(&country, active))
            .await
    }

    /// Names shared by at least `min_count` users.
    pub async fn duplicate_names(
        &self,
        min_count: usize,
        active: Option<bool>,
    ) -> UserStoreResult<Vec<DuplicateName>> {
        let pairs = self.run(move |store| store.name_pairs(active)).await?;
        Ok(find_duplicate_names(pairs, min_count))
    }

    pub async fn delete_all(&self) -> UserStoreResult<usize> {
        self.run(|store| store.delete_all()).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::error::UserStoreError;

    fn client() -> UserClient {
        UserClient::new(SqliteUserStore::in_memory().unwrap())
    }

    fn new_user(first: &str, last: &str, i: usize, active: bool) -> NewUser {
        NewUser {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}{}@example.com", first.to_lowercase(), last.to_lowercase(), i),
            active,
            country: "US".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_names_through_client() {
        let client = client();
        client.create_user(new_user("Alex", "Dog", 0, true)).await.unwrap();
        client.create_user(new_user("Alex", "Dog", 1, false)).await.unwrap();
        client.create_user(new_user("Bob", "Crassel", 2, true)).await.unwrap();
        client.create_user(new_user("Alex", "Dog", 3, true)).await.unwrap();

        let all = client.duplicate_names(2, None).await.unwrap();
        assert_eq!(all, vec![DuplicateName { name: "Alex Dog".into(), count: 3 }]);

        let active = client.duplicate_names(2, Some(true)).await.unwrap();
        assert_eq!(active[0].count, 2);

        let inactive = client.duplicate_names(2, Some(false)).await.unwrap();
        assert!(inactive.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_the_store() {
        let a = client();
        let b = a.clone();
        a.create_user(new_user("Brian", "Mercer", 0, true)).await.unwrap();

        assert_eq!(b.list_users(None).await.unwrap().len(), 1);
        assert_eq!(b.delete_all().await.unwrap(), 1);
        assert!(a.list_users(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let client = client();
        client.create_user(new_user("Brian", "Mercer", 0, true)).await.unwrap();
        let result = client.create_user(new_user("Brian", "Mercer", 0, true)).await;
        assert!(matches!(result, Err(UserStoreError::Conflict(_))));
    }
}
