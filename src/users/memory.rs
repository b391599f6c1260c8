//! In-memory `UserStore` used by handler tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::error::StoreError;
use super::repo::UserStore;
use super::repo_types::{NewUser, User, UserSummary};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<BTreeMap<String, User>>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryUserStore {
    /// Makes every subsequent call fail like a lost connection.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.lock().unwrap().contains_key(user_id)
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new: &NewUser) -> Result<User, StoreError> {
        self.enter()?;
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&new.user_id) {
            return Err(StoreError::Duplicate(new.user_id.clone()));
        }
        let user = User {
            user_id: new.user_id.clone(),
            username: new.username.clone(),
            phone_number: new.phone_number.clone(),
            profile_picture: new.profile_picture.clone(),
            created_at: OffsetDateTime::now_utc(),
            fcm_token: new.fcm_token.clone(),
        };
        users.insert(user.user_id.clone(), user.clone());
        Ok(user)
    }

    async fn search_by_partial_id(&self, term: &str) -> Result<Vec<UserSummary>, StoreError> {
        self.enter()?;
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .filter(|u| u.user_id.starts_with(term))
            .map(UserSummary::from)
            .collect())
    }

    async fn get_by_id(&self, user_id: &str) -> Result<User, StoreError> {
        self.enter()?;
        self.users
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(user_id.to_owned()))
    }
}
