use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{NewProfile, Profile, ProfileUpdate};
use crate::services::store::{StoreError, UserStore};

/// In-process profile store
///
/// Mirrors the PostgreSQL store's semantics (unique emails, id ordering).
/// Used for local development and for HTTP tests.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, Profile>,
    next_id: i64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.email == profile.email) {
            return Err(StoreError::DuplicateEmail(profile.email));
        }

        inner.next_id += 1;
        let created = profile.into_profile(inner.next_id);
        inner.users.insert(created.id, created.clone());

        tracing::debug!("Created user {} ({})", created.id, created.email);
        Ok(created)
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Profile>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Profile, StoreError> {
        let inner = self.inner.read().await;
        inner.users.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, id: i64, update: ProfileUpdate) -> Result<Profile, StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(email) = &update.email {
            if inner.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }

        let profile = inner.users.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        profile.apply_update(update);
        Ok(profile.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn candidate_pool(&self, subject_id: i64) -> Result<Vec<Profile>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .filter(|u| u.id != subject_id)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
