use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewProfile, Profile, ProfileUpdate};

/// Errors that can occur when reading or writing profiles
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

/// Profile storage
///
/// Listings and candidate pools are ordered by id so that ranking ties
/// resolve the same way on every call.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new profile; fails with `DuplicateEmail` if the email is taken
    async fn create(&self, profile: NewProfile) -> Result<Profile, StoreError>;

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Profile>, StoreError>;

    /// Fetch a profile; fails with `NotFound` if it does not exist
    async fn get(&self, id: i64) -> Result<Profile, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError>;

    /// Apply an explicit field update and return the stored result
    async fn update(&self, id: i64, update: ProfileUpdate) -> Result<Profile, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Every profile except the subject
    async fn candidate_pool(&self, subject_id: i64) -> Result<Vec<Profile>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
