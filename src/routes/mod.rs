// Route exports
pub mod auth;
pub mod chat;
pub mod matches;
pub mod users;

use actix_web::web;
use std::sync::Arc;

use crate::core::Matcher;
use crate::models::Profile;
use crate::services::{AssistantClient, OtpClient, ProfileCache, StoreError, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub cache: Arc<ProfileCache>,
    pub otp: Arc<OtpClient>,
    pub assistant: Arc<AssistantClient>,
    pub matcher: Matcher,
    /// Upper bound for any client-supplied `limit`
    pub max_limit: u32,
}

impl AppState {
    /// Fetch a profile through the cache
    pub async fn load_profile(&self, id: i64) -> Result<Profile, StoreError> {
        if let Some(profile) = self.cache.get(id).await {
            return Ok(profile);
        }

        let generation = self.cache.generation();
        let profile = self.store.get(id).await?;
        self.cache.insert_loaded(profile.clone(), generation).await;
        Ok(profile)
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Fixed paths go before `/users/{id}`
    cfg.configure(matches::configure)
        .configure(auth::configure)
        .configure(chat::configure)
        .configure(users::configure);
}
