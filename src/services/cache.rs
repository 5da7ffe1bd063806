use moka::future::{Cache, CacheBuilder};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::models::Profile;

/// In-memory profile cache
///
/// Fronts single-profile lookups. Writers must call `invalidate` after
/// the store write has completed. Loaders read `generation` before going to
/// the store and hand it back to `insert_loaded`, so a load that raced with
/// an invalidation never leaves its stale row behind.
pub struct ProfileCache {
    profiles: Cache<i64, Profile>,
    generation: AtomicU64,
}

impl ProfileCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let profiles = CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            profiles,
            generation: AtomicU64::new(0),
        }
    }

    /// Current invalidation generation; bumped by every `invalidate`
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub async fn get(&self, id: i64) -> Option<Profile> {
        let hit = self.profiles.get(&id).await;
        if hit.is_some() {
            tracing::trace!("Profile cache hit: {}", id);
        }
        hit
    }

    /// Insert a profile read from the store at `generation`
    ///
    /// If any invalidation happened since, the entry is dropped again: the
    /// row may predate the write that caused it.
    pub async fn insert_loaded(&self, profile: Profile, generation: u64) {
        let id = profile.id;
        if self.generation() != generation {
            return;
        }

        self.profiles.insert(id, profile).await;

        if self.generation() != generation {
            tracing::debug!("Dropping profile {} loaded across an invalidation", id);
            self.profiles.invalidate(&id).await;
        }
    }

    pub async fn invalidate(&self, id: i64) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.profiles.invalidate(&id).await;
    }
}
