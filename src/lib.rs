//! UrbanMatch - matchmaking backend for the UrbanMatch dating app
//!
//! This library stores user profiles and ranks candidate matches for a user
//! with a deterministic compatibility score (same city, shared interests,
//! age proximity).

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_match_score, rank, MatchOptions, Matcher, DEFAULT_MIN_SCORE};
pub use crate::models::{MatchResult, NewProfile, Profile, ProfileUpdate, ScoringWeights};
