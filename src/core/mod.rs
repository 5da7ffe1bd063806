// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::{is_same_gender, is_self, passes_pre_filter, PreFilter};
pub use matcher::{rank, MatchOptions, MatchOutcome, Matcher, DEFAULT_MIN_SCORE};
pub use scoring::{calculate_match_score, score_breakdown, shared_interests, ScoreBreakdown};
