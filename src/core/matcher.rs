use crate::models::{MatchResult, Profile, ScoringWeights};
use crate::core::{
    filters::{passes_pre_filter, PreFilter},
    scoring::{score_breakdown, shared_interests},
};

/// Default minimum score a candidate needs to be returned
///
/// A single shared interest (10) clears it; an unrelated pair (0) does not.
pub const DEFAULT_MIN_SCORE: u32 = 10;

/// Per-call ranking options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub min_score: u32,
    pub exclude_same_gender: bool,
    pub limit: Option<usize>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            exclude_same_gender: false,
            limit: None,
        }
    }
}

/// Result of the matching process
#[derive(Debug)]
pub struct MatchOutcome {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Pre-filter (self exclusion, optional same-gender exclusion)
/// 2. Scoring
/// 3. Threshold
/// 4. Stable descending sort, optional limit
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    options: MatchOptions,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, options: MatchOptions) -> Self {
        Self { weights, options }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            options: MatchOptions::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Options used when the caller does not override them
    pub fn default_options(&self) -> MatchOptions {
        self.options
    }

    /// Rank a candidate pool for a subject
    ///
    /// # Arguments
    /// * `subject` - The profile matches are computed for
    /// * `pool` - Candidate profiles, in the order ties should keep
    /// * `options` - Threshold, gender pre-filter and limit
    ///
    /// # Returns
    /// MatchOutcome with candidates sorted by score (descending). Equal
    /// scores keep their pool order.
    pub fn find_matches(
        &self,
        subject: &Profile,
        pool: &[Profile],
        options: &MatchOptions,
    ) -> MatchOutcome {
        let total_candidates = pool.len();
        let pre_filter = PreFilter {
            exclude_same_gender: options.exclude_same_gender,
        };

        let mut matches: Vec<MatchResult> = pool
            .iter()
            // Stage 1: Pre-filter
            .filter(|candidate| passes_pre_filter(subject, candidate, &pre_filter))
            // Stage 2 & 3: Score and threshold
            .filter_map(|candidate| {
                let score = score_breakdown(subject, candidate, &self.weights).total();
                if score >= options.min_score {
                    Some(MatchResult {
                        candidate: candidate.clone(),
                        score,
                        shared_interests: shared_interests(
                            &subject.interests,
                            &candidate.interests,
                        ),
                    })
                } else {
                    None
                }
            })
            .collect();

        // Stable: ties stay in pool order
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        if let Some(limit) = options.limit {
            matches.truncate(limit);
        }

        tracing::trace!(
            subject_id = subject.id,
            total_candidates,
            kept = matches.len(),
            "ranked candidate pool"
        );

        MatchOutcome {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Rank a candidate pool with the reference weights and no gender pre-filter
pub fn rank(subject: &Profile, pool: &[Profile], min_score: u32) -> Vec<MatchResult> {
    let options = MatchOptions {
        min_score,
        ..MatchOptions::default()
    };
    Matcher::with_default_weights()
        .find_matches(subject, pool, &options)
        .matches
}
