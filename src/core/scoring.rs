use std::collections::HashSet;

use crate::models::{Profile, ScoringWeights};

/// Per-term contribution to a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub city: u32,
    pub interests: u32,
    pub age: u32,
}

impl ScoreBreakdown {
    #[inline]
    pub fn total(&self) -> u32 {
        self.city
            .saturating_add(self.interests)
            .saturating_add(self.age)
    }
}

/// Calculate the compatibility score of two profiles with the given weights
///
/// Scoring formula (reference weights):
/// score = (
///     50 if same city +               # exact, case-sensitive
///     10 * |shared interests| +       # set intersection, uncapped
///     30 if age gap <= 5, 15 if <= 10 # exactly one band applies
/// )
///
/// Only `city`, `interests` and `age` are read, and every term is
/// symmetric, so swapping the two profiles never changes the result.
pub fn score_breakdown(
    subject: &Profile,
    candidate: &Profile,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let city = if subject.city == candidate.city {
        weights.same_city
    } else {
        0
    };

    let shared = shared_interest_count(&subject.interests, &candidate.interests);
    let interests = weights.shared_interest.saturating_mul(shared);

    let age = age_score(subject.age, candidate.age, weights);

    ScoreBreakdown {
        city,
        interests,
        age,
    }
}

/// Calculate the compatibility score of two profiles using the reference weights
#[inline]
pub fn calculate_match_score(subject: &Profile, candidate: &Profile) -> u32 {
    score_breakdown(subject, candidate, &ScoringWeights::default()).total()
}

/// Interests present in both profiles, sorted and deduplicated
pub fn shared_interests(a: &[String], b: &[String]) -> Vec<String> {
    let lookup: HashSet<&str> = b.iter().map(String::as_str).collect();
    let mut shared: Vec<String> = a
        .iter()
        .filter(|interest| lookup.contains(interest.as_str()))
        .cloned()
        .collect();
    shared.sort_unstable();
    shared.dedup();
    shared
}

#[inline]
fn shared_interest_count(a: &[String], b: &[String]) -> u32 {
    let left: HashSet<&str> = a.iter().map(String::as_str).collect();
    let right: HashSet<&str> = b.iter().map(String::as_str).collect();
    let count = left.intersection(&right).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Age proximity term. The bands are exclusive: close, near, or nothing.
#[inline]
fn age_score(a: u32, b: u32, weights: &ScoringWeights) -> u32 {
    let gap = a.abs_diff(b);
    if gap <= weights.close_age_gap {
        weights.close_age
    } else if gap <= weights.near_age_gap {
        weights.near_age
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn create_test_profile(id: i64, city: &str, age: u32, interests: &[&str]) -> Profile {
        Profile {
            id,
            name: format!("User {}", id),
            age,
            gender: "female".to_string(),
            email: format!("user{}@example.com", id),
            city: city.to_string(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            questionnaire: BTreeMap::new(),
        }
    }

    #[test]
    fn test_same_city_close_age_one_shared_interest() {
        let subject = create_test_profile(1, "Pune", 25, &["music", "travel"]);
        let candidate = create_test_profile(2, "Pune", 27, &["music", "sports"]);

        let breakdown = score_breakdown(&subject, &candidate, &ScoringWeights::default());
        assert_eq!(breakdown.city, 50);
        assert_eq!(breakdown.interests, 10);
        assert_eq!(breakdown.age, 30);
        assert_eq!(calculate_match_score(&subject, &candidate), 90);
    }

    #[test]
    fn test_unrelated_pair_scores_zero() {
        let subject = create_test_profile(1, "Pune", 20, &["music"]);
        let candidate = create_test_profile(2, "Delhi", 33, &["chess"]);

        assert_eq!(calculate_match_score(&subject, &candidate), 0);
    }

    #[test]
    fn test_near_age_band_with_shared_interest() {
        let subject = create_test_profile(1, "Pune", 20, &["hiking"]);
        let candidate = create_test_profile(2, "Delhi", 29, &["hiking", "chess"]);

        assert_eq!(calculate_match_score(&subject, &candidate), 25);
    }

    #[test]
    fn test_age_band_boundaries() {
        let weights = ScoringWeights::default();
        assert_eq!(age_score(30, 30, &weights), 30);
        assert_eq!(age_score(30, 35, &weights), 30);
        assert_eq!(age_score(30, 36, &weights), 15);
        assert_eq!(age_score(30, 40, &weights), 15);
        assert_eq!(age_score(30, 41, &weights), 0);
        assert_eq!(age_score(41, 30, &weights), 0);
    }

    #[test]
    fn test_duplicate_interests_count_once() {
        let subject = create_test_profile(1, "Pune", 20, &["music", "music", "art"]);
        let candidate = create_test_profile(2, "Goa", 50, &["music", "art", "art"]);

        let breakdown = score_breakdown(&subject, &candidate, &ScoringWeights::default());
        assert_eq!(breakdown.interests, 20);
    }

    #[test]
    fn test_city_match_is_case_sensitive() {
        let subject = create_test_profile(1, "Pune", 20, &[]);
        let candidate = create_test_profile(2, "pune", 50, &[]);

        assert_eq!(calculate_match_score(&subject, &candidate), 0);
    }

    #[test]
    fn test_empty_interests_score_nothing() {
        let subject = create_test_profile(1, "Pune", 20, &[]);
        let candidate = create_test_profile(2, "Pune", 20, &["music"]);

        let breakdown = score_breakdown(&subject, &candidate, &ScoringWeights::default());
        assert_eq!(breakdown.interests, 0);
        assert_eq!(breakdown.total(), 80);
    }

    #[test]
    fn test_interest_term_is_uncapped() {
        let tags: Vec<String> = (0..20).map(|i| format!("tag{}", i)).collect();
        let refs: Vec<&str> = tags.iter().map(String::as_str).collect();
        let subject = create_test_profile(1, "Pune", 20, &refs);
        let candidate = create_test_profile(2, "Goa", 60, &refs);

        assert_eq!(calculate_match_score(&subject, &candidate), 200);
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            same_city: 5,
            shared_interest: 1,
            close_age: 3,
            near_age: 2,
            close_age_gap: 1,
            near_age_gap: 2,
        };
        let subject = create_test_profile(1, "Pune", 20, &["music"]);
        let candidate = create_test_profile(2, "Pune", 22, &["music"]);

        assert_eq!(score_breakdown(&subject, &candidate, &weights).total(), 8);
    }

    #[test]
    fn test_shared_interests_sorted() {
        let a = vec!["travel".to_string(), "music".to_string(), "music".to_string()];
        let b = vec!["music".to_string(), "travel".to_string()];

        assert_eq!(shared_interests(&a, &b), vec!["music", "travel"]);
    }
}
