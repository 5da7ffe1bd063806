use crate::models::Profile;

/// Coarse pre-filter options applied before scoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreFilter {
    /// Drop candidates whose gender equals the subject's
    pub exclude_same_gender: bool,
}

/// Check whether a candidate is the subject itself
#[inline]
pub fn is_self(subject: &Profile, candidate: &Profile) -> bool {
    subject.id == candidate.id
}

/// Check whether a candidate shares the subject's gender value
#[inline]
pub fn is_same_gender(subject: &Profile, candidate: &Profile) -> bool {
    subject.gender == candidate.gender
}

/// Check if a candidate survives the pre-filter stage
///
/// Self-exclusion always applies; the gender check only when enabled.
#[inline]
pub fn passes_pre_filter(subject: &Profile, candidate: &Profile, filter: &PreFilter) -> bool {
    if is_self(subject, candidate) {
        return false;
    }

    if filter.exclude_same_gender && is_same_gender(subject, candidate) {
        return false;
    }

    true
}
