use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored user profile
///
/// `interests` is compared as a set by the scoring engine; duplicates and
/// ordering carry no meaning there but are preserved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub email: String,
    pub city: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub questionnaire: BTreeMap<String, String>,
}

impl Profile {
    /// Apply an update field by field. `id` is never touched.
    pub fn apply_update(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            name,
            age,
            gender,
            email,
            city,
            interests,
            questionnaire,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(age) = age {
            self.age = age;
        }
        if let Some(gender) = gender {
            self.gender = gender;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(city) = city {
            self.city = city;
        }
        if let Some(interests) = interests {
            self.interests = interests;
        }
        if let Some(questionnaire) = questionnaire {
            self.questionnaire = questionnaire;
        }
    }
}

/// Profile data before storage assigns an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub email: String,
    pub city: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub questionnaire: BTreeMap<String, String>,
}

impl NewProfile {
    pub fn into_profile(self, id: i64) -> Profile {
        Profile {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            email: self.email,
            city: self.city,
            interests: self.interests,
            questionnaire: self.questionnaire,
        }
    }
}

/// The mutable subset of a profile. `None` leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub interests: Option<Vec<String>>,
    pub questionnaire: Option<BTreeMap<String, String>>,
}

/// A candidate that cleared the score threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate: Profile,
    pub score: u32,
    #[serde(rename = "sharedInterests")]
    pub shared_interests: Vec<String>,
}

/// Scoring weights
///
/// The defaults are the reference weights: +50 for the same city, +10 per
/// shared interest, +30 for an age gap of at most 5 years and +15 for a gap
/// of at most 10 years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub same_city: u32,
    pub shared_interest: u32,
    pub close_age: u32,
    pub near_age: u32,
    pub close_age_gap: u32,
    pub near_age_gap: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            same_city: 50,
            shared_interest: 10,
            close_age: 30,
            near_age: 15,
            close_age_gap: 5,
            near_age_gap: 10,
        }
    }
}
