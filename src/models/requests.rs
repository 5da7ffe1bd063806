use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::models::domain::{NewProfile, ProfileUpdate};

/// Oldest age accepted from clients
pub const MAX_AGE: u32 = 150;

/// Request to create a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(max = 150))]
    pub age: u32,
    #[validate(length(min = 1))]
    pub gender: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub questionnaire: BTreeMap<String, String>,
}

impl From<CreateUserRequest> for NewProfile {
    fn from(req: CreateUserRequest) -> Self {
        NewProfile {
            name: req.name,
            age: req.age,
            gender: req.gender,
            email: req.email,
            city: req.city,
            interests: req.interests,
            questionnaire: req.questionnaire,
        }
    }
}

/// Request to update a user; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(range(max = 150))]
    pub age: Option<u32>,
    #[validate(length(min = 1))]
    pub gender: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub city: Option<String>,
    pub interests: Option<Vec<String>>,
    pub questionnaire: Option<BTreeMap<String, String>>,
}

impl From<UpdateUserRequest> for ProfileUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        ProfileUpdate {
            name: req.name,
            age: req.age,
            gender: req.gender,
            email: req.email,
            city: req.city,
            interests: req.interests,
            questionnaire: req.questionnaire,
        }
    }
}

/// Query parameters for listing users
#[derive(Debug, Clone, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_list_limit")]
    pub limit: u32,
}

fn default_list_limit() -> u32 {
    10
}

/// Query parameters for the matches endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindMatchesQuery {
    #[serde(rename = "minScore")]
    pub min_score: Option<u32>,
    #[serde(rename = "excludeSameGender")]
    pub exclude_same_gender: Option<bool>,
    pub limit: Option<usize>,
    #[serde(rename = "withScores", default)]
    pub with_scores: bool,
}

/// Query parameters for sending an OTP
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendOtpQuery {
    #[validate(email)]
    pub user_email: String,
}

/// Query parameters for verifying an OTP
///
/// `reg` selects registration mode (the email must not exist yet) or login
/// mode (the email must exist).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyOtpQuery {
    #[validate(email)]
    pub user_email: String,
    #[validate(length(min = 1))]
    pub otp: String,
    pub reg: bool,
}

/// Query parameters for the generated-reply endpoint
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatQuery {
    pub user_id: i64,
    #[validate(length(min = 1))]
    pub message: String,
}
