// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchResult, NewProfile, Profile, ProfileUpdate, ScoringWeights};
pub use requests::{ChatQuery, CreateUserRequest, FindMatchesQuery, ListUsersQuery, SendOtpQuery, UpdateUserRequest, VerifyOtpQuery};
pub use responses::{ChatResponse, ErrorResponse, HealthResponse, MessageResponse, VerifyOtpResponse};
