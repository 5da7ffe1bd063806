use actix_web::{web, HttpResponse, Responder};

use crate::core::MatchOptions;
use crate::error::ApiError;
use crate::models::{FindMatchesQuery, HealthResponse, Profile};
use crate::routes::AppState;

/// Configure health and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/users/{id}/matches", web::get().to(find_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// GET /users/{id}/matches?minScore=10&excludeSameGender=false&limit=20&withScores=false
///
/// Returns the ordered candidate profiles, or `MatchResult`s with scores
/// when `withScores=true`.
async fn find_matches(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<FindMatchesQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let defaults = state.matcher.default_options();
    let options = MatchOptions {
        min_score: query.min_score.unwrap_or(defaults.min_score),
        exclude_same_gender: query
            .exclude_same_gender
            .unwrap_or(defaults.exclude_same_gender),
        limit: query
            .limit
            .map(|limit| limit.min(state.max_limit as usize)),
    };

    let subject = state.load_profile(user_id).await?;
    let pool = state.store.candidate_pool(user_id).await?;

    tracing::debug!("Found {} candidates for {}", pool.len(), user_id);

    let outcome = state.matcher.find_matches(&subject, &pool, &options);

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates)",
        outcome.matches.len(),
        user_id,
        outcome.total_candidates
    );

    if query.with_scores {
        return Ok(HttpResponse::Ok().json(outcome.matches));
    }

    let profiles: Vec<Profile> = outcome
        .matches
        .into_iter()
        .map(|result| result.candidate)
        .collect();

    Ok(HttpResponse::Ok().json(profiles))
}
