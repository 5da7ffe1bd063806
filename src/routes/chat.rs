use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{ChatQuery, ChatResponse};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/get-response", web::get().to(get_response));
}

/// Reply to a message in a user's style
///
/// GET /get-response?user_id={id}&message={text}
async fn get_response(
    state: web::Data<AppState>,
    query: web::Query<ChatQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let profile = state.load_profile(query.user_id).await?;
    let reply = state.assistant.generate_reply(&profile, &query.message).await?;

    Ok(HttpResponse::Ok().json(ChatResponse { reply }))
}
