use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{MessageResponse, SendOtpQuery, VerifyOtpQuery, VerifyOtpResponse};
use crate::routes::AppState;

/// Configure OTP routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/send-otp", web::post().to(send_otp))
        .route("/users/verify-otp", web::post().to(verify_otp));
}

/// Email a one-time password
///
/// POST /users/send-otp?user_email={email}
async fn send_otp(
    state: web::Data<AppState>,
    query: web::Query<SendOtpQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    state.otp.generate(&query.user_email).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "OTP sent successfully".to_string(),
    }))
}

/// Verify a one-time password
///
/// POST /users/verify-otp?user_email={email}&otp={otp}&reg={bool}
///
/// With `reg=true` the email must not be registered yet; otherwise it must
/// belong to an existing user, which is returned on success.
async fn verify_otp(
    state: web::Data<AppState>,
    query: web::Query<VerifyOtpQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let existing = state.store.find_by_email(&query.user_email).await?;

    match (query.reg, existing.is_some()) {
        (true, true) => {
            return Err(ApiError::Unauthorized(
                "A user with this email already exists.".to_string(),
            ));
        }
        (false, false) => {
            return Err(ApiError::Unauthorized(
                "No user exists with this email, try register.".to_string(),
            ));
        }
        _ => {}
    }

    state.otp.verify(&query.user_email, &query.otp).await?;

    Ok(HttpResponse::Ok().json(VerifyOtpResponse {
        verified: true,
        user: existing,
    }))
}
