use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{CreateUserRequest, ListUsersQuery, MessageResponse, UpdateUserRequest};
use crate::routes::AppState;

/// Configure profile CRUD routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .route(web::post().to(create_user))
            .route(web::get().to(list_users)),
    )
    .service(
        web::resource("/users/{id}")
            .route(web::get().to(get_user))
            .route(web::put().to(update_user))
            .route(web::delete().to(delete_user)),
    );
}

/// Create a user
///
/// POST /users
async fn create_user(
    state: web::Data<AppState>,
    req: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let created = state.store.create(req.into_inner().into()).await?;
    tracing::info!("Created user {}", created.id);

    Ok(HttpResponse::Ok().json(created))
}

/// List users
///
/// GET /users?skip=0&limit=10
async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.limit.min(state.max_limit);
    let users = state.store.list(query.skip, limit).await?;

    Ok(HttpResponse::Ok().json(users))
}

/// Get a single user
///
/// GET /users/{id}
async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let profile = state.load_profile(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Update the mutable fields of a user
///
/// PUT /users/{id}
async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let id = path.into_inner();
    let updated = state.store.update(id, req.into_inner().into()).await?;
    state.cache.invalidate(id).await;

    tracing::info!("Updated user {}", id);
    Ok(HttpResponse::Ok().json(updated))
}

/// Delete a user
///
/// DELETE /users/{id}
async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state.store.delete(id).await?;
    state.cache.invalidate(id).await;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("User with ID {} has been deleted successfully", id),
    }))
}
