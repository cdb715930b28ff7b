use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use super::blocking;
use crate::domain::user::UserView;
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderCountsRequest {
    pub usernames: Vec<String>,
}

/// POST /api/register
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserView),
        (status = 400, description = "Missing fields, user limit reached or username taken"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "users"
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let user = blocking(move || {
        state.users.register(
            req.username.as_deref(),
            req.password.as_deref(),
            req.role.as_deref(),
        )
    })
    .await?;
    Ok(HttpResponse::Created().json(user))
}

/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Registered users", body = [UserView]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "users"
)]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = blocking(move || state.users.list_users()).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/admin/user-order-counts
///
/// Maps each requested username to the number of orders it owns.
#[utoipa::path(
    post,
    path = "/api/admin/user-order-counts",
    request_body = OrderCountsRequest,
    responses(
        (status = 200, description = "Order count per username"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn user_order_counts(
    state: web::Data<AppState>,
    body: web::Json<OrderCountsRequest>,
) -> Result<HttpResponse, AppError> {
    let usernames = body.into_inner().usernames;
    let counts = blocking(move || state.users.order_counts(&usernames)).await?;
    Ok(HttpResponse::Ok().json(counts))
}

/// DELETE /api/admin/delete-user/{username}
///
/// Removes the user and all of their orders.
#[utoipa::path(
    delete,
    path = "/api/admin/delete-user/{username}",
    params(
        ("username" = String, Path, description = "User to remove"),
    ),
    responses(
        (status = 204, description = "User and orders removed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "admin"
)]
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner();
    blocking(move || state.users.delete_user(&username)).await?;
    Ok(HttpResponse::NoContent().finish())
}
