use actix_web::{http::header, web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use super::blocking;
use crate::domain::analytics::{daily_report_filename, Dashboard};
use crate::domain::filter::{OrderFilters, SortDirection, SortField};
use crate::domain::order::{Order, OrderInput};
use crate::errors::AppError;
use crate::AppState;

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersParams {
    pub query: Option<String>,
    pub status: Option<String>,
    pub customer: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Restricts the listing to one user's orders.
    pub username: Option<String>,
    /// Field to sort by. Defaults to `orderNumber`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
    pub updated_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserScopeParams {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    /// Day to report on as `YYYY-MM-DD`. Defaults to today (UTC).
    pub date: Option<String>,
    pub username: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// Lists orders after user scoping, filtering and sorting.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("query" = Option<String>, Query, description = "Matches customer, product or order number"),
        ("status" = Option<String>, Query, description = "Exact status label"),
        ("customer" = Option<String>, Query, description = "Matches customer name"),
        ("startDate" = Option<String>, Query, description = "Inclusive lower date bound"),
        ("endDate" = Option<String>, Query, description = "Inclusive upper date bound"),
        ("username" = Option<String>, Query, description = "Owning user"),
        ("sortBy" = Option<String>, Query, description = "Sort field (default orderNumber)"),
        ("direction" = Option<String>, Query, description = "asc or desc (default desc)"),
    ),
    responses(
        (status = 200, description = "Matching orders", body = [Order]),
        (status = 400, description = "Unknown sort field"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let sort_by = match params.sort_by.as_deref().filter(|s| !s.is_empty()) {
        Some(field) => field.parse::<SortField>().map_err(AppError::BadRequest)?,
        None => SortField::default(),
    };
    let direction = params
        .direction
        .as_deref()
        .map(SortDirection::parse)
        .unwrap_or_default();
    let filters = OrderFilters {
        query: params.query,
        status: params.status,
        customer: params.customer,
        start_date: params.start_date,
        end_date: params.end_date,
    };
    let username = params.username;

    let orders = blocking(move || {
        state
            .orders
            .list_orders(username.as_deref(), &filters, sort_by, direction)
    })
    .await?;

    Ok(HttpResponse::Ok().json(orders))
}

/// POST /orders
///
/// Validates and records a new order. The order number, total, timestamps
/// and first history entry are assigned by the server.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = OrderInput,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<OrderInput>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    let order = blocking(move || state.orders.create_order(input)).await?;
    Ok(HttpResponse::Created().json(order))
}

/// GET /orders/{order_number}
#[utoipa::path(
    get,
    path = "/orders/{order_number}",
    params(
        ("order_number" = u64, Path, description = "Order number"),
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let order_number = path.into_inner();
    match blocking(move || state.orders.get_order(order_number)).await? {
        Some(order) => Ok(HttpResponse::Ok().json(order)),
        None => Err(AppError::NotFound),
    }
}

/// PUT /orders/{order_number}
///
/// Moves the order to a new status and appends to its history.
#[utoipa::path(
    put,
    path = "/orders/{order_number}",
    params(
        ("order_number" = u64, Path, description = "Order number"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_number = path.into_inner();
    let body = body.into_inner();
    let order = blocking(move || {
        state
            .orders
            .update_status(order_number, &body.status, body.updated_by.as_deref())
    })
    .await?;
    Ok(HttpResponse::Ok().json(order))
}

/// DELETE /orders/{order_number}
///
/// Succeeds whether or not the order existed.
#[utoipa::path(
    delete,
    path = "/orders/{order_number}",
    params(
        ("order_number" = u64, Path, description = "Order number"),
    ),
    responses(
        (status = 204, description = "Order removed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let order_number = path.into_inner();
    blocking(move || state.orders.delete_order(order_number)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /orders/analytics
#[utoipa::path(
    get,
    path = "/orders/analytics",
    params(
        ("username" = Option<String>, Query, description = "Owning user"),
    ),
    responses(
        (status = 200, description = "Dashboard figures", body = Dashboard),
        (status = 500, description = "Internal server error"),
    ),
    tag = "analytics"
)]
pub async fn analytics(
    state: web::Data<AppState>,
    query: web::Query<UserScopeParams>,
) -> Result<HttpResponse, AppError> {
    let username = query.into_inner().username;
    let board = blocking(move || state.orders.dashboard(username.as_deref())).await?;
    Ok(HttpResponse::Ok().json(board))
}

/// GET /orders/report
///
/// Plain-text sales report for one day, offered as a download.
#[utoipa::path(
    get,
    path = "/orders/report",
    params(
        ("date" = Option<String>, Query, description = "Day as YYYY-MM-DD, default today"),
        ("username" = Option<String>, Query, description = "Owning user"),
    ),
    responses(
        (status = 200, description = "Report text", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed date"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "analytics"
)]
pub async fn daily_report(
    state: web::Data<AppState>,
    query: web::Query<ReportParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let day = match params.date.as_deref() {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest(format!("Invalid date '{}'", text)))?,
        None => Utc::now().date_naive(),
    };
    let username = params.username;

    let report = blocking(move || state.orders.daily_report(day, username.as_deref())).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", daily_report_filename(day)),
        ))
        .body(report))
}
