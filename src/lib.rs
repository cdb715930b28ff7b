pub mod api_doc;
pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use actix_web::{error, middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::application::order_service::OrderService;
use crate::application::user_service::UserService;
use crate::errors::AppError;

pub use config::AppConfig;
pub use infrastructure::json_store::JsonFileStore;

/// Services shared by every worker.
pub struct AppState {
    pub orders: OrderService<JsonFileStore>,
    pub users: UserService<JsonFileStore>,
}

impl AppState {
    pub fn new(store: JsonFileStore, max_users: usize) -> Self {
        Self {
            orders: OrderService::new(store.clone()),
            users: UserService::new(store, max_users),
        }
    }
}

/// Registers every route, plus JSON error bodies for malformed requests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| error::Error::from(AppError::NotFound)),
    )
    .service(
        web::scope("/orders")
            .route("", web::get().to(handlers::orders::list_orders))
            .route("", web::post().to(handlers::orders::create_order))
            .route("/analytics", web::get().to(handlers::orders::analytics))
            .route("/report", web::get().to(handlers::orders::daily_report))
            .route("/{order_number}", web::get().to(handlers::orders::get_order))
            .route("/{order_number}", web::put().to(handlers::orders::update_order))
            .route("/{order_number}", web::delete().to(handlers::orders::delete_order)),
    )
    .service(
        web::scope("/api")
            .route("/register", web::post().to(handlers::users::register))
            .route("/users", web::get().to(handlers::users::list_users))
            .route(
                "/admin/user-order-counts",
                web::post().to(handlers::users::user_order_counts),
            )
            .route(
                "/admin/delete-user/{username}",
                web::delete().to(handlers::users::delete_user),
            ),
    )
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
