use std::io;

use actix_web::web;
use dotenvy::dotenv;
use sales_tracker::{build_server, AppConfig, AppState, JsonFileStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config =
        AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    std::fs::create_dir_all(&config.data_dir)?;

    let store = JsonFileStore::new(&config.data_dir);
    let state = web::Data::new(AppState::new(store, config.max_users));

    log::info!(
        "Starting server at http://{}:{} (data in {})",
        config.host,
        config.port,
        config.data_dir.display()
    );

    build_server(state, &config.host, config.port)?.await
}
