use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use article_api::data::Database;
use article_api::{handlers, utils, AppState, ArticleRepository, Config};

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    utils::init_logger(config.logging.level)?;
    info!("Starting article API...");

    info!("Initializing database...");
    let database = Database::open(&config.database.path, config.database.pool_size)?;
    let repository: Arc<dyn ArticleRepository> = database.article_repository();
    let state = web::Data::new(AppState::new(repository.clone()));

    let server = &config.server;
    info!(
        "Listening on {} with {} workers",
        server.bind_address, server.workers
    );
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(handlers::cors())
            .wrap(Logger::new(r#"%a "%r" %s %b %T"#))
            .configure(handlers::configure)
    })
    .workers(server.workers)
    .client_request_timeout(server.read_timeout)
    .keep_alive(server.keep_alive)
    .shutdown_timeout(server.shutdown_timeout.as_secs())
    .bind(server.bind_address.as_str())
    .with_context(|| format!("Failed to bind {}", server.bind_address))?
    .run()
    .await
    .context("HTTP server failed")?;

    info!("Server stopped, closing the database");
    repository.close();
    Ok(())
}
