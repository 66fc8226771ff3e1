mod auth;
mod config;
mod db;
mod entity;
mod error;
mod repository;
mod response;
mod routes;
mod service;
mod validation;

use std::io;

use actix_web::{middleware, web, App, HttpServer};
use config::AppConfig;
use db::connect_db;
use log::{error, info};
use response::json_error_handler;
use routes::user;
use validation::SkillCatalog;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let config = AppConfig::from_env();
    let catalog = SkillCatalog::load(config.skills_catalog_path.as_deref())?;
    info!("skill catalog loaded with {} entries", catalog.len());
    let db = connect_db(&config)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("db connect failed: {}", e)))?;
    let server_port = config.server_port;

    let server_db = db.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(server_db.clone()))
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(middleware::from_fn(routes::cors::cors_handler))
            .wrap(middleware::Logger::default())
            .service(web::scope("/api/v1/users").configure(user::config))
    })
    .bind(("0.0.0.0", server_port))?;
    info!("server started at http://0.0.0.0:{}", server_port);
    server.run().await?;

    info!("server stopped, closing store");
    if let Err(e) = db.close().await {
        error!("store close failed: {}", e);
    }
    Ok(())
}
