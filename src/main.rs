mod config;
mod db;
mod errors;
mod filters;
mod handlers;
mod logger;
mod models;
mod registry;
mod routes;
mod swagger;
mod validation;

use config::Config;
use db::Storage;
use registry::Registry;
use std::sync::Arc;
use utoipa::OpenApi;
use warp::{self, Filter};

#[tokio::main]
async fn main() -> mongodb::error::Result<()> {
    logger::start_log();

    let config = Config::from_env();
    let registry = Arc::new(
        Registry::load(config.registry_path.as_deref()).expect("Failed to load the registry file"),
    );

    let storage = Storage::connect(&config.mongodb_uri).await?;
    storage.ensure_indexes().await?;

    let doc_config = swagger::doc_config();

    let api_doc = warp::path("api-doc.json")
        .and(warp::get())
        .map(|| warp::reply::json(&swagger::IntellizonDoc::openapi()));

    let swagger_ui = warp::path("docs")
        .and(warp::get())
        .and(warp::path::full())
        .and(warp::path::tail())
        .and(warp::any().map(move || doc_config.clone()))
        .and_then(swagger::serve_swagger);

    let routes = api_doc
        .or(swagger_ui)
        .or(routes::all_routes(
            storage,
            registry,
            config.front_secret.clone(),
            config.helium_secret.clone(),
        ))
        .recover(errors::handle_rejection)
        .with(filters::cors());

    log::info!("IntelliZon gateway listening on port {}", config.port);
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;

    Ok(())
}
