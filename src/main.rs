#[macro_use]
extern crate rocket;

mod auth;
mod content;
mod database;
mod db;
mod env;
mod error;
mod models;
mod navigation;
mod shell;
mod telemetry;
#[cfg(test)]
mod test;
mod validation;

use std::sync::Arc;

use content::ContentServer;
use database::init_database;
use env::{AppConfig, EnvFile, load_environment};
use error::AppError;
use navigation::Navigator;
use shell::Window;
use sqlx::SqlitePool;
use telemetry::init_tracing;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to open database: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

#[rocket::main]
async fn main() -> Result<(), Error> {
    // Env files may carry the OTLP settings, so they are read first and
    // reported once the subscriber is up.
    let env_files = load_environment();
    let _telemetry = init_tracing();
    match { env_files } {
        Ok(files) => files.iter().for_each(EnvFile::log),
        Err(e) => error!(error = %e, "Failed to load environment files"),
    }

    let config = AppConfig::from_env()?;
    info!(database_url = %config.database_url, "Starting learning management system");

    // Not being able to open the store is the one fatal startup condition.
    let pool = SqlitePool::connect(&config.database_url).await?;

    init_database(&pool).await?;

    let content = Arc::new(ContentServer::new(config));
    let mut navigator = Navigator::new(pool.clone(), content);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut window = Window::new(stdin, std::io::stdout());
    window.run(&mut navigator).await?;

    pool.close().await;
    Ok(())
}
