use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://lms.db?mode=rwc";
pub const DEFAULT_VIDEO_DIR: &str = "assets/videos";
pub const DEFAULT_CONTENT_PORT: u16 = 5000;

/// Outcome of reading one env file, logged once tracing is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(String),
    Missing(String),
}

impl EnvFile {
    pub fn log(&self) {
        match self {
            EnvFile::Loaded(path) => info!("Loaded environment from: {}", path),
            EnvFile::Missing(path) => warn!("Environment file {} not found, skipping", path),
        }
    }
}

pub fn load_environment() -> Result<Vec<EnvFile>, Box<dyn std::error::Error>> {
    let is_production =
        dotenvy::var("LMS_PROFILE").unwrap_or("development".to_string()) == "production";

    let env_files = if is_production {
        vec!["config/common.env", "config/prod.env", ".secrets.env"]
    } else {
        vec!["config/common.env", "config/dev.env", ".secrets.env"]
    };

    env_files.into_iter().map(load_env_file).collect()
}

pub fn load_env_file(path: &str) -> Result<EnvFile, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        return Ok(EnvFile::Missing(path.to_string()));
    }

    dotenvy::from_filename_override(path)?;
    Ok(EnvFile::Loaded(path.to_string()))
}

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    /// Directory the content server reads video files from.
    pub video_dir: PathBuf,
    /// Directory stored video locators are resolved against.
    pub working_dir: PathBuf,
    pub content_address: IpAddr,
    pub content_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let working_dir = std::env::current_dir()?;

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let video_dir = std::env::var("VIDEO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_VIDEO_DIR));
        let video_dir = if video_dir.is_absolute() {
            video_dir
        } else {
            working_dir.join(video_dir)
        };

        let content_address = match std::env::var("CONTENT_ADDRESS") {
            Ok(raw) => raw.parse::<IpAddr>().map_err(|e| {
                AppError::Validation(format!("Invalid CONTENT_ADDRESS '{}': {}", raw, e))
            })?,
            Err(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let content_port = match std::env::var("CONTENT_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| {
                AppError::Validation(format!("Invalid CONTENT_PORT '{}': {}", raw, e))
            })?,
            Err(_) => DEFAULT_CONTENT_PORT,
        };

        Ok(Self {
            database_url,
            video_dir,
            working_dir,
            content_address,
            content_port,
        })
    }

    /// Address the embedded browser surface is pointed at.
    pub fn player_url(&self) -> String {
        format!("http://{}:{}/", self.content_address, self.content_port)
    }
}

#[cfg(test)]
pub fn test_config(working_dir: &Path) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        video_dir: working_dir.join(DEFAULT_VIDEO_DIR),
        working_dir: working_dir.to_path_buf(),
        content_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        content_port: 0,
    }
}
