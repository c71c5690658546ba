//! Local HTTP bridge that lets an embedded browser play the video of the
//! most recently opened topic.

pub mod player;
pub mod routes;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rocket::{Build, Rocket};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, instrument};

use crate::env::AppConfig;
use crate::error::AppError;
use crate::telemetry::TelemetryFairing;

/// The single "currently selected" video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NowPlaying {
    pub file_name: String,
    pub title: String,
}

/// Rocket-managed state shared by the request handlers.
pub struct ContentState {
    pub now_playing: watch::Receiver<Option<NowPlaying>>,
    pub video_dir: PathBuf,
}

/// Backslashes become forward slashes and one leading slash is dropped.
pub fn normalize_locator(locator: &str) -> String {
    let normalized = locator.trim().replace('\\', "/");
    match normalized.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => normalized,
    }
}

pub fn resolve_locator(working_dir: &Path, locator: &str) -> PathBuf {
    working_dir.join(normalize_locator(locator))
}

pub struct ContentServer {
    config: AppConfig,
    now_playing: watch::Sender<Option<NowPlaying>>,
    started: Arc<AtomicBool>,
    launch_error: Arc<Mutex<Option<String>>>,
}

impl ContentServer {
    pub fn new(config: AppConfig) -> Self {
        let (now_playing, _) = watch::channel(None);

        Self {
            config,
            now_playing,
            started: Arc::new(AtomicBool::new(false)),
            launch_error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn player_url(&self) -> String {
        self.config.player_url()
    }

    pub fn build_rocket(&self) -> Rocket<Build> {
        let figment = rocket::Config::figment()
            .merge(("address", self.config.content_address))
            .merge(("port", self.config.content_port));

        rocket::custom(figment)
            .manage(ContentState {
                now_playing: self.now_playing.subscribe(),
                video_dir: self.config.video_dir.clone(),
            })
            .mount(
                "/",
                routes![routes::index, routes::serve_video, routes::health],
            )
            .attach(TelemetryFairing)
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Spawns the listener on first use. Returns whether this call started it.
    /// A failed launch clears the running flag so the next call retries.
    #[instrument(skip(self))]
    pub fn ensure_started(&self) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.set_launch_error(None);

        info!(
            address = %self.config.content_address,
            port = self.config.content_port,
            "Starting content server"
        );

        let rocket = self.build_rocket();
        let started = Arc::clone(&self.started);
        let launch_error = Arc::clone(&self.launch_error);
        tokio::spawn(async move {
            if let Err(e) = rocket.launch().await {
                let err = AppError::from(e);
                err.log_and_record("Content server launch");
                started.store(false, Ordering::SeqCst);
                if let Ok(mut slot) = launch_error.lock() {
                    *slot = Some(err.to_string());
                }
            }
        });

        true
    }

    /// Why the last launch failed, if it did.
    pub fn launch_error(&self) -> Option<String> {
        self.launch_error.lock().ok().and_then(|slot| slot.clone())
    }

    fn set_launch_error(&self, error: Option<String>) {
        if let Ok(mut slot) = self.launch_error.lock() {
            *slot = error;
        }
    }

    pub fn select(&self, now_playing: NowPlaying) {
        info!(file_name = %now_playing.file_name, title = %now_playing.title, "Selected video");
        self.now_playing.send_replace(Some(now_playing));
    }

    pub fn now_playing(&self) -> Option<NowPlaying> {
        self.now_playing.borrow().clone()
    }
}
