use std::path::PathBuf;

use rocket::State;
use rocket::fs::NamedFile;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde_json::{Value, json};
use tracing::info;

use super::ContentState;
use super::player::{render_no_video, render_not_found, render_player};
use crate::error::AppError;

#[get("/")]
pub fn index(state: &State<ContentState>) -> Result<RawHtml<String>, Status> {
    let now_playing = state.now_playing.borrow().clone();

    let page = match now_playing {
        Some(now_playing) => {
            info!(file_name = %now_playing.file_name, "Rendering video player");
            render_player(&now_playing)
        }
        None => render_no_video(),
    };

    page.map(RawHtml)
        .map_err(|e| e.to_status_with_log("Rendering player page"))
}

#[get("/video/<file..>")]
pub async fn serve_video(
    file: PathBuf,
    state: &State<ContentState>,
) -> Result<NamedFile, Custom<RawHtml<String>>> {
    let path = state.video_dir.join(&file);

    match NamedFile::open(&path).await {
        Ok(file) => Ok(file),
        Err(e) => {
            let shown = path.display().to_string();
            let err = AppError::NotFound(format!("{} ({})", shown, e));
            let status = err.to_status_with_log("Serving video");
            let body = render_not_found(&shown)
                .unwrap_or_else(|_| "<h3>File not found</h3>".to_string());
            Err(Custom(status, RawHtml(body)))
        }
    }
}

#[get("/health")]
pub fn health(state: &State<ContentState>) -> Json<Value> {
    let now_playing = state.now_playing.borrow().clone();

    Json(json!({
        "status": "ok",
        "now_playing": now_playing,
    }))
}
