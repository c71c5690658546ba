use handlebars::Handlebars;
use once_cell::sync::Lazy;
use rocket::http::RawStr;
use serde_json::{Value, json};
use std::collections::HashMap;

use super::NowPlaying;
use crate::error::AppError;

static PAGE_REGISTRY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("player", include_str!("player.html.hbs"));
    m.insert("no_video", include_str!("no_video.html.hbs"));
    m.insert("not_found", include_str!("not_found.html.hbs"));
    m
});

/// Renders a named page. Values are HTML-escaped by the template engine.
pub fn render(name: &str, ctx: &Value) -> Result<String, AppError> {
    let template = PAGE_REGISTRY
        .get(name)
        .ok_or_else(|| AppError::Internal(format!("unknown page '{}'", name)))?;

    let mut hb = Handlebars::new();
    hb.set_strict_mode(true);

    hb.render_template(template, ctx)
        .map_err(|e| AppError::Internal(format!("rendering page '{}' failed: {}", name, e)))
}

/// URL path the player requests the file from. The name is a single
/// percent-encoded segment so `#`, `?` and `%` survive the round trip.
pub fn video_src(file_name: &str) -> String {
    format!("/video/{}", RawStr::new(file_name).percent_encode())
}

pub fn render_player(now_playing: &NowPlaying) -> Result<String, AppError> {
    render(
        "player",
        &json!({
            "title": now_playing.title,
            "src": video_src(&now_playing.file_name),
        }),
    )
}

pub fn render_no_video() -> Result<String, AppError> {
    render("no_video", &json!({}))
}

pub fn render_not_found(path: &str) -> Result<String, AppError> {
    render("not_found", &json!({ "path": path }))
}
