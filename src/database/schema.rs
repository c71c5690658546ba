use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;

/// Role/grade pairing is checked here as well as in the add-user form.
pub const CURRENT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password TEXT NOT NULL,
    role TEXT NOT NULL,
    grade TEXT,
    CHECK (
        (role = 'admin' AND grade IS NULL)
        OR (role = 'student' AND grade IS NOT NULL)
    )
);

CREATE TABLE IF NOT EXISTS classes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    class_name TEXT NOT NULL UNIQUE,
    grade TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS topics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_name TEXT NOT NULL,
    class_name TEXT NOT NULL,
    video_path TEXT NOT NULL,
    description TEXT NOT NULL,
    UNIQUE (topic_name, class_name)
);
"#;

pub async fn schema_exists(pool: &Pool<Sqlite>) -> Result<bool, AppError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'")
            .fetch_optional(pool)
            .await?;

    Ok(row.is_some())
}

/// Creates any missing tables and seeds the catalog the first time the
/// database is created. Returns whether seeding happened.
#[instrument(skip(pool))]
pub async fn init_database(pool: &Pool<Sqlite>) -> Result<bool, AppError> {
    let existed = schema_exists(pool).await?;

    sqlx::raw_sql(CURRENT_SCHEMA).execute(pool).await?;

    if existed {
        info!("Database already initialised, skipping seed data");
        return Ok(false);
    }

    info!("Fresh database, inserting seed data");
    super::seed::seed_catalog(pool).await?;
    Ok(true)
}
