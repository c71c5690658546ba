use sqlx::{Pool, Sqlite};
use tracing::{info, instrument, warn};

use crate::{
    auth::{Credentials, DbUser, NewUser, Role, User},
    error::AppError,
    models::{
        Class, DbClass, DbTopic, DbTopicContent, GRADES, InsertOutcome, NewClass, NewTopic, Topic,
        TopicContent,
    },
};

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

/// Role/grade pairing every stored user must satisfy.
pub fn check_role_grade(role: Role, grade: Option<&str>) -> Result<(), AppError> {
    match (role, grade) {
        (Role::Student, Some(grade)) if GRADES.contains(&grade) => Ok(()),
        (Role::Student, _) => Err(AppError::Validation(
            "Students must be assigned to Grade 12 or Grade 13.".to_string(),
        )),
        (Role::Admin, None) => Ok(()),
        (Role::Admin, Some(_)) => Err(AppError::Validation(
            "Admins must have grade set to 'none'.".to_string(),
        )),
    }
}

#[instrument(skip(pool, password))]
pub async fn check_login(
    pool: &Pool<Sqlite>,
    username: &str,
    password: &str,
) -> Result<Option<Credentials>, AppError> {
    info!("Checking credentials");
    let row: Option<DbUser> = sqlx::query_as(
        "SELECT username, role, grade FROM users WHERE username = ? AND password = ?",
    )
    .bind(username)
    .bind(password)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let user = User::try_from(row)?;
            Ok(Some(Credentials {
                role: user.role,
                grade: user.grade,
            }))
        }
        None => Ok(None),
    }
}

#[instrument(skip(pool))]
pub async fn get_classes_by_grade(pool: &Pool<Sqlite>, grade: &str) -> Result<Vec<String>, AppError> {
    info!("Getting classes for grade");
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT class_name FROM classes WHERE grade = ? ORDER BY id")
            .bind(grade)
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

#[instrument(skip(pool))]
pub async fn get_topics_by_class(
    pool: &Pool<Sqlite>,
    class_name: &str,
) -> Result<Vec<String>, AppError> {
    info!("Getting topics for class");
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT topic_name FROM topics WHERE class_name = ? ORDER BY id")
            .bind(class_name)
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

#[instrument(skip(pool))]
pub async fn get_topic_content(
    pool: &Pool<Sqlite>,
    class_name: &str,
    topic_name: &str,
) -> Result<Option<TopicContent>, AppError> {
    info!("Getting topic content");
    let row: Option<DbTopicContent> = sqlx::query_as(
        "SELECT video_path, description FROM topics WHERE class_name = ? AND topic_name = ?",
    )
    .bind(class_name)
    .bind(topic_name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| TopicContent {
        video_path: row.video_path.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
    }))
}

#[instrument(skip(pool))]
pub async fn get_all_users(pool: &Pool<Sqlite>) -> Result<Vec<User>, AppError> {
    info!("Getting all users");
    let rows: Vec<DbUser> = sqlx::query_as("SELECT username, role, grade FROM users ORDER BY username")
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(User::try_from).collect()
}

#[instrument(skip(pool))]
pub async fn get_all_classes(pool: &Pool<Sqlite>) -> Result<Vec<Class>, AppError> {
    info!("Getting all classes");
    let rows: Vec<DbClass> =
        sqlx::query_as("SELECT id, class_name, grade FROM classes ORDER BY grade, class_name")
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(Class::from).collect())
}

#[instrument(skip(pool))]
pub async fn get_all_class_names(pool: &Pool<Sqlite>) -> Result<Vec<String>, AppError> {
    info!("Getting all class names");
    let rows: Vec<(String,)> = sqlx::query_as("SELECT class_name FROM classes ORDER BY class_name")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

#[instrument(skip(pool))]
pub async fn get_all_topics(pool: &Pool<Sqlite>) -> Result<Vec<Topic>, AppError> {
    info!("Getting all topics");
    let rows: Vec<DbTopic> =
        sqlx::query_as("SELECT id, topic_name, class_name FROM topics ORDER BY class_name, id")
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(Topic::from).collect())
}

async fn count_rows(pool: &Pool<Sqlite>, sql: &str) -> Result<i64, AppError> {
    let (count,): (i64,) = sqlx::query_as(sql).fetch_one(pool).await?;
    Ok(count)
}

pub async fn count_users(pool: &Pool<Sqlite>) -> Result<i64, AppError> {
    count_rows(pool, "SELECT COUNT(*) FROM users").await
}

pub async fn count_classes(pool: &Pool<Sqlite>) -> Result<i64, AppError> {
    count_rows(pool, "SELECT COUNT(*) FROM classes").await
}

pub async fn count_topics(pool: &Pool<Sqlite>) -> Result<i64, AppError> {
    count_rows(pool, "SELECT COUNT(*) FROM topics").await
}

#[instrument(skip(pool, user), fields(username = %user.username, role = %user.role))]
pub async fn add_user(pool: &Pool<Sqlite>, user: &NewUser) -> Result<InsertOutcome, AppError> {
    info!("Adding user");
    check_role_grade(user.role, user.grade.as_deref())?;

    let res = sqlx::query("INSERT INTO users (username, password, role, grade) VALUES (?, ?, ?, ?)")
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.role.as_str())
        .bind(&user.grade)
        .execute(pool)
        .await;

    match res {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(e) if is_unique_violation(&e) => {
            warn!("Username already exists");
            Ok(InsertOutcome::AlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(pool, class), fields(class_name = %class.name, grade = %class.grade))]
pub async fn add_class(pool: &Pool<Sqlite>, class: &NewClass) -> Result<InsertOutcome, AppError> {
    info!("Adding class");
    let res = sqlx::query("INSERT INTO classes (class_name, grade) VALUES (?, ?)")
        .bind(&class.name)
        .bind(&class.grade)
        .execute(pool)
        .await;

    match res {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(e) if is_unique_violation(&e) => {
            warn!("Class name already exists");
            Ok(InsertOutcome::AlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(pool, topic), fields(topic_name = %topic.name, class_name = %topic.class_name))]
pub async fn add_topic(pool: &Pool<Sqlite>, topic: &NewTopic) -> Result<InsertOutcome, AppError> {
    info!("Adding topic");
    let res = sqlx::query(
        "INSERT INTO topics (topic_name, class_name, video_path, description) VALUES (?, ?, ?, ?)",
    )
    .bind(&topic.name)
    .bind(&topic.class_name)
    .bind(&topic.video_path)
    .bind(&topic.description)
    .execute(pool)
    .await;

    match res {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(e) if is_unique_violation(&e) => {
            warn!("Topic already exists in class");
            Ok(InsertOutcome::AlreadyExists)
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(pool))]
pub async fn delete_user(pool: &Pool<Sqlite>, username: &str) -> Result<u64, AppError> {
    info!("Deleting user");
    let res = sqlx::query("DELETE FROM users WHERE username = ?")
        .bind(username)
        .execute(pool)
        .await?;

    Ok(res.rows_affected())
}

/// Topics that name this class are left in place.
#[instrument(skip(pool))]
pub async fn delete_class(pool: &Pool<Sqlite>, class_name: &str) -> Result<u64, AppError> {
    info!("Deleting class");
    let res = sqlx::query("DELETE FROM classes WHERE class_name = ?")
        .bind(class_name)
        .execute(pool)
        .await?;

    Ok(res.rows_affected())
}

#[instrument(skip(pool))]
pub async fn delete_topic(
    pool: &Pool<Sqlite>,
    topic_name: &str,
    class_name: &str,
) -> Result<u64, AppError> {
    info!("Deleting topic");
    let res = sqlx::query("DELETE FROM topics WHERE topic_name = ? AND class_name = ?")
        .bind(topic_name)
        .bind(class_name)
        .execute(pool)
        .await?;

    Ok(res.rows_affected())
}
