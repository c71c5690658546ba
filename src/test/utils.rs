#[cfg(test)]
pub mod test_utils {
    use crate::auth::{NewUser, Role};
    use crate::content::ContentServer;
    use crate::database::{CURRENT_SCHEMA, SEED_VIDEO, init_database};
    use crate::db::{add_class, add_topic, add_user};
    use crate::env::test_config;
    use crate::error::AppError;
    use crate::models::{NewClass, NewTopic};
    use crate::navigation::Navigator;
    use sqlx::{Pool, Sqlite, SqlitePool};
    use std::path::Path;
    use std::sync::{Arc, Once};
    use tempfile::TempDir;

    static INIT: Once = Once::new();
    pub static STANDARD_PASSWORD: &str = "password123";
    pub static VIDEO_BYTES: &[u8] = b"not really an mp4";

    #[derive(Default)]
    pub struct TestDbBuilder {
        seeded: bool,
        users: Vec<NewUser>,
        classes: Vec<NewClass>,
        topics: Vec<NewTopic>,
    }

    impl TestDbBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        /// Starts from the first-run catalog instead of empty tables.
        pub fn seeded(mut self) -> Self {
            self.seeded = true;
            self
        }

        pub fn student(mut self, username: &str, grade: &str) -> Self {
            self.users.push(NewUser {
                username: username.to_string(),
                password: STANDARD_PASSWORD.to_string(),
                role: Role::Student,
                grade: Some(grade.to_string()),
            });
            self
        }

        pub fn admin(mut self, username: &str) -> Self {
            self.users.push(NewUser {
                username: username.to_string(),
                password: STANDARD_PASSWORD.to_string(),
                role: Role::Admin,
                grade: None,
            });
            self
        }

        pub fn class(mut self, name: &str, grade: &str) -> Self {
            self.classes.push(NewClass {
                name: name.to_string(),
                grade: grade.to_string(),
            });
            self
        }

        pub fn topic(mut self, name: &str, class_name: &str, video_path: &str) -> Self {
            self.topics.push(NewTopic {
                name: name.to_string(),
                class_name: class_name.to_string(),
                video_path: video_path.to_string(),
                description: format!("About {}", name),
            });
            self
        }

        pub async fn build(self) -> Result<TestDb, AppError> {
            INIT.call_once(|| {
                let _ = env_logger::builder().is_test(true).try_init();
            });

            let pool = SqlitePool::connect("sqlite::memory:").await?;

            if self.seeded {
                init_database(&pool).await?;
            } else {
                sqlx::raw_sql(CURRENT_SCHEMA).execute(&pool).await?;
            }

            for user in &self.users {
                add_user(&pool, user).await?;
            }
            for class in &self.classes {
                add_class(&pool, class).await?;
            }
            for topic in &self.topics {
                add_topic(&pool, topic).await?;
            }

            Ok(TestDb { pool })
        }
    }

    pub struct TestDb {
        pub pool: Pool<Sqlite>,
    }

    impl TestDb {
        pub async fn count_where(&self, sql: &str, key: &str) -> i64 {
            let (count,): (i64,) = sqlx::query_as(sql)
                .bind(key)
                .fetch_one(&self.pool)
                .await
                .expect("Failed to count rows");
            count
        }
    }

    pub async fn create_seeded_test_db() -> TestDb {
        TestDbBuilder::new()
            .seeded()
            .build()
            .await
            .expect("Failed to build seeded test database")
    }

    /// Working directory holding the seed video at its stored locator.
    pub fn video_workspace() -> TempDir {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        write_video(dir.path(), SEED_VIDEO);
        dir
    }

    pub fn write_video(working_dir: &Path, locator: &str) {
        let path = working_dir.join(locator.trim_start_matches('/'));
        std::fs::create_dir_all(path.parent().expect("video path has a parent"))
            .expect("Failed to create video dir");
        std::fs::write(&path, VIDEO_BYTES).expect("Failed to write video");
    }

    pub fn test_navigator(test_db: &TestDb, working_dir: &Path) -> Navigator {
        let content = Arc::new(ContentServer::new(test_config(working_dir)));
        Navigator::new(test_db.pool.clone(), content)
    }
}
