use serde::Serialize;

pub const GRADE_12: &str = "Grade 12";
pub const GRADE_13: &str = "Grade 13";
pub const GRADES: [&str; 2] = [GRADE_12, GRADE_13];

/// Result of an insert that may collide with an existing unique key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub grade: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbClass {
    pub id: Option<i64>,
    pub class_name: Option<String>,
    pub grade: Option<String>,
}

impl From<DbClass> for Class {
    fn from(class: DbClass) -> Self {
        Self {
            id: class.id.unwrap_or_default(),
            name: class.class_name.unwrap_or_default(),
            grade: class.grade.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewClass {
    pub name: String,
    pub grade: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    pub class_name: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbTopic {
    pub id: Option<i64>,
    pub topic_name: Option<String>,
    pub class_name: Option<String>,
}

impl From<DbTopic> for Topic {
    fn from(topic: DbTopic) -> Self {
        Self {
            id: topic.id.unwrap_or_default(),
            name: topic.topic_name.unwrap_or_default(),
            class_name: topic.class_name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicContent {
    pub video_path: String,
    pub description: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbTopicContent {
    pub video_path: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTopic {
    pub name: String,
    pub class_name: String,
    pub video_path: String,
    pub description: String,
}
