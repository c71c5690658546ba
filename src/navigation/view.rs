use crate::auth::User;
use crate::content::NowPlaying;
use crate::models::{Class, Topic};

pub const NO_DESCRIPTION: &str = "No description provided.";

/// Everything the window needs to draw the current page.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Login,
    StudentDashboard {
        username: String,
        grade: String,
        classes: Vec<String>,
    },
    Class {
        username: String,
        class_name: String,
        topics: Vec<String>,
    },
    Topic {
        username: String,
        title: String,
        description: String,
        player_url: String,
        now_playing: Option<NowPlaying>,
    },
    AdminDashboard {
        username: String,
        user_count: i64,
        class_count: i64,
        topic_count: i64,
    },
    Users {
        username: String,
        users: Vec<User>,
    },
    Classes {
        username: String,
        classes: Vec<Class>,
    },
    Topics {
        username: String,
        topics: Vec<Topic>,
    },
    AddUser,
    AddClass,
    AddTopic {
        class_names: Vec<String>,
    },
}

impl View {
    /// Message drawn in place of an empty list.
    pub fn empty_message(&self) -> Option<String> {
        match self {
            View::StudentDashboard { grade, classes, .. } if classes.is_empty() => {
                Some(format!("No classes found for {}.", grade))
            }
            View::Class {
                class_name, topics, ..
            } if topics.is_empty() => Some(format!("No topics found for {}.", class_name)),
            View::Users { users, .. } if users.is_empty() => {
                Some("No users found in the database.".to_string())
            }
            View::Classes { classes, .. } if classes.is_empty() => {
                Some("No classes found in the database.".to_string())
            }
            View::Topics { topics, .. } if topics.is_empty() => {
                Some("No topics found in the database.".to_string())
            }
            View::AddTopic { class_names } if class_names.is_empty() => {
                Some("Add a class before adding topics.".to_string())
            }
            _ => None,
        }
    }
}
