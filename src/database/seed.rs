use sqlx::{Pool, Sqlite};
use tracing::{info, instrument, warn};

use crate::{
    auth::{NewUser, Role},
    db::{add_class, add_topic, add_user},
    error::AppError,
    models::{GRADE_12, GRADE_13, InsertOutcome, NewClass, NewTopic},
};

pub const SEED_VIDEO: &str = "/assets/videos/Accoounting1Topic1.mp4";
pub const SEED_DESCRIPTION: &str = "Sample topic description here.";

const SEED_USERS: [(&str, &str, Role, Option<&str>); 3] = [
    ("Anushka", "abc123", Role::Admin, None),
    ("Imashi", "cde456", Role::Student, Some(GRADE_12)),
    ("Chamika", "fgh789", Role::Student, Some(GRADE_13)),
];

// "Paper Discussions" appears once per grade; class names are unique across
// grades so the Grade 13 row is rejected.
const SEED_CLASSES: [(&str, &str); 9] = [
    ("Accounting 1", GRADE_12),
    ("Business Studies 1", GRADE_12),
    ("Economics 1", GRADE_12),
    ("Paper Discussions", GRADE_12),
    ("Accounting 2", GRADE_13),
    ("Business Studies 2", GRADE_13),
    ("Economics 2", GRADE_13),
    ("Paper Discussions", GRADE_13),
    ("Revision", GRADE_13),
];

const SEED_TOPIC_COUNTS: [(&str, u32); 8] = [
    ("Accounting 1", 10),
    ("Business Studies 1", 6),
    ("Economics 1", 7),
    ("Accounting 2", 5),
    ("Business Studies 2", 6),
    ("Economics 2", 7),
    ("Paper Discussions", 9),
    ("Revision", 4),
];

fn seed_description(class_name: &str, topic_name: &str) -> &'static str {
    match (class_name, topic_name) {
        ("Accounting 1", "Topic 1") => "Introduction to accounting.",
        _ => SEED_DESCRIPTION,
    }
}

#[instrument(skip(pool))]
pub async fn seed_catalog(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    for (username, password, role, grade) in SEED_USERS {
        let user = NewUser {
            username: username.to_string(),
            password: password.to_string(),
            role,
            grade: grade.map(String::from),
        };
        if add_user(pool, &user).await? == InsertOutcome::AlreadyExists {
            warn!(username, "Seed user already present");
        }
    }

    for (name, grade) in SEED_CLASSES {
        let class = NewClass {
            name: name.to_string(),
            grade: grade.to_string(),
        };
        if add_class(pool, &class).await? == InsertOutcome::AlreadyExists {
            warn!(class_name = name, grade, "Seed class skipped, name already taken");
        }
    }

    let mut topics_added = 0;
    for (class_name, count) in SEED_TOPIC_COUNTS {
        for i in 1..=count {
            let topic_name = format!("Topic {}", i);
            let topic = NewTopic {
                description: seed_description(class_name, &topic_name).to_string(),
                name: topic_name,
                class_name: class_name.to_string(),
                video_path: SEED_VIDEO.to_string(),
            };
            if add_topic(pool, &topic).await?.is_inserted() {
                topics_added += 1;
            }
        }
    }

    info!(topics_added, "Seed data inserted");
    Ok(())
}
