#[cfg(test)]
mod tests {
    use crate::auth::Role;
    use crate::database::SEED_VIDEO;
    use crate::models::GRADE_12;
    use crate::navigation::{Action, AdminSection, NO_DESCRIPTION, Page, View};
    use crate::test::test_utils::{
        STANDARD_PASSWORD, TestDbBuilder, create_seeded_test_db, test_navigator, video_workspace,
        write_video,
    };
    use crate::validation::{NewClassForm, NewTopicForm, NewUserForm};

    fn login(username: &str, password: &str) -> Action {
        Action::Login {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[rocket::async_test]
    async fn test_failed_login_raises_alert() {
        let test_db = create_seeded_test_db().await;
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator
            .dispatch(login("Imashi", "wrong"))
            .await
            .expect("Dispatch should not fail");

        assert_eq!(
            navigator.take_alert().as_deref(),
            Some("Invalid username or password")
        );
        assert_eq!(navigator.current(), &Page::Login);
        assert!(navigator.session().is_none());
    }

    #[rocket::async_test]
    async fn test_student_browses_and_plays_topic() {
        let test_db = create_seeded_test_db().await;
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator.dispatch(login(" Imashi ", "cde456")).await.unwrap();
        assert!(navigator.take_alert().is_none());
        assert_eq!(
            navigator.current(),
            &Page::StudentDashboard {
                grade: GRADE_12.to_string()
            }
        );

        let View::StudentDashboard {
            username, classes, ..
        } = navigator.render().await.unwrap()
        else {
            panic!("Expected the student dashboard");
        };
        assert_eq!(username, "Imashi");
        assert_eq!(classes[0], "Accounting 1");

        navigator
            .dispatch(Action::OpenClass("Accounting 1".to_string()))
            .await
            .unwrap();
        let View::Class { topics, .. } = navigator.render().await.unwrap() else {
            panic!("Expected the class page");
        };
        assert_eq!(topics.len(), 10);

        assert!(!navigator.content().is_running());
        navigator
            .dispatch(Action::OpenTopic("Topic 1".to_string()))
            .await
            .unwrap();
        assert!(navigator.take_alert().is_none());
        assert!(navigator.content().is_running());
        assert_eq!(navigator.history().len(), 2);

        let now_playing = navigator
            .content()
            .now_playing()
            .expect("A video should be selected");
        assert_eq!(now_playing.file_name, "Accoounting1Topic1.mp4");
        assert_eq!(now_playing.title, "Accounting 1 - Topic 1");

        let View::Topic {
            title, description, ..
        } = navigator.render().await.unwrap()
        else {
            panic!("Expected the topic page");
        };
        assert_eq!(title, "Accounting 1 - Topic 1");
        assert_eq!(description, "Introduction to accounting.");

        navigator.dispatch(Action::Back).await.unwrap();
        assert!(matches!(navigator.current(), Page::ClassPage { .. }));
        navigator.dispatch(Action::Back).await.unwrap();
        assert!(matches!(navigator.current(), Page::StudentDashboard { .. }));
        navigator.dispatch(Action::Back).await.unwrap();
        assert!(matches!(navigator.current(), Page::StudentDashboard { .. }));
    }

    #[rocket::async_test]
    async fn test_missing_video_file_keeps_class_page() {
        let test_db = create_seeded_test_db().await;
        let workspace = tempfile::tempdir().unwrap();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator.dispatch(login("Imashi", "cde456")).await.unwrap();
        navigator
            .dispatch(Action::OpenClass("Accounting 1".to_string()))
            .await
            .unwrap();
        navigator
            .dispatch(Action::OpenTopic("Topic 3".to_string()))
            .await
            .unwrap();

        let alert = navigator.take_alert().expect("Expected an alert");
        assert!(alert.starts_with("Video file not found at: "));
        assert!(alert.ends_with("Accoounting1Topic1.mp4"));
        assert!(matches!(navigator.current(), Page::ClassPage { .. }));
        assert!(navigator.content().now_playing().is_none());
        assert!(!navigator.content().is_running());
    }

    #[rocket::async_test]
    async fn test_empty_locator_reports_missing_path() {
        let test_db = TestDbBuilder::new()
            .student("student_user", GRADE_12)
            .class("Maths", GRADE_12)
            .topic("Vectors", "Maths", "   ")
            .build()
            .await
            .unwrap();
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator
            .dispatch(login("student_user", STANDARD_PASSWORD))
            .await
            .unwrap();
        navigator
            .dispatch(Action::OpenClass("Maths".to_string()))
            .await
            .unwrap();
        navigator
            .dispatch(Action::OpenTopic("Vectors".to_string()))
            .await
            .unwrap();

        assert_eq!(
            navigator.take_alert().as_deref(),
            Some("No video path found for 'Vectors' in database.")
        );
    }

    #[rocket::async_test]
    async fn test_backslash_locator_resolves() {
        let test_db = TestDbBuilder::new()
            .student("student_user", GRADE_12)
            .class("Maths", GRADE_12)
            .topic("Vectors", "Maths", "\\assets\\videos\\vectors.mp4")
            .build()
            .await
            .unwrap();
        let workspace = tempfile::tempdir().unwrap();
        write_video(workspace.path(), "assets/videos/vectors.mp4");
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator
            .dispatch(login("student_user", STANDARD_PASSWORD))
            .await
            .unwrap();
        navigator
            .dispatch(Action::OpenClass("Maths".to_string()))
            .await
            .unwrap();
        navigator
            .dispatch(Action::OpenTopic("Vectors".to_string()))
            .await
            .unwrap();

        assert!(navigator.take_alert().is_none());
        assert_eq!(
            navigator.content().now_playing().map(|n| n.file_name),
            Some("vectors.mp4".to_string())
        );

        let View::Topic { description, .. } = navigator.render().await.unwrap() else {
            panic!("Expected the topic page");
        };
        assert_eq!(description, "About Vectors");
    }

    #[rocket::async_test]
    async fn test_empty_states() {
        let test_db = TestDbBuilder::new()
            .student("student_user", GRADE_12)
            .class("Maths", GRADE_12)
            .build()
            .await
            .unwrap();
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator
            .dispatch(login("student_user", STANDARD_PASSWORD))
            .await
            .unwrap();
        navigator
            .dispatch(Action::OpenClass("Maths".to_string()))
            .await
            .unwrap();

        let view = navigator.render().await.unwrap();
        assert_eq!(
            view.empty_message().as_deref(),
            Some("No topics found for Maths.")
        );
    }

    #[rocket::async_test]
    async fn test_logout_clears_session_and_history() {
        let test_db = create_seeded_test_db().await;
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator.dispatch(login("Imashi", "cde456")).await.unwrap();
        navigator
            .dispatch(Action::OpenClass("Accounting 1".to_string()))
            .await
            .unwrap();
        navigator.dispatch(Action::Logout).await.unwrap();

        assert_eq!(navigator.current(), &Page::Login);
        assert!(navigator.history().is_empty());
        assert!(navigator.session().is_none());
        assert_eq!(navigator.render().await.unwrap(), View::Login);
    }

    #[rocket::async_test]
    async fn test_student_cannot_reach_admin_pages() {
        let test_db = create_seeded_test_db().await;
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator.dispatch(login("Imashi", "cde456")).await.unwrap();
        navigator
            .dispatch(Action::OpenSection(AdminSection::Users))
            .await
            .unwrap();

        assert_eq!(
            navigator.take_alert().as_deref(),
            Some("That action is not available on this page.")
        );
        assert!(matches!(navigator.current(), Page::StudentDashboard { .. }));

        navigator
            .dispatch(Action::DeleteUser("Anushka".to_string()))
            .await
            .unwrap();
        assert!(navigator.take_alert().is_some());
        assert_eq!(
            test_db
                .count_where("SELECT COUNT(*) FROM users WHERE username = ?", "Anushka")
                .await,
            1
        );
    }

    #[rocket::async_test]
    async fn test_admin_login_lands_on_dashboard() {
        let test_db = create_seeded_test_db().await;
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator.dispatch(login("Anushka", "abc123")).await.unwrap();

        assert_eq!(navigator.current(), &Page::AdminDashboard);
        assert_eq!(navigator.session().map(|s| s.role), Some(Role::Admin));

        let view = navigator.render().await.unwrap();
        assert_eq!(
            view,
            View::AdminDashboard {
                username: "Anushka".to_string(),
                user_count: 3,
                class_count: 8,
                topic_count: 54,
            }
        );

        navigator
            .dispatch(Action::OpenClass("Accounting 1".to_string()))
            .await
            .unwrap();
        assert!(navigator.take_alert().is_some());
        assert_eq!(navigator.current(), &Page::AdminDashboard);
    }

    #[rocket::async_test]
    async fn test_admin_adds_class() {
        let test_db = create_seeded_test_db().await;
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator.dispatch(login("Anushka", "abc123")).await.unwrap();
        navigator
            .dispatch(Action::OpenSection(AdminSection::Classes))
            .await
            .unwrap();
        navigator.dispatch(Action::OpenAddForm).await.unwrap();
        assert_eq!(navigator.current(), &Page::AddClass);

        navigator
            .dispatch(Action::SubmitClass(NewClassForm {
                class_name: "  ".to_string(),
                grade: GRADE_12.to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(
            navigator.take_alert().as_deref(),
            Some("All fields must be filled.")
        );
        assert_eq!(navigator.current(), &Page::AddClass);

        navigator
            .dispatch(Action::SubmitClass(NewClassForm {
                class_name: "Accounting 1".to_string(),
                grade: GRADE_12.to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(
            navigator.take_alert().as_deref(),
            Some("Class 'Accounting 1' already exists.")
        );
        assert_eq!(navigator.current(), &Page::AddClass);

        navigator
            .dispatch(Action::SubmitClass(NewClassForm {
                class_name: " Statistics ".to_string(),
                grade: GRADE_12.to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(
            navigator.take_notice().as_deref(),
            Some("Class 'Statistics' added successfully.")
        );
        assert_eq!(navigator.current(), &Page::EditClasses);

        let View::Classes { classes, .. } = navigator.render().await.unwrap() else {
            panic!("Expected the class list");
        };
        assert!(classes.iter().any(|class| class.name == "Statistics"));
    }

    #[rocket::async_test]
    async fn test_admin_adds_user_and_topic() {
        let test_db = create_seeded_test_db().await;
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator.dispatch(login("Anushka", "abc123")).await.unwrap();
        navigator
            .dispatch(Action::OpenSection(AdminSection::Users))
            .await
            .unwrap();
        navigator.dispatch(Action::OpenAddForm).await.unwrap();

        let mut form = NewUserForm {
            username: "Nimal".to_string(),
            password: "secret".to_string(),
            confirm_password: "secrets".to_string(),
            role: "student".to_string(),
            grade: GRADE_12.to_string(),
        };
        navigator
            .dispatch(Action::SubmitUser(form.clone()))
            .await
            .unwrap();
        assert_eq!(
            navigator.take_alert().as_deref(),
            Some("Passwords do not match.")
        );

        form.confirm_password = "secret".to_string();
        navigator.dispatch(Action::SubmitUser(form)).await.unwrap();
        assert_eq!(
            navigator.take_notice().as_deref(),
            Some("User 'Nimal' added successfully.")
        );
        assert_eq!(navigator.current(), &Page::EditUsers);

        navigator.dispatch(Action::Back).await.unwrap();
        navigator
            .dispatch(Action::OpenSection(AdminSection::Topics))
            .await
            .unwrap();
        navigator.dispatch(Action::OpenAddForm).await.unwrap();

        let View::AddTopic { class_names } = navigator.render().await.unwrap() else {
            panic!("Expected the topic form");
        };
        assert!(class_names.contains(&"Revision".to_string()));

        let topic = NewTopicForm {
            topic_name: "Topic 1".to_string(),
            class_name: "Revision".to_string(),
            description: "Again".to_string(),
            video_path: SEED_VIDEO.to_string(),
        };
        navigator
            .dispatch(Action::SubmitTopic(topic.clone()))
            .await
            .unwrap();
        assert_eq!(
            navigator.take_alert().as_deref(),
            Some("Topic 'Topic 1' already exists in 'Revision'.")
        );

        navigator
            .dispatch(Action::SubmitTopic(NewTopicForm {
                topic_name: "Topic 5".to_string(),
                ..topic
            }))
            .await
            .unwrap();
        assert_eq!(
            navigator.take_notice().as_deref(),
            Some("Topic 'Topic 5' added to 'Revision' successfully.")
        );
        assert_eq!(navigator.current(), &Page::EditTopics);
    }

    #[rocket::async_test]
    async fn test_admin_deletes_show_notices() {
        let test_db = create_seeded_test_db().await;
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator.dispatch(login("Anushka", "abc123")).await.unwrap();
        navigator
            .dispatch(Action::OpenSection(AdminSection::Users))
            .await
            .unwrap();
        navigator
            .dispatch(Action::DeleteUser("Chamika".to_string()))
            .await
            .unwrap();
        assert_eq!(
            navigator.take_notice().as_deref(),
            Some("User 'Chamika' removed successfully.")
        );

        navigator.dispatch(Action::Back).await.unwrap();
        navigator
            .dispatch(Action::OpenSection(AdminSection::Topics))
            .await
            .unwrap();
        navigator
            .dispatch(Action::DeleteTopic {
                topic_name: "Topic 4".to_string(),
                class_name: "Revision".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            navigator.take_notice().as_deref(),
            Some("Topic 'Topic 4' from 'Revision' removed successfully.")
        );

        navigator.dispatch(Action::Back).await.unwrap();
        navigator
            .dispatch(Action::OpenSection(AdminSection::Classes))
            .await
            .unwrap();
        navigator
            .dispatch(Action::DeleteClass("Revision".to_string()))
            .await
            .unwrap();
        assert_eq!(
            navigator.take_notice().as_deref(),
            Some("Class 'Revision' removed successfully.")
        );

        let View::Classes { classes, .. } = navigator.render().await.unwrap() else {
            panic!("Expected the class list");
        };
        assert_eq!(classes.len(), 7);
    }

    #[rocket::async_test]
    async fn test_topic_without_description_uses_placeholder() {
        let test_db = TestDbBuilder::new()
            .student("student_user", GRADE_12)
            .class("Maths", GRADE_12)
            .build()
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO topics (topic_name, class_name, video_path, description) VALUES (?, ?, ?, '')",
        )
        .bind("Vectors")
        .bind("Maths")
        .bind(SEED_VIDEO)
        .execute(&test_db.pool)
        .await
        .unwrap();
        let workspace = video_workspace();
        let mut navigator = test_navigator(&test_db, workspace.path());

        navigator
            .dispatch(login("student_user", STANDARD_PASSWORD))
            .await
            .unwrap();
        navigator
            .dispatch(Action::OpenClass("Maths".to_string()))
            .await
            .unwrap();
        navigator
            .dispatch(Action::OpenTopic("Vectors".to_string()))
            .await
            .unwrap();

        let View::Topic { description, .. } = navigator.render().await.unwrap() else {
            panic!("Expected the topic page");
        };
        assert_eq!(description, NO_DESCRIPTION);
    }
}
