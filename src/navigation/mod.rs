//! Page router for the single application window.
//!
//! Forward moves push the previous page onto `history`; `Back` pops it.
//! Logging out drops the session and the whole stack.

pub mod page;
pub mod view;

pub use page::*;
pub use view::*;

use std::sync::Arc;

use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::auth::{Permission, Role, Session};
use crate::content::{ContentServer, NowPlaying, resolve_locator};
use crate::db;
use crate::error::AppError;
use crate::models::InsertOutcome;
use crate::validation::{NewClassForm, NewTopicForm, NewUserForm};

pub struct Navigator {
    pool: Pool<Sqlite>,
    content: Arc<ContentServer>,
    current: Page,
    history: Vec<Page>,
    session: Option<Session>,
    alert: Option<String>,
    notice: Option<String>,
}

fn unavailable() -> AppError {
    AppError::Validation("That action is not available on this page.".to_string())
}

impl Navigator {
    pub fn new(pool: Pool<Sqlite>, content: Arc<ContentServer>) -> Self {
        Self {
            pool,
            content,
            current: Page::Login,
            history: Vec::new(),
            session: None,
            alert: None,
            notice: None,
        }
    }

    pub fn current(&self) -> &Page {
        &self.current
    }

    pub fn history(&self) -> &[Page] {
        &self.history
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn content(&self) -> &ContentServer {
        &self.content
    }

    /// Error dialog raised by the last action, if any.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// Informational dialog raised by the last action, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Applies one user action. Errors the user can act on become an alert
    /// and leave the current page in place; anything else is returned.
    pub async fn dispatch(&mut self, action: Action) -> Result<(), AppError> {
        self.alert = None;
        self.notice = None;

        match self.apply(action).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_user_facing() => {
                e.log_and_record("Navigation action");
                self.alert = Some(e.to_string());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, action), fields(page = ?self.current))]
    async fn apply(&mut self, action: Action) -> Result<(), AppError> {
        match action {
            Action::Login { username, password } => self.login(&username, &password).await,
            Action::Logout => {
                self.logout();
                Ok(())
            }
            Action::Back => {
                if let Some(previous) = self.history.pop() {
                    info!(to = ?previous, "Navigating back");
                    self.current = previous;
                }
                Ok(())
            }
            Action::OpenClass(class_name) => {
                let Page::StudentDashboard { grade } = self.current.clone() else {
                    return Err(unavailable());
                };
                self.push(Page::ClassPage { grade, class_name })
            }
            Action::OpenTopic(topic_name) => self.open_topic(topic_name).await,
            Action::OpenSection(section) => {
                if self.current != Page::AdminDashboard {
                    return Err(unavailable());
                }
                self.push(section.list_page())
            }
            Action::OpenAddForm => {
                let add_page = self.current.add_page().ok_or_else(unavailable)?;
                self.push(add_page)
            }
            Action::SubmitUser(form) => self.submit_user(form).await,
            Action::SubmitClass(form) => self.submit_class(form).await,
            Action::SubmitTopic(form) => self.submit_topic(form).await,
            Action::DeleteUser(username) => {
                self.require_page(&Page::EditUsers)?;
                db::delete_user(&self.pool, &username).await?;
                self.notice = Some(format!("User '{}' removed successfully.", username));
                Ok(())
            }
            Action::DeleteClass(class_name) => {
                self.require_page(&Page::EditClasses)?;
                db::delete_class(&self.pool, &class_name).await?;
                self.notice = Some(format!("Class '{}' removed successfully.", class_name));
                Ok(())
            }
            Action::DeleteTopic {
                topic_name,
                class_name,
            } => {
                self.require_page(&Page::EditTopics)?;
                db::delete_topic(&self.pool, &topic_name, &class_name).await?;
                self.notice = Some(format!(
                    "Topic '{}' from '{}' removed successfully.",
                    topic_name, class_name
                ));
                Ok(())
            }
        }
    }

    fn session_or_err(&self) -> Result<&Session, AppError> {
        self.session
            .as_ref()
            .ok_or_else(|| AppError::Authentication("Please log in first.".to_string()))
    }

    fn guard(&self, page: &Page) -> Result<(), AppError> {
        match page.required_permission() {
            Some(permission) => self.session_or_err()?.require_permission(permission),
            None => Ok(()),
        }
    }

    /// The current page must be `page` and the session must be allowed on it.
    fn require_page(&self, page: &Page) -> Result<(), AppError> {
        if &self.current != page {
            return Err(unavailable());
        }
        self.guard(page)
    }

    fn push(&mut self, page: Page) -> Result<(), AppError> {
        self.guard(&page)?;
        info!(to = ?page, "Navigating forward");
        let previous = std::mem::replace(&mut self.current, page);
        self.history.push(previous);
        Ok(())
    }

    #[instrument(skip(self, password))]
    async fn login(&mut self, username: &str, password: &str) -> Result<(), AppError> {
        if self.current != Page::Login {
            return Err(unavailable());
        }

        let credentials = db::check_login(&self.pool, username.trim(), password.trim())
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid username or password".to_string())
            })?;

        let session = Session::new(username.trim(), credentials);
        let home = match session.role {
            Role::Student => Page::StudentDashboard {
                grade: session.grade.clone().unwrap_or_default(),
            },
            Role::Admin => Page::AdminDashboard,
        };

        info!(role = %session.role, "Login successful");
        self.session = Some(session);
        self.history.clear();
        self.current = home;
        Ok(())
    }

    fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(username = %session.username, "Logged out");
        }
        self.history.clear();
        self.current = Page::Login;
    }

    async fn open_topic(&mut self, topic_name: String) -> Result<(), AppError> {
        let Page::ClassPage { grade, class_name } = self.current.clone() else {
            return Err(unavailable());
        };
        self.session_or_err()?
            .require_permission(Permission::WatchTopics)?;

        let video_path = match db::get_topic_content(&self.pool, &class_name, &topic_name).await? {
            Some(content) if !content.video_path.trim().is_empty() => content.video_path,
            _ => {
                return Err(AppError::MissingVideo(format!(
                    "No video path found for '{}' in database.",
                    topic_name
                )));
            }
        };

        let resolved = resolve_locator(&self.content.config().working_dir, &video_path);
        if !resolved.is_file() {
            return Err(AppError::MissingVideo(format!(
                "Video file not found at: {}",
                resolved.display()
            )));
        }

        let file_name = resolved
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.content.ensure_started();
        self.content.select(NowPlaying {
            file_name,
            title: format!("{} - {}", class_name, topic_name),
        });

        self.push(Page::TopicPage {
            grade,
            class_name,
            topic_name,
        })
    }

    async fn submit_user(&mut self, form: NewUserForm) -> Result<(), AppError> {
        self.require_page(&Page::AddUser)?;
        let user = form.into_new_user()?;

        match db::add_user(&self.pool, &user).await? {
            InsertOutcome::Inserted => {
                self.notice = Some(format!("User '{}' added successfully.", user.username));
                self.return_to_list();
                Ok(())
            }
            InsertOutcome::AlreadyExists => Err(AppError::Conflict(format!(
                "Username '{}' already exists.",
                user.username
            ))),
        }
    }

    async fn submit_class(&mut self, form: NewClassForm) -> Result<(), AppError> {
        self.require_page(&Page::AddClass)?;
        let class = form.into_new_class()?;

        match db::add_class(&self.pool, &class).await? {
            InsertOutcome::Inserted => {
                self.notice = Some(format!("Class '{}' added successfully.", class.name));
                self.return_to_list();
                Ok(())
            }
            InsertOutcome::AlreadyExists => Err(AppError::Conflict(format!(
                "Class '{}' already exists.",
                class.name
            ))),
        }
    }

    async fn submit_topic(&mut self, form: NewTopicForm) -> Result<(), AppError> {
        self.require_page(&Page::AddTopic)?;
        let topic = form.into_new_topic()?;

        match db::add_topic(&self.pool, &topic).await? {
            InsertOutcome::Inserted => {
                self.notice = Some(format!(
                    "Topic '{}' added to '{}' successfully.",
                    topic.name, topic.class_name
                ));
                self.return_to_list();
                Ok(())
            }
            InsertOutcome::AlreadyExists => Err(AppError::Conflict(format!(
                "Topic '{}' already exists in '{}'.",
                topic.name, topic.class_name
            ))),
        }
    }

    fn return_to_list(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.current = previous;
        }
    }

    /// Builds the view for the current page from fresh store reads.
    pub async fn render(&self) -> Result<View, AppError> {
        let username = self
            .session
            .as_ref()
            .map(|session| session.username.clone())
            .unwrap_or_default();

        let view = match &self.current {
            Page::Login => View::Login,
            Page::StudentDashboard { grade } => View::StudentDashboard {
                username,
                grade: grade.clone(),
                classes: db::get_classes_by_grade(&self.pool, grade).await?,
            },
            Page::ClassPage { class_name, .. } => View::Class {
                username,
                class_name: class_name.clone(),
                topics: db::get_topics_by_class(&self.pool, class_name).await?,
            },
            Page::TopicPage {
                class_name,
                topic_name,
                ..
            } => {
                let description = db::get_topic_content(&self.pool, class_name, topic_name)
                    .await?
                    .map(|content| content.description)
                    .filter(|description| !description.trim().is_empty())
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string());

                View::Topic {
                    username,
                    title: self.current.title(),
                    description,
                    player_url: self.content.player_url(),
                    now_playing: self.content.now_playing(),
                }
            }
            Page::AdminDashboard => View::AdminDashboard {
                username,
                user_count: db::count_users(&self.pool).await?,
                class_count: db::count_classes(&self.pool).await?,
                topic_count: db::count_topics(&self.pool).await?,
            },
            Page::EditUsers => View::Users {
                username,
                users: db::get_all_users(&self.pool).await?,
            },
            Page::EditClasses => View::Classes {
                username,
                classes: db::get_all_classes(&self.pool).await?,
            },
            Page::EditTopics => View::Topics {
                username,
                topics: db::get_all_topics(&self.pool).await?,
            },
            Page::AddUser => View::AddUser,
            Page::AddClass => View::AddClass,
            Page::AddTopic => View::AddTopic {
                class_names: db::get_all_class_names(&self.pool).await?,
            },
        };

        Ok(view)
    }
}
