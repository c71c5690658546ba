//! Line-oriented window: draws the navigator's current view and turns typed
//! commands into navigation actions.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::GRADES;
use crate::navigation::{Action, AdminSection, Navigator, View};
use crate::validation::{NO_GRADE, NewClassForm, NewTopicForm, NewUserForm};

const RULE: &str = "------------------------------------------------------------";

/// A command typed on a page other than Login or an add form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(usize),
    Delete(usize),
    Add,
    Back,
    Logout,
    Play,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();

    match (head.as_str(), arg) {
        ("b" | "back", None) => Command::Back,
        ("logout", None) => Command::Logout,
        ("q" | "quit" | "exit", None) => Command::Quit,
        ("a" | "add", None) => Command::Add,
        ("p" | "play", None) => Command::Play,
        ("h" | "help" | "?", None) => Command::Help,
        ("d" | "delete", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::Delete(n),
            _ => Command::Unknown(line.to_string()),
        },
        (n, None) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::Select(n),
            _ => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

/// Last form submitted from an add page, offered back as defaults while the
/// page stays put.
#[derive(Debug, Clone, PartialEq)]
enum Draft {
    User(NewUserForm),
    Class(NewClassForm),
    Topic(NewTopicForm),
}

impl Draft {
    fn from_action(action: &Action) -> Option<Self> {
        match action {
            Action::SubmitUser(form) => Some(Draft::User(form.clone())),
            Action::SubmitClass(form) => Some(Draft::Class(form.clone())),
            Action::SubmitTopic(form) => Some(Draft::Topic(form.clone())),
            _ => None,
        }
    }
}

pub struct Window<R, W> {
    lines: Lines<R>,
    out: W,
    draft: Option<Draft>,
}

impl<R, W> Window<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
            draft: None,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    async fn prompt(&mut self, label: &str) -> Result<Option<String>, AppError> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;
        Ok(self.lines.next_line().await?)
    }

    /// Prompts with a kept value; an empty answer keeps it.
    async fn prompt_kept(
        &mut self,
        label: &str,
        kept: Option<&str>,
        secret: bool,
    ) -> Result<Option<String>, AppError> {
        let label = match kept.filter(|value| !value.is_empty()) {
            Some(_) if secret => format!("{} [unchanged]: ", label),
            Some(value) => format!("{} [{}]: ", label, value),
            None => format!("{}: ", label),
        };
        let answer = self.prompt(&label).await?;

        Ok(answer.map(|line| match kept {
            Some(value) if line.trim().is_empty() => value.to_string(),
            _ => line,
        }))
    }

    async fn confirm(&mut self, question: &str) -> Result<bool, AppError> {
        let answer = self.prompt(&format!("{} [y/N]: ", question)).await?;
        Ok(matches!(
            answer.as_deref().map(str::trim),
            Some("y" | "Y" | "yes" | "Yes")
        ))
    }

    /// Runs until the input ends or the user quits.
    #[instrument(skip_all)]
    pub async fn run(&mut self, navigator: &mut Navigator) -> Result<(), AppError> {
        loop {
            let view = navigator.render().await?;
            self.draw(&view)?;

            let Some(action) = self.read_action(&view, navigator).await? else {
                info!("Window closed");
                return Ok(());
            };

            if let Some(action) = action {
                let before = navigator.current().clone();
                if let Some(draft) = Draft::from_action(&action) {
                    self.draft = Some(draft);
                }
                navigator.dispatch(action).await?;
                if navigator.current() != &before {
                    self.draft = None;
                }
            }

            if let Some(alert) = navigator.take_alert() {
                writeln!(self.out, "[Error] {}", alert)?;
            }
            if let Some(notice) = navigator.take_notice() {
                writeln!(self.out, "[Info] {}", notice)?;
            }
        }
    }

    /// `None` closes the window; `Some(None)` redraws without acting.
    async fn read_action(
        &mut self,
        view: &View,
        navigator: &Navigator,
    ) -> Result<Option<Option<Action>>, AppError> {
        match view {
            View::Login => {
                let Some(username) = self.prompt("Username: ").await? else {
                    return Ok(None);
                };
                if matches!(username.trim(), "quit" | "exit") {
                    return Ok(None);
                }
                let Some(password) = self.prompt("Password: ").await? else {
                    return Ok(None);
                };
                Ok(Some(Some(Action::Login { username, password })))
            }
            View::AddUser => self.read_user_form().await,
            View::AddClass => self.read_class_form().await,
            View::AddTopic { class_names } => self.read_topic_form(class_names).await,
            _ => {
                let Some(line) = self.prompt("> ").await? else {
                    return Ok(None);
                };
                let command = parse_command(&line);
                if command == Command::Quit {
                    return Ok(None);
                }
                self.command_action(view, navigator, command).await.map(Some)
            }
        }
    }

    async fn command_action(
        &mut self,
        view: &View,
        navigator: &Navigator,
        command: Command,
    ) -> Result<Option<Action>, AppError> {
        let action = match (command, view) {
            (Command::Back, _) => Some(Action::Back),
            (Command::Logout, _) => Some(Action::Logout),
            (Command::Help, _) => {
                self.draw_help(view)?;
                None
            }
            (Command::Select(n), View::StudentDashboard { classes, .. }) => {
                classes.get(n - 1).cloned().map(Action::OpenClass)
            }
            (Command::Select(n), View::Class { topics, .. }) => {
                topics.get(n - 1).cloned().map(Action::OpenTopic)
            }
            (Command::Select(n), View::AdminDashboard { .. }) => AdminSection::ALL
                .get(n - 1)
                .copied()
                .map(Action::OpenSection),
            (Command::Add, View::Users { .. } | View::Classes { .. } | View::Topics { .. }) => {
                Some(Action::OpenAddForm)
            }
            (Command::Delete(n), View::Users { users, .. }) => match users.get(n - 1) {
                Some(user) => {
                    let question = format!("Are you sure you want to delete '{}'?", user.username);
                    self.confirm(&question)
                        .await?
                        .then(|| Action::DeleteUser(user.username.clone()))
                }
                None => None,
            },
            (Command::Delete(n), View::Classes { classes, .. }) => match classes.get(n - 1) {
                Some(class) => {
                    let question = format!(
                        "Are you sure you want to delete the '{}' class?",
                        class.name
                    );
                    self.confirm(&question)
                        .await?
                        .then(|| Action::DeleteClass(class.name.clone()))
                }
                None => None,
            },
            (Command::Delete(n), View::Topics { topics, .. }) => match topics.get(n - 1) {
                Some(topic) => {
                    let question = format!(
                        "Are you sure you want to delete the '{}' topic from '{}'?",
                        topic.name, topic.class_name
                    );
                    self.confirm(&question).await?.then(|| Action::DeleteTopic {
                        topic_name: topic.name.clone(),
                        class_name: topic.class_name.clone(),
                    })
                }
                None => None,
            },
            (Command::Play, View::Topic { player_url, .. }) => {
                if let Some(error) = navigator.content().launch_error() {
                    writeln!(self.out, "[Error] Video server failed to start: {}", error)?;
                    return Ok(None);
                }
                match navigator.content().now_playing() {
                    Some(now_playing) => writeln!(
                        self.out,
                        "Open {} to play '{}'.",
                        player_url, now_playing.title
                    )?,
                    None => writeln!(self.out, "No video selected.")?,
                }
                None
            }
            (command, _) => {
                writeln!(self.out, "Unknown command {:?}. Type 'help'.", command)?;
                None
            }
        };

        Ok(action)
    }

    async fn read_choice(
        &mut self,
        label: &str,
        options: &[&str],
        kept: Option<&str>,
    ) -> Result<Option<String>, AppError> {
        writeln!(self.out, "{}", label)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, option)?;
        }
        let Some(line) = self.prompt_kept("Choice", kept, false).await? else {
            return Ok(None);
        };
        if kept == Some(line.as_str()) {
            return Ok(Some(line));
        }

        let choice = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i))
            .map(|option| option.to_string())
            .unwrap_or_default();
        Ok(Some(choice))
    }

    async fn read_user_form(&mut self) -> Result<Option<Option<Action>>, AppError> {
        let previous = match &self.draft {
            Some(Draft::User(form)) => Some(form.clone()),
            _ => None,
        };
        let previous = previous.as_ref();

        let Some(username) = self
            .prompt_kept("Username", previous.map(|f| f.username.as_str()), false)
            .await?
        else {
            return Ok(None);
        };
        if username.trim() == "back" {
            return Ok(Some(Some(Action::Back)));
        }
        let Some(password) = self
            .prompt_kept("Password", previous.map(|f| f.password.as_str()), true)
            .await?
        else {
            return Ok(None);
        };
        let Some(confirm_password) = self
            .prompt_kept(
                "Re-enter Password",
                previous.map(|f| f.confirm_password.as_str()),
                true,
            )
            .await?
        else {
            return Ok(None);
        };
        let Some(role) = self
            .read_choice(
                "Role:",
                &["admin", "student"],
                previous.map(|f| f.role.as_str()),
            )
            .await?
        else {
            return Ok(None);
        };
        let grades = [GRADES[0], GRADES[1], NO_GRADE];
        let Some(grade) = self
            .read_choice("Grade:", &grades, previous.map(|f| f.grade.as_str()))
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(Some(Action::SubmitUser(NewUserForm {
            username,
            password,
            confirm_password,
            role,
            grade,
        }))))
    }

    async fn read_class_form(&mut self) -> Result<Option<Option<Action>>, AppError> {
        let previous = match &self.draft {
            Some(Draft::Class(form)) => Some(form.clone()),
            _ => None,
        };
        let previous = previous.as_ref();

        let Some(class_name) = self
            .prompt_kept("Class Name", previous.map(|f| f.class_name.as_str()), false)
            .await?
        else {
            return Ok(None);
        };
        if class_name.trim() == "back" {
            return Ok(Some(Some(Action::Back)));
        }
        let grades = [GRADES[0], GRADES[1], NO_GRADE];
        let Some(grade) = self
            .read_choice("Grade:", &grades, previous.map(|f| f.grade.as_str()))
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(Some(Action::SubmitClass(NewClassForm { class_name, grade }))))
    }

    async fn read_topic_form(
        &mut self,
        class_names: &[String],
    ) -> Result<Option<Option<Action>>, AppError> {
        let previous = match &self.draft {
            Some(Draft::Topic(form)) => Some(form.clone()),
            _ => None,
        };
        let previous = previous.as_ref();

        let Some(topic_name) = self
            .prompt_kept("Topic Name", previous.map(|f| f.topic_name.as_str()), false)
            .await?
        else {
            return Ok(None);
        };
        if topic_name.trim() == "back" {
            return Ok(Some(Some(Action::Back)));
        }
        let options: Vec<&str> = class_names.iter().map(String::as_str).collect();
        let Some(class_name) = self
            .read_choice(
                "Select Class:",
                &options,
                previous.map(|f| f.class_name.as_str()),
            )
            .await?
        else {
            return Ok(None);
        };
        let Some(description) = self
            .prompt_kept(
                "Topic Description",
                previous.map(|f| f.description.as_str()),
                false,
            )
            .await?
        else {
            return Ok(None);
        };
        let Some(video_path) = self
            .prompt_kept("Video Path", previous.map(|f| f.video_path.as_str()), false)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(Some(Action::SubmitTopic(NewTopicForm {
            topic_name,
            class_name,
            description,
            video_path,
        }))))
    }

    fn draw(&mut self, view: &View) -> Result<(), AppError> {
        writeln!(self.out, "{}", RULE)?;

        match view {
            View::Login => {
                writeln!(self.out, "Learning Management System")?;
                writeln!(self.out, "Log in to continue (type 'quit' to exit).")?;
            }
            View::StudentDashboard {
                username,
                grade,
                classes,
            } => {
                writeln!(self.out, "Logged in as: {}", username)?;
                writeln!(self.out, "{} Classes", grade)?;
                self.draw_list(classes.iter())?;
            }
            View::Class {
                username,
                class_name,
                topics,
            } => {
                writeln!(self.out, "Logged in as: {}", username)?;
                writeln!(self.out, "{}", class_name)?;
                self.draw_list(topics.iter())?;
            }
            View::Topic {
                username,
                title,
                description,
                ..
            } => {
                writeln!(self.out, "Logged in as: {}", username)?;
                writeln!(self.out, "{}", title)?;
                writeln!(self.out, "Description")?;
                writeln!(self.out, "  {}", description)?;
                writeln!(self.out, "Type 'play' to watch the video.")?;
            }
            View::AdminDashboard {
                username,
                user_count,
                class_count,
                topic_count,
            } => {
                writeln!(self.out, "Logged in as: {} (Admin)", username)?;
                writeln!(self.out, "Admin Dashboard")?;
                let counts = [user_count, class_count, topic_count];
                for (i, (section, count)) in AdminSection::ALL.iter().zip(counts).enumerate() {
                    writeln!(self.out, "  {}. {} ({})", i + 1, section.label(), count)?;
                }
            }
            View::Users { username, users } => {
                writeln!(self.out, "Logged in as: {} (Admin)", username)?;
                writeln!(self.out, "Manage Users")?;
                self.draw_list(users.iter().map(|user| match &user.grade {
                    Some(grade) => format!("{} | Role: {} | Grade: {}", user.username, user.role, grade),
                    None => format!("{} | Role: {}", user.username, user.role),
                }))?;
            }
            View::Classes { username, classes } => {
                writeln!(self.out, "Logged in as: {} (Admin)", username)?;
                writeln!(self.out, "Manage Classes")?;
                self.draw_list(
                    classes
                        .iter()
                        .map(|class| format!("{} | Grade: {}", class.name, class.grade)),
                )?;
            }
            View::Topics { username, topics } => {
                writeln!(self.out, "Logged in as: {} (Admin)", username)?;
                writeln!(self.out, "Manage Topics")?;
                self.draw_list(
                    topics
                        .iter()
                        .map(|topic| format!("{} | Class: {}", topic.name, topic.class_name)),
                )?;
            }
            View::AddUser => writeln!(self.out, "Add New User (type 'back' to cancel)")?,
            View::AddClass => writeln!(self.out, "Add New Class (type 'back' to cancel)")?,
            View::AddTopic { .. } => writeln!(self.out, "Add New Topic (type 'back' to cancel)")?,
        }

        if let Some(message) = view.empty_message() {
            writeln!(self.out, "  {}", message)?;
        }

        Ok(())
    }

    fn draw_list<T: std::fmt::Display>(
        &mut self,
        items: impl Iterator<Item = T>,
    ) -> Result<(), AppError> {
        for (i, item) in items.enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, item)?;
        }
        Ok(())
    }

    fn draw_help(&mut self, view: &View) -> Result<(), AppError> {
        let help = match view {
            View::StudentDashboard { .. } => "<n> open class, logout, quit",
            View::Class { .. } => "<n> open topic, back, logout, quit",
            View::Topic { .. } => "play, back, logout, quit",
            View::AdminDashboard { .. } => "<n> open section, logout, quit",
            View::Users { .. } | View::Classes { .. } | View::Topics { .. } => {
                "add, delete <n>, back, logout, quit"
            }
            _ => "back, logout, quit",
        };
        writeln!(self.out, "Commands: {}", help)?;
        Ok(())
    }
}
