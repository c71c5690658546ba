use crate::auth::Permission;
use crate::validation::{NewClassForm, NewTopicForm, NewUserForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSection {
    Users,
    Classes,
    Topics,
}

impl AdminSection {
    pub const ALL: [AdminSection; 3] = [
        AdminSection::Users,
        AdminSection::Classes,
        AdminSection::Topics,
    ];

    pub fn list_page(&self) -> Page {
        match self {
            AdminSection::Users => Page::EditUsers,
            AdminSection::Classes => Page::EditClasses,
            AdminSection::Topics => Page::EditTopics,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdminSection::Users => "Edit Users",
            AdminSection::Classes => "Edit Classes",
            AdminSection::Topics => "Edit Topics",
        }
    }
}

/// Every page the window can show, with the context it needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Login,
    StudentDashboard {
        grade: String,
    },
    ClassPage {
        grade: String,
        class_name: String,
    },
    TopicPage {
        grade: String,
        class_name: String,
        topic_name: String,
    },
    AdminDashboard,
    EditUsers,
    EditClasses,
    EditTopics,
    AddUser,
    AddClass,
    AddTopic,
}

impl Page {
    pub fn title(&self) -> String {
        match self {
            Page::Login => "Login".to_string(),
            Page::StudentDashboard { grade } => format!("{} Classes", grade),
            Page::ClassPage { class_name, .. } => class_name.clone(),
            Page::TopicPage {
                class_name,
                topic_name,
                ..
            } => format!("{} - {}", class_name, topic_name),
            Page::AdminDashboard => "Admin Dashboard".to_string(),
            Page::EditUsers => "Manage Users".to_string(),
            Page::EditClasses => "Manage Classes".to_string(),
            Page::EditTopics => "Manage Topics".to_string(),
            Page::AddUser => "Add New User".to_string(),
            Page::AddClass => "Add New Class".to_string(),
            Page::AddTopic => "Add New Topic".to_string(),
        }
    }

    /// `None` for pages reachable without a session.
    pub fn required_permission(&self) -> Option<Permission> {
        match self {
            Page::Login => None,
            Page::StudentDashboard { .. } | Page::ClassPage { .. } => {
                Some(Permission::BrowseCatalog)
            }
            Page::TopicPage { .. } => Some(Permission::WatchTopics),
            Page::AdminDashboard => Some(Permission::ViewAdminDashboard),
            Page::EditUsers | Page::AddUser => Some(Permission::ManageUsers),
            Page::EditClasses | Page::AddClass => Some(Permission::ManageClasses),
            Page::EditTopics | Page::AddTopic => Some(Permission::ManageTopics),
        }
    }

    pub fn add_page(&self) -> Option<Page> {
        match self {
            Page::EditUsers => Some(Page::AddUser),
            Page::EditClasses => Some(Page::AddClass),
            Page::EditTopics => Some(Page::AddTopic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login { username: String, password: String },
    Logout,
    Back,
    OpenClass(String),
    OpenTopic(String),
    OpenSection(AdminSection),
    OpenAddForm,
    SubmitUser(NewUserForm),
    SubmitClass(NewClassForm),
    SubmitTopic(NewTopicForm),
    DeleteUser(String),
    DeleteClass(String),
    DeleteTopic {
        topic_name: String,
        class_name: String,
    },
}
