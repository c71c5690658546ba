use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::auth::{NewUser, Role};
use crate::error::AppError;
use crate::models::{GRADES, NewClass, NewTopic};

pub const REQUIRED_MESSAGE: &str = "All fields must be filled.";

/// Grade choice meaning "no grade"; only valid for admins.
pub const NO_GRADE: &str = "none";

fn form_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

#[derive(Debug)]
pub struct ValidationErrorWrapper(pub ValidationErrors);

impl From<ValidationErrorWrapper> for AppError {
    fn from(wrapper: ValidationErrorWrapper) -> Self {
        let message = wrapper
            .0
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.clone())
            .map(|message| message.to_string())
            .unwrap_or_else(|| "Invalid value".to_string());

        AppError::Validation(message)
    }
}

pub trait ValidateForm: Validate {
    fn validate_form(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|errors| AppError::from(ValidationErrorWrapper(errors)))
    }
}

impl<T: Validate> ValidateForm for T {}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
#[validate(schema(function = "validate_user_form"))]
pub struct NewUserForm {
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub username: String,
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub password: String,
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub confirm_password: String,
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub role: String,
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub grade: String,
}

fn validate_user_form(form: &NewUserForm) -> Result<(), ValidationError> {
    if form.password != form.confirm_password {
        return Err(form_error("password_mismatch", "Passwords do not match."));
    }

    match form.role.as_str() {
        "student" if !GRADES.contains(&form.grade.as_str()) => Err(form_error(
            "student_grade",
            "Students must be assigned to Grade 12 or Grade 13.",
        )),
        "admin" if form.grade != NO_GRADE => Err(form_error(
            "admin_grade",
            "Admins must have grade set to 'none'.",
        )),
        "student" | "admin" => Ok(()),
        _ => Err(form_error("role", "Role must be either 'admin' or 'student'.")),
    }
}

impl NewUserForm {
    pub fn trimmed(&self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            password: self.password.trim().to_string(),
            confirm_password: self.confirm_password.trim().to_string(),
            role: self.role.trim().to_string(),
            grade: self.grade.trim().to_string(),
        }
    }

    pub fn into_new_user(self) -> Result<NewUser, AppError> {
        let form = self.trimmed();
        form.validate_form()?;

        let role =
            Role::from_str(&form.role).map_err(|e| AppError::Validation(e.to_string()))?;
        let grade = match form.grade.as_str() {
            NO_GRADE => None,
            grade => Some(grade.to_string()),
        };

        Ok(NewUser {
            username: form.username,
            password: form.password,
            role,
            grade,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
#[validate(schema(function = "validate_class_form"))]
pub struct NewClassForm {
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub class_name: String,
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub grade: String,
}

fn validate_class_form(form: &NewClassForm) -> Result<(), ValidationError> {
    if GRADES.contains(&form.grade.as_str()) {
        Ok(())
    } else {
        Err(form_error(
            "class_grade",
            "A class must be assigned to Grade 12 or Grade 13.",
        ))
    }
}

impl NewClassForm {
    pub fn into_new_class(self) -> Result<NewClass, AppError> {
        let form = Self {
            class_name: self.class_name.trim().to_string(),
            grade: self.grade.trim().to_string(),
        };
        form.validate_form()?;

        Ok(NewClass {
            name: form.class_name,
            grade: form.grade,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct NewTopicForm {
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub topic_name: String,
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub class_name: String,
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub description: String,
    #[validate(length(min = 1, message = "All fields must be filled."))]
    pub video_path: String,
}

impl NewTopicForm {
    pub fn into_new_topic(self) -> Result<NewTopic, AppError> {
        let form = Self {
            topic_name: self.topic_name.trim().to_string(),
            class_name: self.class_name.trim().to_string(),
            description: self.description.trim().to_string(),
            video_path: self.video_path.trim().to_string(),
        };
        form.validate_form()?;

        Ok(NewTopic {
            name: form.topic_name,
            class_name: form.class_name,
            video_path: form.video_path,
            description: form.description,
        })
    }
}
