use serde::Serialize;

use super::{Permission, Role};
use crate::error::AppError;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct User {
    pub username: String,
    pub role: Role,
    pub grade: Option<String>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbUser {
    pub username: Option<String>,
    pub role: Option<String>,
    pub grade: Option<String>,
}

impl TryFrom<DbUser> for User {
    type Error = AppError;

    fn try_from(user: DbUser) -> Result<Self, Self::Error> {
        let role = Role::from_str(&user.role.unwrap_or_default())
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Self {
            username: user.username.unwrap_or_default(),
            role,
            grade: user.grade,
        })
    }
}

/// What a successful credential check yields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub role: Role,
    pub grade: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub grade: Option<String>,
}

/// Identity carried between pages after login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub grade: Option<String>,
}

impl Session {
    pub fn new(username: &str, credentials: Credentials) -> Self {
        Self {
            username: username.to_string(),
            role: credentials.role,
            grade: credentials.grade,
        }
    }

    pub fn require_permission(&self, permission: Permission) -> Result<(), AppError> {
        if self.role.has_permission(permission) {
            Ok(())
        } else {
            tracing::warn!(
                username = %self.username,
                role = %self.role.as_str(),
                permission = ?permission,
                "Permission denied"
            );
            Err(AppError::Authorization(
                "You don't have permission to open this page.".to_string(),
            ))
        }
    }
}
