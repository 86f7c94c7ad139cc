//! User domain entity

use chrono::{DateTime, Utc};
use lemon_shared::EntityId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            _ => self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 150, message = "Username must be between 1 and 150 characters"))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 150, message = "First name too long"))]
    pub first_name: String,

    #[validate(length(max = 150, message = "Last name too long"))]
    pub last_name: String,

    pub password_hash: String,
    pub is_superuser: bool,
}

impl NewUser {
    pub fn new(
        username: String,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        password_hash: String,
    ) -> Result<Self, DomainError> {
        let username = username.trim().to_string();
        if username.chars().any(char::is_whitespace) {
            return Err(DomainError::ValidationError(
                "Username may not contain whitespace".to_string(),
            ));
        }
        let user = Self {
            username,
            email: email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            first_name: first_name.unwrap_or_default().trim().to_string(),
            last_name: last_name.unwrap_or_default().trim().to_string(),
            password_hash,
            is_superuser: false,
        };
        user.validate()?;
        Ok(user)
    }

    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }

    pub fn into_user(self, id: EntityId) -> User {
        User {
            id,
            username: self.username,
            email: self.email.unwrap_or_default(),
            first_name: self.first_name,
            last_name: self.last_name,
            is_superuser: self.is_superuser,
            password_hash: self.password_hash,
            date_joined: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_trims_and_validates() {
        let user = NewUser::new(
            " mario ".to_string(),
            Some("mario@littlelemon.com".to_string()),
            Some("Mario".to_string()),
            None,
            "hash".to_string(),
        )
        .unwrap();
        assert_eq!(user.username, "mario");
        assert!(!user.is_superuser);
        assert_eq!(user.into_user(1).full_name(), "Mario");
    }

    #[test]
    fn test_invalid_email_rejected() {
        let result = NewUser::new("adrian".to_string(), Some("not-an-email".to_string()), None, None, "h".to_string());
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_blank_email_allowed() {
        let user = NewUser::new("adrian".to_string(), Some("  ".to_string()), None, None, "h".to_string()).unwrap();
        assert_eq!(user.email, None);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = NewUser::new("tilly".to_string(), None, None, None, "secret-hash".to_string())
            .unwrap()
            .into_user(5);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
