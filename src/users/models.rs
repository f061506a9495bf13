//! User (identity) models and request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_admin: bool,
    pub is_email_verified: bool,
    pub password_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        username: String,
        email: String,
        full_name: String,
        password_hash: String,
        is_admin: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            full_name,
            password_hash,
            is_admin,
            is_email_verified: false,
            password_changed_at: now,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether this user may modify the account `target`
    pub fn can_manage(&self, target: Uuid) -> bool {
        self.is_admin || self.id == target
    }
}

/// Public profile embedded in auth responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "full_name is required"))]
    pub full_name: String,
    #[validate(length(min = 5, message = "username must be at least 5 characters"))]
    pub username: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Profile update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "full_name must not be empty"))]
    pub full_name: Option<String>,
    #[validate(length(min = 5, message = "username must be at least 5 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
}

impl UpdateUser {
    pub fn apply(self, user: &mut User) {
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            if email != user.email {
                user.is_email_verified = false;
            }
            user.email = email;
        }
        user.updated_at = Utc::now();
    }
}

/// Password change payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePassword {
    #[validate(length(min = 1, message = "current_password is required"))]
    pub current_password: String,
    #[validate(length(min = 1, message = "new_password is required"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "alice1".to_string(),
            "alice@x.com".to_string(),
            "Alice".to_string(),
            "hash".to_string(),
            false,
        )
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("deleted_at").is_none());
        assert_eq!(json["username"], "alice1");
    }

    #[test]
    fn test_create_user_validation() {
        let input = CreateUser {
            full_name: "Alice".into(),
            username: "shrt".into(),
            email: "not-an-email".into(),
            password: "".into(),
            is_admin: false,
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("full_name"));
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut u = user();
        u.is_email_verified = true;
        UpdateUser {
            full_name: Some("Alice Liddell".into()),
            ..Default::default()
        }
        .apply(&mut u);
        assert_eq!(u.full_name, "Alice Liddell");
        assert_eq!(u.username, "alice1");
        assert!(u.is_email_verified);

        UpdateUser {
            email: Some("alice@y.com".into()),
            ..Default::default()
        }
        .apply(&mut u);
        assert!(!u.is_email_verified);
    }

    #[test]
    fn test_can_manage() {
        let mut u = user();
        assert!(u.can_manage(u.id));
        assert!(!u.can_manage(Uuid::new_v4()));
        u.is_admin = true;
        assert!(u.can_manage(Uuid::new_v4()));
    }
}
