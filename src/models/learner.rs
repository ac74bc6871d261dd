use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{ERR_INVALID_EMAIL, ERR_INVALID_USERNAME, MAX_EMAIL_LEN, MAX_USERNAME_LEN};
use crate::error::{AppError, Result};

/// Learner record stored in redb, keyed by email
/// Uses Unix timestamp for compact storage with bincode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerRecord {
    pub username: String,
    /// When the learner was registered (Unix timestamp)
    pub created_at: i64,
}

/// Role asserted by the auth layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Learner,
    Instructor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Instructor => "instructor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "learner" => Ok(Role::Learner),
            "instructor" => Ok(Role::Instructor),
            _ => Err(AppError::Unauthenticated),
        }
    }
}

/// Authenticated caller, passed explicitly into every core call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub email: String,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn new(email: &str, username: &str, role: Role) -> Result<Self> {
        let email = normalize_email(email)?;
        let username = username.trim();
        if !validate_username(username) {
            return Err(AppError::MalformedPayload(ERR_INVALID_USERNAME.to_string()));
        }
        Ok(Self {
            email,
            username: username.to_string(),
            role,
        })
    }

    pub fn is_instructor(&self) -> bool {
        self.role == Role::Instructor
    }
}

/// Trim and lowercase an email, rejecting anything that is not shaped like one
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_ascii_lowercase();
    if validate_email(&email) {
        Ok(email)
    } else {
        Err(AppError::MalformedPayload(ERR_INVALID_EMAIL.to_string()))
    }
}

/// Basic shape check: one '@', non-empty local part, dotted domain, no whitespace
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return false;
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn validate_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= MAX_USERNAME_LEN
        && !username.chars().any(|c| c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("siti@example.com"));
        assert!(validate_email("a.b+c@school.sch.id"));

        assert!(!validate_email(""));
        assert!(!validate_email("no-at-sign.com"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@localhost"));
        assert!(!validate_email("user@example.com."));
        assert!(!validate_email("us er@example.com"));
        assert!(!validate_email("a@b@example.com"));

        let long = format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN));
        assert!(!validate_email(&long));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Siti@Example.COM ").unwrap(),
            "siti@example.com"
        );
        assert!(normalize_email("nope").is_err());
    }

    #[test]
    fn test_identity_validation() {
        let identity = Identity::new("Budi@example.com", " Budi ", Role::Learner).unwrap();
        assert_eq!(identity.email, "budi@example.com");
        assert_eq!(identity.username, "Budi");
        assert!(!identity.is_instructor());

        assert!(Identity::new("budi@example.com", "   ", Role::Learner).is_err());
        assert!(Identity::new("budi@example.com", &"x".repeat(101), Role::Learner).is_err());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("learner".parse::<Role>().unwrap(), Role::Learner);
        assert_eq!("instructor".parse::<Role>().unwrap(), Role::Instructor);
        assert!(matches!(
            "admin".parse::<Role>(),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_learner_record_serialization() {
        let record = LearnerRecord {
            username: "Siti".to_string(),
            created_at: 1733788800,
        };

        let bytes = crate::db::encode(&record).unwrap();
        let decoded: LearnerRecord = crate::db::decode(&bytes).unwrap();

        assert_eq!(record, decoded);
    }
}
