use crate::catalog::Catalog;
use crate::entities::{new_entity_id, required_trimmed};
use crate::errors::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Superadmin,
}

impl Role {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(StoreError::validation(format!(
                "Invalid role: {other}"
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
            Role::Superadmin => write!(f, "superadmin"),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Unique, stored lowercased and trimmed
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Team ids this user belongs to or leads. Maintained by team saves.
    pub teams: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller input for user creation
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
}

impl User {
    pub fn from_draft(draft: NewUser, catalog: &Catalog) -> Result<User> {
        let email = validate_email(&draft.email)?;
        if catalog.email_taken(&email) {
            return Err(StoreError::conflict(format!(
                "Email already in use: {email}"
            )));
        }

        let role = match draft.role.as_deref() {
            Some(raw) => Role::parse(raw)?,
            None => Role::default(),
        };

        let now = Utc::now();
        Ok(User {
            id: new_entity_id(),
            email,
            first_name: required_trimmed("First name", &draft.first_name)?,
            last_name: required_trimmed("Last name", &draft.last_name)?,
            role,
            teams: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Superadmin)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn validate_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(StoreError::validation("Email is required"));
    }
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(StoreError::validation(format!(
            "Invalid email address: {email}"
        )));
    }
    Ok(email)
}
