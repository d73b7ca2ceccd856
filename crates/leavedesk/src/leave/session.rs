//! Stand-in identity layer. Credentials are never checked against anything; the session only
//! tells the leave service who is asking and whether they review leave.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Admin,
}

impl Role {
    /// Usernames containing "admin" (any case) review leave.
    pub fn infer(username: &str) -> Self {
        if username.to_lowercase().contains("admin") {
            Role::Admin
        } else {
            Role::Employee
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }
}

/// Caller context handed to every role-scoped leave query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    /// Any pair of non-blank credentials signs in.
    pub fn sign_in(username: &str, password: &str) -> Result<Self, SessionError> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        Ok(Self {
            username: username.to_string(),
            role: Role::infer(username),
        })
    }

    /// Checks the sign-up form and discards it; there is no account store to write to.
    pub fn sign_up(
        username: &str,
        password: &str,
        confirm_password: &str,
        email: &str,
    ) -> Result<(), SessionError> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        if password != confirm_password {
            return Err(SessionError::PasswordMismatch);
        }
        if email.trim().is_empty() {
            return Err(SessionError::MissingEmail);
        }
        Ok(())
    }

    pub fn is_reviewer(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("please enter both username and password")]
    MissingCredentials,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("please enter your email")]
    MissingEmail,
}
