use std::fmt;
use thiserror::Error;

pub const MIN_USERNAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;

/// A single failed field check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("Username must be at least {} characters long.", MIN_USERNAME_LEN)]
    UsernameTooShort,

    #[error("Password must be at least {} characters long.", MIN_PASSWORD_LEN)]
    PasswordTooShort,
}

/// Every field check that failed, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "))]
pub struct InvalidCredentials(pub Vec<CredentialsError>);

/// A username/password pair that passed the login form checks.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Lengths are counted in characters, not bytes.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, InvalidCredentials> {
        let username = username.into();
        let password = password.into();

        let mut problems = Vec::new();
        if username.chars().count() < MIN_USERNAME_LEN {
            problems.push(CredentialsError::UsernameTooShort);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            problems.push(CredentialsError::PasswordTooShort);
        }

        if problems.is_empty() {
            Ok(Self { username, password })
        } else {
            Err(InvalidCredentials(problems))
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
