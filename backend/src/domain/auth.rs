//! Authentication primitives: login credentials, registrations and the
//! claims carried in the session cookie.
//!
//! Inbound payload parsing stays outside the domain; handlers call these
//! constructors before talking to a port or service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::user::{DisplayName, Email, User, UserId, UserValidationError};

/// Domain error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// One of the required registration fields was absent or empty.
    #[error("Missing required fields")]
    MissingFields,
    /// Email was missing or blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// A field was present but malformed.
    #[error(transparent)]
    Invalid(#[from] UserValidationError),
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is non-empty and kept verbatim for exact lookups.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use daybook::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada@example.com", "pw").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        if email.trim().is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string used for the exact-match user lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: DisplayName,
    email: Email,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration fields.
    ///
    /// Absent or empty fields fail with
    /// [`CredentialsValidationError::MissingFields`] before any per-field
    /// validation runs.
    ///
    /// # Examples
    /// ```
    /// use daybook::domain::{CredentialsValidationError, Registration};
    ///
    /// let err = Registration::try_from_parts(Some("Ada"), None, Some("pw")).unwrap_err();
    /// assert_eq!(err, CredentialsValidationError::MissingFields);
    /// ```
    pub fn try_from_parts(
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, CredentialsValidationError> {
        let (Some(name), Some(email), Some(password)) = (
            name.filter(|v| !v.is_empty()),
            email.filter(|v| !v.is_empty()),
            password.filter(|v| !v.is_empty()),
        ) else {
            return Err(CredentialsValidationError::MissingFields);
        };

        Ok(Self {
            name: DisplayName::new(name)?,
            email: Email::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Identity claims stored in the signed session cookie.
///
/// Populated once at issuance from the stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionClaims {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

impl From<&User> for SessionClaims {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().clone(),
            email: user.email().to_string(),
            name: user.display_name().to_string(),
        }
    }
}
