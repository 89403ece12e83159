use serde::{Deserialize, Serialize};

use crate::error::{UserStoreError, UserStoreResult};

/// Maximum length of a first or last name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub active: bool,
    pub country: String,
}

impl User {
    /// "First Last", the key used by duplicate-name aggregation.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Request to create a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub active: bool,
    pub country: String,
}

impl NewUser {
    /// Validate and normalize the request.
    ///
    /// Names and email are trimmed, the country code is uppercased.
    ///
    /// # Errors
    /// Returns `UserStoreError::Validation` if:
    /// - a name is empty or longer than `MAX_NAME_LENGTH`
    /// - the email has no local part or domain, or exceeds `MAX_EMAIL_LENGTH`
    /// - the country is not two ASCII letters
    pub fn normalized(&self) -> UserStoreResult<NewUser> {
        let first_name = validate_name("first_name", &self.first_name)?;
        let last_name = validate_name("last_name", &self.last_name)?;

        let email = self.email.trim();
        if email.len() > MAX_EMAIL_LENGTH {
            return Err(UserStoreError::validation(format!(
                "email exceeds maximum length of {} characters",
                MAX_EMAIL_LENGTH
            )));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(UserStoreError::validation("email must look like name@domain")),
        }

        let country = self.country.trim();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(UserStoreError::validation(
                "country must be a two-letter code",
            ));
        }

        Ok(NewUser {
            first_name,
            last_name,
            email: email.to_string(),
            active: self.active,
            country: country.to_ascii_uppercase(),
        })
    }
}

fn validate_name(field: &str, value: &str) -> UserStoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserStoreError::validation(format!("{} cannot be empty", field)));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(UserStoreError::validation(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// A name that occurs at least the requested number of times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateName {
    pub name: String,
    pub count: usize,
}
