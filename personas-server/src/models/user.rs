//! User input payloads, validated at construction

use super::ValidationError;

/// Validated payload for creating a user.
///
/// Both fields are required and must be non-empty.
///
/// # Example
/// ```
/// use personas_server::models::NewUser;
///
/// assert!(NewUser::new(Some("Ada".into()), Some("ada@example.com".into())).is_ok());
/// assert!(NewUser::new(Some("Ada".into()), None).is_err());
/// assert!(NewUser::new(Some("".into()), Some("ada@example.com".into())).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    /// Validate a raw create payload.
    ///
    /// Missing fields and empty strings are both rejected, matching the
    /// wire contract where `""` counts as absent.
    pub fn new(name: Option<String>, email: Option<String>) -> Result<Self, ValidationError> {
        match (non_empty(name), non_empty(email)) {
            (Some(name), Some(email)) => Ok(Self { name, email }),
            _ => Err(ValidationError::MissingNameAndEmail),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Validated payload for a partial user update.
///
/// At least one field must carry a non-empty value. The values themselves
/// are kept exactly as submitted: a field left out of the request stays
/// `None` and is bound as SQL NULL so the `COALESCE` update retains the
/// stored column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPatch {
    name: Option<String>,
    email: Option<String>,
}

impl UserPatch {
    /// Validate a raw update payload.
    pub fn new(name: Option<String>, email: Option<String>) -> Result<Self, ValidationError> {
        let has_name = name.as_deref().is_some_and(|s| !s.is_empty());
        let has_email = email.as_deref().is_some_and(|s| !s.is_empty());
        if !has_name && !has_email {
            return Err(ValidationError::MissingNameOrEmail);
        }

        Ok(Self { name, email })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Consume the patch, returning the submitted values for echoing.
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        (self.name, self.email)
    }
}

/// Empty strings count as absent, matching the wire contract.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
