use itertools::Itertools;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors.iter().join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{}", describe(.0))]
    Invalid(Vec<FieldError>),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email not found")]
    UnknownEmail,

    #[error("Invalid OTP")]
    InvalidCode,

    #[error("No password reset in progress")]
    NoResetInProgress,

    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccountError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AccountError::Invalid(errors) => errors,
            _ => &[],
        }
    }
}
