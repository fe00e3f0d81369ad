use std::rc::Rc;

use log::info;
use rand::Rng;

use super::password::{hash_password, MIN_PASSWORD_LENGTH};
use super::{AccountError, FieldError};
use crate::store::{keys, read_json, write_json, KeyValueStore, UserRepository};

/// Forgot-password flow: request a one-time code, confirm it, set a new password.
pub struct PasswordReset {
    store: Rc<dyn KeyValueStore>,
    users: UserRepository,
    verified: bool,
}

impl PasswordReset {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            store,
            verified: false,
        }
    }

    /// Issues a fresh 4-digit code for a registered email. The caller delivers it.
    pub fn request(&mut self, email: &str) -> Result<String, AccountError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AccountError::Invalid(vec![FieldError::new(
                "email",
                "Email is required",
            )]));
        }
        let user = self
            .users
            .find_by_email(email)
            .ok_or(AccountError::UnknownEmail)?;

        let code = rand::rng().random_range(1000..10000).to_string();
        write_json(self.store.as_ref(), keys::RESET_OTP, &code)?;
        write_json(self.store.as_ref(), keys::RESET_EMAIL, &user.email)?;
        self.verified = false;
        info!(target: "accounts", "Password reset requested for {}", user.email);
        Ok(code)
    }

    pub fn verify(&mut self, code: &str) -> Result<(), AccountError> {
        let expected: String =
            read_json(self.store.as_ref(), keys::RESET_OTP).ok_or(AccountError::NoResetInProgress)?;
        if expected != code.trim() {
            return Err(AccountError::InvalidCode);
        }
        self.verified = true;
        Ok(())
    }

    pub fn reset_password(&mut self, password: &str, confirm: &str) -> Result<(), AccountError> {
        if !self.verified {
            return Err(AccountError::NoResetInProgress);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AccountError::Invalid(vec![FieldError::new(
                "password",
                "Password must be 6+ characters",
            )]));
        }
        if password != confirm {
            return Err(AccountError::Invalid(vec![FieldError::new(
                "confirmPassword",
                "Passwords do not match",
            )]));
        }

        let email: String = read_json(self.store.as_ref(), keys::RESET_EMAIL)
            .ok_or(AccountError::NoResetInProgress)?;
        let mut user = self
            .users
            .find_by_email(&email)
            .ok_or(AccountError::UnknownEmail)?;
        user.password_hash = hash_password(password)?;
        self.users.update(user)?;

        self.store.remove(keys::RESET_OTP)?;
        self.store.remove(keys::RESET_EMAIL)?;
        self.verified = false;
        info!(target: "accounts", "Password updated for {}", email);
        Ok(())
    }
}
