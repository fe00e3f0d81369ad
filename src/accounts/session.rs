use std::rc::Rc;

use log::info;

use super::password::verify_password;
use super::signup::is_valid_email;
use super::{AccountError, FieldError};
use crate::model::User;
use crate::store::{keys, read_json, write_json, KeyValueStore, StoreError, UserRepository};

/// Who is logged in. The remembered user's email lives under `currentUser`.
#[derive(Clone)]
pub struct Session {
    store: Rc<dyn KeyValueStore>,
    users: UserRepository,
}

impl Session {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            store,
        }
    }

    pub fn login(&self, email: &str, password: &str, remember: bool) -> Result<User, AccountError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AccountError::Invalid(vec![FieldError::new(
                "email",
                "Email is required",
            )]));
        }
        if !is_valid_email(email) {
            return Err(AccountError::Invalid(vec![FieldError::new(
                "email",
                "Enter valid email",
            )]));
        }
        if password.trim().is_empty() {
            return Err(AccountError::Invalid(vec![FieldError::new(
                "password",
                "Password is required",
            )]));
        }

        let user = self
            .users
            .find_by_email(email)
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or(AccountError::InvalidCredentials)?;

        if remember {
            write_json(self.store.as_ref(), keys::CURRENT_USER, &user.email)?;
        }
        info!(target: "accounts", "{} logged in (remember: {})", user.email, remember);
        Ok(user)
    }

    /// The remembered user, if they are still registered.
    pub fn current_user(&self) -> Option<User> {
        let email: String = read_json(self.store.as_ref(), keys::CURRENT_USER)?;
        self.users.find_by_email(&email)
    }

    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.remove(keys::CURRENT_USER)
    }
}
