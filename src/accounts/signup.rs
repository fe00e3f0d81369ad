use std::sync::OnceLock;

use log::info;
use regex::Regex;

use super::password::{hash_password, MIN_PASSWORD_LENGTH};
use super::{AccountError, FieldError};
use crate::model::User;
use crate::store::UserRepository;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern compiles"))
}

fn age_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+$").expect("age pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub account_type: String,
    pub workplace: String,
    pub full_name: String,
    pub dob: String,
    pub phone: String,
    pub country: String,
    pub age: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    /// Every problem with the form, in field order. Empty when it can be registered.
    pub fn validate(&self, users: &UserRepository) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.full_name.trim().is_empty() {
            errors.push(FieldError::new("fullName", "Full Name is required"));
        }
        if self.dob.trim().is_empty() {
            errors.push(FieldError::new("dob", "Date of Birth is required"));
        }
        if !phone_pattern().is_match(&self.phone) {
            errors.push(FieldError::new("phone", "Phone must be 10 digits"));
        }
        if self.country.trim().is_empty() {
            errors.push(FieldError::new("country", "Country is required"));
        }
        if !age_pattern().is_match(&self.age) {
            errors.push(FieldError::new("age", "Enter valid age"));
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email"));
        } else if users.email_exists(&self.email) {
            errors.push(FieldError::new("email", "Email already registered"));
        }
        if self.username.trim().is_empty() {
            errors.push(FieldError::new("username", "Username required"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(FieldError::new("password", "Password must be 6+ characters"));
        }
        errors
    }

    pub fn register(self, users: &UserRepository) -> Result<User, AccountError> {
        let errors = self.validate(users);
        if !errors.is_empty() {
            return Err(AccountError::Invalid(errors));
        }
        let user = User {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            account_type: self.account_type,
            workplace: self.workplace,
            dob: self.dob,
            phone: self.phone,
            country: self.country,
            age: self.age,
            password_hash: hash_password(&self.password)?,
        };
        users.add(user.clone())?;
        info!(target: "accounts", "Registered {}", user.email);
        Ok(user)
    }
}
