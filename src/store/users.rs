use std::rc::Rc;

use super::{keys, KeyValueStore, Record, RecordList, StoreError};
use crate::model::User;

impl Record for User {
    fn record_id(&self) -> &str {
        &self.email
    }
}

#[derive(Clone)]
pub struct UserRepository {
    users: RecordList<User>,
}

impl UserRepository {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            users: RecordList::new(store, keys::USERS),
        }
    }

    pub fn list(&self) -> Vec<User> {
        self.users.list()
    }

    /// Emails compare case-insensitively.
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.list().into_iter().find(|user| user.has_email(email))
    }

    pub fn email_exists(&self, email: &str) -> bool {
        self.find_by_email(email).is_some()
    }

    pub fn add(&self, user: User) -> Result<(), StoreError> {
        self.users.append(user)
    }

    pub fn update(&self, user: User) -> Result<(), StoreError> {
        let email = user.email.clone();
        self.users.upsert_by(user, |u| u.has_email(&email))
    }

    pub fn delete(&self, email: &str) -> Result<bool, StoreError> {
        self.users.delete_where(|u| u.has_email(email))
    }

    /// Users whose full name contains `query`, ignoring case.
    pub fn search_by_name(&self, query: &str) -> Vec<User> {
        let query = query.to_lowercase();
        self.list()
            .into_iter()
            .filter(|user| user.full_name.to_lowercase().contains(&query))
            .collect()
    }
}
