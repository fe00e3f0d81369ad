use std::rc::Rc;

use log::info;

use crate::model::User;
use crate::store::{keys, read_records, write_list, KeyValueStore, StoreError, UserRepository};

/// Emails of the authors the user follows.
#[derive(Clone)]
pub struct Follows {
    store: Rc<dyn KeyValueStore>,
    users: UserRepository,
}

impl Follows {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            store,
        }
    }

    pub fn followed_emails(&self) -> Vec<String> {
        read_records(self.store.as_ref(), keys::FOLLOWED_USERS)
    }

    pub fn is_following(&self, email: &str) -> bool {
        self.followed_emails()
            .iter()
            .any(|followed| followed.eq_ignore_ascii_case(email))
    }

    /// Follows or unfollows `email`; returns whether it is followed afterwards.
    pub fn toggle_follow(&self, email: &str) -> Result<bool, StoreError> {
        let mut followed = self.followed_emails();
        let before = followed.len();
        followed.retain(|f| !f.eq_ignore_ascii_case(email));
        let now_following = followed.len() == before;
        if now_following {
            followed.push(email.to_string());
        }
        write_list(self.store.as_ref(), keys::FOLLOWED_USERS, &followed)?;
        info!(target: "social", "{} {}", if now_following { "Followed" } else { "Unfollowed" }, email);
        Ok(now_following)
    }

    /// Registered users that are followed, in registration order.
    pub fn followed_authors(&self) -> Vec<User> {
        let followed = self.followed_emails();
        self.users
            .list()
            .into_iter()
            .filter(|user| followed.iter().any(|email| user.has_email(email)))
            .collect()
    }
}
