use std::rc::Rc;

use log::{info, warn};

use super::{keys, new_record_id, KeyValueStore, Record, RecordList, StoreError};
use crate::model::{Quiz, QuizValidationError, User};

impl Record for Quiz {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuizStoreError {
    #[error("{0}")]
    Invalid(#[from] QuizValidationError),
    #[error("Collection {0} not found")]
    UnknownCollection(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct QuizRepository {
    quizzes: RecordList<Quiz>,
}

impl QuizRepository {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            quizzes: RecordList::new(store, keys::QUIZZES),
        }
    }

    /// Quizzes that fail validation are skipped rather than handed to an attempt.
    pub fn list(&self) -> Vec<Quiz> {
        self.quizzes
            .list()
            .into_iter()
            .filter(|quiz| match quiz.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(target: "store", "Skipping stored quiz {}: {}", quiz.id, err);
                    false
                }
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Quiz> {
        self.list().into_iter().find(|quiz| quiz.id == id)
    }

    /// Stores a new quiz authored by `author`, assigning it a fresh id.
    pub fn create(&self, mut quiz: Quiz, author: &User) -> Result<Quiz, QuizStoreError> {
        if quiz.collection_id.as_deref().map_or(true, |c| c.trim().is_empty()) {
            return Err(QuizValidationError::MissingCollection.into());
        }
        quiz.validate()?;
        quiz.id = new_record_id();
        quiz.author_username = Some(author.username.clone());
        quiz.author_email = Some(author.email.clone());
        self.quizzes.append(quiz.clone())?;
        info!(target: "store", "Created quiz {} ({} questions)", quiz.id, quiz.question_count());
        Ok(quiz)
    }

    /// Like `create`, but also checks the collection exists.
    pub fn create_in(
        &self,
        quiz: Quiz,
        author: &User,
        collections: &super::CollectionRepository,
    ) -> Result<Quiz, QuizStoreError> {
        if let Some(collection_id) = quiz.collection_id.as_deref() {
            if collections.get(collection_id).is_none() {
                return Err(QuizStoreError::UnknownCollection(collection_id.to_string()));
            }
        }
        self.create(quiz, author)
    }

    pub fn update(&self, quiz: Quiz) -> Result<(), QuizStoreError> {
        quiz.validate()?;
        Ok(self.quizzes.upsert(quiz)?)
    }

    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.quizzes.delete(id)
    }

    pub fn list_in_collection(&self, collection_id: &str) -> Vec<Quiz> {
        self.list()
            .into_iter()
            .filter(|quiz| quiz.collection_id.as_deref() == Some(collection_id))
            .collect()
    }

    pub fn list_by_author(&self, email: &str) -> Vec<Quiz> {
        self.list()
            .into_iter()
            .filter(|quiz| {
                quiz.author_email
                    .as_deref()
                    .is_some_and(|author| author.eq_ignore_ascii_case(email))
            })
            .collect()
    }
}
