use std::rc::Rc;

use crate::model::Quiz;
use crate::store::{keys, KeyValueStore, RecordList, StoreError};

/// Favorited quizzes, kept as snapshots so they open without a lookup.
#[derive(Clone)]
pub struct Favorites {
    quizzes: RecordList<Quiz>,
}

impl Favorites {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            quizzes: RecordList::new(store, keys::FAVORITE_QUIZZES),
        }
    }

    pub fn list(&self) -> Vec<Quiz> {
        self.quizzes.list()
    }

    pub fn is_favorite(&self, quiz_id: &str) -> bool {
        self.quizzes.get(quiz_id).is_some()
    }

    /// Returns whether the quiz is a favorite afterwards.
    pub fn toggle(&self, quiz: &Quiz) -> Result<bool, StoreError> {
        if self.quizzes.delete(&quiz.id)? {
            return Ok(false);
        }
        self.quizzes.append(quiz.clone())?;
        Ok(true)
    }

    pub fn remove(&self, quiz_id: &str) -> Result<bool, StoreError> {
        self.quizzes.delete(quiz_id)
    }
}
