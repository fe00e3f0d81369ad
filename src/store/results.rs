use std::rc::Rc;

use log::info;

use super::{keys, KeyValueStore, Record, RecordList, StoreResult};
use crate::model::QuizResult;

impl Record for QuizResult {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Append-only history of completed attempts.
#[derive(Clone)]
pub struct ResultRepository {
    results: RecordList<QuizResult>,
}

impl ResultRepository {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            results: RecordList::new(store, keys::QUIZ_RESULTS),
        }
    }

    pub fn record(&self, result: QuizResult) -> StoreResult<()> {
        info!(
            target: "store",
            "Recording result {} for quiz {}: {}/{}",
            result.id, result.quiz_id, result.score, result.total
        );
        self.results.append(result)
    }

    pub fn list(&self) -> Vec<QuizResult> {
        self.results.list()
    }

    /// Newest first, the order the attempt history is shown in.
    pub fn list_recent_first(&self) -> Vec<QuizResult> {
        let mut results = self.list();
        results.reverse();
        results
    }

    pub fn list_for_quiz(&self, quiz_id: &str) -> Vec<QuizResult> {
        self.list()
            .into_iter()
            .filter(|r| r.quiz_id == quiz_id)
            .collect()
    }

    pub fn best_for_quiz(&self, quiz_id: &str) -> Option<QuizResult> {
        self.list_for_quiz(quiz_id)
            .into_iter()
            .max_by_key(|r| r.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, Quiz, ScoreSummary};
    use crate::store::MemoryStore;
    use std::time::SystemTime;

    fn result_for(quiz: &Quiz, score: usize) -> QuizResult {
        let summary = ScoreSummary {
            score,
            wrong: quiz.question_count() - score,
            unattempted: 0,
            total: quiz.question_count(),
        };
        QuizResult::new(quiz, &summary, SystemTime::now())
    }

    #[test]
    fn test_results_are_listed_in_both_orders() {
        let repository = ResultRepository::new(Rc::new(MemoryStore::new()));
        let questions = vec![
            Question::new("a", &["x", "y"], 0),
            Question::new("b", &["x", "y"], 0),
        ];
        let geo = Quiz::untimed("geo", "Geo", questions.clone());
        let math = Quiz::untimed("math", "Math", questions);

        repository.record(result_for(&geo, 1)).unwrap();
        repository.record(result_for(&math, 2)).unwrap();
        repository.record(result_for(&geo, 2)).unwrap();

        let stored: Vec<_> = repository.list().iter().map(|r| r.quiz_id.clone()).collect();
        assert_eq!(stored, vec!["geo", "math", "geo"]);

        let recent: Vec<_> = repository
            .list_recent_first()
            .iter()
            .map(|r| (r.quiz_id.clone(), r.score))
            .collect();
        assert_eq!(
            recent,
            vec![
                ("geo".to_string(), 2),
                ("math".to_string(), 2),
                ("geo".to_string(), 1)
            ]
        );

        assert_eq!(repository.list_for_quiz("geo").len(), 2);
        assert_eq!(repository.best_for_quiz("geo").map(|r| r.score), Some(2));
        assert_eq!(repository.best_for_quiz("history"), None);
    }
}
