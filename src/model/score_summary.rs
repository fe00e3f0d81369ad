use serde::{Deserialize, Serialize};

use super::Question;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScoreSummary {
    pub score: usize,
    pub wrong: usize,
    pub unattempted: usize,
    pub total: usize,
}

impl ScoreSummary {
    /// `answers[i]` is the option picked for `questions[i]`, `None` when left blank.
    pub fn tally(questions: &[Question], answers: &[Option<usize>]) -> Self {
        let mut summary = ScoreSummary {
            total: questions.len(),
            ..Default::default()
        };
        for (index, question) in questions.iter().enumerate() {
            match answers.get(index).copied().flatten() {
                Some(option) if question.is_correct(option) => summary.score += 1,
                Some(_) => summary.wrong += 1,
                None => summary.unattempted += 1,
            }
        }
        summary
    }

    pub fn is_consistent(&self) -> bool {
        self.score + self.wrong + self.unattempted == self.total
    }
}
