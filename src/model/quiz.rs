use serde::{Deserialize, Serialize};

use super::question::MIN_OPTIONS;
use super::Question;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    Limited,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizValidationError {
    #[error("Title required")]
    MissingTitle,
    #[error("Select collection")]
    MissingCollection,
    #[error("Add at least one question")]
    NoQuestions,
    #[error("Question {0} needs at least {MIN_OPTIONS} options")]
    TooFewOptions(usize),
    #[error("Question {0} marks an option that does not exist as correct")]
    CorrectIndexOutOfRange(usize),
    #[error("A limited quiz needs a time limit of at least one minute")]
    MissingTimeLimit,
    #[error("An untimed quiz cannot carry a time limit")]
    UnexpectedTimeLimit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub time_mode: TimeMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
}

impl Quiz {
    pub fn untimed(id: &str, title: &str, questions: Vec<Question>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            time_mode: TimeMode::None,
            time_limit_minutes: None,
            questions,
            image: None,
            collection_id: None,
            author_username: None,
            author_email: None,
        }
    }

    pub fn timed(id: &str, title: &str, minutes: u32, questions: Vec<Question>) -> Self {
        Self {
            time_mode: TimeMode::Limited,
            time_limit_minutes: Some(minutes),
            ..Self::untimed(id, title, questions)
        }
    }

    /// Seconds allowed for answering, `None` for untimed quizzes.
    pub fn time_limit_seconds(&self) -> Option<u32> {
        match self.time_mode {
            TimeMode::Limited => self.time_limit_minutes.map(|m| m.saturating_mul(60)),
            TimeMode::None => None,
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Shape checks applied where quizzes enter the store. The attempt engine trusts its input.
    pub fn validate(&self) -> Result<(), QuizValidationError> {
        if self.title.trim().is_empty() {
            return Err(QuizValidationError::MissingTitle);
        }
        if self.questions.is_empty() {
            return Err(QuizValidationError::NoQuestions);
        }
        for (index, question) in self.questions.iter().enumerate() {
            if question.options.len() < MIN_OPTIONS {
                return Err(QuizValidationError::TooFewOptions(index + 1));
            }
            if !question.has_option(question.correct_index) {
                return Err(QuizValidationError::CorrectIndexOutOfRange(index + 1));
            }
        }
        match (self.time_mode, self.time_limit_minutes) {
            (TimeMode::Limited, Some(minutes)) if minutes > 0 => Ok(()),
            (TimeMode::Limited, _) => Err(QuizValidationError::MissingTimeLimit),
            (TimeMode::None, Some(_)) => Err(QuizValidationError::UnexpectedTimeLimit),
            (TimeMode::None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_questions() -> Vec<Question> {
        vec![
            Question::new("Capital of Peru?", &["Lima", "Quito"], 0),
            Question::new("Largest planet?", &["Mars", "Jupiter", "Venus"], 1),
        ]
    }

    #[test]
    fn test_quiz_without_time_mode_defaults_to_untimed() {
        let quiz: Quiz = serde_json::from_str(
            r#"{"id":"1700000000000","title":"Geo","questions":[
                {"question":"Capital of Peru?","options":["Lima","Quito"],"correctIndex":0}
            ],"collectionId":"c1","authorUsername":"ana"}"#,
        )
        .unwrap();

        assert_eq!(quiz.time_mode, TimeMode::None);
        assert_eq!(quiz.time_limit_seconds(), None);
        assert_eq!(quiz.collection_id.as_deref(), Some("c1"));
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn test_timed_quiz_round_trips_camel_case_fields() {
        let quiz = Quiz::timed("q1", "Space", 2, sample_questions());
        let json = serde_json::to_value(&quiz).unwrap();

        assert_eq!(json["timeMode"], "limited");
        assert_eq!(json["timeLimitMinutes"], 2);
        assert_eq!(quiz.time_limit_seconds(), Some(120));
    }

    #[test]
    fn test_validate_rejects_malformed_quizzes() {
        let mut quiz = Quiz::untimed("q1", "  ", sample_questions());
        assert_eq!(quiz.validate(), Err(QuizValidationError::MissingTitle));

        quiz.title = "Geo".to_string();
        quiz.questions[1].correct_index = 3;
        assert_eq!(
            quiz.validate(),
            Err(QuizValidationError::CorrectIndexOutOfRange(2))
        );

        quiz.questions[1].correct_index = 0;
        quiz.questions[0].options.truncate(1);
        assert_eq!(quiz.validate(), Err(QuizValidationError::TooFewOptions(1)));

        let empty = Quiz::untimed("q2", "Empty", vec![]);
        assert_eq!(empty.validate(), Err(QuizValidationError::NoQuestions));

        let no_limit = Quiz {
            time_mode: TimeMode::Limited,
            ..Quiz::untimed("q3", "Timed", sample_questions())
        };
        assert_eq!(no_limit.validate(), Err(QuizValidationError::MissingTimeLimit));

        let zero_limit = Quiz::timed("q4", "Timed", 0, sample_questions());
        assert_eq!(zero_limit.validate(), Err(QuizValidationError::MissingTimeLimit));
    }
}
