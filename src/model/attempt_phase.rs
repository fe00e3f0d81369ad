use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AttemptPhase {
    /// Lead-in countdown; answers are not accepted yet.
    #[default]
    Starting,
    InProgress,
    /// Terminal. Answers are frozen and the result has been written.
    Submitted,
}

impl AttemptPhase {
    pub fn accepts_answers(&self) -> bool {
        matches!(self, AttemptPhase::InProgress)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptPhase::Submitted)
    }
}
