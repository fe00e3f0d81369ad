use super::{AttemptPhase, ScoreSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptEvent {
    PhaseChanged(AttemptPhase),
    LeadInChanged(u32),
    TimeRemainingChanged(u32),
    AnswerSelected {
        question_index: usize,
        option_index: usize,
    },
    Submitted {
        summary: ScoreSummary,
        auto: bool,
    },
    /// The attempt was scored but the result could not be written.
    ResultNotSaved(String),
}
