#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptCommand {
    SelectAnswer {
        question_index: usize,
        option_index: usize,
    },
    Submit,
    /// One wall-clock second elapsed.
    Tick,
    /// Host is leaving the attempt without submitting.
    Abandon,
}
