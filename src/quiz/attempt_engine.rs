use log::{error, info, trace};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::SystemTime;

use super::settings::Settings;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{
    AttemptCommand, AttemptEvent, AttemptPhase, Countdown, CountdownTick, Quiz, QuizResult,
    ScoreSummary,
};
use crate::store::{ResultRepository, StoreResult};

/// Drives one quiz-taking session: lead-in countdown, answering with an
/// optional time limit, then a single scored and persisted result.
pub struct AttemptEngine {
    quiz: Rc<Quiz>,
    answers: Vec<Option<usize>>,
    phase: AttemptPhase,
    lead_in: Countdown,
    time_limit: Option<Countdown>,
    summary: Option<ScoreSummary>,
    abandoned: bool,
    results: ResultRepository,
    command_subscription: Option<Unsubscriber<AttemptCommand>>,
    attempt_event_emitter: EventEmitter<AttemptEvent>,
}

impl Destroyable for AttemptEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.command_subscription.take() {
            subscription.unsubscribe();
        }
        if self.abandoned || self.phase.is_terminal() {
            return;
        }
        info!(target: "attempt", "Attempt at quiz {} abandoned; nothing recorded", self.quiz.id);
        self.abandoned = true;
        self.lead_in.disarm();
        if let Some(time_limit) = self.time_limit.as_mut() {
            time_limit.disarm();
        }
    }
}

impl EventHandler<AttemptCommand> for AttemptEngine {
    fn handle_event(&mut self, command: &AttemptCommand) {
        trace!(target: "attempt", "Handling command: {:?}", command);
        match *command {
            AttemptCommand::SelectAnswer {
                question_index,
                option_index,
            } => {
                self.select_answer(question_index, option_index);
            }
            AttemptCommand::Submit => {
                // failure is already logged and announced as ResultNotSaved
                let _ = self.submit();
            }
            AttemptCommand::Tick => self.tick(),
            AttemptCommand::Abandon => self.abandon(),
        }
    }
}

impl AttemptEngine {
    /// Starts the attempt. Observers subscribed to the emitter's channel see
    /// the initial `PhaseChanged(Starting)`.
    pub fn new(
        quiz: Rc<Quiz>,
        results: ResultRepository,
        settings: &Settings,
        attempt_event_emitter: EventEmitter<AttemptEvent>,
    ) -> Self {
        let mut engine = Self {
            answers: vec![None; quiz.question_count()],
            quiz,
            phase: AttemptPhase::Starting,
            lead_in: Countdown::default(),
            time_limit: None,
            summary: None,
            abandoned: false,
            results,
            command_subscription: None,
            attempt_event_emitter,
        };
        info!(
            target: "attempt",
            "Starting attempt at quiz {} ({} questions, limit {:?}s)",
            engine.quiz.id,
            engine.quiz.question_count(),
            engine.quiz.time_limit_seconds()
        );
        engine.emit(AttemptEvent::PhaseChanged(AttemptPhase::Starting));
        if settings.lead_in_seconds == 0 {
            engine.begin_answering();
        } else {
            engine.lead_in.arm(settings.lead_in_seconds);
            engine.emit(AttemptEvent::LeadInChanged(settings.lead_in_seconds));
        }
        engine
    }

    /// Like `new`, but also listens for `AttemptCommand`s until submitted or destroyed.
    pub fn connected(
        quiz: Rc<Quiz>,
        results: ResultRepository,
        settings: &Settings,
        attempt_command_observer: EventObserver<AttemptCommand>,
        attempt_event_emitter: EventEmitter<AttemptEvent>,
    ) -> Rc<RefCell<Self>> {
        let engine = Rc::new(RefCell::new(Self::new(
            quiz,
            results,
            settings,
            attempt_event_emitter,
        )));
        AttemptEngine::wire_subscription(&engine, attempt_command_observer);
        engine
    }

    fn wire_subscription(
        engine: &Rc<RefCell<Self>>,
        attempt_command_observer: EventObserver<AttemptCommand>,
    ) {
        let engine_weak = Rc::downgrade(engine);
        let subscription = attempt_command_observer.subscribe(move |command| {
            let Some(engine) = engine_weak.upgrade() else {
                return;
            };
            match engine.try_borrow_mut() {
                Ok(mut engine) => engine.handle_event(command),
                Err(_) => error!(
                    target: "attempt",
                    "Dropping {:?}: issued while the attempt was handling another command",
                    command
                ),
            };
        });
        engine.borrow_mut().command_subscription = Some(subscription);
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn answer(&self, question_index: usize) -> Option<usize> {
        self.answers.get(question_index).copied().flatten()
    }

    /// Present once the attempt has been submitted.
    pub fn summary(&self) -> Option<ScoreSummary> {
        self.summary
    }

    pub fn lead_in_remaining(&self) -> u32 {
        if self.phase == AttemptPhase::Starting {
            self.lead_in.remaining_seconds()
        } else {
            0
        }
    }

    /// `None` for untimed quizzes.
    pub fn time_remaining_seconds(&self) -> Option<u32> {
        match &self.time_limit {
            Some(countdown) => Some(countdown.remaining_seconds()),
            None => self.quiz.time_limit_seconds(),
        }
    }

    /// Whether the host should keep delivering one tick per second.
    pub fn is_timer_armed(&self) -> bool {
        self.lead_in.is_armed() || self.time_limit.as_ref().is_some_and(Countdown::is_armed)
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    /// Records `option_index` for `question_index`, replacing any earlier pick.
    /// Returns whether the selection was taken.
    pub fn select_answer(&mut self, question_index: usize, option_index: usize) -> bool {
        if self.abandoned || !self.phase.accepts_answers() {
            trace!(
                target: "attempt",
                "Ignoring selection {}:{} while {:?}",
                question_index, option_index, self.phase
            );
            return false;
        }
        let in_range = self
            .quiz
            .questions
            .get(question_index)
            .is_some_and(|question| question.has_option(option_index));
        if !in_range {
            trace!(
                target: "attempt",
                "Ignoring out of range selection {}:{}",
                question_index, option_index
            );
            return false;
        }
        self.answers[question_index] = Some(option_index);
        self.emit(AttemptEvent::AnswerSelected {
            question_index,
            option_index,
        });
        true
    }

    /// Manual submit. A no-op unless answering is in progress.
    pub fn submit(&mut self) -> StoreResult<()> {
        self.finish(false)
    }

    pub fn tick(&mut self) {
        if self.abandoned {
            return;
        }
        match self.phase {
            AttemptPhase::Starting => match self.lead_in.tick() {
                CountdownTick::Running(remaining) => {
                    self.emit(AttemptEvent::LeadInChanged(remaining))
                }
                CountdownTick::Expired => {
                    self.emit(AttemptEvent::LeadInChanged(0));
                    self.begin_answering();
                }
                CountdownTick::Disarmed => (),
            },
            AttemptPhase::InProgress => {
                let tick = match self.time_limit.as_mut() {
                    Some(countdown) => countdown.tick(),
                    None => return,
                };
                match tick {
                    CountdownTick::Running(remaining) => {
                        self.emit(AttemptEvent::TimeRemainingChanged(remaining))
                    }
                    CountdownTick::Expired => {
                        self.emit(AttemptEvent::TimeRemainingChanged(0));
                        info!(target: "attempt", "Time is up for quiz {}", self.quiz.id);
                        let _ = self.finish(true);
                    }
                    CountdownTick::Disarmed => (),
                }
            }
            AttemptPhase::Submitted => (),
        }
    }

    /// The host is leaving: stop the clock and record nothing.
    pub fn abandon(&mut self) {
        self.destroy();
    }

    fn begin_answering(&mut self) {
        self.lead_in.disarm();
        self.phase = AttemptPhase::InProgress;
        self.emit(AttemptEvent::PhaseChanged(AttemptPhase::InProgress));
        if let Some(seconds) = self.quiz.time_limit_seconds() {
            self.time_limit = Some(Countdown::armed(seconds));
            self.emit(AttemptEvent::TimeRemainingChanged(seconds));
        }
    }

    fn finish(&mut self, auto: bool) -> StoreResult<()> {
        if self.abandoned || self.phase != AttemptPhase::InProgress {
            trace!(target: "attempt", "Ignoring submit while {:?}", self.phase);
            return Ok(());
        }
        if let Some(time_limit) = self.time_limit.as_mut() {
            time_limit.disarm();
        }

        let summary = ScoreSummary::tally(&self.quiz.questions, &self.answers);
        let saved = self
            .results
            .record(QuizResult::new(&self.quiz, &summary, SystemTime::now()));

        self.summary = Some(summary);
        self.phase = AttemptPhase::Submitted;
        if let Some(subscription) = self.command_subscription.take() {
            subscription.unsubscribe();
        }

        info!(
            target: "attempt",
            "Submitted quiz {} (auto: {}): {} correct, {} wrong, {} unattempted of {}",
            self.quiz.id, auto, summary.score, summary.wrong, summary.unattempted, summary.total
        );
        if let Err(err) = &saved {
            error!(target: "attempt", "Result for quiz {} not saved: {}", self.quiz.id, err);
            self.emit(AttemptEvent::ResultNotSaved(err.to_string()));
        }
        self.emit(AttemptEvent::PhaseChanged(AttemptPhase::Submitted));
        self.emit(AttemptEvent::Submitted { summary, auto });
        saved
    }

    fn emit(&self, event: AttemptEvent) {
        self.attempt_event_emitter.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use test_context::test_context;

    use super::*;
    use crate::events::Channel;
    use crate::quiz::tests::{three_question_quiz, RecordingObserver};
    use crate::store::{keys, KeyValueStore, MemoryStore, StoreError};
    use crate::tests::UsingLogger;

    fn settings(lead_in_seconds: u32) -> Settings {
        Settings {
            lead_in_seconds,
            ..Settings::default()
        }
    }

    struct Harness {
        engine: AttemptEngine,
        results: ResultRepository,
        events: RecordingObserver<AttemptEvent>,
    }

    fn start(quiz: Quiz, lead_in_seconds: u32) -> Harness {
        let results = ResultRepository::new(Rc::new(MemoryStore::new()));
        let (emitter, observer) = Channel::<AttemptEvent>::new();
        let events = RecordingObserver::attach(&observer);
        let engine = AttemptEngine::new(
            Rc::new(quiz),
            results.clone(),
            &settings(lead_in_seconds),
            emitter,
        );
        Harness {
            engine,
            results,
            events,
        }
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_manual_submit_scores_each_question(_: &mut UsingLogger) {
        let mut harness = start(three_question_quiz(None), 0);
        let engine = &mut harness.engine;

        assert_eq!(engine.phase(), AttemptPhase::InProgress);
        engine.select_answer(0, 0);
        engine.select_answer(1, 1);
        engine.select_answer(2, 1);
        engine.submit().unwrap();

        let summary = engine.summary().unwrap();
        assert_eq!(
            summary,
            ScoreSummary {
                score: 2,
                wrong: 1,
                unattempted: 0,
                total: 3
            }
        );
        assert_eq!(engine.phase(), AttemptPhase::Submitted);

        let stored = harness.results.list();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].quiz_id, "q-three");
        assert_eq!(stored[0].summary(), summary);
        assert!(harness.events.contains(&AttemptEvent::Submitted {
            summary,
            auto: false
        }));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_time_limit_exhaustion_auto_submits(_: &mut UsingLogger) {
        let mut harness = start(three_question_quiz(Some(1)), 0);
        let engine = &mut harness.engine;

        assert_eq!(engine.time_remaining_seconds(), Some(60));
        engine.select_answer(0, 0);
        for _ in 0..59 {
            engine.tick();
        }
        assert_eq!(engine.phase(), AttemptPhase::InProgress);
        assert_eq!(engine.time_remaining_seconds(), Some(1));

        engine.tick();
        assert_eq!(engine.phase(), AttemptPhase::Submitted);
        assert!(!engine.is_timer_armed());

        let summary = engine.summary().unwrap();
        assert_eq!(summary.score, 1);
        assert_eq!(summary.wrong, 0);
        assert_eq!(summary.unattempted, 2);
        assert!(harness.events.contains(&AttemptEvent::Submitted {
            summary,
            auto: true
        }));
        assert_eq!(harness.results.list().len(), 1);
    }

    #[test]
    fn test_untimed_quiz_never_auto_submits() {
        let mut harness = start(three_question_quiz(None), 0);
        let engine = &mut harness.engine;

        assert!(!engine.is_timer_armed());
        for _ in 0..10_000 {
            engine.tick();
        }
        assert_eq!(engine.phase(), AttemptPhase::InProgress);
        assert_eq!(engine.time_remaining_seconds(), None);
        assert!(harness.results.list().is_empty());
    }

    #[test]
    fn test_lead_in_blocks_answers_until_it_runs_out() {
        let mut harness = start(three_question_quiz(Some(1)), 10);
        let engine = &mut harness.engine;

        assert_eq!(engine.phase(), AttemptPhase::Starting);
        assert!(engine.is_timer_armed());
        assert!(!engine.select_answer(0, 0));
        assert_eq!(engine.submit().ok(), Some(()));
        assert_eq!(engine.phase(), AttemptPhase::Starting);

        for _ in 0..9 {
            engine.tick();
        }
        assert_eq!(engine.lead_in_remaining(), 1);
        assert_eq!(engine.time_remaining_seconds(), Some(60));

        engine.tick();
        assert_eq!(engine.phase(), AttemptPhase::InProgress);
        assert!(engine.is_timer_armed());
        assert_eq!(engine.answers(), &[None, None, None]);
        assert!(engine.select_answer(0, 0));

        assert_eq!(
            harness.events.phases(),
            vec![AttemptPhase::Starting, AttemptPhase::InProgress]
        );
    }

    #[test]
    fn test_last_selection_wins() {
        let mut harness = start(three_question_quiz(None), 0);
        let engine = &mut harness.engine;

        engine.select_answer(1, 0);
        engine.select_answer(1, 1);
        engine.select_answer(1, 1);

        assert_eq!(engine.answers(), &[None, Some(1), None]);
    }

    #[test]
    fn test_out_of_range_selection_is_ignored() {
        let mut harness = start(three_question_quiz(None), 0);
        let engine = &mut harness.engine;

        assert!(!engine.select_answer(7, 0));
        assert!(!engine.select_answer(0, 2));
        assert_eq!(engine.answers(), &[None, None, None]);
    }

    #[test]
    fn test_answers_freeze_after_submit_and_second_submit_is_ignored() {
        let mut harness = start(three_question_quiz(None), 0);
        let engine = &mut harness.engine;

        engine.select_answer(0, 1);
        engine.submit().unwrap();
        assert!(!engine.select_answer(0, 0));
        assert_eq!(engine.answer(0), Some(1));

        engine.submit().unwrap();
        engine.tick();
        assert_eq!(harness.results.list().len(), 1);
        assert_eq!(harness.events.count_submitted(), 1);
    }

    #[test]
    fn test_abandoned_attempt_records_nothing() {
        let mut harness = start(three_question_quiz(Some(1)), 0);
        let engine = &mut harness.engine;

        engine.select_answer(0, 0);
        engine.abandon();
        assert!(engine.is_abandoned());
        assert!(!engine.is_timer_armed());

        for _ in 0..120 {
            engine.tick();
        }
        engine.submit().unwrap();
        assert!(!engine.select_answer(1, 1));
        assert_eq!(engine.phase(), AttemptPhase::InProgress);
        assert!(harness.results.list().is_empty());
        assert_eq!(harness.events.count_submitted(), 0);
    }

    #[test]
    fn test_results_accumulate_across_attempts() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let results = ResultRepository::new(store);
        for _ in 0..2 {
            let (emitter, _observer) = Channel::<AttemptEvent>::new();
            let mut engine = AttemptEngine::new(
                Rc::new(three_question_quiz(None)),
                results.clone(),
                &settings(0),
                emitter,
            );
            engine.submit().unwrap();
        }

        let stored = results.list();
        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0].id, stored[1].id);
        assert!(stored.iter().all(|r| r.unattempted == 3));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_malformed_history_is_replaced_by_the_new_result(_: &mut UsingLogger) {
        let store = Rc::new(MemoryStore::new());
        store.set(keys::QUIZ_RESULTS, "{not a list").unwrap();
        let (emitter, observer) = Channel::<AttemptEvent>::new();
        let events = RecordingObserver::attach(&observer);
        let mut engine = AttemptEngine::new(
            Rc::new(three_question_quiz(None)),
            ResultRepository::new(store.clone()),
            &settings(0),
            emitter,
        );

        engine.select_answer(1, 1);
        engine.submit().unwrap();

        let raw = store.get(keys::QUIZ_RESULTS).unwrap().unwrap();
        let stored: Vec<QuizResult> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].quiz_id, "q-three");
        assert_eq!(stored[0].summary(), engine.summary().unwrap());
        assert!(!events
            .all()
            .iter()
            .any(|event| matches!(event, AttemptEvent::ResultNotSaved(_))));
    }

    struct UnwritableStore;

    impl KeyValueStore for UnwritableStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(Some("not a list".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }

        fn remove(&self, _key: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unsaved_result_still_ends_the_attempt() {
        let (emitter, observer) = Channel::<AttemptEvent>::new();
        let events = RecordingObserver::attach(&observer);
        let mut engine = AttemptEngine::new(
            Rc::new(three_question_quiz(None)),
            ResultRepository::new(Rc::new(UnwritableStore)),
            &settings(0),
            emitter,
        );

        engine.select_answer(0, 0);
        assert!(engine.submit().is_err());
        assert_eq!(engine.phase(), AttemptPhase::Submitted);
        assert_eq!(engine.summary().map(|s| s.score), Some(1));
        assert!(events
            .all()
            .iter()
            .any(|event| matches!(event, AttemptEvent::ResultNotSaved(_))));
    }

    #[test]
    fn test_connected_engine_follows_commands() {
        let results = ResultRepository::new(Rc::new(MemoryStore::new()));
        let (command_emitter, command_observer) = Channel::<AttemptCommand>::new();
        let (event_emitter, event_observer) = Channel::<AttemptEvent>::new();
        let events = RecordingObserver::attach(&event_observer);

        let engine = AttemptEngine::connected(
            Rc::new(three_question_quiz(Some(1))),
            results.clone(),
            &settings(2),
            command_observer.clone(),
            event_emitter,
        );

        command_emitter.emit(&AttemptCommand::SelectAnswer {
            question_index: 0,
            option_index: 0,
        });
        assert_eq!(engine.borrow().answer(0), None);

        command_emitter.emit(&AttemptCommand::Tick);
        command_emitter.emit(&AttemptCommand::Tick);
        command_emitter.emit(&AttemptCommand::SelectAnswer {
            question_index: 0,
            option_index: 0,
        });
        command_emitter.emit(&AttemptCommand::Submit);

        assert_eq!(engine.borrow().phase(), AttemptPhase::Submitted);
        assert_eq!(engine.borrow().summary().map(|s| s.score), Some(1));
        assert_eq!(command_observer.listener_count(), 0);
        assert_eq!(results.list().len(), 1);
        assert_eq!(
            events.phases(),
            vec![
                AttemptPhase::Starting,
                AttemptPhase::InProgress,
                AttemptPhase::Submitted
            ]
        );
    }

    #[test]
    fn test_abandon_command_detaches_engine() {
        let results = ResultRepository::new(Rc::new(MemoryStore::new()));
        let (command_emitter, command_observer) = Channel::<AttemptCommand>::new();
        let (event_emitter, _event_observer) = Channel::<AttemptEvent>::new();

        let engine = AttemptEngine::connected(
            Rc::new(three_question_quiz(None)),
            results.clone(),
            &settings(0),
            command_observer.clone(),
            event_emitter,
        );

        command_emitter.emit(&AttemptCommand::Abandon);
        command_emitter.emit(&AttemptCommand::Submit);

        assert!(engine.borrow().is_abandoned());
        assert_eq!(command_observer.listener_count(), 0);
        assert!(results.list().is_empty());
    }
}
