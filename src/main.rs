use std::env;
use std::io::{self, BufRead};
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info};

use quizzo::events::{Channel, EventEmitter, EventObserver, Unsubscriber};
use quizzo::helpers::format_clock;
use quizzo::model::{AttemptCommand, AttemptEvent, AttemptPhase, Quiz};
use quizzo::quiz::{AttemptEngine, Settings};
use quizzo::store::{FileStore, KeyValueStore, QuizRepository, ResultRepository};

const TICK: Duration = Duration::from_secs(1);

fn init_logging() {
    let default_level = if Settings::is_debug_mode() { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let settings = Settings::load();
    let store: Rc<dyn KeyValueStore> = match FileStore::open(Settings::data_dir()) {
        Ok(store) => Rc::new(store),
        Err(e) => {
            error!("Could not open data directory {:?}: {}", Settings::data_dir(), e);
            return ExitCode::FAILURE;
        }
    };
    let quizzes = QuizRepository::new(store.clone());
    let results = ResultRepository::new(store);

    match env::args().nth(1) {
        None => {
            list_quizzes(&quizzes, &results);
            ExitCode::SUCCESS
        }
        Some(quiz_id) => match quizzes.get(&quiz_id) {
            Some(quiz) => run_attempt(Rc::new(quiz), results, &settings),
            None => {
                eprintln!("No quiz with id {}", quiz_id);
                ExitCode::FAILURE
            }
        },
    }
}

fn list_quizzes(quizzes: &QuizRepository, results: &ResultRepository) {
    let all = quizzes.list();
    if all.is_empty() {
        println!("No quizzes yet.");
        return;
    }
    for quiz in all {
        let limit = quiz
            .time_limit_seconds()
            .map_or_else(|| "untimed".to_string(), format_clock);
        let best = results
            .best_for_quiz(&quiz.id)
            .map_or_else(String::new, |r| format!(", best {}/{}", r.score, r.total));
        println!(
            "{}  {} ({} questions, {}{})",
            quiz.id,
            quiz.title,
            quiz.question_count(),
            limit,
            best
        );
    }
}

fn run_attempt(quiz: Rc<Quiz>, results: ResultRepository, settings: &Settings) -> ExitCode {
    let (command_emitter, command_observer) = Channel::<AttemptCommand>::new();
    let (event_emitter, event_observer) = Channel::<AttemptEvent>::new();
    let _printer = print_events(&event_observer, quiz.clone());

    let engine = AttemptEngine::connected(
        quiz,
        results,
        settings,
        command_observer,
        event_emitter,
    );

    let lines = spawn_stdin_reader();
    let mut next_tick = Instant::now() + TICK;
    loop {
        let (phase, armed) = {
            let engine = engine.borrow();
            if engine.is_abandoned() {
                return ExitCode::SUCCESS;
            }
            (engine.phase(), engine.is_timer_armed())
        };
        if phase == AttemptPhase::Submitted {
            return ExitCode::SUCCESS;
        }

        let received = if armed {
            lines.recv_timeout(next_tick.saturating_duration_since(Instant::now()))
        } else {
            lines.recv().map_err(|_| RecvTimeoutError::Disconnected)
        };
        match received {
            Ok(line) => handle_line(&line, &command_emitter),
            Err(RecvTimeoutError::Timeout) => {
                next_tick += TICK;
                command_emitter.emit(&AttemptCommand::Tick);
            }
            Err(RecvTimeoutError::Disconnected) => {
                info!(target: "attempt", "stdin closed, abandoning attempt");
                engine.borrow_mut().abandon();
                return ExitCode::SUCCESS;
            }
        }
        if !armed {
            next_tick = Instant::now() + TICK;
        }
    }
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn handle_line(line: &str, commands: &EventEmitter<AttemptCommand>) {
    match line.trim() {
        "" => {}
        "submit" => commands.emit(&AttemptCommand::Submit),
        "quit" => commands.emit(&AttemptCommand::Abandon),
        other => match parse_selection(other) {
            Some((question_index, option_index)) => {
                commands.emit(&AttemptCommand::SelectAnswer {
                    question_index,
                    option_index,
                })
            }
            None => println!("Commands: <question> <option>, submit, quit"),
        },
    }
}

/// "2 3" selects option 3 of question 2; both numbers start at 1.
fn parse_selection(input: &str) -> Option<(usize, usize)> {
    let mut parts = input.split_whitespace();
    let question: usize = parts.next()?.parse().ok()?;
    let option: usize = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((question.checked_sub(1)?, option.checked_sub(1)?))
}

fn print_events(
    observer: &EventObserver<AttemptEvent>,
    quiz: Rc<Quiz>,
) -> Unsubscriber<AttemptEvent> {
    observer.subscribe(move |event| match event {
        AttemptEvent::PhaseChanged(AttemptPhase::Starting) => {
            println!("{}", quiz.title);
        }
        AttemptEvent::PhaseChanged(AttemptPhase::InProgress) => print_questions(&quiz),
        AttemptEvent::PhaseChanged(AttemptPhase::Submitted) => {}
        AttemptEvent::LeadInChanged(seconds) => println!("Starting in {}...", seconds),
        AttemptEvent::TimeRemainingChanged(seconds) => {
            if *seconds % 60 == 0 || *seconds <= 10 {
                println!("Time left {}", format_clock(*seconds));
            }
        }
        AttemptEvent::AnswerSelected {
            question_index,
            option_index,
        } => println!("Q{}: option {}", question_index + 1, option_index + 1),
        AttemptEvent::Submitted { summary, auto } => {
            if *auto {
                println!("Time is up.");
            }
            println!(
                "Score {}/{} ({} wrong, {} unattempted)",
                summary.score, summary.total, summary.wrong, summary.unattempted
            );
        }
        AttemptEvent::ResultNotSaved(reason) => {
            eprintln!("Your result could not be saved: {}", reason);
        }
    })
}

fn print_questions(quiz: &Quiz) {
    for (index, question) in quiz.questions.iter().enumerate() {
        println!("{}. {}", index + 1, question.text);
        for (option_index, option) in question.options.iter().enumerate() {
            println!("   {}) {}", option_index + 1, option);
        }
    }
    println!("Answer with <question> <option>, then submit.");
}
