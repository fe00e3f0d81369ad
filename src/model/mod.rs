mod attempt_command;
mod attempt_event;
mod attempt_phase;
mod collection;
mod countdown;
mod invite;
mod question;
mod quiz;
mod quiz_result;
mod score_summary;
mod user;

pub use attempt_command::AttemptCommand;
pub use attempt_event::AttemptEvent;
pub use attempt_phase::AttemptPhase;
pub use collection::{Collection, Visibility};
pub use countdown::{Countdown, CountdownTick};
pub use invite::{Invite, InviteStatus};
pub use question::{Question, MIN_OPTIONS};
pub use quiz::{Quiz, QuizValidationError, TimeMode};
pub use quiz_result::QuizResult;
pub use score_summary::ScoreSummary;
pub use user::User;
