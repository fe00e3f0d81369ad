pub mod attempt_engine;
pub mod settings;

pub use attempt_engine::AttemptEngine;
pub use settings::Settings;
