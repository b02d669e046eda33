//! Quiz attempt lifecycle: start, answer, navigate, submit.

mod controller;
mod state;

pub use controller::AttemptController;
pub use state::{ActiveAttempt, AnswerBuffer, AttemptState};
