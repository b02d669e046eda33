//! Domain types shared by the API client, the attempt controller and the UI.

mod attempt;
mod question;
mod quiz;
mod result;

pub use attempt::{AnswerValue, AnsweredQuestion, QuizAttempt};
pub use question::{AnswerOption, Question};
pub use quiz::{QuizStatus, QuizSummary};
pub use result::{QuestionOutcome, QuizResult};
