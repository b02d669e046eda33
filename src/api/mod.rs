//! Remote quiz API.
//!
//! [`QuizApi`] is the seam the attempt controller talks through;
//! [`HttpQuizApi`] is the production implementation.

mod client;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{QuizAttempt, QuizResult, QuizSummary};
use crate::protocol::{AnswerRequest, SubmitRequest};

pub use client::HttpQuizApi;

#[async_trait]
pub trait QuizApi: Send + Sync + 'static {
    /// Quizzes visible to the signed-in student.
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, ApiError>;

    /// Open a new attempt for `quiz_id`.
    async fn start_attempt(&self, quiz_id: &str) -> Result<QuizAttempt, ApiError>;

    /// Persist a single answer. Callers treat this as advisory.
    async fn submit_answer(&self, request: AnswerRequest) -> Result<(), ApiError>;

    /// Submit the whole attempt and receive its grade.
    async fn submit_attempt(&self, request: SubmitRequest) -> Result<QuizResult, ApiError>;
}
