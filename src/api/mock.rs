//! In-memory [`QuizApi`] for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ApiError;
use crate::models::{AnswerOption, Question, QuizAttempt, QuizResult, QuizStatus, QuizSummary};
use crate::protocol::{AnswerRequest, SubmitRequest};

use super::QuizApi;

/// Serves one quiz with `question_count` questions, each offering options
/// `a`, `b` and `c` unless marked free-text. Failures can be switched on per
/// endpoint.
#[derive(Default)]
pub struct MockApi {
    pub question_count: usize,
    /// 1-based numbers of the questions that have no options.
    pub free_text: Vec<usize>,
    pub fail_start: AtomicBool,
    pub fail_answers: AtomicBool,
    pub fail_submit: AtomicBool,
    pub started: Mutex<Vec<String>>,
    pub synced: Mutex<Vec<AnswerRequest>>,
    pub submitted: Mutex<Vec<SubmitRequest>>,
    /// Start time handed out with new attempts instead of the current time.
    pub started_at: Mutex<Option<DateTime<Utc>>>,
}

impl MockApi {
    pub fn with_questions(question_count: usize) -> Self {
        Self {
            question_count,
            ..Self::default()
        }
    }

    pub fn with_free_text(mut self, number: usize) -> Self {
        self.free_text.push(number);
        self
    }

    pub fn set_fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_answers(&self, fail: bool) {
        self.fail_answers.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_submit(&self, fail: bool) {
        self.fail_submit.store(fail, Ordering::SeqCst);
    }

    pub fn set_started_at(&self, at: DateTime<Utc>) {
        *self.started_at.lock().unwrap() = Some(at);
    }

    pub fn submitted(&self) -> Vec<SubmitRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn synced(&self) -> Vec<AnswerRequest> {
        self.synced.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizApi for MockApi {
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, ApiError> {
        Ok(vec![QuizSummary {
            id: "quiz-1".to_string(),
            title: "Data Structures".to_string(),
            status: QuizStatus::Available,
            duration: 10,
            passing_score: 50,
            question_count: self.question_count,
            description: None,
            course: None,
        }])
    }

    async fn start_attempt(&self, quiz_id: &str) -> Result<QuizAttempt, ApiError> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        let mut started = self.started.lock().unwrap();
        started.push(quiz_id.to_string());

        let questions = (1..=self.question_count)
            .map(|n| Question {
                id: format!("q{n}"),
                text: format!("Question {n}"),
                options: if self.free_text.contains(&n) {
                    Vec::new()
                } else {
                    ["a", "b", "c"]
                        .into_iter()
                        .map(|id| AnswerOption {
                            id: id.to_string(),
                            text: id.to_uppercase(),
                        })
                        .collect()
                },
                points: 1,
            })
            .collect();

        Ok(QuizAttempt {
            id: format!("attempt-{}", started.len()),
            quiz_id: quiz_id.to_string(),
            questions,
            duration: 10,
            started_at: self.started_at.lock().unwrap().unwrap_or_else(Utc::now),
            server_started_at: None,
        })
    }

    async fn submit_answer(&self, request: AnswerRequest) -> Result<(), ApiError> {
        if self.fail_answers.load(Ordering::SeqCst) {
            return Err(ApiError::Timeout);
        }
        self.synced.lock().unwrap().push(request);
        Ok(())
    }

    async fn submit_attempt(&self, request: SubmitRequest) -> Result<QuizResult, ApiError> {
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection reset".to_string()));
        }
        let answered = request.answers.len() as u32;
        self.submitted.lock().unwrap().push(request);

        let total = self.question_count as u32;
        let percentage = if total == 0 {
            0.0
        } else {
            f64::from(answered) * 100.0 / f64::from(total)
        };
        Ok(QuizResult {
            total_points: total,
            earned_points: answered,
            percentage,
            passed: percentage >= 50.0,
            breakdown: None,
        })
    }
}
