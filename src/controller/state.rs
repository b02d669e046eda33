//! Attempt state held by the controller.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::models::{AnswerValue, AnsweredQuestion, Question, QuizAttempt, QuizResult};

/// Where the controller is in an attempt's lifecycle.
#[derive(Debug, Default)]
pub enum AttemptState {
    /// No attempt in progress.
    #[default]
    Idle,
    /// An attempt is being answered.
    InProgress(ActiveAttempt),
    /// The last attempt was submitted and graded.
    Result(QuizResult),
}

impl AttemptState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InProgress(_) => "an attempt is in progress",
            Self::Result(_) => "a result is shown",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Answers keyed by question id. One entry per question at most.
#[derive(Debug, Clone, Default)]
pub struct AnswerBuffer {
    entries: HashMap<String, AnsweredQuestion>,
}

impl AnswerBuffer {
    pub fn get(&self, question_id: &str) -> Option<&AnsweredQuestion> {
        self.entries.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite the answer for `question_id`.
    fn record(&mut self, question_id: &str, answer: AnswerValue, at: DateTime<Utc>) -> &AnsweredQuestion {
        let entry = AnsweredQuestion {
            question_id: question_id.to_string(),
            answer,
            answered_at: at,
        };
        self.entries.insert(question_id.to_string(), entry);
        &self.entries[question_id]
    }

    /// Answered entries, following the order of `questions`.
    pub fn in_question_order<'a>(
        &'a self,
        questions: &'a [Question],
    ) -> impl Iterator<Item = &'a AnsweredQuestion> + 'a {
        questions.iter().filter_map(|q| self.entries.get(&q.id))
    }
}

/// An attempt being answered: the attempt itself, the question cursor and
/// the local answers.
#[derive(Debug, Clone)]
pub struct ActiveAttempt {
    attempt: QuizAttempt,
    cursor: usize,
    answers: AnswerBuffer,
}

impl ActiveAttempt {
    /// `attempt` must contain at least one question.
    pub(super) fn new(attempt: QuizAttempt) -> Self {
        debug_assert!(!attempt.questions.is_empty());
        Self {
            attempt,
            cursor: 0,
            answers: AnswerBuffer::default(),
        }
    }

    pub fn attempt(&self) -> &QuizAttempt {
        &self.attempt
    }

    pub fn answers(&self) -> &AnswerBuffer {
        &self.answers
    }

    /// Zero-based index of the question being shown.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn question_count(&self) -> usize {
        self.attempt.questions.len()
    }

    pub fn current_question(&self) -> &Question {
        &self.attempt.questions[self.cursor]
    }

    /// The buffered answer for the question under the cursor.
    pub fn selected_answer(&self) -> Option<&AnsweredQuestion> {
        self.answers.get(&self.current_question().id)
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.attempt
            .questions
            .get(index)
            .is_some_and(|q| self.answers.get(&q.id).is_some())
    }

    /// `(answered, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.answers.len(), self.question_count())
    }

    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.attempt.deadline() - now).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.attempt.deadline()
    }

    pub(super) fn record_current(&mut self, answer: AnswerValue, at: DateTime<Utc>) -> AnsweredQuestion {
        let question_id = self.attempt.questions[self.cursor].id.clone();
        self.answers.record(&question_id, answer, at).clone()
    }

    /// Returns whether the cursor moved.
    pub(super) fn step_forward(&mut self) -> bool {
        if self.cursor + 1 < self.question_count() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Returns whether the cursor moved.
    pub(super) fn step_back(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub(super) fn jump_to(&mut self, index: usize) {
        self.cursor = index.min(self.question_count() - 1);
    }
}
