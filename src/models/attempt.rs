use std::time::Duration;

use chrono::{DateTime, Utc};

use super::Question;

/// An attempt handed out by the server when a quiz is started.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAttempt {
    /// Opaque token assigned by the server.
    pub id: String,
    pub quiz_id: String,
    pub questions: Vec<Question>,
    /// Minutes.
    pub duration: u32,
    /// Local clock when the start call returned. The countdown runs from here.
    pub started_at: DateTime<Utc>,
    /// `startedAt` as reported by the server, if any.
    pub server_started_at: Option<DateTime<Utc>>,
}

impl QuizAttempt {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }

    /// Length of the countdown the attempt runs under.
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration) * 60)
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.started_at + chrono::Duration::minutes(i64::from(self.duration))
    }
}

/// What the student chose for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    /// Id of one of the question's options.
    Option(String),
    /// Free-text answer.
    Text(String),
}

impl AnswerValue {
    /// The `selectedAnswer` string the API expects.
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Option(id) => id,
            Self::Text(text) => text,
        }
    }

    pub fn option_id(&self) -> Option<&str> {
        match self {
            Self::Option(id) => Some(id),
            Self::Text(_) => None,
        }
    }
}

/// Buffered answer for a single question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnsweredQuestion {
    pub question_id: String,
    pub answer: AnswerValue,
    pub answered_at: DateTime<Utc>,
}
