//! JSON shapes exchanged with the remote quiz API.
//!
//! Field names are camelCase on the wire. Responses arrive wrapped in a
//! `{ success, ... }` envelope; start responses may also be a bare attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AnsweredQuestion, Question, QuizAttempt, QuizResult, QuizSummary};

fn default_success() -> bool {
    true
}

/// Response of `GET /quizzes/available`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListQuizzesResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub quizzes: Vec<QuizSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Attempt object as sent by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptPayload {
    #[serde(alias = "attemptId")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<String>,
    pub questions: Vec<Question>,
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl AttemptPayload {
    /// Fill in what the server left out (the quiz id that was requested).
    /// The countdown starts at `now`; the server's `startedAt` is only kept
    /// for reference, since its clock may disagree with ours.
    pub fn into_attempt(self, requested_quiz_id: &str, now: DateTime<Utc>) -> QuizAttempt {
        QuizAttempt {
            id: self.id,
            quiz_id: self
                .quiz_id
                .unwrap_or_else(|| requested_quiz_id.to_string()),
            questions: self.questions,
            duration: self.duration,
            started_at: now,
            server_started_at: self.started_at,
        }
    }
}

/// Response of `POST /quizzes/{id}/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartAttemptResponse {
    /// `{ success, attempt }`
    Envelope {
        #[serde(default = "default_success")]
        success: bool,
        attempt: AttemptPayload,
    },
    /// The attempt object itself.
    Bare(AttemptPayload),
    /// `{ success: false, message }` delivered with a 2xx status.
    Failure {
        success: bool,
        #[serde(default)]
        message: Option<String>,
    },
}

/// Body of `POST /quizzes/answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub attempt_id: String,
    pub question_id: String,
    pub selected_answer: String,
}

impl AnswerRequest {
    pub fn new(attempt_id: &str, answered: &AnsweredQuestion) -> Self {
        Self {
            attempt_id: attempt_id.to_string(),
            question_id: answered.question_id.clone(),
            selected_answer: answered.answer.as_wire().to_string(),
        }
    }
}

/// One entry of the bulk submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub selected_answer: String,
}

/// Body of `POST /quizzes/{attemptId}/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub attempt_id: String,
    pub answers: Vec<SubmittedAnswer>,
}

impl SubmitRequest {
    pub fn new<'a>(attempt_id: &str, answers: impl IntoIterator<Item = &'a AnsweredQuestion>) -> Self {
        Self {
            attempt_id: attempt_id.to_string(),
            answers: answers
                .into_iter()
                .map(|a| SubmittedAnswer {
                    question_id: a.question_id.clone(),
                    selected_answer: a.answer.as_wire().to_string(),
                })
                .collect(),
        }
    }
}

/// Response of the submit call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<QuizResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body sent with non-2xx responses. Either field may carry the text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerValue;

    #[test]
    fn test_start_response_shapes() {
        let envelope = r#"{"success":true,"attempt":{"id":"a1","questions":[],"duration":10}}"#;
        assert!(matches!(
            serde_json::from_str::<StartAttemptResponse>(envelope).unwrap(),
            StartAttemptResponse::Envelope { success: true, .. }
        ));

        let bare = r#"{"attemptId":"a1","quizId":"q","questions":[],"duration":10}"#;
        let StartAttemptResponse::Bare(payload) = serde_json::from_str(bare).unwrap() else {
            panic!("expected bare attempt");
        };
        assert_eq!(payload.id, "a1");
        assert_eq!(payload.quiz_id.as_deref(), Some("q"));

        let failure = r#"{"success":false,"message":"Quiz closed"}"#;
        assert!(matches!(
            serde_json::from_str::<StartAttemptResponse>(failure).unwrap(),
            StartAttemptResponse::Failure { success: false, .. }
        ));
    }

    #[test]
    fn test_into_attempt_fills_gaps() {
        let payload = AttemptPayload {
            id: "a1".into(),
            quiz_id: None,
            questions: Vec::new(),
            duration: 15,
            started_at: None,
        };
        let now = Utc::now();
        let attempt = payload.into_attempt("quiz-3", now);
        assert_eq!(attempt.quiz_id, "quiz-3");
        assert_eq!(attempt.started_at, now);
        assert!(attempt.server_started_at.is_none());
    }

    #[test]
    fn test_countdown_ignores_server_clock() {
        let now = Utc::now();
        let server_start = now - chrono::Duration::minutes(25);
        let payload = AttemptPayload {
            id: "a1".into(),
            quiz_id: Some("quiz-3".into()),
            questions: Vec::new(),
            duration: 20,
            started_at: Some(server_start),
        };
        let attempt = payload.into_attempt("quiz-3", now);
        assert_eq!(attempt.started_at, now);
        assert_eq!(attempt.server_started_at, Some(server_start));
        assert_eq!(attempt.deadline(), now + chrono::Duration::minutes(20));
    }

    #[test]
    fn test_answer_request_serialization() {
        let answered = AnsweredQuestion {
            question_id: "q1".into(),
            answer: AnswerValue::Option("opt-b".into()),
            answered_at: Utc::now(),
        };
        let json = serde_json::to_value(AnswerRequest::new("att-9", &answered)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"attemptId":"att-9","questionId":"q1","selectedAnswer":"opt-b"})
        );
    }

    #[test]
    fn test_error_body_prefers_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"Quiz not found","error":"x"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Quiz not found"));

        let body: ErrorBody = serde_json::from_str(r#"{"error":"  "}"#).unwrap();
        assert_eq!(body.into_message(), None);
    }
}
