use serde::{Deserialize, Serialize};

/// Per-question correctness, only sent when the server is configured to reveal it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question_id: String,
    pub correct: bool,
    #[serde(default)]
    pub earned_points: u32,
}

/// Outcome of a submitted attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub total_points: u32,
    pub earned_points: u32,
    pub percentage: f64,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<QuestionOutcome>>,
}

impl QuizResult {
    pub fn correct_count(&self) -> Option<usize> {
        self.breakdown
            .as_ref()
            .map(|b| b.iter().filter(|o| o.correct).count())
    }
}
