use serde::{Deserialize, Serialize};

/// Availability of a quiz from the student's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Upcoming,
    Available,
    Completed,
    Ended,
}

impl QuizStatus {
    /// Only available quizzes can be started.
    pub fn can_start(self) -> bool {
        matches!(self, Self::Available)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Available => "Available",
            Self::Completed => "Completed",
            Self::Ended => "Ended",
        }
    }
}

/// Catalog entry returned by the quiz listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub status: QuizStatus,
    /// Minutes.
    pub duration: u32,
    /// Percent required to pass.
    pub passing_score: u32,
    pub question_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_wire() {
        let json = r#"{
            "id": "quiz-7",
            "title": "Midterm",
            "status": "available",
            "duration": 30,
            "passingScore": 60,
            "questionCount": 12
        }"#;
        let quiz: QuizSummary = serde_json::from_str(json).unwrap();
        assert_eq!(quiz.status, QuizStatus::Available);
        assert_eq!(quiz.passing_score, 60);
        assert_eq!(quiz.question_count, 12);
        assert!(quiz.description.is_none());
    }

    #[test]
    fn test_only_available_can_start() {
        assert!(QuizStatus::Available.can_start());
        assert!(!QuizStatus::Upcoming.can_start());
        assert!(!QuizStatus::Completed.can_start());
        assert!(!QuizStatus::Ended.can_start());
    }
}
