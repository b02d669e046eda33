//! The quiz attempt controller.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinSet;

use crate::api::QuizApi;
use crate::error::ControllerError;
use crate::models::{AnswerValue, AnsweredQuestion, QuizResult};
use crate::protocol::{AnswerRequest, SubmitRequest};

use super::state::{ActiveAttempt, AttemptState};

/// Drives one quiz attempt at a time from start to graded result.
///
/// Local state is authoritative for what the student sees. Each answer is
/// also pushed to the server in the background; those pushes never fail an
/// operation. Starting and submitting are awaited, and because they borrow
/// the controller mutably no other operation can interleave with them.
///
/// Answering spawns tokio tasks, so the controller must be used inside a
/// tokio runtime.
pub struct AttemptController<A: QuizApi> {
    api: Arc<A>,
    state: AttemptState,
    syncs: JoinSet<()>,
}

impl<A: QuizApi> AttemptController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: AttemptState::Idle,
            syncs: JoinSet::new(),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    pub fn active(&self) -> Option<&ActiveAttempt> {
        match &self.state {
            AttemptState::InProgress(active) => Some(active),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            AttemptState::Result(result) => Some(result),
            _ => None,
        }
    }

    /// The buffered answer of the question under the cursor.
    pub fn selected_answer(&self) -> Option<&AnsweredQuestion> {
        self.active().and_then(ActiveAttempt::selected_answer)
    }

    /// Time left on the countdown; `None` when no attempt is active.
    pub fn remaining(&self) -> Option<Duration> {
        self.active().map(|a| a.remaining_at(Utc::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.active().is_some_and(|a| a.is_expired_at(Utc::now()))
    }

    /// Background answer syncs that have not been reaped yet.
    pub fn pending_syncs(&self) -> usize {
        self.syncs.len()
    }

    /// Ask the server for a new attempt and make it the active one.
    ///
    /// On failure the controller stays idle.
    pub async fn start_attempt(&mut self, quiz_id: &str) -> Result<(), ControllerError> {
        self.require_idle("start an attempt")?;

        let attempt = self.api.start_attempt(quiz_id).await.map_err(|err| {
            tracing::warn!(quiz_id, error = %err, "failed to start attempt");
            err
        })?;

        if attempt.questions.is_empty() {
            tracing::warn!(quiz_id, attempt_id = %attempt.id, "attempt has no questions");
            return Err(ControllerError::EmptyAttempt(attempt.id));
        }

        tracing::info!(
            quiz_id,
            attempt_id = %attempt.id,
            questions = attempt.questions.len(),
            minutes = attempt.duration,
            "attempt started"
        );
        self.state = AttemptState::InProgress(ActiveAttempt::new(attempt));
        Ok(())
    }

    /// Choose `option_id` for the current question.
    pub fn select_answer(&mut self, option_id: &str) -> Result<(), ControllerError> {
        let active = self.active_mut("select an answer")?;
        let question = active.current_question();
        if question.option(option_id).is_none() {
            return Err(ControllerError::UnknownOption {
                question_id: question.id.clone(),
                option_id: option_id.to_string(),
            });
        }

        self.record(AnswerValue::Option(option_id.to_string()))
    }

    /// Record a free-text answer for the current question. Questions with
    /// options only take [`select_answer`](Self::select_answer).
    pub fn answer_text(&mut self, text: &str) -> Result<(), ControllerError> {
        let question = self.active_mut("answer a question")?.current_question();
        if !question.is_free_text() {
            return Err(ControllerError::NotFreeText(question.id.clone()));
        }
        self.record(AnswerValue::Text(text.to_string()))
    }

    fn record(&mut self, answer: AnswerValue) -> Result<(), ControllerError> {
        let active = self.active_mut("answer a question")?;
        let answered = active.record_current(answer, Utc::now());
        let request = AnswerRequest::new(&active.attempt().id, &answered);
        self.spawn_sync(request);
        Ok(())
    }

    /// Push one answer to the server without waiting for it. Failures are
    /// logged and dropped.
    fn spawn_sync(&mut self, request: AnswerRequest) {
        while self.syncs.try_join_next().is_some() {}

        let api = Arc::clone(&self.api);
        self.syncs.spawn(async move {
            match api.submit_answer(request.clone()).await {
                Ok(()) => tracing::debug!(
                    attempt_id = %request.attempt_id,
                    question_id = %request.question_id,
                    "answer synced"
                ),
                Err(err) => tracing::warn!(
                    attempt_id = %request.attempt_id,
                    question_id = %request.question_id,
                    error = %err,
                    "answer sync failed"
                ),
            }
        });
    }

    /// Returns whether the cursor moved.
    pub fn next_question(&mut self) -> Result<bool, ControllerError> {
        Ok(self.active_mut("move to the next question")?.step_forward())
    }

    /// Returns whether the cursor moved.
    pub fn previous_question(&mut self) -> Result<bool, ControllerError> {
        Ok(self.active_mut("move to the previous question")?.step_back())
    }

    /// Jump to `index`, clamped to the last question.
    pub fn go_to_question(&mut self, index: usize) -> Result<(), ControllerError> {
        self.active_mut("jump to a question")?.jump_to(index);
        Ok(())
    }

    /// Send every buffered answer and, on success, replace the attempt with
    /// its result.
    ///
    /// On failure the attempt and its answers are left untouched so the call
    /// can be repeated.
    pub async fn submit_attempt(&mut self) -> Result<(), ControllerError> {
        let active = match &self.state {
            AttemptState::InProgress(active) => active,
            other => {
                return Err(ControllerError::InvalidState {
                    operation: "submit",
                    state: other.name(),
                });
            }
        };
        let attempt = active.attempt();
        let request = SubmitRequest::new(
            &attempt.id,
            active.answers().in_question_order(&attempt.questions),
        );
        let attempt_id = attempt.id.clone();

        let result = self.api.submit_attempt(request).await.map_err(|err| {
            tracing::warn!(%attempt_id, error = %err, "failed to submit attempt");
            err
        })?;

        tracing::info!(
            %attempt_id,
            earned = result.earned_points,
            total = result.total_points,
            passed = result.passed,
            "attempt submitted"
        );
        // The bulk submission supersedes any per-answer sync still in flight.
        self.syncs.abort_all();
        self.state = AttemptState::Result(result);
        Ok(())
    }

    /// Drop the active attempt and its answers without submitting.
    pub fn exit_attempt(&mut self) -> Result<(), ControllerError> {
        let active = self.active_mut("exit")?;
        tracing::info!(
            attempt_id = %active.attempt().id,
            answered = active.answers().len(),
            "attempt discarded"
        );
        self.syncs.abort_all();
        self.state = AttemptState::Idle;
        Ok(())
    }

    /// Leave the result screen, making the controller ready for a new attempt.
    pub fn reset(&mut self) -> Result<(), ControllerError> {
        if !matches!(self.state, AttemptState::Result(_)) {
            return Err(ControllerError::InvalidState {
                operation: "reset",
                state: self.state.name(),
            });
        }
        self.state = AttemptState::Idle;
        Ok(())
    }

    /// Wait for every background answer sync to finish.
    pub async fn settle_syncs(&mut self) {
        while let Some(joined) = self.syncs.join_next().await {
            if let Err(err) = joined {
                if err.is_panic() {
                    tracing::error!(error = %err, "answer sync task panicked");
                }
            }
        }
    }

    fn require_idle(&self, operation: &'static str) -> Result<(), ControllerError> {
        if self.state.is_idle() {
            Ok(())
        } else {
            Err(ControllerError::InvalidState {
                operation,
                state: self.state.name(),
            })
        }
    }

    fn active_mut(&mut self, operation: &'static str) -> Result<&mut ActiveAttempt, ControllerError> {
        match &mut self.state {
            AttemptState::InProgress(active) => Ok(active),
            other => Err(ControllerError::InvalidState {
                operation,
                state: other.name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::models::AnswerValue;

    async fn started(questions: usize) -> (Arc<MockApi>, AttemptController<MockApi>) {
        let api = Arc::new(MockApi::with_questions(questions));
        let mut controller = AttemptController::new(Arc::clone(&api));
        controller.start_attempt("quiz-1").await.unwrap();
        (api, controller)
    }

    fn selected(controller: &AttemptController<MockApi>) -> Option<String> {
        controller
            .selected_answer()
            .and_then(|a| a.answer.option_id())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn test_start_enters_first_question() {
        let (_, controller) = started(3).await;
        let active = controller.active().unwrap();
        assert_eq!(active.cursor(), 0);
        assert!(active.answers().is_empty());
        assert_eq!(active.attempt().quiz_id, "quiz-1");
        assert!(controller.remaining().unwrap() <= Duration::from_secs(600));
        assert!(!controller.is_expired());
    }

    #[tokio::test]
    async fn test_failed_start_stays_idle() {
        let api = Arc::new(MockApi::with_questions(3));
        api.set_fail_start(true);
        let mut controller = AttemptController::new(Arc::clone(&api));

        let err = controller.start_attempt("quiz-1").await.unwrap_err();
        assert!(matches!(err, ControllerError::Api(_)));
        assert!(controller.state().is_idle());
        assert!(controller.active().is_none());
    }

    #[tokio::test]
    async fn test_empty_attempt_is_rejected() {
        let api = Arc::new(MockApi::with_questions(0));
        let mut controller = AttemptController::new(api);
        let err = controller.start_attempt("quiz-1").await.unwrap_err();
        assert!(matches!(err, ControllerError::EmptyAttempt(_)));
        assert!(controller.state().is_idle());
    }

    #[tokio::test]
    async fn test_second_start_requires_idle() {
        let (api, mut controller) = started(2).await;
        let err = controller.start_attempt("quiz-2").await.unwrap_err();
        assert!(matches!(err, ControllerError::InvalidState { .. }));
        assert_eq!(api.started.lock().unwrap().len(), 1);
        assert_eq!(controller.active().unwrap().attempt().quiz_id, "quiz-1");
    }

    #[tokio::test]
    async fn test_operations_outside_attempt_are_rejected() {
        let api = Arc::new(MockApi::with_questions(2));
        let mut controller = AttemptController::new(api);
        assert!(controller.select_answer("a").is_err());
        assert!(controller.next_question().is_err());
        assert!(controller.previous_question().is_err());
        assert!(controller.exit_attempt().is_err());
        assert!(controller.reset().is_err());
        assert!(controller.submit_attempt().await.is_err());
        assert!(controller.state().is_idle());
    }

    #[tokio::test]
    async fn test_cursor_stays_in_bounds() {
        let (_, mut controller) = started(4).await;
        // xorshift sequence of forward/back moves
        let mut seed: u32 = 0x9e37_79b9;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            if seed % 2 == 0 {
                controller.next_question().unwrap();
            } else {
                controller.previous_question().unwrap();
            }
            let cursor = controller.active().unwrap().cursor();
            assert!(cursor < 4, "cursor {cursor} out of range");
        }
    }

    #[tokio::test]
    async fn test_boundaries_are_noops() {
        let (_, mut controller) = started(2).await;
        assert!(!controller.previous_question().unwrap());
        assert!(controller.next_question().unwrap());
        assert!(!controller.next_question().unwrap());
        assert_eq!(controller.active().unwrap().cursor(), 1);
    }

    #[tokio::test]
    async fn test_go_to_question_clamps() {
        let (_, mut controller) = started(3).await;
        controller.select_answer("c").unwrap();

        controller.go_to_question(2).unwrap();
        assert_eq!(controller.active().unwrap().cursor(), 2);
        assert_eq!(selected(&controller), None);

        controller.go_to_question(99).unwrap();
        assert_eq!(controller.active().unwrap().cursor(), 2);

        controller.go_to_question(0).unwrap();
        assert_eq!(selected(&controller).as_deref(), Some("c"));

        controller.exit_attempt().unwrap();
        assert!(matches!(
            controller.go_to_question(0),
            Err(ControllerError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_selection_survives_navigation() {
        let (_, mut controller) = started(3).await;
        controller.select_answer("b").unwrap();
        controller.next_question().unwrap();
        assert_eq!(selected(&controller), None);
        controller.select_answer("c").unwrap();
        controller.previous_question().unwrap();
        assert_eq!(selected(&controller).as_deref(), Some("b"));
        controller.next_question().unwrap();
        assert_eq!(selected(&controller).as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_reselecting_overwrites() {
        let (api, mut controller) = started(2).await;
        controller.select_answer("a").unwrap();
        let first_at = controller.selected_answer().unwrap().answered_at;
        controller.select_answer("a").unwrap();

        let active = controller.active().unwrap();
        assert_eq!(active.answers().len(), 1);
        assert!(active.selected_answer().unwrap().answered_at >= first_at);

        controller.settle_syncs().await;
        assert_eq!(api.synced().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_option_is_rejected() {
        let (_, mut controller) = started(1).await;
        let err = controller.select_answer("z").unwrap_err();
        assert!(matches!(err, ControllerError::UnknownOption { .. }));
        assert!(controller.active().unwrap().answers().is_empty());
    }

    #[tokio::test]
    async fn test_sync_failure_keeps_local_selection() {
        let (api, mut controller) = started(2).await;
        api.set_fail_answers(true);

        assert!(controller.select_answer("c").is_ok());
        controller.settle_syncs().await;

        assert_eq!(selected(&controller).as_deref(), Some("c"));
        assert!(api.synced().is_empty());
        assert!(controller.active().is_some());
    }

    #[tokio::test]
    async fn test_sync_carries_question_and_attempt() {
        let (api, mut controller) = started(2).await;
        controller.next_question().unwrap();
        controller.select_answer("b").unwrap();
        controller.settle_syncs().await;

        let synced = api.synced();
        assert_eq!(synced.len(), 1);
        assert_eq!(synced[0].attempt_id, "attempt-1");
        assert_eq!(synced[0].question_id, "q2");
        assert_eq!(synced[0].selected_answer, "b");
        assert_eq!(controller.pending_syncs(), 0);
    }

    #[tokio::test]
    async fn test_submit_sends_only_answered_questions() {
        let (api, mut controller) = started(3).await;
        controller.select_answer("a").unwrap();
        controller.next_question().unwrap();
        controller.next_question().unwrap();
        controller.select_answer("b").unwrap();

        controller.submit_attempt().await.unwrap();

        let submitted = api.submitted();
        assert_eq!(submitted.len(), 1);
        let answers: Vec<_> = submitted[0]
            .answers
            .iter()
            .map(|a| (a.question_id.as_str(), a.selected_answer.as_str()))
            .collect();
        assert_eq!(answers, [("q1", "a"), ("q3", "b")]);

        let result = controller.result().unwrap();
        assert_eq!(result.earned_points, 2);
        assert!(controller.active().is_none());
    }

    #[tokio::test]
    async fn test_text_only_for_free_text_questions() {
        let api = Arc::new(MockApi::with_questions(2).with_free_text(2));
        let mut controller = AttemptController::new(Arc::clone(&api));
        controller.start_attempt("quiz-1").await.unwrap();

        let err = controller.answer_text("forty-two").unwrap_err();
        assert!(matches!(err, ControllerError::NotFreeText(ref id) if id == "q1"));
        assert!(controller.active().unwrap().answers().is_empty());

        controller.next_question().unwrap();
        assert!(controller.select_answer("a").is_err());
        controller.answer_text("forty-two").unwrap();
        assert_eq!(
            controller.selected_answer().unwrap().answer,
            AnswerValue::Text("forty-two".into())
        );
        controller.settle_syncs().await;
        assert_eq!(api.synced()[0].selected_answer, "forty-two");
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_answers() {
        let api = Arc::new(MockApi::with_questions(2).with_free_text(2));
        let mut controller = AttemptController::new(Arc::clone(&api));
        controller.start_attempt("quiz-1").await.unwrap();
        controller.select_answer("a").unwrap();
        controller.next_question().unwrap();
        controller.answer_text("left blank on purpose").unwrap();

        api.set_fail_submit(true);
        let err = controller.submit_attempt().await.unwrap_err();
        assert!(matches!(err, ControllerError::Api(ref e) if e.is_recoverable()));

        let active = controller.active().unwrap();
        assert_eq!(active.answers().len(), 2);
        assert_eq!(active.cursor(), 1);
        assert_eq!(
            active.selected_answer().unwrap().answer,
            AnswerValue::Text("left blank on purpose".into())
        );

        api.set_fail_submit(false);
        controller.submit_attempt().await.unwrap();
        assert!(controller.result().is_some());
        assert_eq!(api.submitted()[0].answers.len(), 2);
    }

    #[tokio::test]
    async fn test_exit_then_restart_is_fresh() {
        let (api, mut controller) = started(3).await;
        controller.select_answer("a").unwrap();
        controller.next_question().unwrap();

        controller.exit_attempt().unwrap();
        assert!(controller.state().is_idle());
        assert!(api.submitted().is_empty());

        controller.start_attempt("quiz-1").await.unwrap();
        let active = controller.active().unwrap();
        assert_eq!(active.attempt().id, "attempt-2");
        assert_eq!(active.cursor(), 0);
        assert!(active.answers().is_empty());
        assert!(controller.selected_answer().is_none());
    }

    #[tokio::test]
    async fn test_reset_after_result() {
        let (_, mut controller) = started(1).await;
        controller.submit_attempt().await.unwrap();
        assert!(controller.start_attempt("quiz-1").await.is_err());

        controller.reset().unwrap();
        assert!(controller.state().is_idle());
        controller.start_attempt("quiz-1").await.unwrap();
        assert!(controller.active().is_some());
    }
}
