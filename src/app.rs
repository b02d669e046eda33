//! View state of the terminal front-end.
//!
//! `App` wraps the attempt controller and keeps what only the screens care
//! about: the quiz catalog, highlighted rows, the free-text input and the
//! banner shown after a failed operation.

use std::collections::HashMap;

use crate::api::QuizApi;
use crate::controller::{AttemptController, AttemptState};
use crate::error::ControllerError;
use crate::models::{QuizStatus, QuizSummary};

/// Which screen is showing. Follows the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Catalog,
    Quiz,
    Result,
}

/// Banner line under the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

pub struct App<A: QuizApi> {
    controller: AttemptController<A>,
    quizzes: Vec<QuizSummary>,
    catalog_cursor: usize,
    /// Highlighted option on the current question.
    option_cursor: usize,
    text_input: String,
    notice: Option<Notice>,
    confirming_exit: bool,
    auto_submit_tried: bool,
    /// Question texts of the submitted attempt, for the result breakdown.
    submitted_questions: HashMap<String, String>,
    result_scroll: usize,
    pub should_quit: bool,
}

impl<A: QuizApi> App<A> {
    pub fn new(controller: AttemptController<A>) -> Self {
        Self {
            controller,
            quizzes: Vec::new(),
            catalog_cursor: 0,
            option_cursor: 0,
            text_input: String::new(),
            notice: None,
            confirming_exit: false,
            auto_submit_tried: false,
            submitted_questions: HashMap::new(),
            result_scroll: 0,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &AttemptController<A> {
        &self.controller
    }

    pub fn screen(&self) -> Screen {
        match self.controller.state() {
            AttemptState::Idle => Screen::Catalog,
            AttemptState::InProgress(_) => Screen::Quiz,
            AttemptState::Result(_) => Screen::Result,
        }
    }

    pub fn quizzes(&self) -> &[QuizSummary] {
        &self.quizzes
    }

    pub fn catalog_cursor(&self) -> usize {
        self.catalog_cursor
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn text_input(&self) -> &str {
        &self.text_input
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_confirming_exit(&self) -> bool {
        self.confirming_exit
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn submitted_question_text(&self, question_id: &str) -> Option<&str> {
        self.submitted_questions.get(question_id).map(String::as_str)
    }

    fn report(&mut self, err: &ControllerError) {
        tracing::debug!(error = %err, "operation failed");
        self.notice = Some(Notice::Error(err.user_message()));
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    // Catalog

    pub async fn refresh_catalog(&mut self) {
        match self.controller.api().list_quizzes().await {
            Ok(quizzes) => {
                tracing::info!(count = quizzes.len(), "catalog loaded");
                self.quizzes = quizzes;
                self.catalog_cursor = self.catalog_cursor.min(self.quizzes.len().saturating_sub(1));
                self.notice = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load catalog");
                self.notice = Some(Notice::Error(err.user_message()));
            }
        }
    }

    pub fn catalog_down(&mut self) {
        let max = self.quizzes.len().saturating_sub(1);
        self.catalog_cursor = (self.catalog_cursor + 1).min(max);
    }

    pub fn catalog_up(&mut self) {
        self.catalog_cursor = self.catalog_cursor.saturating_sub(1);
    }

    pub fn highlighted_quiz(&self) -> Option<&QuizSummary> {
        self.quizzes.get(self.catalog_cursor)
    }

    pub async fn start_highlighted(&mut self) {
        let Some(quiz) = self.highlighted_quiz() else {
            return;
        };
        if !quiz.status.can_start() {
            let message = match quiz.status {
                QuizStatus::Upcoming => "This quiz has not opened yet.",
                QuizStatus::Completed => "You have already completed this quiz.",
                _ => "This quiz is closed.",
            };
            self.notice = Some(Notice::Info(message.to_string()));
            return;
        }

        let quiz_id = quiz.id.clone();
        match self.controller.start_attempt(&quiz_id).await {
            Ok(()) => {
                self.notice = None;
                self.auto_submit_tried = false;
                self.confirming_exit = false;
                self.sync_cursor_with_answer();
            }
            Err(err) => self.report(&err),
        }
    }

    // Quiz

    pub fn option_down(&mut self) {
        let count = self.current_option_count();
        if count > 0 {
            self.option_cursor = (self.option_cursor + 1) % count;
        }
    }

    pub fn option_up(&mut self) {
        let count = self.current_option_count();
        if count > 0 {
            self.option_cursor = (self.option_cursor + count - 1) % count;
        }
    }

    fn current_option_count(&self) -> usize {
        self.controller
            .active()
            .map_or(0, |a| a.current_question().options.len())
    }

    pub fn current_is_free_text(&self) -> bool {
        self.controller
            .active()
            .is_some_and(|a| a.current_question().is_free_text())
    }

    /// Record the highlighted option as the answer.
    pub fn choose_highlighted(&mut self) {
        let Some(option_id) = self.controller.active().and_then(|a| {
            a.current_question()
                .options
                .get(self.option_cursor)
                .map(|o| o.id.clone())
        }) else {
            return;
        };
        if let Err(err) = self.controller.select_answer(&option_id) {
            self.report(&err);
        }
    }

    pub fn text_push(&mut self, c: char) {
        self.text_input.push(c);
    }

    pub fn text_pop(&mut self) {
        self.text_input.pop();
    }

    /// Record the typed text as the answer to a free-text question.
    pub fn save_text(&mut self) {
        if self.commit_text() {
            self.notice = Some(Notice::Info("Answer saved.".to_string()));
        }
    }

    /// Record unsaved text in the input before leaving the question. Returns
    /// whether an answer was recorded.
    fn commit_text(&mut self) -> bool {
        if !self.current_is_free_text() {
            return false;
        }
        let text = self.text_input.trim().to_string();
        if text.is_empty() {
            return false;
        }
        let unchanged = self
            .controller
            .selected_answer()
            .is_some_and(|a| a.answer.as_wire() == text);
        if unchanged {
            return false;
        }
        match self.controller.answer_text(&text) {
            Ok(()) => true,
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    pub fn next_question(&mut self) {
        self.commit_text();
        if let Ok(true) = self.controller.next_question() {
            self.sync_cursor_with_answer();
        }
    }

    pub fn previous_question(&mut self) {
        self.commit_text();
        if let Ok(true) = self.controller.previous_question() {
            self.sync_cursor_with_answer();
        }
    }

    /// Jump to the question at `index` (0-based) on the question strip.
    pub fn go_to_question(&mut self, index: usize) {
        self.commit_text();
        if self.controller.go_to_question(index).is_ok() {
            self.sync_cursor_with_answer();
        }
    }

    /// Point the highlight (or text field) at the buffered answer of the
    /// question just entered.
    fn sync_cursor_with_answer(&mut self) {
        self.option_cursor = 0;
        self.text_input.clear();
        let Some(active) = self.controller.active() else {
            return;
        };
        if let Some(answered) = active.selected_answer() {
            match answered.answer.option_id() {
                Some(id) => {
                    self.option_cursor = active.current_question().option_index(id).unwrap_or(0);
                }
                None => self.text_input = answered.answer.as_wire().to_string(),
            }
        }
    }

    pub async fn submit(&mut self) {
        self.commit_text();
        let questions: HashMap<String, String> = match self.controller.active() {
            Some(active) => active
                .attempt()
                .questions
                .iter()
                .map(|q| (q.id.clone(), q.text.clone()))
                .collect(),
            None => return,
        };

        self.notice = Some(Notice::Info("Submitting...".to_string()));
        match self.controller.submit_attempt().await {
            Ok(()) => {
                self.submitted_questions = questions;
                self.result_scroll = 0;
                self.confirming_exit = false;
                self.notice = None;
            }
            Err(err) => self.report(&err),
        }
    }

    /// Submit once when the countdown runs out.
    pub async fn tick(&mut self) {
        if self.controller.is_expired() && !self.auto_submit_tried {
            self.auto_submit_tried = true;
            tracing::info!("time is up, submitting attempt");
            self.submit().await;
        }
    }

    pub fn request_exit(&mut self) {
        self.confirming_exit = true;
    }

    pub fn cancel_exit(&mut self) {
        self.confirming_exit = false;
    }

    /// Discard the attempt after the student confirmed.
    pub async fn confirm_exit(&mut self) {
        self.confirming_exit = false;
        match self.controller.exit_attempt() {
            Ok(()) => {
                self.text_input.clear();
                self.option_cursor = 0;
                self.refresh_catalog().await;
            }
            Err(err) => self.report(&err),
        }
    }

    // Result

    pub fn scroll_down(&mut self) {
        let rows = self
            .controller
            .result()
            .and_then(|r| r.breakdown.as_ref())
            .map_or(0, Vec::len);
        self.result_scroll = (self.result_scroll + 1).min(rows.saturating_sub(1));
    }

    pub fn scroll_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub async fn back_to_catalog(&mut self) {
        if let Err(err) = self.controller.reset() {
            self.report(&err);
            return;
        }
        self.submitted_questions.clear();
        self.refresh_catalog().await;
    }

    /// Let pending answer syncs finish before the process exits.
    pub async fn shutdown(&mut self) {
        self.controller.settle_syncs().await;
    }
}
