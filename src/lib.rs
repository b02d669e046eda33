//! # portal-quiz
//!
//! Client for the student portal's quiz API: list quizzes, take an attempt
//! question by question, submit it and read the grade.
//!
//! The heart of the crate is [`AttemptController`], which owns a single
//! attempt at a time and keeps local answers authoritative while pushing
//! each one to the server in the background. A terminal front-end built on
//! ratatui drives it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use portal_quiz::{AttemptController, HttpQuizApi, QuizApi};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(HttpQuizApi::new(
//!     "https://portal.example.edu/api",
//!     "token",
//!     std::time::Duration::from_secs(15),
//! )?);
//! let quizzes = api.list_quizzes().await?;
//!
//! let mut controller = AttemptController::new(api);
//! controller.start_attempt(&quizzes[0].id).await?;
//! controller.select_answer("b")?;
//! controller.next_question()?;
//! controller.submit_attempt().await?;
//! println!("{:?}", controller.result());
//! # Ok(())
//! # }
//! ```

pub mod api;
mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod protocol;
pub mod terminal;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub use api::{HttpQuizApi, QuizApi};
pub use app::{App, Notice, Screen};
pub use config::Config;
pub use controller::{AttemptController, AttemptState};
pub use error::{ApiError, ControllerError, PortalError};

/// How long to wait for a key before redrawing the countdown.
const TICK: Duration = Duration::from_millis(200);

/// Run the interactive front-end until the student quits.
pub async fn run_tui<A: QuizApi>(api: Arc<A>) -> Result<(), PortalError> {
    let mut app = App::new(AttemptController::new(api));
    app.refresh_catalog().await;

    let mut guard = terminal::TerminalGuard::enter()?;
    let result = run_event_loop(guard.terminal(), &mut app).await;
    drop(guard);

    app.shutdown().await;
    result
}

async fn run_event_loop<A: QuizApi>(
    terminal: &mut terminal::PortalTerminal,
    app: &mut App<A>,
) -> Result<(), PortalError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;
        app.tick().await;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_input(app, key).await;
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn handle_input<A: QuizApi>(app: &mut App<A>, key: KeyEvent) {
    if app.is_confirming_exit() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_exit().await,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_exit(),
            _ => {}
        }
        return;
    }

    match app.screen() {
        Screen::Catalog => handle_catalog_input(app, key.code).await,
        Screen::Quiz => handle_quiz_input(app, key).await,
        Screen::Result => handle_result_input(app, key.code).await,
    }
}

async fn handle_catalog_input<A: QuizApi>(app: &mut App<A>, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.catalog_down(),
        KeyCode::Up | KeyCode::Char('k') => app.catalog_up(),
        KeyCode::Enter => app.start_highlighted().await,
        KeyCode::Char('r') | KeyCode::Char('R') => app.refresh_catalog().await,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

async fn handle_quiz_input<A: QuizApi>(app: &mut App<A>, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('s') {
            app.submit().await;
        }
        return;
    }

    if app.current_is_free_text() {
        match key.code {
            KeyCode::Char(c) => app.text_push(c),
            KeyCode::Backspace => app.text_pop(),
            KeyCode::Enter => app.save_text(),
            KeyCode::Right => app.next_question(),
            KeyCode::Left => app.previous_question(),
            KeyCode::Esc => app.request_exit(),
            _ => {}
        }
        return;
    }

    app.clear_notice();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.option_up(),
        KeyCode::Down | KeyCode::Char('j') => app.option_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_highlighted(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => app.next_question(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => app.previous_question(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.submit().await,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.request_exit(),
        KeyCode::Char(c @ '1'..='9') => app.go_to_question(c as usize - '1' as usize),
        _ => {}
    }
}

async fn handle_result_input<A: QuizApi>(app: &mut App<A>, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('b') => app.back_to_catalog().await,
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        _ => {}
    }
}
