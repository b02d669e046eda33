mod catalog;
mod quiz;
mod result;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::api::QuizApi;
use crate::app::{App, Notice, Screen};

pub fn render<A: QuizApi>(frame: &mut Frame, app: &App<A>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let [body, banner] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    match app.screen() {
        Screen::Catalog => catalog::render(frame, body, app),
        Screen::Quiz => quiz::render(frame, body, app),
        Screen::Result => result::render(frame, body, app),
    }

    render_notice(frame, banner, app.notice());

    if app.is_confirming_exit() {
        render_exit_prompt(frame, area);
    }
}

fn render_notice(frame: &mut Frame, area: Rect, notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };
    let (text, color) = match notice {
        Notice::Info(text) => (text.as_str(), Color::Yellow),
        Notice::Error(text) => (text.as_str(), Color::Red),
    };
    let widget = Paragraph::new(text).alignment(Alignment::Center).fg(color);
    frame.render_widget(widget, area);
}

fn render_exit_prompt(frame: &mut Frame, area: Rect) {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(7),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, popup, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(48),
        Constraint::Fill(1),
    ])
    .areas(row);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Leave this attempt?",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from("Your answers will not be submitted.".fg(Color::Gray)),
        Line::from(""),
        Line::from("y leave  ·  n stay".fg(Color::DarkGray)),
    ];

    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::Red),
        );
    frame.render_widget(widget, popup);
}
