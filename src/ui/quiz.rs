//! Quiz screen: one question at a time with the countdown.

use std::time::Duration;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::api::QuizApi;
use crate::app::App;
use crate::controller::ActiveAttempt;
use crate::format;
use crate::models::Question;

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

pub fn render<A: QuizApi>(frame: &mut Frame, area: Rect, app: &App<A>) {
    let controller = app.controller();
    let Some(active) = controller.active() else {
        return;
    };
    let question = active.current_question();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Progress + timer
        Constraint::Length(1), // Question strip
        Constraint::Length(6), // Question text
        Constraint::Min(6),    // Options / text input
        Constraint::Length(1), // Controls
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], active, controller.remaining().unwrap_or_default());
    render_strip(frame, chunks[1], active);
    render_question_text(frame, chunks[2], question);

    if question.is_free_text() {
        render_text_answer(frame, chunks[3], app.text_input(), active);
    } else {
        let chosen = active
            .selected_answer()
            .and_then(|a| a.answer.option_id())
            .and_then(|id| question.option_index(id));
        render_options(frame, chunks[3], question, app.option_cursor(), chosen);
    }

    render_controls(frame, chunks[4], question.is_free_text());
}

fn render_progress(frame: &mut Frame, area: Rect, active: &ActiveAttempt, remaining: Duration) {
    let [left, right] = Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).areas(area);

    let (answered, total) = active.progress();
    let progress = format!(
        "Question {} of {}  ·  {} answered",
        active.cursor() + 1,
        total,
        answered
    );
    frame.render_widget(
        Paragraph::new(progress).style(Style::default().fg(Color::Cyan).bold()),
        left,
    );

    let timer = Paragraph::new(format::countdown(remaining))
        .alignment(Alignment::Right)
        .style(Style::default().fg(format::countdown_color(remaining)).bold());
    frame.render_widget(timer, right);
}

/// One cell per question: answered ones in green, the current one bracketed.
fn render_strip(frame: &mut Frame, area: Rect, active: &ActiveAttempt) {
    let spans: Vec<Span> = (0..active.question_count())
        .map(|i| {
            let color = if active.is_answered(i) {
                Color::Green
            } else {
                Color::DarkGray
            };
            let label = if i == active.cursor() {
                format!("[{}]", i + 1)
            } else {
                format!(" {} ", i + 1)
            };
            Span::styled(label, Style::default().fg(color))
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, question: &Question) {
    let title = format!(" {} ", format::plural(question.points as usize, "point", "points"));
    let widget = Paragraph::new(question.text.as_str())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title)
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    highlighted: usize,
    chosen: Option<usize>,
) {
    let lines: Vec<Line> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let is_highlighted = i == highlighted;
            let is_chosen = chosen == Some(i);
            let prefix = if is_highlighted { "> " } else { "  " };
            let mark = if is_chosen { "(*) " } else { "( ) " };
            let label = OPTION_LABELS.get(i).copied().unwrap_or('?');

            let style = match (is_chosen, is_highlighted) {
                (true, _) => Style::default().fg(Color::Green).bold(),
                (false, true) => Style::default().fg(Color::Yellow).bold(),
                (false, false) => Style::default().fg(Color::White),
            };

            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(mark, style),
                Span::styled(format!("{}) ", label), style),
                Span::styled(opt.text.as_str(), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_text_answer(frame: &mut Frame, area: Rect, input: &str, active: &ActiveAttempt) {
    let saved = active.selected_answer().map(|a| a.answer.as_wire());
    let is_saved = saved.is_some_and(|s| s == input.trim());

    let border = if is_saved { Color::Green } else { Color::Yellow };
    let title = if is_saved { " Answer (saved) " } else { " Answer " };

    let widget = Paragraph::new(format!("{input}_"))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(title)
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, free_text: bool) {
    let help = if free_text {
        "type answer  ·  enter save  ·  ←/→ question  ·  ctrl+s submit  ·  esc leave"
    } else {
        "j/k option  ·  enter choose  ·  h/l or 1-9 question  ·  s submit  ·  q leave"
    };
    let widget = Paragraph::new(help)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);

    frame.render_widget(widget, area);
}
