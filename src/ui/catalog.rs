use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::api::QuizApi;
use crate::app::App;
use crate::format;
use crate::models::{QuizStatus, QuizSummary};

const TITLE_WIDTH: usize = 40;

pub fn render<A: QuizApi>(frame: &mut Frame, area: Rect, app: &App<A>) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app.quizzes().len());
    render_list(frame, chunks[1], app.quizzes(), app.catalog_cursor());
    render_details(frame, chunks[2], app.highlighted_quiz());
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, area: Rect, count: usize) {
    let content = vec![
        Line::from(Span::styled(
            "QUIZZES",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(format::plural(count, "quiz", "quizzes").fg(Color::DarkGray)),
    ];
    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn status_color(status: QuizStatus) -> Color {
    match status {
        QuizStatus::Available => Color::Green,
        QuizStatus::Upcoming => Color::Yellow,
        QuizStatus::Completed => Color::Cyan,
        QuizStatus::Ended => Color::DarkGray,
    }
}

fn render_list(frame: &mut Frame, area: Rect, quizzes: &[QuizSummary], cursor: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .padding(Padding::horizontal(1));

    if quizzes.is_empty() {
        let widget = Paragraph::new("No quizzes right now.  Press r to refresh.")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray)
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let lines: Vec<Line> = quizzes
        .iter()
        .enumerate()
        .map(|(i, quiz)| {
            let is_selected = i == cursor;
            let marker = if is_selected { "> " } else { "  " };
            let title_style = if is_selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(marker, title_style),
                Span::styled(
                    format!("{:<width$}", format::truncate(&quiz.title, TITLE_WIDTH), width = TITLE_WIDTH),
                    title_style,
                ),
                Span::styled(
                    format!(" {:<10}", quiz.status.label()),
                    Style::default().fg(status_color(quiz.status)),
                ),
                Span::styled(
                    format!(" {:>3} min", quiz.duration),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    // Keep the highlighted row on screen.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = cursor.saturating_sub(visible.saturating_sub(1));

    let widget = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_details(frame: &mut Frame, area: Rect, quiz: Option<&QuizSummary>) {
    let Some(quiz) = quiz else {
        return;
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format::plural(quiz.question_count, "question", "questions"),
            Style::default().fg(Color::White),
        ),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{} minutes", quiz.duration),
            Style::default().fg(Color::White),
        ),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("pass at {}", format::percentage(f64::from(quiz.passing_score))),
            Style::default().fg(Color::White),
        ),
    ])];
    if let Some(course) = &quiz.course {
        lines.push(Line::from(course.as_str().fg(Color::Cyan)));
    }
    if let Some(description) = &quiz.description {
        lines.push(Line::from(description.as_str().fg(Color::Gray)));
    }

    let widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k navigate  ·  enter start  ·  r refresh  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
