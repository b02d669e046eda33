use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::api::QuizApi;
use crate::app::App;
use crate::format;
use crate::models::QuizResult;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render<A: QuizApi>(frame: &mut Frame, area: Rect, app: &App<A>) {
    let Some(result) = app.controller().result() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], result);
    render_breakdown(frame, chunks[2], app, result);
    render_controls(frame, chunks[3]);
}

fn render_score_summary(frame: &mut Frame, area: Rect, result: &QuizResult) {
    let grade_color = format::grade_color(result.percentage);
    let (verdict, verdict_color) = if result.passed {
        ("PASSED", Color::Green)
    } else {
        ("NOT PASSED", Color::Red)
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {} points  ({})",
                result.earned_points,
                result.total_points,
                format::percentage(result.percentage)
            ),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(Span::styled(verdict, Style::default().fg(verdict_color).bold())),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_breakdown<A: QuizApi>(frame: &mut Frame, area: Rect, app: &App<A>, result: &QuizResult) {
    let Some(breakdown) = &result.breakdown else {
        let widget = Paragraph::new("Per-question results are not available for this quiz.")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray);
        frame.render_widget(widget, area);
        return;
    };

    let lines: Vec<Line> = breakdown
        .iter()
        .enumerate()
        .map(|(index, outcome)| {
            let (symbol, color) = if outcome.correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };
            let text = app
                .submitted_question_text(&outcome.question_id)
                .unwrap_or(outcome.question_id.as_str());

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format::truncate(text, QUESTION_PREVIEW_LENGTH),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("  {} pt", outcome.earned_points),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Your Answers ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        )
        .scroll((app.result_scroll() as u16, 0));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  enter back to quizzes  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
