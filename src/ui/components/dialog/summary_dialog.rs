//! Review summary overlay

use super::base::{render_dialog, DialogConfig};
use cras_intake::summary::{Summary, NOT_INFORMED};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

/// Render every step's answers in a scrollable dialog
pub fn render_summary_dialog(frame: &mut Frame, summary: &Summary, scroll: u16) {
    let mut body = Vec::new();

    for section in &summary.sections {
        body.push(Line::from(Span::styled(
            format!("{}. {}", section.step, section.title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for row in &section.rows {
            let value_style = if row.value == NOT_INFORMED {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            body.push(Line::from(vec![
                Span::styled(
                    format!("  {}: ", row.label),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(row.value.clone(), value_style),
            ]));
        }
        body.push(Line::from(""));
    }

    render_dialog(
        frame,
        DialogConfig {
            title: "Resumo da Ficha",
            title_color: Color::Cyan,
            border_color: Color::Cyan,
            body,
            hint: Some(vec![
                Span::styled("↑↓", Style::default().fg(Color::Cyan)),
                Span::styled(" rolar  ", Style::default().fg(Color::DarkGray)),
                Span::styled("Esc", Style::default().fg(Color::Cyan)),
                Span::styled(" fechar", Style::default().fg(Color::DarkGray)),
            ]),
            max_width: 80,
            scroll,
            ..Default::default()
        },
    );
}
