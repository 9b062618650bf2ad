//! Field rendering utilities for forms

use cras_intake::state::{FieldKind, FieldValidity};
use cras_intake::view::FieldElement;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Field height in rows (top border + value + bottom border)
pub const FIELD_HEIGHT: u16 = 3;

fn border_color(field: &FieldElement, is_active: bool) -> Color {
    if !field.enabled {
        Color::DarkGray
    } else if field.validity == FieldValidity::Invalid {
        Color::Red
    } else if is_active {
        Color::Cyan
    } else if field.validity == FieldValidity::Valid {
        Color::Green
    } else {
        Color::DarkGray
    }
}

/// Draw a form field from its in-memory element
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FieldElement, is_active: bool) {
    let style = if !field.enabled {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    let border_style = Style::default().fg(border_color(field, is_active));

    let display_str = if !field.enabled {
        "(não se aplica)".to_string()
    } else {
        field.display_value()
    };

    // Selects cycle with the arrows instead of a text cursor
    let cursor = match (is_active, field.kind) {
        (false, _) => "",
        (true, FieldKind::Select) => " ◂▸",
        (true, _) => "▌",
    };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_str, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let marker = if field.required && field.enabled { " *" } else { "" };
    let mut block = Block::default()
        .title(format!(" {}{marker} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(error) = &field.error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(content.block(block), area);
}
