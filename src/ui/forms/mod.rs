//! Form rendering module
//!
//! - `field_renderer`: one bordered box per field
//! - `draw_step`: the fields of the visible step, two per row

mod field_renderer;

use cras_intake::view::MemoryView;
use field_renderer::{draw_field, FIELD_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Draw the fields of the visible step inside a titled frame
pub fn draw_step(frame: &mut Frame, area: Rect, view: &MemoryView) {
    let step = view.visible_step();
    let block = Block::default()
        .title(format!(" {} ", step.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields: Vec<_> = view.elements_in(step).collect();
    let row_count = fields.len().div_ceil(2);
    let mut constraints = vec![Constraint::Length(FIELD_HEIGHT); row_count];
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    let active = view.focused();
    for (row, pair) in fields.chunks(2).enumerate() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[row]);
        for (column, field) in pair.iter().enumerate() {
            let is_active = active == Some(field.name.as_str());
            draw_field(frame, columns[column], field, is_active);
        }
    }
}
