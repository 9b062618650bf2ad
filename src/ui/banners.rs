//! Banner strip under the step selector

use cras_intake::state::{BannerKind, BannerQueue};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn banner_style(kind: BannerKind) -> (Color, &'static str) {
    match kind {
        BannerKind::Success => (Color::Green, "✓"),
        BannerKind::Warning => (Color::Yellow, "!"),
        BannerKind::Error => (Color::Red, "✗"),
    }
}

/// One line per banner, newest on top
pub fn draw_banners(frame: &mut Frame, area: Rect, banners: &BannerQueue) {
    let lines: Vec<Line> = banners
        .iter()
        .map(|banner| {
            let (color, icon) = banner_style(banner.kind);
            Line::from(vec![
                Span::styled(
                    format!(" {icon} "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(banner.message.as_str(), Style::default().fg(color)),
                Span::styled("  (Esc)", Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}
