//! Layout components (header, step selector, navigation, status bar)

use super::components::{render_button, render_step_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::platform::COPY_SHORTCUT;
use cras_intake::state::{StepIndex, TOTAL_STEPS};
use cras_intake::view::{ForwardAction, MemoryView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Screen regions of the form
pub struct FormAreas {
    pub header: Rect,
    pub steps: Rect,
    pub banners: Rect,
    pub content: Rect,
    pub navigation: Rect,
}

/// Split the screen, reserving one line per banner and the bottom line for the status bar
pub fn create_layout(area: Rect, banner_count: usize) -> FormAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                   // Header
            Constraint::Length(BUTTON_HEIGHT),       // Step selector
            Constraint::Length(banner_count as u16), // Banners
            Constraint::Min(0),                      // Fields
            Constraint::Length(BUTTON_HEIGHT),       // Back / forward
            Constraint::Length(1),                   // Status bar
        ])
        .split(area);

    FormAreas {
        header: chunks[0],
        steps: chunks[1],
        banners: chunks[2],
        content: chunks[3],
        navigation: chunks[4],
    }
}

/// Draw the step title with the progress gauge
pub fn draw_header(frame: &mut Frame, area: Rect, view: &MemoryView) {
    let step = view.visible_step();
    let progress = view.progress();
    let title = format!(
        " Ficha CRAS · Etapa {step} de {TOTAL_STEPS}: {} ",
        step.title()
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .percent(u16::from(progress.percent));

    frame.render_widget(gauge, area);
}

/// Draw one selector button per step
pub fn draw_step_selector(frame: &mut Frame, area: Rect, view: &MemoryView) {
    let constraints: Vec<Constraint> = StepIndex::all()
        .map(|_| Constraint::Ratio(1, u32::from(TOTAL_STEPS)))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for step in StepIndex::all() {
        render_step_button(
            frame,
            chunks[step.position()],
            step.get(),
            view.step_status(step),
            step == view.visible_step(),
        );
    }
}

/// Draw the back and forward controls
pub fn draw_navigation(frame: &mut Frame, area: Rect, view: &MemoryView) {
    let navigation = view.navigation();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16),
            Constraint::Min(0),
            Constraint::Length(26),
        ])
        .split(area);

    render_button(
        frame,
        chunks[0],
        "^P Voltar",
        false,
        navigation.back_enabled,
    );

    // The submit control only lights up once the last step is satisfied
    let forward_label = format!("^N {}", navigation.forward.label());
    let highlight = navigation.forward == ForwardAction::Submit && navigation.forward_enabled;
    if view.is_reset_busy() {
        render_button(frame, chunks[2], "Limpando...", false, false);
    } else {
        render_button(
            frame,
            chunks[2],
            &forward_label,
            highlight,
            navigation.forward_enabled,
        );
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    // Build status bar content
    let mut spans = vec![];

    // Token status
    let token_status = if app.has_token() {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(token_status);

    let hints = format!(
        "Tab:campo ←→:opção F1-F6:etapa ^U:apagar ^R:resumo ^L:limpar \
         {COPY_SHORTCUT}:copiar ^E:exportar"
    );
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    // Copy message
    if let Some(msg) = &app.copy_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    // Quit hint on the right
    let quit_hint = " ^C:sair ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));

    frame.render_widget(status, status_area);

    // Render quit hint on the right
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}
