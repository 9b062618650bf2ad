//! Confirmation dialog for clearing the form

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

const RESET_QUESTION: &str =
    "Tem certeza que deseja limpar todos os dados? Esta ação não pode ser desfeita.";

/// Render the reset confirmation; `selected_option` is `true` on "Limpar"
pub fn render_confirm_dialog(frame: &mut Frame, selected_option: bool) {
    let mut body = vec![Line::from("")];

    // Add options with selection highlighting
    let options = [false, true]; // Cancelar, Limpar
    let labels = ["Cancelar", "Limpar"];
    let colors = [Color::White, Color::Red];

    for (i, (&is_reset, &label)) in options.iter().zip(labels.iter()).enumerate() {
        let is_selected = selected_option == is_reset;
        let prefix = if is_selected { "▸ " } else { "  " };
        let style = if is_selected {
            Style::default().fg(colors[i]).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        body.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
    }

    render_dialog(
        frame,
        DialogConfig {
            title: "Limpar Formulário",
            title_color: Color::Red,
            border_color: Color::Red,
            message: RESET_QUESTION,
            body,
            hint: Some(vec![
                Span::styled("↑↓", Style::default().fg(Color::Cyan)),
                Span::styled(" selecionar  ", Style::default().fg(Color::DarkGray)),
                Span::styled("Enter", Style::default().fg(Color::Cyan)),
                Span::styled(" confirmar  ", Style::default().fg(Color::DarkGray)),
                Span::styled("Esc", Style::default().fg(Color::Cyan)),
                Span::styled(" cancelar", Style::default().fg(Color::DarkGray)),
            ]),
            max_width: 56,
            ..Default::default()
        },
    );
}
