//! UI module for rendering the TUI

mod banners;
mod components;
mod forms;
mod layout;

use crate::app::{App, Overlay};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let view = app.view();
    let areas = layout::create_layout(frame.area(), view.banners().len());

    layout::draw_header(frame, areas.header, view);
    layout::draw_step_selector(frame, areas.steps, view);
    banners::draw_banners(frame, areas.banners, view.banners());
    forms::draw_step(frame, areas.content, view);
    layout::draw_navigation(frame, areas.navigation, view);

    // Draw status bar
    layout::draw_status_bar(frame, app);

    // Overlays last so they sit above the form
    match app.overlay {
        Overlay::None => {}
        Overlay::Summary { scroll } => {
            components::render_summary_dialog(frame, &app.summary(), scroll)
        }
        Overlay::ConfirmReset { selected_option } => {
            components::render_confirm_dialog(frame, selected_option)
        }
    }
}
