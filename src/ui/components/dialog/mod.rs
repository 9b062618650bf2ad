//! Dialog components for TUI

mod base;
mod confirm_dialog;
mod summary_dialog;

pub use confirm_dialog::render_confirm_dialog;
pub use summary_dialog::render_summary_dialog;
