//! Host form view contract
//!
//! The wizard never renders anything itself. Every visible effect goes
//! through [`FormView`], so the same controller drives a browser bridge, the
//! terminal host or the in-memory view used by the tests.

mod memory;

pub use memory::{FieldElement, FocusCycle, MemoryView};

use crate::state::{Banner, FieldValidity, StepIndex};

/// Marker shown on a step selector button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepStatus {
    #[default]
    Pending,
    /// Advancing was tried and blocked by invalid fields
    Attempted,
    Completed,
}

/// Progress of the wizard as shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub step: StepIndex,
    pub percent: u8,
}

impl Progress {
    pub fn of(step: StepIndex) -> Self {
        Self {
            step,
            percent: step.progress_percent(),
        }
    }
}

/// What the forward button does on the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForwardAction {
    #[default]
    Next,
    Submit,
}

impl ForwardAction {
    pub fn label(self) -> &'static str {
        match self {
            ForwardAction::Next => "Próximo",
            ForwardAction::Submit => "Enviar Informações",
        }
    }
}

/// State of the back/forward navigation controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub back_enabled: bool,
    pub forward: ForwardAction,
    pub forward_enabled: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            back_enabled: false,
            forward: ForwardAction::Next,
            forward_enabled: true,
        }
    }
}

/// Rendering surface and field storage owned by the host
pub trait FormView {
    /// Every named field in the host form, the token field included
    fn field_names(&self) -> Vec<String>;

    fn has_field(&self, name: &str) -> bool;

    /// Live value of a field; `None` when the form has no such field
    fn value(&self, name: &str) -> Option<String>;

    fn set_value(&mut self, name: &str, value: &str);

    fn is_enabled(&self, name: &str) -> bool;

    fn set_enabled(&mut self, name: &str, enabled: bool);

    fn is_required(&self, name: &str) -> bool;

    fn set_required(&mut self, name: &str, required: bool);

    fn set_validity(&mut self, name: &str, validity: FieldValidity);

    /// Replace the inline message under a field; `None` removes it
    fn set_error_message(&mut self, name: &str, message: Option<&str>);

    fn focus(&mut self, name: &str);

    /// Show only this step's container and highlight its selector
    fn show_step(&mut self, step: StepIndex);

    fn set_step_status(&mut self, step: StepIndex, status: StepStatus);

    fn render_progress(&mut self, progress: Progress);

    fn set_navigation(&mut self, navigation: NavigationState);

    /// Busy indicator on the reset control; busy controls are disabled
    fn set_reset_busy(&mut self, busy: bool);

    fn show_banner(&mut self, banner: Banner);

    /// Hand the form over to the host's native submission
    fn submit(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_labels() {
        assert_eq!(ForwardAction::Next.label(), "Próximo");
        assert_eq!(ForwardAction::Submit.label(), "Enviar Informações");
    }

    #[test]
    fn test_progress_of_step() {
        let progress = Progress::of(StepIndex::clamped(3));
        assert_eq!(progress.percent, 50);
        assert_eq!(Progress::of(StepIndex::LAST).percent, 100);
    }
}
