//! Multi-step wizard: navigation, gating, autosave, submission and reset

mod controller;
mod submission;

pub use controller::{Transition, Wizard, WizardState};
pub use submission::{
    reset_warning, submit_token_error, RESET_FAILED, RESET_SUCCESS, SUBMIT_TOKEN_ERROR,
    TOKEN_FIELD_MISSING,
};
