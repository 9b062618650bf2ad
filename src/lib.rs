//! CRAS intake - multi-step registration form wizard
//!
//! The core of a social-assistance intake form: input masks, CPF/RG
//! checksums, conditional fields, step gating, autosave and submission with
//! anti-forgery token renewal. Rendering is left to a host implementing
//! [`view::FormView`].

pub mod config;
pub mod error;
pub mod format;
pub mod state;
pub mod storage;
pub mod summary;
pub mod token;
pub mod validate;
pub mod view;
pub mod wizard;

pub use config::WizardConfig;
pub use error::{StorageError, TokenError, WizardError, WizardResult};
pub use wizard::{Transition, Wizard};
