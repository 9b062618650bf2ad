//! Wizard state module

mod banner;
mod binding;
mod field;
mod layout;
mod record;
mod step;

pub use banner::*;
pub use binding::*;
pub use field::*;
pub use layout::*;
pub use record::*;
pub use step::*;
