//! Anti-forgery token acquisition
//!
//! This module talks to the server-side collaborators: the JSON token
//! endpoint, the form page used as a fallback source, and the submit endpoint.

mod client;
mod renewal;
mod traits;

pub use client::HttpTransport;
pub use renewal::{
    renew_token, scrape_token, RenewalOutcome, DENIED_MESSAGE, RATE_LIMITED_MESSAGE,
    UNAVAILABLE_MESSAGE,
};
#[cfg(test)]
pub use traits::MockTokenTransport;
pub use traits::{HttpReply, TokenTransport};
