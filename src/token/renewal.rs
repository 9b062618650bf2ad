//! Anti-forgery token renewal
//!
//! Attempts run in order: the dedicated JSON endpoint first, then a re-fetch
//! of the form page scraped for the hidden token input. Rate limiting and
//! denial stop the sequence; every other failure falls through to the page.

use super::traits::{HttpReply, TokenTransport};
use crate::state::TOKEN_FIELD;
use regex::Regex;
use serde::Deserialize;

pub const RATE_LIMITED_MESSAGE: &str = "Muitas tentativas. Aguarde um momento.";
pub const DENIED_MESSAGE: &str = "Acesso negado";
pub const UNAVAILABLE_MESSAGE: &str = "Não foi possível obter novo token";

/// Result of one renewal attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenewalOutcome {
    Renewed(String),
    /// Carries the server's `error` text, when it sent one
    RateLimited(String),
    Denied,
    Unavailable,
}

impl RenewalOutcome {
    pub fn token(&self) -> Option<&str> {
        match self {
            RenewalOutcome::Renewed(token) => Some(token),
            _ => None,
        }
    }

    pub fn is_renewed(&self) -> bool {
        matches!(self, RenewalOutcome::Renewed(_))
    }

    /// Text shown to the user for a failed renewal
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            RenewalOutcome::Renewed(_) => None,
            RenewalOutcome::RateLimited(_) => Some(RATE_LIMITED_MESSAGE),
            RenewalOutcome::Denied => Some(DENIED_MESSAGE),
            RenewalOutcome::Unavailable => Some(UNAVAILABLE_MESSAGE),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    csrf_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// What the dedicated endpoint said, before any fallback
enum EndpointVerdict {
    Done(RenewalOutcome),
    FallBack,
}

fn read_endpoint(reply: &HttpReply) -> EndpointVerdict {
    match reply.status {
        429 => {
            let server_message = serde_json::from_str::<ErrorBody>(&reply.body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_default();
            tracing::warn!(error = %server_message, "token endpoint rate limited");
            EndpointVerdict::Done(RenewalOutcome::RateLimited(server_message))
        }
        403 => {
            tracing::warn!("token endpoint denied access");
            EndpointVerdict::Done(RenewalOutcome::Denied)
        }
        _ if reply.is_success() => {
            match serde_json::from_str::<TokenBody>(&reply.body)
                .ok()
                .and_then(|b| b.csrf_token)
                .filter(|t| !t.is_empty())
            {
                Some(token) => EndpointVerdict::Done(RenewalOutcome::Renewed(token)),
                None => EndpointVerdict::FallBack,
            }
        }
        status => {
            tracing::debug!(status, "token endpoint gave no token");
            EndpointVerdict::FallBack
        }
    }
}

/// Obtain a fresh token from the server
pub async fn renew_token(transport: &dyn TokenTransport) -> RenewalOutcome {
    match transport.fetch_token().await {
        Ok(reply) => {
            if let EndpointVerdict::Done(outcome) = read_endpoint(&reply) {
                return outcome;
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "token endpoint unreachable");
        }
    }

    match transport.fetch_page().await {
        Ok(reply) if reply.is_success() => match scrape_token(&reply.body) {
            Some(token) => {
                tracing::debug!("token recovered from page");
                RenewalOutcome::Renewed(token)
            }
            None => RenewalOutcome::Unavailable,
        },
        Ok(reply) => {
            tracing::warn!(status = reply.status, "page re-fetch failed");
            RenewalOutcome::Unavailable
        }
        Err(err) => {
            tracing::warn!(error = %err, "page re-fetch failed");
            RenewalOutcome::Unavailable
        }
    }
}

/// Value of the first `<input>` named `csrfmiddlewaretoken` in an HTML page
pub fn scrape_token(html: &str) -> Option<String> {
    let input_tag = Regex::new(r"(?is)<input\b[^>]*>").ok()?;
    let attribute =
        Regex::new(r#"(?is)([a-z_:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).ok()?;

    let found = input_tag.find_iter(html).find_map(|tag| {
        let mut name = None;
        let mut value = None;
        for caps in attribute.captures_iter(tag.as_str()) {
            let attr = caps.get(1).map(|m| m.as_str().to_ascii_lowercase());
            let content = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());
            match attr.as_deref() {
                Some("name") => name = content,
                Some("value") => value = content,
                _ => {}
            }
        }
        if name.as_deref() == Some(TOKEN_FIELD) {
            value.filter(|v| !v.is_empty())
        } else {
            None
        }
    });
    found
}
