//! Trait abstraction for the token endpoints to enable mocking in tests

use crate::error::TokenError;
use async_trait::async_trait;

/// Status and body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two reads token renewal needs from the server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenTransport: Send + Sync {
    /// GET the token endpoint as an XHR
    async fn fetch_token(&self) -> Result<HttpReply, TokenError>;

    /// GET the form page itself
    async fn fetch_page(&self) -> Result<HttpReply, TokenError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        assert!(HttpReply::new(200, "").is_success());
        assert!(HttpReply::new(204, "").is_success());
        assert!(!HttpReply::new(302, "").is_success());
        assert!(!HttpReply::new(429, "").is_success());
    }
}
