//! HTTP client for the token endpoint, the form page and the submit endpoint

use super::traits::{HttpReply, TokenTransport};
use crate::config::WizardConfig;
use crate::error::TokenError;
use async_trait::async_trait;
use std::time::Duration;

/// Header marking token requests as XHR, as the server expects
const XHR_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// reqwest-backed transport; clones share one connection pool and cookie jar
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    token_url: String,
    page_url: String,
    submit_url: String,
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl HttpTransport {
    /// Create a transport rooted at `base_url`
    pub fn new(
        base_url: &str,
        token_path: &str,
        page_path: &str,
        submit_path: &str,
        timeout: Duration,
    ) -> Result<Self, TokenError> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TokenError::Config(format!(
                "base url must be http(s): {base_url}"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| TokenError::Config(e.to_string()))?;

        Ok(Self {
            client,
            token_url: join_url(base_url, token_path),
            page_url: join_url(base_url, page_path),
            submit_url: join_url(base_url, submit_path),
        })
    }

    pub fn from_config(config: &WizardConfig) -> Result<Self, TokenError> {
        Self::new(
            &config.base_url(),
            config.token_path(),
            config.page_path(),
            config.submit_path(),
            config.request_timeout(),
        )
    }

    /// Where `post_form` sends the filled form
    pub fn submit_url(&self) -> &str {
        &self.submit_url
    }

    async fn read(url: &str, response: reqwest::Response) -> Result<HttpReply, TokenError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TokenError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(HttpReply { status, body })
    }

    fn transport_error(url: &str, err: reqwest::Error) -> TokenError {
        TokenError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    async fn get_xhr(&self, url: &str) -> Result<HttpReply, TokenError> {
        let response = self
            .client
            .get(url)
            .header(XHR_HEADER.0, XHR_HEADER.1)
            .send()
            .await
            .map_err(|e| Self::transport_error(url, e))?;
        Self::read(url, response).await
    }

    /// POST named fields as `application/x-www-form-urlencoded`
    pub async fn post_form(&self, fields: &[(String, String)]) -> Result<HttpReply, TokenError> {
        let url = &self.submit_url;
        tracing::info!(url = %url, fields = fields.len(), "posting form");
        let response = self
            .client
            .post(url)
            .header("Referer", &self.page_url)
            .form(fields)
            .send()
            .await
            .map_err(|e| Self::transport_error(url, e))?;
        Self::read(url, response).await
    }
}

#[async_trait]
impl TokenTransport for HttpTransport {
    async fn fetch_token(&self) -> Result<HttpReply, TokenError> {
        self.get_xhr(&self.token_url).await
    }

    async fn fetch_page(&self) -> Result<HttpReply, TokenError> {
        self.get_xhr(&self.page_url).await
    }
}
