//! Generic HTTP client tools
//!
//! The portal answers every request with a rendered HTML page. This module
//! sends a prepared `RequestBuilder`, logs the exchange and hands back the
//! final URL (after redirects) together with the page body.

use reqwest::RequestBuilder;
use url::Url;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// A fetched portal page.
#[derive(Debug, Clone)]
pub struct Page {
    /// URL of the last response in the redirect chain.
    pub url: Url,
    pub status: u16,
    pub body: String,
}

impl Page {
    /// First value of query parameter `name` in the final URL.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the resulting page
    ///
    /// Unified processing: sending requests, logging, error handling.
    /// Status codes are not interpreted; the portal reports problems inside
    /// the page, so callers inspect the body or the final URL instead.
    ///
    /// # Arguments
    /// * `request_builder` - configured request constructor (including URL, query, form, etc.)
    /// * `method_name` - request method name (such as "GET", "POST", used for logs)
    /// * `action` - logical page or action name (for logging)
    ///
    /// # Returns
    /// * `Ok(Page)` - final URL, status code and body
    /// * `Err(ProviderError::NetworkError | ProviderError::Timeout)` - transport failure
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        action: &str,
    ) -> Result<Page, ProviderError> {
        log::debug!("[strato] {method_name} {action}");

        let response = request_builder.send().await?;

        let status = response.status().as_u16();
        let url = response.url().clone();
        log::debug!("[strato] Response Status: {status}");

        if !response.status().is_success() {
            log::warn!("[strato] {method_name} {action} answered with HTTP {status}");
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!("[strato] Response Body: {}", truncate_for_log(&body));

        Ok(Page { url, status, body })
    }
}
