//! STRATO 门户 HTTP 请求方法

use crate::error::Result;
use crate::http_client::{HttpUtils, Page};

use super::StratoProvider;

impl StratoProvider {
    /// GET the portal entry point with the given query.
    pub(crate) async fn get_page(&self, query: &[(&str, &str)], action: &str) -> Result<Page> {
        let request = self.client.get(self.api_url.clone()).query(query);
        HttpUtils::execute_request(request, "GET", action).await
    }

    /// POST a url-encoded form to the portal entry point.
    ///
    /// Keys may repeat; they are sent in the given order.
    pub(crate) async fn post_form(&self, form: &[(&str, &str)], action: &str) -> Result<Page> {
        let request = self.client.post(self.api_url.clone()).form(form);
        HttpUtils::execute_request(request, "POST", action).await
    }
}
