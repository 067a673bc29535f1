use std::sync::Arc;

use crate::decode::{decode_html, DecodedHtml};
use crate::retry::{with_retry, RetryPolicy, Sleeper, TokioSleeper};
use crate::transport::Transport;
use crate::FetchError;

/// Fetches individual article pages under its own retry policy, separate from
/// the listing policy.
pub struct ArticleFetcher {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    retry: RetryPolicy,
}

impl ArticleFetcher {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleeper),
            retry,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub async fn fetch(&self, url: &str) -> Result<DecodedHtml, FetchError> {
        let transport = self.transport.as_ref();
        let response = with_retry(&self.retry, self.sleeper.as_ref(), "article page", |_| async move {
            transport.get(url, &[]).await
        })
        .await?;
        Ok(decode_html(&response.body, response.content_type.as_deref()))
    }
}
