use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

use sitewatch_notify::{Notifier, NotifyMessage, DEFAULT_SUBJECT};

/// 把聚合后的宕机列表交给通知器发送
///
/// 失败只记录日志并返回 `false`，本轮内不重试。
pub struct AlertDispatcher {
    notifier: Arc<dyn Notifier>,
    subject: String,
    timeout: Duration,
}

impl AlertDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        Self {
            notifier,
            subject: DEFAULT_SUBJECT.to_string(),
            timeout,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub async fn notify(&self, recipient: &str, urls: &[String]) -> bool {
        if urls.is_empty() {
            return false;
        }

        if !self.notifier.is_enabled() {
            warn!(notifier = self.notifier.name(), recipient = %recipient, "Notifier disabled, alert dropped");
            return false;
        }

        let message = NotifyMessage::site_down_report_with_subject(recipient, urls, self.subject.clone());

        match timeout(self.timeout, self.notifier.send(&message)).await {
            Ok(Ok(result)) if result.is_accepted() => {
                info!(recipient = %recipient, sites = result.sites, "Outage alert sent");
                true
            }
            Ok(Ok(result)) => {
                error!(recipient = %recipient, "Outage alert failed: {}", result);
                false
            }
            Ok(Err(e)) => {
                error!(recipient = %recipient, error = %e, "Outage alert error");
                false
            }
            Err(_) => {
                error!(recipient = %recipient, timeout = ?self.timeout, "Outage alert timed out");
                false
            }
        }
    }
}
