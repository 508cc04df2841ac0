use crate::message::NotifyMessage;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// 投递结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// 对端已接收
    Accepted,
    /// 对端拒收或会话中断，附带原因
    Rejected(String),
}

/// 一份宕机报告的投递回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyResult {
    pub recipient: String,
    /// 报告中列出的站点数
    pub sites: usize,
    pub delivery: Delivery,
}

impl NotifyResult {
    pub fn accepted(message: &NotifyMessage) -> Self {
        Self {
            recipient: message.recipient.clone(),
            sites: message.sites.len(),
            delivery: Delivery::Accepted,
        }
    }

    pub fn rejected(message: &NotifyMessage, reason: impl Into<String>) -> Self {
        Self {
            recipient: message.recipient.clone(),
            sites: message.sites.len(),
            delivery: Delivery::Rejected(reason.into()),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.delivery == Delivery::Accepted
    }
}

impl fmt::Display for NotifyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.delivery {
            Delivery::Accepted => write!(
                f,
                "outage report for {} site(s) accepted for {}",
                self.sites, self.recipient
            ),
            Delivery::Rejected(reason) => write!(
                f,
                "outage report for {} site(s) to {} rejected: {}",
                self.sites, self.recipient, reason
            ),
        }
    }
}

/// 宕机报告的投递通道
///
/// 对端拒收用 `Delivery::Rejected` 表示；报告本身无法构造（如收件地址非法）才返回 `Err`。
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &NotifyMessage) -> Result<NotifyResult>;

    fn name(&self) -> &str;

    /// 缺少凭据的通道不会被调用，告警直接丢弃
    fn is_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> NotifyMessage {
        NotifyMessage::site_down_report(
            "alice@x.com",
            &["https://a.com".to_string(), "https://b.com".to_string()],
        )
    }

    #[test]
    fn test_receipt_carries_recipient_and_site_count() {
        let result = NotifyResult::accepted(&report());

        assert!(result.is_accepted());
        assert_eq!(result.recipient, "alice@x.com");
        assert_eq!(result.sites, 2);
    }

    #[test]
    fn test_rejection_keeps_reason() {
        let result = NotifyResult::rejected(&report(), "550 mailbox unavailable");

        assert!(!result.is_accepted());
        assert_eq!(
            result.to_string(),
            "outage report for 2 site(s) to alice@x.com rejected: 550 mailbox unavailable"
        );
    }
}
