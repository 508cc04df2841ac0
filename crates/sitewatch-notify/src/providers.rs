use crate::message::NotifyMessage;
use crate::notifier::{Notifier, NotifyResult};
use anyhow::Result;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

// ============================================================================
// 邮件通知
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    /// SMTP 会话超时（秒）
    pub timeout_secs: u64,
}

pub struct EmailNotifier {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    enabled: bool,
}

impl EmailNotifier {
    /// 创建邮件通知器（STARTTLS + 用户名密码认证）
    pub fn new(config: EmailConfig) -> Result<Self> {
        let from: Mailbox = config.from.parse()?;

        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .credentials(creds)
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self {
            from,
            mailer,
            enabled: !config.username.is_empty(),
        })
    }

    fn build_email(&self, message: &NotifyMessage) -> Result<Message> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(message.recipient.parse()?)
            .subject(&message.title)
            .multipart(MultiPart::alternative_plain_html(
                message.text.clone(),
                message.html.clone(),
            ))?;
        Ok(email)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, message: &NotifyMessage) -> Result<NotifyResult> {
        let email = self.build_email(message)?;

        match self.mailer.send(email).await {
            Ok(_) => {
                info!(recipient = %message.recipient, sites = message.sites.len(), "Alert email sent");
                Ok(NotifyResult::accepted(message))
            }
            Err(e) => {
                warn!(recipient = %message.recipient, error = %e, "Alert email failed");
                Ok(NotifyResult::rejected(message, format!("smtp: {}", e)))
            }
        }
    }

    fn name(&self) -> &str {
        "email"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
