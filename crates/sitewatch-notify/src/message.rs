use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBJECT: &str = "Alert: sites down detected";

/// 通知消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyMessage {
    /// 收件人
    pub recipient: String,

    /// 标题
    pub title: String,

    /// HTML 正文
    pub html: String,

    /// 纯文本正文
    pub text: String,

    /// 涉及的站点
    pub sites: Vec<String>,

    /// 时间
    pub timestamp: DateTime<Utc>,
}

impl NotifyMessage {
    /// 宕机报告：一封邮件列出本轮新发现的全部宕机站点
    pub fn site_down_report(recipient: impl Into<String>, urls: &[String]) -> Self {
        Self::site_down_report_with_subject(recipient, urls, DEFAULT_SUBJECT)
    }

    pub fn site_down_report_with_subject(
        recipient: impl Into<String>,
        urls: &[String],
        subject: impl Into<String>,
    ) -> Self {
        let timestamp = Utc::now();
        Self {
            recipient: recipient.into(),
            title: subject.into(),
            html: render_html(urls, timestamp),
            text: render_text(urls, timestamp),
            sites: urls.to_vec(),
            timestamp,
        }
    }
}

fn render_html(urls: &[String], timestamp: DateTime<Utc>) -> String {
    let rows: String = urls
        .iter()
        .map(|url| {
            format!(
                "<tr><td style=\"padding: 8px; border: 1px solid #ddd;\">{}</td></tr>",
                html_escape::encode_text(url)
            )
        })
        .collect();

    format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px;">
    <h2 style="color: #c0392b;">Sites down</h2>
    <p>The following sites were detected as down during the latest scan:</p>
    <table style="border-collapse: collapse; width: 100%; max-width: 500px;">
        <tr style="background: #f2f2f2;">
            <th style="padding: 10px; text-align: left; border: 1px solid #ddd;">Site</th>
        </tr>
        {rows}
    </table>
    <p style="margin-top: 20px; color: #888;">
        sitewatch checker<br>
        Report generated automatically at {time}.
    </p>
</div>"#,
        rows = rows,
        time = timestamp.to_rfc3339(),
    )
}

fn render_text(urls: &[String], timestamp: DateTime<Utc>) -> String {
    let mut text = String::from("The following sites were detected as down during the latest scan:\n\n");
    for url in urls {
        text.push_str("  - ");
        text.push_str(url);
        text.push('\n');
    }
    text.push_str(&format!("\nReport generated automatically at {}.\n", timestamp.to_rfc3339()));
    text
}
