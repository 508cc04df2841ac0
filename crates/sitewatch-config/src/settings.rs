use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 全局配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteWatchConfig {
    #[serde(default)]
    pub checker: CheckerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 检查循环配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckerConfig {
    /// 两轮扫描之间的休眠（秒）
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// 每个站点处理后的间隔（毫秒）
    #[serde(default = "default_pacing_millis")]
    pub pacing_millis: u64,

    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    #[serde(default = "default_write_timeout_secs")]
    pub write_timeout_secs: u64,

    #[serde(default = "default_notify_timeout_secs")]
    pub notify_timeout_secs: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// 启动时用每个站点最近一条日志初始化状态表
    #[serde(default = "default_true")]
    pub seed_from_history: bool,
}

/// 站点/用户存储（Supabase）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub url: String,

    /// service role key
    #[serde(default)]
    pub service_key: String,

    #[serde(default = "default_store_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_users_per_page")]
    pub users_per_page: u32,
}

/// 邮件发送配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// 发件人，为空时使用 username
    #[serde(default)]
    pub from: Option<String>,

    #[serde(default = "default_subject")]
    pub subject: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 输出 JSON 格式日志
    #[serde(default)]
    pub json: bool,
}

// 默认值函数
fn default_interval_secs() -> u64 {
    60
}

fn default_pacing_millis() -> u64 {
    1000
}

fn default_probe_timeout_secs() -> u64 {
    10
}

fn default_write_timeout_secs() -> u64 {
    10
}

fn default_notify_timeout_secs() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("sitewatch-checker/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_true() -> bool {
    true
}

fn default_store_timeout_secs() -> u64 {
    10
}

fn default_users_per_page() -> u32 {
    1000
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject() -> String {
    "Alert: sites down detected".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CheckerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_millis)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SmtpConfig {
    pub fn sender(&self) -> &str {
        match self.from.as_deref() {
            Some(from) if !from.is_empty() => from,
            _ => &self.username,
        }
    }
}

// Default trait 实现
impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            pacing_millis: default_pacing_millis(),
            probe_timeout_secs: default_probe_timeout_secs(),
            write_timeout_secs: default_write_timeout_secs(),
            notify_timeout_secs: default_notify_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            seed_from_history: default_true(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_key: String::new(),
            timeout_secs: default_store_timeout_secs(),
            users_per_page: default_users_per_page(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: None,
            subject: default_subject(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
