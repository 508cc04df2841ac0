use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::{Duration, Instant};
use tracing::debug;

use sitewatch_config::CheckerConfig;
use sitewatch_types::ProbeResult;

use crate::error::CheckerError;

/// 单次可达性检查
///
/// 实现不得返回错误：所有失败都归为 `offline`。
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeResult;
}

/// 探测参数
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self::from(&CheckerConfig::default())
    }
}

impl From<&CheckerConfig> for ProbeSettings {
    fn from(config: &CheckerConfig) -> Self {
        Self {
            timeout: config.probe_timeout(),
            max_redirects: config.max_redirects,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// HTTP GET 探测，跟随重定向
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(settings: ProbeSettings) -> Result<Self, CheckerError> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(settings.max_redirects))
            .timeout(settings.timeout)
            .user_agent(settings.user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str) -> ProbeResult {
        let start = Instant::now();

        debug!(url = %url, "Running probe");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, error = %e, "Probe request failed");
                return ProbeResult::offline();
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "Probe got non-success status");
            return ProbeResult::offline();
        }

        // 计时到响应体完整接收为止
        if let Err(e) = response.bytes().await {
            debug!(url = %url, error = %e, "Probe body read failed");
            return ProbeResult::offline();
        }

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        ProbeResult::online(latency_ms)
    }
}
