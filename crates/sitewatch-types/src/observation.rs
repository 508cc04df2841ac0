use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::SiteStatus;

/// 单次探测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: SiteStatus,
    /// 端到端耗时（毫秒），探测失败时为 0
    pub latency_ms: u64,
}

impl ProbeResult {
    pub fn online(latency_ms: u64) -> Self {
        Self {
            status: SiteStatus::Online,
            latency_ms,
        }
    }

    pub fn offline() -> Self {
        Self {
            status: SiteStatus::Offline,
            latency_ms: 0,
        }
    }
}

/// 站点日志条目（只追加）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub site_id: String,
    pub timestamp: DateTime<Utc>,
    pub status: SiteStatus,
    #[serde(rename = "response_time")]
    pub response_time_ms: u64,
}

impl Observation {
    pub fn new(site_id: impl Into<String>, result: ProbeResult) -> Self {
        Self {
            site_id: site_id.into(),
            timestamp: Utc::now(),
            status: result.status,
            response_time_ms: result.latency_ms,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_wire_fields() {
        let obs = Observation::new("s1", ProbeResult::online(120));
        let json = serde_json::to_value(&obs).unwrap();

        assert_eq!(json["site_id"], "s1");
        assert_eq!(json["status"], "online");
        assert_eq!(json["response_time"], 120);
        assert!(json.get("response_time_ms").is_none());
    }

    #[test]
    fn test_offline_probe_has_zero_latency() {
        let result = ProbeResult::offline();
        assert_eq!(result.status, SiteStatus::Offline);
        assert_eq!(result.latency_ms, 0);
    }
}
