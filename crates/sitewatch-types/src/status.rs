use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 站点可达状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    /// 在线
    Online,
    /// 离线
    Offline,
}

impl SiteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteStatus::Online => "online",
            SiteStatus::Offline => "offline",
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, SiteStatus::Offline)
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown site status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for SiteStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(SiteStatus::Online),
            "offline" => Ok(SiteStatus::Offline),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
