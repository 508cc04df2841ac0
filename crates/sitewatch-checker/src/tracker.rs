use std::collections::{HashMap, HashSet};

use sitewatch_types::SiteStatus;

/// 站点上一次状态的记录
///
/// 调度器持有并注入，可以替换成持久化的实现。
pub trait TransitionTracker: Send + Sync {
    /// 记录新状态，返回是否为一次新的 在线→离线 转变。
    ///
    /// 无论返回值如何都会覆盖已存状态；未见过的站点视为“之前不离线”。
    fn update(&mut self, site_id: &str, status: SiteStatus) -> bool;

    /// 写入初始状态，不产生转变
    fn seed(&mut self, site_id: &str, status: SiteStatus);

    fn last_status(&self, site_id: &str) -> Option<SiteStatus>;

    /// 丢弃已注销站点的状态
    fn retain(&mut self, live_site_ids: &HashSet<&str>);
}

/// 进程内状态表，重启即清空
#[derive(Debug, Default)]
pub struct MemoryTracker {
    last_status: HashMap<String, SiteStatus>,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.last_status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_status.is_empty()
    }
}

impl TransitionTracker for MemoryTracker {
    fn update(&mut self, site_id: &str, status: SiteStatus) -> bool {
        let previous = self.last_status.insert(site_id.to_string(), status);
        let was_offline = matches!(previous, Some(SiteStatus::Offline));
        !was_offline && status.is_offline()
    }

    fn seed(&mut self, site_id: &str, status: SiteStatus) {
        self.last_status.insert(site_id.to_string(), status);
    }

    fn last_status(&self, site_id: &str) -> Option<SiteStatus> {
        self.last_status.get(site_id).copied()
    }

    fn retain(&mut self, live_site_ids: &HashSet<&str>) {
        self.last_status
            .retain(|id, _| live_site_ids.contains(id.as_str()));
    }
}
