use async_trait::async_trait;
use std::collections::HashMap;

use sitewatch_types::{Observation, Site};

use crate::error::StoreResult;

/// 历史查询的默认上限
pub const HISTORY_LIMIT: usize = 100;

/// 站点目录与用户联系方式
#[async_trait]
pub trait SiteDirectory: Send + Sync {
    /// 当前全部已注册站点
    async fn list_sites(&self) -> StoreResult<Vec<Site>>;

    /// 用户 ID -> 邮箱，没有邮箱的用户不出现
    async fn list_user_emails(&self) -> StoreResult<HashMap<String, String>>;
}

/// 站点日志（只追加）
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// 追加一条探测结果
    async fn record(&self, observation: &Observation) -> StoreResult<()>;

    /// 站点最近一条日志
    async fn latest(&self, site_id: &str) -> StoreResult<Option<Observation>>;

    /// 按时间倒序的历史
    async fn history(&self, site_id: &str, limit: usize) -> StoreResult<Vec<Observation>>;
}
