use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use sitewatch_types::{Observation, Site};

use crate::error::StoreResult;
use crate::store::{ObservationStore, SiteDirectory};

#[derive(Default)]
struct Inner {
    sites: Vec<Site>,
    emails: HashMap<String, String>,
    logs: Vec<Observation>,
}

/// 进程内存储，用于测试和本地试运行
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册站点
    pub async fn add_site(&self, site: Site) {
        self.inner.write().await.sites.push(site);
    }

    /// 删除站点（模拟外部注销）
    pub async fn remove_site(&self, site_id: &str) {
        self.inner.write().await.sites.retain(|s| s.id != site_id);
    }

    /// 设置用户邮箱
    pub async fn set_email(&self, user_id: impl Into<String>, email: impl Into<String>) {
        self.inner
            .write()
            .await
            .emails
            .insert(user_id.into(), email.into());
    }

    /// 全部日志（写入顺序）
    pub async fn observations(&self) -> Vec<Observation> {
        self.inner.read().await.logs.clone()
    }

    pub async fn observations_for(&self, site_id: &str) -> Vec<Observation> {
        self.inner
            .read()
            .await
            .logs
            .iter()
            .filter(|o| o.site_id == site_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SiteDirectory for MemoryStore {
    async fn list_sites(&self) -> StoreResult<Vec<Site>> {
        Ok(self.inner.read().await.sites.clone())
    }

    async fn list_user_emails(&self) -> StoreResult<HashMap<String, String>> {
        Ok(self.inner.read().await.emails.clone())
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    async fn record(&self, observation: &Observation) -> StoreResult<()> {
        self.inner.write().await.logs.push(observation.clone());
        Ok(())
    }

    async fn latest(&self, site_id: &str) -> StoreResult<Option<Observation>> {
        Ok(self.history(site_id, 1).await?.into_iter().next())
    }

    async fn history(&self, site_id: &str, limit: usize) -> StoreResult<Vec<Observation>> {
        let mut logs = self.observations_for(site_id).await;
        // 同一时间戳时后写入的排前面
        logs.reverse();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.truncate(limit);
        Ok(logs)
    }
}
