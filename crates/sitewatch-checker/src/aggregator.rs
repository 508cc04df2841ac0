use indexmap::IndexMap;

/// 某个用户本轮待发送的告警
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAlert {
    pub user_id: String,
    pub email: String,
    /// 按探测顺序排列
    pub urls: Vec<String>,
}

/// 单轮内按用户聚合的新宕机站点
///
/// 每轮新建，不跨轮保存。用户按首次出现的顺序排列。
#[derive(Debug, Default)]
pub struct AlertBatch {
    pending: IndexMap<String, PendingAlert>,
}

impl AlertBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个新宕机站点
    pub fn push(&mut self, user_id: &str, email: &str, url: &str) {
        self.pending
            .entry(user_id.to_string())
            .or_insert_with(|| PendingAlert {
                user_id: user_id.to_string(),
                email: email.to_string(),
                urls: Vec::new(),
            })
            .urls
            .push(url.to_string());
    }

    /// 有待发送告警的用户数
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn get(&self, user_id: &str) -> Option<&PendingAlert> {
        self.pending.get(user_id)
    }

    pub fn into_alerts(self) -> Vec<PendingAlert> {
        self.pending.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_by_user() {
        let mut batch = AlertBatch::new();
        batch.push("u1", "alice@x.com", "https://a.com");
        batch.push("u2", "bob@y.com", "https://c.com");
        batch.push("u1", "alice@x.com", "https://b.com");

        assert_eq!(batch.len(), 2);

        let alerts = batch.into_alerts();
        assert_eq!(alerts[0].email, "alice@x.com");
        assert_eq!(alerts[0].urls, vec!["https://a.com", "https://b.com"]);
        assert_eq!(alerts[1].email, "bob@y.com");
        assert_eq!(alerts[1].urls, vec!["https://c.com"]);
    }

    #[test]
    fn test_empty_batch_has_no_alerts() {
        let batch = AlertBatch::new();
        assert!(batch.is_empty());
        assert!(batch.into_alerts().is_empty());
    }
}
