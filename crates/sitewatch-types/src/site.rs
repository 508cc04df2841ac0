use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// 被监控的站点
///
/// 由外部注册流程创建，检查器只读。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// 存储分配的标识（线上可能是数字或字符串）
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,

    /// 探测目标 URL
    pub url: String,

    /// 所属用户，为空时只探测和记录，不告警
    #[serde(default, deserialize_with = "opt_id_as_string")]
    pub user_id: Option<String>,

    /// 显示名称
    #[serde(default)]
    pub name: Option<String>,
}

impl Site {
    pub fn new(id: impl Into<String>, url: impl Into<String>, user_id: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: id.into(),
            name: Some(display_name(&url)),
            url,
            user_id: Some(user_id.into()),
        }
    }

    /// 存储里的名称，缺失时从 URL 推导
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => display_name(&self.url),
        }
    }
}

/// 从 URL 推导显示名称：主机名去掉开头的 `www.`
///
/// 无法解析出主机名时返回原始字符串。
pub fn display_name(url: &str) -> String {
    match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) {
        Some(host) => host.strip_prefix("www.").unwrap_or(&host).to_string(),
        None => url.to_string(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn opt_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}
