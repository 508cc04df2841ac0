use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use sitewatch_types::{Observation, Site};

use crate::error::{StoreError, StoreResult};
use crate::store::{ObservationStore, SiteDirectory};

const SITES_TABLE: &str = "sites";
const SITE_LOGS_TABLE: &str = "site_logs";

/// Supabase 连接参数
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_key: String,
    pub timeout: Duration,
    pub users_per_page: u32,
}

/// 基于 Supabase REST (PostgREST + GoTrue admin) 的存储
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    service_key: String,
    timeout: Duration,
    users_per_page: u32,
}

#[derive(Debug, Deserialize)]
struct UserPage {
    #[serde(default)]
    users: Vec<AdminUser>,
}

#[derive(Debug, Deserialize)]
struct AdminUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig) -> StoreResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Self::with_client(client, config)
    }

    /// 使用外部提供的 HTTP 客户端
    pub fn with_client(client: Client, config: SupabaseConfig) -> StoreResult<Self> {
        let base_url = config.url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StoreError::Config("supabase url is empty".to_string()));
        }
        if config.service_key.is_empty() {
            return Err(StoreError::Config("supabase service key is empty".to_string()));
        }

        Ok(Self {
            client,
            base_url,
            service_key: config.service_key,
            timeout: config.timeout,
            users_per_page: config.users_per_page.max(1),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.service_key))
            .timeout(self.timeout)
    }

    async fn check(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
        let body = Self::check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_logs(&self, site_id: &str, limit: usize) -> StoreResult<Vec<Observation>> {
        let site_filter = format!("eq.{}", site_id);
        let limit = limit.to_string();

        let request = self.client.get(self.rest_url(SITE_LOGS_TABLE)).query(&[
            ("select", "site_id,timestamp,status,response_time"),
            ("site_id", site_filter.as_str()),
            ("order", "timestamp.desc"),
            ("limit", limit.as_str()),
        ]);

        Self::decode(self.authorize(request).send().await?).await
    }
}

#[async_trait]
impl SiteDirectory for SupabaseStore {
    async fn list_sites(&self) -> StoreResult<Vec<Site>> {
        let request = self
            .client
            .get(self.rest_url(SITES_TABLE))
            .query(&[("select", "id,url,user_id,name")]);

        let sites: Vec<Site> = Self::decode(self.authorize(request).send().await?).await?;

        debug!(count = sites.len(), "Fetched registered sites");
        Ok(sites)
    }

    async fn list_user_emails(&self) -> StoreResult<HashMap<String, String>> {
        let mut emails = HashMap::new();
        let per_page = self.users_per_page.to_string();
        let mut page: u32 = 1;

        loop {
            let page_param = page.to_string();
            let request = self
                .client
                .get(format!("{}/auth/v1/admin/users", self.base_url))
                .query(&[("page", page_param.as_str()), ("per_page", per_page.as_str())]);

            let body: UserPage = Self::decode(self.authorize(request).send().await?).await?;
            let fetched = body.users.len();

            for user in body.users {
                if let Some(email) = user.email.filter(|e| !e.is_empty()) {
                    emails.insert(user.id, email);
                }
            }

            if fetched < self.users_per_page as usize {
                break;
            }
            page += 1;
        }

        debug!(count = emails.len(), "Resolved user contact addresses");
        Ok(emails)
    }
}

#[async_trait]
impl ObservationStore for SupabaseStore {
    async fn record(&self, observation: &Observation) -> StoreResult<()> {
        let request = self
            .client
            .post(self.rest_url(SITE_LOGS_TABLE))
            .header("Prefer", "return=minimal")
            .json(observation);

        Self::check(self.authorize(request).send().await?).await?;

        debug!(
            site_id = %observation.site_id,
            status = %observation.status,
            "Observation appended"
        );
        Ok(())
    }

    async fn latest(&self, site_id: &str) -> StoreResult<Option<Observation>> {
        Ok(self.fetch_logs(site_id, 1).await?.into_iter().next())
    }

    async fn history(&self, site_id: &str, limit: usize) -> StoreResult<Vec<Observation>> {
        self.fetch_logs(site_id, limit).await
    }
}
