use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use crate::services::event_store::SearchLogStore;
use ride_search_analytics::events::SearchEvent;
use ride_search_analytics::fetch::auth::ApiKey;
use ride_search_analytics::fetch::{BasicClient, HttpClient};

/// Connection settings for the managed event store.
///
/// Passed explicitly at construction; nothing here is read from ambient
/// globals. `service_key` is the service-role key, so this client must only
/// run in trusted backoffice contexts.
#[derive(Debug, Clone)]
pub struct EventStoreConfig {
    pub base_url: String,
    pub service_key: String,
}

impl EventStoreConfig {
    /// Reads `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY` from the
    /// environment.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("SUPABASE_URL")
            .map_err(|_| anyhow::anyhow!("SUPABASE_URL must be set"))?;
        let service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| anyhow::anyhow!("SUPABASE_SERVICE_ROLE_KEY must be set"))?;

        Ok(Self {
            base_url,
            service_key,
        })
    }
}

/// Reads `search_logs` through the store's PostgREST surface.
///
/// PostgREST wants the service key twice: verbatim in `apikey` and as a
/// bearer token, hence the stacked [`ApiKey`] wrappers.
pub struct SupabaseEventStore {
    base_url: String,
    client: ApiKey<ApiKey<BasicClient>>,
}

impl SupabaseEventStore {
    pub fn new(config: EventStoreConfig) -> Self {
        let client = ApiKey::bearer(
            ApiKey::header(BasicClient::new(), "apikey", config.service_key.clone()),
            config.service_key,
        );

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl SearchLogStore for SupabaseEventStore {
    #[tracing::instrument(skip(self))]
    async fn fetch_window(&self, days: u32) -> Result<Vec<SearchEvent>> {
        let since = Utc::now() - chrono::Duration::days(days as i64);
        let url = format!(
            "{}/rest/v1/search_logs?select=*&created_at=gte.{}&order=created_at.desc",
            self.base_url,
            since.to_rfc3339(),
        );

        let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
        let response = self
            .client
            .execute(req)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send search_logs request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Event store returned status {}: {}",
                status,
                body
            ));
        }

        let events: Vec<SearchEvent> = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse search_logs response: {}", e))?;

        Ok(events)
    }
}
