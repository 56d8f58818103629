use anyhow::Result;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::Provider;

pub struct ProviderService {
    supabase: SupabaseClient,
}

impl ProviderService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_providers(&self) -> Result<Vec<Provider>> {
        debug!("Fetching all providers");

        let path = "/rest/v1/providers?select=id,name,specialty,bio&order=id.asc";
        let result: Vec<Value> = self.supabase.request(Method::GET, path, None).await?;

        let providers: Vec<Provider> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Provider>, _>>()?;

        Ok(providers)
    }

    pub async fn get_provider(&self, provider_id: &str) -> Result<Option<Provider>> {
        debug!("Fetching provider: {}", provider_id);

        let path = format!(
            "/rest/v1/providers?id=eq.{}&select=id,name,specialty,bio",
            provider_id
        );
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }
}
