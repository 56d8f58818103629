use std::sync::Arc;

use shared_config::{AppConfig, DEFAULT_TIMEZONE};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the store client at a mock server (wiremock's `uri()`).
    pub fn with_store_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            app_env: "test".to_string(),
            app_name: "Healthcare Appointment API".to_string(),
            app_version: "1.0.0".to_string(),
            clinic_timezone: DEFAULT_TIMEZONE,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}
