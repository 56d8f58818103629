use std::env;

use chrono_tz::Tz;
use tracing::warn;

pub const DEFAULT_TIMEZONE: Tz = Tz::America__Toronto;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub app_env: String,
    pub app_name: String,
    pub app_version: String,
    /// Civil timezone all business-hour rules are expressed in. Instants are
    /// stored in UTC and rendered back through this zone.
    pub clinic_timezone: Tz,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            app_env: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string()),
            app_name: env::var("APP_NAME")
                .unwrap_or_else(|_| "Healthcare Appointment API".to_string()),
            app_version: env::var("APP_VERSION")
                .unwrap_or_else(|_| "1.0.0".to_string()),
            clinic_timezone: env::var("CLINIC_TIMEZONE")
                .ok()
                .and_then(|raw| match raw.parse::<Tz>() {
                    Ok(tz) => Some(tz),
                    Err(_) => {
                        warn!("CLINIC_TIMEZONE {:?} is not a known IANA zone, using {}", raw, DEFAULT_TIMEZONE);
                        None
                    }
                })
                .unwrap_or(DEFAULT_TIMEZONE),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| parse_cors_origins(&raw))
                .unwrap_or_else(|_| vec!["http://localhost:3000".to_string()]),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
    }
}

/// CORS_ORIGINS accepts either a JSON array or a comma-separated string.
fn parse_cors_origins(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        match serde_json::from_str::<Vec<String>>(trimmed) {
            Ok(origins) => return origins,
            Err(e) => warn!("CORS_ORIGINS looks like JSON but failed to parse ({}), treating as comma-separated", e),
        }
    }
    trimmed
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
