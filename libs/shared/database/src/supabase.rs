use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Result of an insert against a table carrying a uniqueness constraint.
///
/// The constraint in the backing database is the authoritative serialization
/// point for double-booking: of two racing inserts for the same
/// `(provider_id, start_time)` exactly one lands, the other surfaces here as
/// `ConstraintViolated` rather than a generic error.
#[derive(Debug)]
pub enum InsertOutcome<T> {
    Inserted(T),
    ConstraintViolated,
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.anon_key)).unwrap(),
        );

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers();
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store API error ({}): {}", status, error_text);

            return Err(StoreError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Insert a row, asking the store to return the created representation.
    /// An HTTP 409 from the backing uniqueness constraint is reported as
    /// `InsertOutcome::ConstraintViolated`, not as an error.
    pub async fn insert<T>(&self, path: &str, body: Value) -> Result<InsertOutcome<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Inserting into {}", url);

        let mut headers = self.get_headers();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let response = self
            .client
            .request(Method::POST, &url)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            let error_text = response.text().await.unwrap_or_default();
            debug!("Insert rejected by uniqueness constraint: {}", error_text);
            return Ok(InsertOutcome::ConstraintViolated);
        }

        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store insert error ({}): {}", status, error_text);

            return Err(StoreError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let mut rows = response.json::<Vec<T>>().await?;
        match rows.pop() {
            Some(row) => Ok(InsertOutcome::Inserted(row)),
            None => Err(StoreError::Api {
                status: status.as_u16(),
                message: "insert returned no representation".to_string(),
            }),
        }
    }
}
