//! Supabase (PostgREST) store implementation.
//!
//! Reads the complaint tables over the PostgREST HTTP interface:
//! `GET {url}/rest/v1/{table}?select=*&order=created_at.desc&thread_id=eq.X`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::rows::{
    normalize_emails, normalize_threads, EmailRow, EmailThreadRow, EMAIL_TABLE, THREAD_TABLE,
};
use super::traits::{EmailQuery, Result, StoreError, TableStore};
use crate::config::StoreSettings;
use crate::domain::{Email, EmailThread};

/// Header carrying the project API key.
const API_KEY_HEADER: &str = "apikey";

/// Header selecting a non-default schema for reads.
const PROFILE_HEADER: &str = "accept-profile";

/// PostgREST error body.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct PostgrestError {
    message: String,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Store backed by a Supabase project's REST endpoint.
pub struct SupabaseStore {
    client: reqwest::Client,
    rest_url: Url,
    api_key: Option<String>,
    schema: Option<String>,
}

impl SupabaseStore {
    /// Creates a store for the project at `base_url`.
    ///
    /// `base_url` may be the project root (`https://xyz.supabase.co`) or the
    /// REST root (`https://xyz.supabase.co/rest/v1`).
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            rest_url: rest_endpoint(base_url)?,
            api_key,
            schema: None,
        })
    }

    /// Creates a store from the `store` settings section.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self> {
        let url = settings
            .url
            .as_deref()
            .ok_or_else(|| StoreError::InvalidConfig("no store url configured".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;

        let mut store = Self::new(url, settings.api_key.clone())?.with_client(client);
        if let Some(ref schema) = settings.schema {
            store = store.with_schema(schema.clone());
        }
        Ok(store)
    }

    /// Overrides the HTTP client (useful for custom timeouts or proxies).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Reads from a schema other than `public`.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Returns the REST root all table URLs are built from.
    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        let mut url = self.rest_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidConfig(format!("cannot extend {}", self.rest_url)))?
            .pop_if_empty()
            .push(table);
        Ok(url)
    }

    pub(crate) fn threads_url(&self) -> Result<Url> {
        let mut url = self.table_url(THREAD_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");
        Ok(url)
    }

    pub(crate) fn emails_url(&self, query: &EmailQuery) -> Result<Url> {
        let mut url = self.table_url(EMAIL_TABLE)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            if let Some(ref thread_id) = query.thread_id {
                pairs.append_pair("thread_id", &format!("eq.{}", thread_id));
            }
            if let Some(category) = query.category {
                // ilike without wildcards is a case-insensitive equality match
                pairs.append_pair("category", &format!("ilike.{}", category.as_str()));
            }
            if let Some(since) = query.created_since {
                pairs.append_pair(
                    "created_at",
                    &format!("gte.{}", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
                );
            }
            pairs.append_pair("order", &format!("created_at.{}", query.order.as_str()));
        }
        Ok(url)
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(ref api_key) = self.api_key {
            if let Ok(value) = HeaderValue::from_str(api_key) {
                headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
            }
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", api_key)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        if let Some(ref schema) = self.schema {
            if let Ok(value) = HeaderValue::from_str(schema) {
                headers.insert(HeaderName::from_static(PROFILE_HEADER), value);
            }
        }

        headers
    }

    async fn get_rows<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        tracing::debug!(%url, "Querying store");

        let response = self
            .client
            .get(url)
            .headers(self.build_headers())
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn handle_error_response(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        StoreError::Api {
            status,
            message: error_message(&body),
        }
    }
}

#[async_trait]
impl TableStore for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn fetch_threads(&self) -> Result<Vec<EmailThread>> {
        let rows: Vec<EmailThreadRow> = self.get_rows(self.threads_url()?).await?;
        Ok(normalize_threads(rows))
    }

    async fn fetch_emails(&self, query: &EmailQuery) -> Result<Vec<Email>> {
        let rows: Vec<EmailRow> = self.get_rows(self.emails_url(query)?).await?;
        Ok(normalize_emails(rows))
    }
}

/// Resolves the REST root from a project or REST URL.
fn rest_endpoint(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url.trim())
        .map_err(|e| StoreError::InvalidConfig(format!("invalid store url {base_url}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(StoreError::InvalidConfig(format!(
            "store url must be http or https: {base_url}"
        )));
    }

    let trimmed = url.path().trim_end_matches('/').to_string();
    let path = if trimmed.ends_with("/rest/v1") {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/rest/v1/")
    };
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::Timeout
    } else {
        StoreError::Connection(error.to_string())
    }
}

/// Extracts the most useful message from an error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) => match err.hint {
            Some(hint) => format!("{} ({})", err.message, hint),
            None => err.message,
        },
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
