//! Open Food Facts search client
//!
//! One text search per call against the classic `cgi/search.pl` endpoint,
//! limited to a small page and a fixed field allow-list. Failures never
//! propagate: a failed search is logged and reported as zero candidates so
//! the caller can move on to the next query variant.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::build_info::BuildInfo;

/// Search endpoint, relative to the configured base URL
pub const SEARCH_PATH: &str = "/cgi/search.pl";

/// Fields requested from the database; everything else is dropped server-side
pub const SEARCH_FIELDS: &str = "product_name,lang,nutriments,categories_tags";

/// Search error types
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Client configuration
#[derive(Debug, Clone)]
pub struct OpenFoodFactsConfig {
    /// Base URL (default: <https://world.openfoodfacts.org>)
    pub base_url: String,
    /// Identifying client header with a contact reference
    pub user_agent: String,
    /// Maximum products returned per search
    pub page_size: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://world.openfoodfacts.org".to_string(),
            user_agent: BuildInfo::user_agent(),
            page_size: 8,
            timeout: Duration::from_secs(8),
        }
    }
}

/// One product record as returned by a search, untrusted
///
/// Each field decodes on its own: a field of the wrong shape is dropped
/// instead of rejecting the whole product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    /// Declared language code ("de", "en", ...)
    #[serde(default, deserialize_with = "lenient_string")]
    pub lang: Option<String>,
    /// Nutrient field name -> number, numeric string, null, or garbage
    #[serde(default, deserialize_with = "lenient_object")]
    pub nutriments: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub categories_tags: Vec<String>,
}

impl RawCandidate {
    /// Whether the nutrient key is present with a non-null value
    pub fn has_nutrient(&self, key: &str) -> bool {
        matches!(self.nutriments.get(key), Some(v) if !v.is_null())
    }

    /// Numeric value of a nutrient, if present and parseable
    ///
    /// Accepts JSON numbers and numeric strings. Anything else, including
    /// non-finite values, is treated as absent.
    pub fn nutrient(&self, key: &str) -> Option<f64> {
        let value = match self.nutriments.get(key)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Option<Vec<Value>>,
}

/// A text search against the food database
///
/// Implementations must not fail: transport or decode problems yield an
/// empty vector.
#[async_trait]
pub trait FoodSearch: Send + Sync {
    async fn search(&self, query: &str) -> Vec<RawCandidate>;
}

/// HTTP client for the Open Food Facts search API
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    config: OpenFoodFactsConfig,
    http_client: reqwest::Client,
}

impl OpenFoodFactsClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built
    /// (e.g. the user agent is not a valid header value).
    pub fn new(config: OpenFoodFactsConfig) -> SearchResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &OpenFoodFactsConfig {
        &self.config
    }

    /// Perform one search, surfacing every failure
    pub async fn try_search(&self, query: &str) -> SearchResult<Vec<RawCandidate>> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), SEARCH_PATH);
        let page_size = self.config.page_size.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("page_size", page_size.as_str()),
                ("json", "1"),
                ("fields", SEARCH_FIELDS),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        // Decode products one by one so a single odd record doesn't sink the page
        let candidates = parsed
            .products
            .unwrap_or_default()
            .into_iter()
            .filter_map(|product| match serde_json::from_value::<RawCandidate>(product) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    tracing::debug!("Skipping undecodable product for '{}': {}", query, e);
                    None
                }
            })
            .collect();

        Ok(candidates)
    }
}

#[async_trait]
impl FoodSearch for OpenFoodFactsClient {
    async fn search(&self, query: &str) -> Vec<RawCandidate> {
        match self.try_search(query).await {
            Ok(candidates) => {
                tracing::debug!(query, count = candidates.len(), "Food search completed");
                candidates
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Food search failed, treating as no results");
                Vec::new()
            }
        }
    }
}
