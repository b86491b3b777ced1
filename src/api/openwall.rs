use crate::api::error::ApiError;
use crate::config::Config;
use crate::models::cache::{cache_key, ResponseCache};
use crate::models::content::{Article, DictionaryEntry, SavedToggle, Video};
use crate::models::params::Params;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Every cached read under this family is dropped when a saved flag changes.
pub const SAVED_ARTICLES_FAMILY: &str = "saved-articles";

pub struct OpenwallApi {
    client: Client,
    base_url: String,
    cache: Arc<ResponseCache<Value>>,
    cache_ttl: Duration,
    dictionary_ttl: Duration,
}

impl OpenwallApi {
    pub fn new(config: &Config, cache: Arc<ResponseCache<Value>>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl: config.cache_ttl,
            dictionary_ttl: config.dictionary_ttl,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// Serves `path` from the cache while fresh; otherwise fetches it and
    /// caches the body for `ttl`. Only a body that decodes into `T` is
    /// cached, so failed fetches leave the cache untouched.
    pub async fn get_cached<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &Params,
        ttl: Duration,
    ) -> Result<T, ApiError> {
        let key = cache_key(path, params);
        if let Some(hit) = self.cache.get(key.as_str()) {
            debug!("Cache hit for {}", key);
            return Ok(serde_json::from_value(hit)?);
        }

        debug!("Cache miss for {}", key);
        let json = self.get_json(path, params).await?;
        let decoded = serde_json::from_value(json.clone())?;
        self.cache.set(key, json, ttl);
        Ok(decoded)
    }

    pub async fn get_json(&self, path: &str, params: &Params) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!("Sending GET {}", url);
        let mut request = self.client.get(url);
        if !params.is_empty() {
            request = request.query(&params.query_pairs());
        }
        let response = request.send().await?;
        Self::read_json(path, response).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        debug!("Sending POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        Self::read_json(path, response).await
    }

    async fn read_json(path: &str, response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limit hit for {}", path);
            return Err(ApiError::RateLimited {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn clear_cache_pattern(&self, pattern: &str) -> usize {
        self.cache.clear_pattern(pattern)
    }

    pub async fn list_articles(&self, page: u32) -> Result<Vec<Article>, ApiError> {
        let params = Params::new().with("page", page);
        self.get_cached("/articles", &params, self.cache_ttl).await
    }

    pub async fn get_article(&self, slug: &str) -> Result<Article, ApiError> {
        let path = format!("/articles/{}", slug);
        self.get_cached(&path, &Params::new(), self.cache_ttl).await
    }

    pub async fn list_videos(&self) -> Result<Vec<Video>, ApiError> {
        self.get_cached("/videos", &Params::new(), self.cache_ttl).await
    }

    pub async fn search_dictionary(&self, term: &str) -> Result<Vec<DictionaryEntry>, ApiError> {
        let params = Params::new().with("q", term.trim());
        self.get_cached("/dictionary/search", &params, self.dictionary_ttl)
            .await
    }

    pub async fn saved_articles(&self) -> Result<Vec<Article>, ApiError> {
        let path = format!("/users/{}", SAVED_ARTICLES_FAMILY);
        self.get_cached(&path, &Params::new(), self.cache_ttl).await
    }

    pub async fn toggle_saved_article(&self, slug: &str) -> Result<SavedToggle, ApiError> {
        let path = format!("/users/{}/{}", SAVED_ARTICLES_FAMILY, slug);
        let json = self.post_json(&path, &Value::Object(Default::default())).await?;
        let toggle: SavedToggle = serde_json::from_value(json)?;

        let cleared = self.clear_cache_pattern(SAVED_ARTICLES_FAMILY);
        info!(
            "Saved flag for {} is now {}, invalidated {} cached reads",
            slug, toggle.saved, cleared
        );
        Ok(toggle)
    }

    /// Drops every cached read. Session handling itself lives elsewhere.
    pub fn logout(&self) {
        info!("Clearing response cache on logout");
        self.clear_cache();
    }
}
