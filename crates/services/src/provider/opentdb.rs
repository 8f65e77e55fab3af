use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use trivia_core::model::{Category, RawQuestion};

use super::{QuestionRequest, TriviaProvider};
use crate::error::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://opentdb.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const BASE_URL_VAR: &str = "TRIVIA_API_BASE_URL";
const TIMEOUT_VAR: &str = "TRIVIA_API_TIMEOUT_SECS";

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidBaseUrl` if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        let mut base_url = Url::parse(base_url.trim())?;
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `TRIVIA_API_BASE_URL` and `TRIVIA_API_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidBaseUrl` if the configured URL does not parse.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_vars(env::var(BASE_URL_VAR).ok(), env::var(TIMEOUT_VAR).ok())
    }

    fn from_vars(
        base_url: Option<String>,
        timeout_secs: Option<String>,
    ) -> Result<Self, ProviderError> {
        let base_url = base_url
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = timeout_secs
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        Ok(Self::new(&base_url)?.with_timeout(timeout))
    }

    /// # Errors
    ///
    /// Returns `ProviderError::InvalidBaseUrl` if the endpoint cannot be joined.
    pub fn categories_url(&self) -> Result<Url, ProviderError> {
        Ok(self.base_url.join("api_category.php")?)
    }

    /// Question endpoint with `amount`, optional `category`, and `difficulty` set.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidBaseUrl` if the endpoint cannot be joined.
    pub fn questions_url(&self, request: &QuestionRequest) -> Result<Url, ProviderError> {
        let mut url = self.base_url.join("api.php")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("amount", &request.amount.to_string());
            if let Some(id) = request.category.id() {
                query.append_pair("category", &id.to_string());
            }
            query.append_pair("difficulty", request.difficulty.as_str());
        }
        Ok(url)
    }
}

/// HTTP client for an Open Trivia DB compatible provider.
#[derive(Clone)]
pub struct OpenTdbClient {
    client: Client,
    config: ProviderConfig,
}

impl OpenTdbClient {
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn get_body(&self, url: Url) -> Result<String, ProviderError> {
        let response = self.client.get(url).send().await?;
        check_status(response.status())?;
        Ok(response.text().await?)
    }
}

fn check_status(status: StatusCode) -> Result<(), ProviderError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ProviderError::HttpStatus(status))
    }
}

#[async_trait]
impl TriviaProvider for OpenTdbClient {
    async fn fetch_categories(&self) -> Result<Vec<Category>, ProviderError> {
        let url = self.config.categories_url()?;
        debug!(%url, "fetching trivia categories");
        let body = self.get_body(url).await?;
        parse_categories(&body)
    }

    async fn fetch_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<RawQuestion>, ProviderError> {
        let url = self.config.questions_url(request)?;
        debug!(%url, "fetching trivia questions");
        let body = self.get_body(url).await?;
        parse_questions(&body)
    }
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    trivia_categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    #[serde(default)]
    response_code: u32,
    #[serde(default)]
    results: Vec<RawQuestion>,
}

fn parse_categories(body: &str) -> Result<Vec<Category>, ProviderError> {
    let parsed: CategoriesResponse = serde_json::from_str(body)?;
    Ok(parsed.trivia_categories)
}

fn parse_questions(body: &str) -> Result<Vec<RawQuestion>, ProviderError> {
    let parsed: QuestionsResponse = serde_json::from_str(body)?;
    if parsed.response_code != 0 {
        return Err(ProviderError::Rejected {
            code: parsed.response_code,
        });
    }
    Ok(parsed.results)
}
