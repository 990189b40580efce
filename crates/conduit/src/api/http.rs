//! reqwest-backed client for RealWorld-compatible servers.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::{
    ApiError, ApiResult, ArticleApi, ArticleQuery, AuthApi, ServerErrors, INVALID_CREDENTIALS_KEY,
};
use crate::article::{Article, ArticleList};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::User;

/// Longest response body kept in an [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 200;

#[derive(Deserialize)]
struct ArticleEnvelope {
    article: Article,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    errors: ServerErrors,
}

/// HTTP implementation of [`ArticleApi`] and [`AuthApi`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    limit: u32,
}

impl HttpClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            token: config.api.token.clone(),
            limit: config.feed.articles_limit,
        })
    }

    /// URL of the list request for `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is malformed.
    pub fn list_url(&self, query: &ArticleQuery) -> ApiResult<Url> {
        let mut url = self.endpoint("articles")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &self.limit.to_string());
            pairs.append_pair("offset", &query.page.offset(self.limit).to_string());
            if let Some((name, value)) = query.filter.query_pair() {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Url::parse(&format!("{}/{path}", self.base_url))
            .map_err(|e| ApiError::Network(format!("invalid URL for '{path}': {e}")))
    }

    fn favorite_url(&self, slug: &str) -> ApiResult<Url> {
        if slug.is_empty() {
            return Err(ApiError::InvalidSlug);
        }
        let mut url = self.endpoint("articles")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Network("base URL cannot have a path".to_string()))?
            .push(slug)
            .push("favorite");
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Token {token}")),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_for_status(status.as_u16(), &body))
}

/// Classify a non-success response.
pub(crate) fn error_for_status(status: u16, body: &str) -> ApiError {
    let errors = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.errors)
        .filter(|errors| !errors.is_empty());

    match (status, errors) {
        (401, Some(errors)) if errors.contains(INVALID_CREDENTIALS_KEY) => {
            ApiError::Unprocessable(errors)
        }
        (401, _) => ApiError::Unauthorized,
        (404, _) => ApiError::NotFound,
        (_, Some(errors)) => ApiError::Unprocessable(errors),
        (status, None) => ApiError::Status {
            status,
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        },
    }
}

#[async_trait::async_trait]
impl ArticleApi for HttpClient {
    async fn fetch_articles(&self, query: &ArticleQuery) -> ApiResult<ArticleList> {
        let url = self.list_url(query)?;
        Self::send(self.request(Method::GET, url)).await
    }

    async fn add_favorite(&self, slug: &str) -> ApiResult<Article> {
        let url = self.favorite_url(slug)?;
        let envelope: ArticleEnvelope = Self::send(self.request(Method::POST, url)).await?;
        Ok(envelope.article)
    }

    async fn remove_favorite(&self, slug: &str) -> ApiResult<Article> {
        let url = self.favorite_url(slug)?;
        let envelope: ArticleEnvelope = Self::send(self.request(Method::DELETE, url)).await?;
        Ok(envelope.article)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpClient {
    async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let url = self.endpoint("users/login")?;
        let body = json!({ "user": { "email": email, "password": password } });
        let envelope: UserEnvelope = Self::send(self.request(Method::POST, url).json(&body)).await?;
        Ok(envelope.user)
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> ApiResult<User> {
        let url = self.endpoint("users")?;
        let body = json!({
            "user": { "username": username, "email": email, "password": password }
        });
        let envelope: UserEnvelope = Self::send(self.request(Method::POST, url).json(&body)).await?;
        Ok(envelope.user)
    }

    async fn current_user(&self) -> ApiResult<User> {
        if self.token.is_none() {
            return Err(ApiError::Unauthorized);
        }
        let url = self.endpoint("user")?;
        let envelope: UserEnvelope = Self::send(self.request(Method::GET, url)).await?;
        Ok(envelope.user)
    }
}
