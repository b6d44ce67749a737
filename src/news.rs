//! News feed from the newsdata.io aggregator.
//!
//! Articles are fetched per request, mapped into [`Article`]s with fallback
//! values for missing fields, and decorated with likes and comments from the
//! [`EngagementStore`].

use reqwest::Client;
use serde::Deserialize;
use std::hash::{DefaultHasher, Hash, Hasher};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::NewsConfig;
use crate::models::Article;
use crate::store::EngagementStore;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("No articles found")]
    NoArticles,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

/// The subset of a newsdata.io response we read.
#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Option<Vec<RawArticle>>,
}

/// One article as returned upstream; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct RawArticle {
    pub article_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub source_name: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
}

impl RawArticle {
    /// Stable id: the upstream id, or a hash of the title.
    pub fn id(&self) -> String {
        if let Some(id) = self.article_id.as_deref().filter(|id| !id.is_empty()) {
            return id.to_string();
        }
        let mut hasher = DefaultHasher::new();
        self.title.as_deref().unwrap_or_default().hash(&mut hasher);
        hasher.finish().to_string()
    }

    /// Build the served article, filling gaps with display defaults.
    pub fn into_article(self, store: &dyn EngagementStore) -> Article {
        let id = self.id();
        let engagement = store.get(&id);
        Article {
            title: self.title.unwrap_or_else(|| "No Title".to_string()),
            description: self
                .description
                .unwrap_or_else(|| "No description available".to_string()),
            image: self.image_url.unwrap_or_default(),
            url: self.link.unwrap_or_else(|| "#".to_string()),
            source: self.source_name.unwrap_or_else(|| "Unknown".to_string()),
            pub_date: self.pub_date.unwrap_or_default(),
            likes: engagement.likes,
            comments: engagement.comments,
            id,
        }
    }
}

/// Client for the news aggregator.
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    config: NewsConfig,
    api_key: Option<String>,
}

impl NewsClient {
    /// Create a client for the aggregator at `config.endpoint`.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client, expected to carry the fetch timeout
    /// * `config` - Endpoint, language and article limit
    /// * `api_key` - newsdata.io key; requests are still sent without one and
    ///   the upstream rejection surfaces as [`NewsError::NoArticles`]
    pub fn new(client: Client, config: NewsConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            config,
            api_key,
        }
    }

    fn request_url(&self, category: Option<&str>) -> String {
        let mut url = format!(
            "{}?apikey={}&language={}",
            self.config.endpoint,
            urlencoding::encode(self.api_key.as_deref().unwrap_or_default()),
            urlencoding::encode(&self.config.language),
        );
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            url.push_str("&category=");
            url.push_str(&urlencoding::encode(category));
        }
        url
    }

    /// Fetch the latest articles, optionally filtered by category.
    ///
    /// # Arguments
    ///
    /// * `category` - Aggregator category such as `"science"`; empty means all
    /// * `store` - Source of the likes and comments attached to each article
    ///
    /// # Returns
    ///
    /// At most `max_articles` articles in upstream order, or
    /// [`NewsError::NoArticles`] when the aggregator answers with an error
    /// status or an empty result list.
    #[instrument(level = "info", skip_all, fields(category = category.unwrap_or("")))]
    pub async fn fetch(
        &self,
        category: Option<&str>,
        store: &dyn EngagementStore,
    ) -> Result<Vec<Article>, NewsError> {
        let response = self.client.get(self.request_url(category)).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "News aggregator responded");

        if !status.is_success() {
            return Err(NewsError::NoArticles);
        }
        let body: NewsResponse = response.json().await?;
        let raw = body
            .results
            .filter(|r| !r.is_empty())
            .ok_or(NewsError::NoArticles)?;

        let articles: Vec<Article> = raw
            .into_iter()
            .take(self.config.max_articles)
            .map(|a| a.into_article(store))
            .collect();
        info!(count = articles.len(), "Fetched news articles");
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> NewsClient {
        NewsClient::new(
            Client::new(),
            NewsConfig {
                endpoint: format!("{}/api/1/news", server.uri()),
                ..Default::default()
            },
            Some("nd_key".to_string()),
        )
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let store = MemoryStore::new();
        let article = RawArticle {
            article_id: Some("abc".into()),
            ..Default::default()
        }
        .into_article(&store);

        assert_eq!(article.id, "abc");
        assert_eq!(article.title, "No Title");
        assert_eq!(article.description, "No description available");
        assert_eq!(article.image, "");
        assert_eq!(article.url, "#");
        assert_eq!(article.source, "Unknown");
        assert_eq!(article.pub_date, "");
        assert_eq!(article.likes, 0);
    }

    #[test]
    fn test_id_falls_back_to_title_hash() {
        let a = RawArticle {
            title: Some("Same headline".into()),
            ..Default::default()
        };
        let b = RawArticle {
            title: Some("Same headline".into()),
            ..Default::default()
        };
        let c = RawArticle {
            title: Some("Other headline".into()),
            ..Default::default()
        };
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_engagement_is_attached() {
        let store = MemoryStore::new();
        store.like("abc");
        store.comment("abc", "nice".into());
        let article = RawArticle {
            article_id: Some("abc".into()),
            ..Default::default()
        }
        .into_article(&store);
        assert_eq!(article.likes, 1);
        assert_eq!(article.comments, vec!["nice"]);
    }

    #[tokio::test]
    async fn test_fetch_limits_and_maps() {
        let server = MockServer::start().await;
        let results: Vec<_> = (0..25)
            .map(|i| serde_json::json!({"article_id": format!("id{i}"), "title": format!("T{i}"), "pubDate": "2025-01-01 10:00:00"}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/1/news"))
            .and(query_param("apikey", "nd_key"))
            .and(query_param("language", "en"))
            .and(query_param("category", "science"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": results})),
            )
            .mount(&server)
            .await;

        let store = MemoryStore::new();
        let articles = client(&server).fetch(Some("science"), &store).await.unwrap();
        assert_eq!(articles.len(), 20);
        assert_eq!(articles[0].id, "id0");
        assert_eq!(articles[0].title, "T0");
        assert_eq!(articles[0].pub_date, "2025-01-01 10:00:00");
    }

    #[tokio::test]
    async fn test_fetch_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
            .mount(&server)
            .await;

        let err = client(&server).fetch(None, &MemoryStore::new()).await.unwrap_err();
        assert!(matches!(err, NewsError::NoArticles));
        assert_eq!(err.to_string(), "No articles found");
    }

    #[tokio::test]
    async fn test_fetch_upstream_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({"status": "error"})))
            .mount(&server)
            .await;

        let err = client(&server).fetch(None, &MemoryStore::new()).await.unwrap_err();
        assert!(matches!(err, NewsError::NoArticles));
    }
}
