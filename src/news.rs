//! News Fetcher
//!
//! Busca notícias de tecnologia com base no perfil do usuário e resume cada
//! uma através de uma sessão de chat dedicada.

use serde::Deserialize;

use crate::chat::ChatSession;
use crate::config::AppConfig;
use crate::errors::TechdeskError;
use crate::profile::UserProfile;

/// Fixed technology keywords always included in the search query
pub const TECH_TERMS: [&str; 5] = [
    "technology",
    "innovation",
    "startup",
    "programming",
    "development",
];

const NEWS_ENDPOINT: &str = "https://newsapi.org/v2/everything";

/// Um artigo resumido; produzido por atualização, nunca persistido
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsSummary {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub published_at: String,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
}

/// Builds the OR-joined search query from the profile plus the fixed keywords
pub fn build_query(profile: &UserProfile) -> String {
    let mut terms: Vec<&str> = Vec::new();
    terms.extend(profile.stack.iter().map(String::as_str));
    terms.extend(profile.interests.iter().map(String::as_str));
    terms.extend(TECH_TERMS);
    terms.join(" OR ")
}

/// Driver de busca e resumo de notícias
pub struct NewsFetcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: String,
    domains: String,
    page_size: usize,
}

impl NewsFetcher {
    pub fn new(api_key: &str, config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: NEWS_ENDPOINT.to_string(),
            api_key: api_key.to_string(),
            language: config.news_language.clone(),
            domains: config.news_domains.clone(),
            page_size: config.news_page_size,
        }
    }

    /// Overrides the search endpoint (used by tests)
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Busca artigos recentes pro perfil e resume cada um.
    ///
    /// Falha de transporte não propaga: retorna uma única entrada marcando o
    /// erro, e a falha vai pro log.
    pub async fn fetch_and_summarize(
        &self,
        profile: &UserProfile,
        session: &mut ChatSession,
    ) -> Vec<NewsSummary> {
        match self.try_fetch(profile, session).await {
            Ok(summaries) => summaries,
            Err(err) => {
                tracing::error!("failed to fetch news: {err}");
                vec![NewsSummary {
                    title: "Error".to_string(),
                    summary: format!("Failed to fetch news: {err}"),
                    url: String::new(),
                    published_at: String::new(),
                }]
            }
        }
    }

    async fn try_fetch(
        &self,
        profile: &UserProfile,
        session: &mut ChatSession,
    ) -> Result<Vec<NewsSummary>, TechdeskError> {
        let query = build_query(profile);
        tracing::info!("search terms: {query}");

        let page_size = self.page_size.to_string();
        let params = [
            ("apiKey", self.api_key.as_str()),
            ("q", query.as_str()),
            ("pageSize", page_size.as_str()),
            ("sortBy", "publishedAt"),
            ("language", self.language.as_str()),
            ("domains", self.domains.as_str()),
        ];

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| TechdeskError::NewsApiError(e.to_string()))?
            .error_for_status()
            .map_err(|e| TechdeskError::NewsApiError(e.to_string()))?;

        let parsed: NewsResponse = response
            .json()
            .await
            .map_err(|e| TechdeskError::NewsApiError(e.to_string()))?;

        tracing::info!("found {} articles", parsed.articles.len());

        let mut summaries = Vec::with_capacity(parsed.articles.len());
        for (i, article) in parsed.articles.iter().enumerate() {
            tracing::info!("processing article {}/{}", i + 1, parsed.articles.len());

            let description = article.description.as_deref().unwrap_or("");
            let prompt = format!(
                "Summarize this technology news item in 2-3 sentences: {} - {}",
                article.title, description
            );
            let summary = session.send_message(&prompt).await;

            summaries.push(NewsSummary {
                title: article.title.clone(),
                summary,
                url: article.url.clone(),
                published_at: article.published_at.clone(),
            });
        }

        tracing::info!("news processing complete");
        Ok(summaries)
    }
}
