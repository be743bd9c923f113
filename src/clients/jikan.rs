//! Client for the Jikan (MyAnimeList) catalog API.
//!
//! The listing calls swallow failures: they log and return an empty result so
//! a consumer can render an empty state. Callers that need to tell failures
//! apart use [`CatalogClient::try_get_details`] or
//! [`CatalogClient::fetch_random`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::domain::AnimeId;
use crate::error::{TransportError, recover};
use crate::models::anime::UNKNOWN;
use crate::models::{CatalogRecord, Genre, ImageSet, Recommendation};

pub const JIKAN_API: &str = "https://api.jikan.moe/v4";
pub const TRENDING_LIMIT: u32 = 10;
pub const SEARCH_LIMIT: u32 = 20;
pub const RECOMMENDATIONS_LIMIT: usize = 10;

/// Issues a GET and returns the response body of a 2xx reply.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport whose requests fail with
    /// [`TransportError::Timeout`] after `config.request_timeout()`.
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

#[derive(Debug, Deserialize)]
struct JikanResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
pub struct MalAnime {
    pub mal_id: u32,
    pub title: Option<String>,
    pub title_english: Option<String>,
    pub score: Option<f32>,
    pub episodes: Option<u32>,
    pub rank: Option<u32>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub duration: Option<String>,
    pub rating: Option<String>,
    pub aired: Option<Aired>,
    #[serde(default)]
    pub genres: Option<Vec<MalGenericInfo>>,
    pub images: Option<MalImages>,
    pub synopsis: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Aired {
    pub string: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MalGenericInfo {
    pub mal_id: u32,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MalImages {
    pub jpg: Option<MalImageUrls>,
}

#[derive(Debug, Deserialize)]
pub struct MalImageUrls {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MalRecommendation {
    pub mal_id: String,
    #[serde(default)]
    pub entry: Vec<serde_json::Value>,
    pub content: Option<String>,
}

impl From<MalAnime> for CatalogRecord {
    fn from(anime: MalAnime) -> Self {
        let images = anime
            .images
            .and_then(|i| i.jpg)
            .map(|jpg| ImageSet {
                image_url: jpg.image_url,
                large_image_url: jpg.large_image_url,
            })
            .unwrap_or_default();

        Self {
            id: AnimeId::new(anime.mal_id),
            title: anime
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            title_english: anime.title_english,
            score: anime.score,
            episodes: anime.episodes,
            status: anime.status,
            rank: anime.rank,
            kind: anime.anime_type,
            genres: anime
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| Genre {
                    id: g.mal_id,
                    name: g
                        .name
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                })
                .collect(),
            images,
            synopsis: anime.synopsis,
            aired: anime.aired.and_then(|a| a.string),
            duration: anime.duration,
            rating: anime.rating,
        }
    }
}

/// Decodes a single record; an entry that does not even carry an id is
/// dropped instead of failing the whole page.
fn parse_record(value: serde_json::Value) -> Option<CatalogRecord> {
    match serde_json::from_value::<MalAnime>(value) {
        Ok(anime) => Some(anime.into()),
        Err(e) => {
            warn!("Skipping malformed catalog entry: {e}");
            None
        }
    }
}

fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, TransportError> {
    let envelope: JikanResponse<T> = serde_json::from_str(body)?;
    Ok(envelope.data)
}

fn parse_list(body: &str) -> Result<Vec<CatalogRecord>, TransportError> {
    let items: Vec<serde_json::Value> = parse_envelope(body)?;
    Ok(items.into_iter().filter_map(parse_record).collect())
}

fn parse_single(body: &str) -> Result<CatalogRecord, TransportError> {
    let item: serde_json::Value = parse_envelope(body)?;
    serde_json::from_value::<MalAnime>(item)
        .map(CatalogRecord::from)
        .map_err(TransportError::from)
}

#[derive(Clone)]
pub struct CatalogClient {
    transport: Arc<dyn CatalogTransport>,
    base_url: String,
    trending_limit: u32,
    search_limit: u32,
    recommendations_limit: usize,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let transport = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(transport, config))
    }

    pub fn with_transport(transport: Arc<dyn CatalogTransport>, config: &CatalogConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            trending_limit: config.trending_limit,
            search_limit: config.search_limit,
            recommendations_limit: config.recommendations_limit,
        }
    }

    /// Top currently-airing titles.
    pub async fn fetch_trending(&self) -> Vec<CatalogRecord> {
        let url = format!(
            "{}/top/anime?filter=airing&limit={}",
            self.base_url, self.trending_limit
        );
        recover(
            self.get_list(&url).await,
            Vec::new(),
            "Error fetching trending anime",
        )
    }

    /// Blank queries return nothing without touching the network.
    pub async fn search(&self, query: &str) -> Vec<CatalogRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let url = format!(
            "{}/anime?q={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            self.search_limit
        );
        recover(self.get_list(&url).await, Vec::new(), "Error searching anime")
    }

    /// `None` when the title does not exist or the request failed.
    pub async fn get_details(&self, id: AnimeId) -> Option<CatalogRecord> {
        recover(
            self.try_get_details(id).await,
            None,
            "Error fetching anime details",
        )
    }

    /// Like [`Self::get_details`], but only a 404 maps to `Ok(None)`.
    pub async fn try_get_details(
        &self,
        id: AnimeId,
    ) -> Result<Option<CatalogRecord>, TransportError> {
        let url = format!("{}/anime/{}", self.base_url, id);
        match self.transport.get(&url).await {
            Ok(body) => parse_single(&body).map(Some),
            Err(e) if e.is_not_found() => {
                debug!(%id, "Anime not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn fetch_random(&self) -> Result<CatalogRecord, TransportError> {
        let url = format!("{}/random/anime", self.base_url);
        let body = self.transport.get(&url).await?;
        parse_single(&body)
    }

    pub async fn fetch_recommendations(&self) -> Vec<Recommendation> {
        let url = format!("{}/recommendations/anime", self.base_url);
        let result = async {
            let body = self.transport.get(&url).await?;
            let items: Vec<MalRecommendation> = parse_envelope(&body)?;
            Ok::<_, TransportError>(
                items
                    .into_iter()
                    .take(self.recommendations_limit)
                    .map(|r| Recommendation {
                        id: r.mal_id,
                        entries: r.entry.into_iter().filter_map(parse_record).collect(),
                        content: r.content,
                    })
                    .collect::<Vec<_>>(),
            )
        }
        .await;

        recover(result, Vec::new(), "Error fetching anime recommendations")
    }

    async fn get_list(&self, url: &str) -> Result<Vec<CatalogRecord>, TransportError> {
        let body = self.transport.get(url).await?;
        parse_list(&body)
    }
}
