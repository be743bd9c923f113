use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::AnimeId;

pub const UNKNOWN: &str = "Unknown";
pub const NOT_AVAILABLE: &str = "N/A";

/// A catalog entry as returned by the remote API, or a snapshot of one
/// stored in the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(alias = "mal_id")]
    pub id: AnimeId,
    #[serde(default = "unknown", deserialize_with = "text_or_unknown")]
    pub title: String,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<f32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub rank: Option<u32>,
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "images_either_shape")]
    pub images: ImageSet,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default, deserialize_with = "aired_either_shape")]
    pub aired: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

fn text_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown))
}

// Numbers that do not fit (negative counts, numeric strings from hand-edited
// data) degrade to "absent" instead of failing the whole record.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

// Snapshots saved straight from the remote API nest these fields; accept both
// that shape and the flattened one written by this crate.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImagesShape {
    Remote { jpg: ImageSet },
    Flat(ImageSet),
}

fn images_either_shape<'de, D>(deserializer: D) -> Result<ImageSet, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<ImagesShape>::deserialize(deserializer)? {
        Some(ImagesShape::Remote { jpg }) => jpg,
        Some(ImagesShape::Flat(images)) => images,
        None => ImageSet::default(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AiredShape {
    Text(String),
    Remote { string: Option<String> },
}

fn aired_either_shape<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<AiredShape>::deserialize(deserializer)? {
        Some(AiredShape::Text(s)) => Some(s),
        Some(AiredShape::Remote { string }) => string,
        None => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(alias = "mal_id")]
    pub id: u32,
    #[serde(default = "unknown", deserialize_with = "text_or_unknown")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

/// Entries stored in the watchlist are plain record snapshots.
pub type WatchlistEntry = CatalogRecord;

impl CatalogRecord {
    /// Minimal record with every optional field unset.
    #[must_use]
    pub fn new(id: AnimeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            title_english: None,
            score: None,
            episodes: None,
            status: None,
            rank: None,
            kind: None,
            genres: Vec::new(),
            images: ImageSet::default(),
            synopsis: None,
            aired: None,
            duration: None,
            rating: None,
        }
    }

    /// English title when the catalog has a distinct one.
    #[must_use]
    pub fn english_title(&self) -> Option<&str> {
        self.title_english
            .as_deref()
            .filter(|t| !t.is_empty() && *t != self.title)
    }

    #[must_use]
    pub fn display_score(&self) -> String {
        self.score
            .map_or_else(|| NOT_AVAILABLE.to_string(), |s| format!("{s:.2}"))
    }

    #[must_use]
    pub fn display_episodes(&self) -> String {
        self.episodes
            .map_or_else(|| "?".to_string(), |e| e.to_string())
    }

    #[must_use]
    pub fn display_status(&self) -> &str {
        self.status.as_deref().unwrap_or(UNKNOWN)
    }

    #[must_use]
    pub fn display_rank(&self) -> String {
        self.rank
            .map_or_else(|| NOT_AVAILABLE.to_string(), |r| format!("#{r}"))
    }

    #[must_use]
    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }

    /// Best available cover image, preferring the large variant.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images
            .large_image_url
            .as_deref()
            .or(self.images.image_url.as_deref())
    }
}

/// A pair of titles that users recommend together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub entries: Vec<CatalogRecord>,
    pub content: Option<String>,
}
