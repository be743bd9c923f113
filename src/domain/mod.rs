//! Domain primitives shared across the catalog client and the repositories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MyAnimeList identifier of a catalog entry.
///
/// ```rust
/// use anidex::domain::AnimeId;
///
/// let id: AnimeId = "5114".parse().unwrap();
/// assert_eq!(id.value(), 5114);
/// assert_eq!(id.to_string(), "5114");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AnimeId(u32);

impl AnimeId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AnimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AnimeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<AnimeId> for u32 {
    fn from(id: AnimeId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid anime ID: '{0}'. ID must be a positive integer")]
pub struct ParseAnimeIdError(String);

impl FromStr for AnimeId {
    type Err = ParseAnimeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u32>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(ParseAnimeIdError(s.to_string())),
        }
    }
}
