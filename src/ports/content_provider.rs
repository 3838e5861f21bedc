use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};

/// The kinds of collections a provider can hand tracks out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Playlist,
    Album,
    Mix,
    Favorites,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Playlist => "playlist",
            ContentType::Album => "album",
            ContentType::Mix => "mix",
            ContentType::Favorites => "favorites",
        }
    }

    /// Capitalized form used in progress messages and fallback names.
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Playlist => "Playlist",
            ContentType::Album => "Album",
            ContentType::Mix => "Mix",
            ContentType::Favorites => "Favorites",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown content type: {0}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "playlist" => Ok(ContentType::Playlist),
            "album" => Ok(ContentType::Album),
            "mix" => Ok(ContentType::Mix),
            "favorites" => Ok(ContentType::Favorites),
            _ => Err(UnknownContentType(s.to_string())),
        }
    }
}

/// A reference to one source collection. Order of refs in a merge is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    pub id: String,
    pub kind: ContentType,
}

impl ContentRef {
    pub fn new(id: impl Into<String>, kind: ContentType) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Decoupled metadata of a collection. Every field the API may omit is optional.
#[derive(Debug, Clone, Default)]
pub struct ContentMetadata {
    pub id: String,
    pub name: Option<String>,
    pub track_count: Option<u32>,
    pub cover_url: Option<String>,
}

/// Decoupled representation of a track as returned by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderTrack {
    pub id: Option<String>,
    pub name: Option<String>,
    pub artist: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
}

/// A collection the current user can pick as a merge source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub track_count: Option<u32>,
    pub description: Option<String>,
}

/// Told about each write batch as `(current, total)`, 1-based, before the batch is sent.
pub trait BatchProgress: Send + Sync {
    fn batch_started(&self, current: usize, total: usize);
}

impl<F> BatchProgress for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn batch_started(&self, current: usize, total: usize) {
        self(current, total)
    }
}

/// Port trait wrapping the streaming-catalog capabilities the merge engine needs.
///
/// Implementations live in `services::tidal` (production), `services::retry` (decorator)
/// or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContentProvider: Send + Sync {
    async fn resolve_metadata(&self, id: &str, kind: ContentType) -> Result<ContentMetadata>;

    /// Returns the full collection in order; pagination is the implementation's business.
    async fn fetch_tracks(&self, id: &str, kind: ContentType) -> Result<Vec<ProviderTrack>>;

    async fn create_playlist(&self, name: &str) -> Result<CreatedPlaylist>;

    /// Appends `track_ids` in order, `batch_size` at a time. `on_batch` hears about every
    /// batch once, before that batch is submitted.
    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
        batch_size: usize,
        on_batch: Arc<dyn BatchProgress>,
    ) -> Result<()>;

    async fn delete_playlist(&self, playlist_id: &str) -> Result<bool>;

    async fn list_user_playlists(&self) -> Result<Vec<ContentSummary>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parses_case_insensitively() {
        assert_eq!("Playlist".parse::<ContentType>().unwrap(), ContentType::Playlist);
        assert_eq!(" ALBUM ".parse::<ContentType>().unwrap(), ContentType::Album);
        assert_eq!("mix".parse::<ContentType>().unwrap(), ContentType::Mix);
        assert_eq!("favorites".parse::<ContentType>().unwrap(), ContentType::Favorites);
    }

    #[test]
    fn test_content_type_rejects_unknown() {
        let err = "artist".parse::<ContentType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown content type: artist");
    }

    #[test]
    fn test_closures_report_batch_progress() {
        let seen = std::sync::Mutex::new(Vec::new());
        let on_batch = |current: usize, total: usize| seen.lock().unwrap().push((current, total));
        on_batch.batch_started(1, 2);
        on_batch.batch_started(2, 2);
        assert_eq!(*seen.lock().unwrap(), [(1, 2), (2, 2)]);
    }

    #[test]
    fn test_content_summary_serializes_type_field() {
        let summary = ContentSummary {
            id: "my-favorites".into(),
            name: "My Favorite Tracks".into(),
            kind: ContentType::Favorites,
            track_count: None,
            description: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "favorites");
        assert_eq!(json["trackCount"], serde_json::Value::Null);
    }
}
