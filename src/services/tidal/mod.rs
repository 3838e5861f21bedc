pub mod client;

use crate::ports::content_provider::{ContentSummary, ContentType, ProviderTrack};
use crate::tidal_rs::{TidalPlaylist, TidalTrack};

/// Id of the pseudo playlist standing for the user's favorite tracks.
pub const FAVORITES_ID: &str = "my-favorites";
pub const FAVORITES_NAME: &str = "My Favorite Tracks";
const FAVORITES_DESCRIPTION: &str = "Your favorite tracks on TIDAL";

/// Strips the `album_` / `mix_` prefixes that listed albums and mixes carry.
pub fn catalog_id(id: &str, kind: ContentType) -> &str {
    match kind {
        ContentType::Album => id.strip_prefix("album_").unwrap_or(id),
        ContentType::Mix => id.strip_prefix("mix_").unwrap_or(id),
        ContentType::Playlist | ContentType::Favorites => id,
    }
}

pub fn album_display_name(title: &str) -> String {
    format!("{} (Album)", title)
}

/// Resource URL of a square image, from the dashed uuid Tidal hands out.
pub fn image_url(uuid: &str, size: u32) -> String {
    format!(
        "https://resources.tidal.com/images/{}/{}x{}.jpg",
        uuid.replace('-', "/"),
        size,
        size
    )
}

/// Parses track ids into the numeric form Tidal accepts. Ids that don't parse are logged and
/// dropped.
pub fn coerce_track_ids(track_ids: &[String]) -> Vec<u64> {
    track_ids
        .iter()
        .filter_map(|id| match id.trim().parse::<u64>() {
            Ok(numeric) => Some(numeric),
            Err(_) => {
                log::warn!("Could not convert track ID to int: {}", id);
                None
            }
        })
        .collect()
}

/// Splits `track_ids` into write batches of at most `batch_size`, in order.
///
/// Every chunk yields one batch even when none of its ids convert, so batch numbering stays
/// in step with the chunks. A `batch_size` of 0 is treated as 1.
pub fn plan_batches(track_ids: &[String], batch_size: usize) -> Vec<Vec<u64>> {
    track_ids
        .chunks(batch_size.max(1))
        .map(coerce_track_ids)
        .collect()
}

impl From<TidalTrack> for ProviderTrack {
    fn from(track: TidalTrack) -> Self {
        ProviderTrack {
            id: track.id_string(),
            artist: track.artist_name().map(str::to_string),
            name: track.title,
        }
    }
}

impl From<TidalPlaylist> for ContentSummary {
    fn from(playlist: TidalPlaylist) -> Self {
        ContentSummary {
            name: playlist.title.unwrap_or_default(),
            id: playlist.uuid,
            kind: ContentType::Playlist,
            track_count: playlist.number_of_tracks,
            description: playlist.description,
        }
    }
}

pub fn favorites_summary() -> ContentSummary {
    ContentSummary {
        id: FAVORITES_ID.to_string(),
        name: FAVORITES_NAME.to_string(),
        kind: ContentType::Favorites,
        track_count: None,
        description: Some(FAVORITES_DESCRIPTION.to_string()),
    }
}
