use crate::ports::content_provider::ContentType;

/// Terminal failures of a merge. Each one reaches the client as a single error event.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("No tracks found in the selected content")]
    NoTracksFound,
    #[error("Failed to fetch tracks of {kind} {id}: {cause:#}")]
    Fetch {
        kind: ContentType,
        id: String,
        #[source]
        cause: color_eyre::Report,
    },
    #[error("Failed to create playlist: {0:#}")]
    CreatePlaylist(#[source] color_eyre::Report),
    /// Raised after the half-written playlist has been deleted (or the delete was attempted).
    #[error("Failed to add tracks to playlist: {cause:#}")]
    WriteBack {
        playlist_id: String,
        #[source]
        cause: color_eyre::Report,
    },
}
