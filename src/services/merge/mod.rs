use std::sync::Arc;

use crate::config::MergeConfig;
use crate::ports::content_provider::{ContentProvider, ContentRef};

pub mod aggregate;
pub mod error;
pub mod job;
pub mod progress;
pub mod report;
pub mod request;

pub use aggregate::Aggregation;
pub use error::MergeError;
pub use job::{MergeEvent, MergeJob};
pub use progress::{ProgressSink, ProgressUpdate};
pub use report::{MergeResult, build_duplicate_report};
pub use request::{MergeRequest, ValidationError};

/// Limits applied by the merge engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    pub batch_size: usize,
    pub track_limit: usize,
    pub max_duplicates_returned: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            batch_size: 50,
            track_limit: 10_000,
            max_duplicates_returned: 200,
        }
    }
}

impl From<&MergeConfig> for MergeOptions {
    fn from(config: &MergeConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            track_limit: config.track_limit,
            max_duplicates_returned: config.max_duplicates_returned,
        }
    }
}

/// Merges several provider collections into one new, deduplicated playlist.
pub struct MergeService<P: ContentProvider + ?Sized> {
    provider: Arc<P>,
    options: MergeOptions,
}

impl<P: ContentProvider + ?Sized> MergeService<P> {
    pub fn new(provider: Arc<P>, options: MergeOptions) -> Self {
        Self { provider, options }
    }

    /// Runs one merge from fetch to completion.
    ///
    /// Sources are processed strictly in order; the order decides which source owns a
    /// track and drives the progress percentages. If writing tracks fails after the
    /// playlist was created, the playlist is deleted before the error is returned.
    pub async fn merge(
        &self,
        sources: &[ContentRef],
        name: &str,
        keep_it_tidy: bool,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<MergeResult, MergeError> {
        log::info!(
            "Merging {} sources into '{}' (keep_it_tidy={})",
            sources.len(),
            name,
            keep_it_tidy
        );

        let mut aggregation = Aggregation::new(keep_it_tidy);
        for (index, source) in sources.iter().enumerate() {
            progress.send(ProgressUpdate::fetching(source.kind, index, sources.len()));

            let display_name = self.display_name(source, index).await;
            let tracks = self
                .provider
                .fetch_tracks(&source.id, source.kind)
                .await
                .map_err(|cause| MergeError::Fetch {
                    kind: source.kind,
                    id: source.id.clone(),
                    cause,
                })?;
            log::debug!(
                "Fetched {} tracks from {} '{}'",
                tracks.len(),
                source.kind,
                display_name
            );

            aggregation.add_source(&display_name, &tracks);
        }

        let mut duplicates = build_duplicate_report(&aggregation);
        let total_duplicate_tracks = duplicates.len();
        duplicates.truncate(self.options.max_duplicates_returned);

        let total_fetched = aggregation.total_fetched();
        let cross_duplicates = aggregation.cross_duplicates();
        let intra_duplicates = aggregation.intra_duplicates();
        let duplicates_removed = aggregation.duplicates_removed();
        let playlist_counts = aggregation.source_counts().to_vec();

        log::info!(
            "Total fetched: {}, unique: {}, cross-playlist dupes: {}, intra-playlist dupes: {}",
            total_fetched,
            aggregation.unique_count(),
            cross_duplicates,
            intra_duplicates
        );

        let mut track_ids = aggregation.into_track_ids();
        if track_ids.is_empty() {
            return Err(MergeError::NoTracksFound);
        }

        let truncated_count = track_ids.len().saturating_sub(self.options.track_limit);
        let was_truncated = truncated_count > 0;
        if was_truncated {
            log::info!(
                "Truncated tracks from {} to {}",
                track_ids.len(),
                self.options.track_limit
            );
            track_ids.truncate(self.options.track_limit);
        }

        progress.send(ProgressUpdate::found_unique(
            track_ids.len(),
            duplicates_removed,
            intra_duplicates,
            keep_it_tidy,
        ));

        progress.send(ProgressUpdate::creating_playlist());
        let playlist = self
            .provider
            .create_playlist(name)
            .await
            .map_err(MergeError::CreatePlaylist)?;
        log::info!("Created playlist '{}' ({})", playlist.name, playlist.id);

        progress.send(ProgressUpdate::adding_tracks(track_ids.len()));
        let batch_sink = progress.clone();
        let on_batch = move |current: usize, total: usize| {
            batch_sink.send(ProgressUpdate::batch(current, total));
        };
        if let Err(cause) = self
            .provider
            .add_tracks(
                &playlist.id,
                &track_ids,
                self.options.batch_size,
                Arc::new(on_batch),
            )
            .await
        {
            log::error!(
                "Failed to add tracks, cleaning up playlist {}: {:#}",
                playlist.id,
                cause
            );
            progress.send(ProgressUpdate::cleaning_up());
            self.delete_orphaned_playlist(&playlist.id).await;
            return Err(MergeError::WriteBack {
                playlist_id: playlist.id,
                cause,
            });
        }

        progress.send(ProgressUpdate::complete());
        log::info!(
            "Merge complete: {} tracks in playlist {}",
            track_ids.len(),
            playlist.id
        );

        Ok(MergeResult {
            id: playlist.id,
            track_count: track_ids.len(),
            total_fetched,
            duplicates_removed,
            cross_playlist_duplicates: cross_duplicates,
            intra_playlist_duplicates: intra_duplicates,
            playlist_counts,
            duplicates,
            total_duplicate_tracks,
            was_truncated,
            truncated_count,
        })
    }

    /// Best-effort name lookup; a failed lookup never aborts the merge.
    async fn display_name(&self, source: &ContentRef, index: usize) -> String {
        let fallback = || format!("{} {}", source.kind.label(), index + 1);

        match self
            .provider
            .resolve_metadata(&source.id, source.kind)
            .await
        {
            Ok(metadata) => {
                log::debug!(
                    "Resolved {} {} as {:?} ({:?} tracks)",
                    source.kind,
                    metadata.id,
                    metadata.name,
                    metadata.track_count
                );
                metadata.name.unwrap_or_else(fallback)
            }
            Err(e) => {
                log::warn!(
                    "Could not resolve name of {} {}: {:#}",
                    source.kind,
                    source.id,
                    e
                );
                fallback()
            }
        }
    }

    async fn delete_orphaned_playlist(&self, playlist_id: &str) {
        match self.provider.delete_playlist(playlist_id).await {
            Ok(true) => log::info!("Deleted orphaned playlist {}", playlist_id),
            Ok(false) => log::warn!("Provider refused to delete orphaned playlist {}", playlist_id),
            Err(e) => log::error!(
                "Failed to delete orphaned playlist {}: {:#}",
                playlist_id,
                e
            ),
        }
    }
}
