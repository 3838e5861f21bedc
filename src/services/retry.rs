use std::sync::Arc;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use color_eyre::eyre::Result;

use crate::ports::content_provider::{
    BatchProgress, ContentMetadata, ContentProvider, ContentSummary, ContentType, CreatedPlaylist,
    ProviderTrack,
};

pub fn default_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(500))
        .with_max_delay(Duration::from_secs(8))
        .with_max_times(3)
}

/// Retries the read side of a provider with exponential backoff.
///
/// Writes pass straight through: replaying a batch that partially landed would add its tracks
/// twice.
pub struct RetryingProvider<P> {
    inner: P,
    backoff: ExponentialBuilder,
}

impl<P: ContentProvider> RetryingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_backoff(inner, default_backoff())
    }

    pub fn with_backoff(inner: P, backoff: ExponentialBuilder) -> Self {
        Self { inner, backoff }
    }
}

fn log_retry(operation: &'static str) -> impl FnMut(&color_eyre::Report, Duration) {
    move |err, delay| {
        log::warn!(
            "{} failed, retrying in {}: {:#}",
            operation,
            humantime::format_duration(delay),
            err
        );
    }
}

#[async_trait::async_trait]
impl<P: ContentProvider> ContentProvider for RetryingProvider<P> {
    async fn resolve_metadata(&self, id: &str, kind: ContentType) -> Result<ContentMetadata> {
        (move || self.inner.resolve_metadata(id, kind))
            .retry(self.backoff)
            .notify(log_retry("Resolving metadata"))
            .await
    }

    async fn fetch_tracks(&self, id: &str, kind: ContentType) -> Result<Vec<ProviderTrack>> {
        (move || self.inner.fetch_tracks(id, kind))
            .retry(self.backoff)
            .notify(log_retry("Fetching tracks"))
            .await
    }

    async fn create_playlist(&self, name: &str) -> Result<CreatedPlaylist> {
        self.inner.create_playlist(name).await
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
        batch_size: usize,
        on_batch: Arc<dyn BatchProgress>,
    ) -> Result<()> {
        self.inner
            .add_tracks(playlist_id, track_ids, batch_size, on_batch)
            .await
    }

    async fn delete_playlist(&self, playlist_id: &str) -> Result<bool> {
        self.inner.delete_playlist(playlist_id).await
    }

    async fn list_user_playlists(&self) -> Result<Vec<ContentSummary>> {
        (move || self.inner.list_user_playlists())
            .retry(self.backoff)
            .notify(log_retry("Listing playlists"))
            .await
    }
}
