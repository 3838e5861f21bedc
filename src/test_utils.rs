use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};

use crate::ports::content_provider::{
    BatchProgress, ContentMetadata, ContentProvider, ContentSummary, ContentType, CreatedPlaylist,
    ProviderTrack,
};
use crate::services::merge::{ProgressSink, ProgressUpdate};

pub fn track(id: &str, name: &str, artist: &str) -> ProviderTrack {
    ProviderTrack {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        artist: Some(artist.to_string()),
    }
}

/// Tracks named `Song {id}` by `Artist {id}`.
pub fn tracks(ids: &[&str]) -> Vec<ProviderTrack> {
    ids.iter()
        .map(|id| track(id, &format!("Song {}", id), &format!("Artist {}", id)))
        .collect()
}

#[derive(Default)]
pub struct RecordingProgressSink {
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl RecordingProgressSink {
    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn send(&self, update: ProgressUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}

struct ScriptedSource {
    name: Option<String>,
    tracks: Vec<ProviderTrack>,
}

/// In-memory provider that serves fixed sources and records every write.
#[derive(Default)]
pub struct ScriptedProvider {
    sources: HashMap<String, ScriptedSource>,
    fetch_delay: Option<Duration>,
    fail_on_batch: Option<usize>,
    created: Mutex<Vec<String>>,
    added: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, id: &str, name: &str, tracks: Vec<ProviderTrack>) -> Self {
        self.sources.insert(
            id.to_string(),
            ScriptedSource {
                name: Some(name.to_string()),
                tracks,
            },
        );
        self
    }

    /// A source whose metadata lookup fails.
    pub fn with_unnamed_source(mut self, id: &str, tracks: Vec<ProviderTrack>) -> Self {
        self.sources
            .insert(id.to_string(), ScriptedSource { name: None, tracks });
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Makes `add_tracks` fail when it reaches the given 1-based batch.
    pub fn failing_on_batch(mut self, batch: usize) -> Self {
        self.fail_on_batch = Some(batch);
        self
    }

    pub fn created_playlists(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn added_tracks(&self) -> Vec<String> {
        self.added.lock().unwrap().clone()
    }

    pub fn deleted_playlists(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ContentProvider for ScriptedProvider {
    async fn resolve_metadata(&self, id: &str, _kind: ContentType) -> Result<ContentMetadata> {
        let name = self
            .sources
            .get(id)
            .and_then(|source| source.name.clone())
            .ok_or_else(|| eyre!("No metadata for {}", id))?;
        Ok(ContentMetadata {
            id: id.to_string(),
            name: Some(name),
            ..Default::default()
        })
    }

    async fn fetch_tracks(&self, id: &str, _kind: ContentType) -> Result<Vec<ProviderTrack>> {
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.sources
            .get(id)
            .map(|source| source.tracks.clone())
            .ok_or_else(|| eyre!("Unknown source {}", id))
    }

    async fn create_playlist(&self, name: &str) -> Result<CreatedPlaylist> {
        let mut created = self.created.lock().unwrap();
        let id = format!("created-{}", created.len() + 1);
        created.push(id.clone());
        Ok(CreatedPlaylist {
            id,
            name: name.to_string(),
        })
    }

    async fn add_tracks(
        &self,
        _playlist_id: &str,
        track_ids: &[String],
        batch_size: usize,
        on_batch: Arc<dyn BatchProgress>,
    ) -> Result<()> {
        let batch_size = batch_size.max(1);
        let total = track_ids.len().div_ceil(batch_size);
        for (index, batch) in track_ids.chunks(batch_size).enumerate() {
            on_batch.batch_started(index + 1, total);
            if self.fail_on_batch == Some(index + 1) {
                return Err(eyre!("Batch {} rejected", index + 1));
            }
            self.added.lock().unwrap().extend(batch.iter().cloned());
        }
        Ok(())
    }

    async fn delete_playlist(&self, playlist_id: &str) -> Result<bool> {
        self.deleted.lock().unwrap().push(playlist_id.to_string());
        Ok(true)
    }

    async fn list_user_playlists(&self) -> Result<Vec<ContentSummary>> {
        let mut summaries: Vec<ContentSummary> = self
            .sources
            .iter()
            .map(|(id, source)| ContentSummary {
                id: id.clone(),
                name: source.name.clone().unwrap_or_default(),
                kind: ContentType::Playlist,
                track_count: Some(source.tracks.len() as u32),
                description: None,
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }
}
