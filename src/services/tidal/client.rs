use std::sync::Arc;

use color_eyre::eyre::Result;
use reqwest::Client;

use crate::ports::content_provider::{
    BatchProgress, ContentMetadata, ContentProvider, ContentSummary, ContentType, CreatedPlaylist,
    ProviderTrack,
};
use crate::tidal_rs::{TidalSession, content, playlist, tracks};

use super::{
    FAVORITES_ID, FAVORITES_NAME, album_display_name, catalog_id, favorites_summary, image_url,
    plan_batches,
};

const COVER_SIZE: u32 = 320;

pub struct TidalHttpAdapter {
    client: Client,
    session: TidalSession,
}

impl TidalHttpAdapter {
    pub fn new(session: TidalSession) -> Self {
        Self {
            client: Client::new(),
            session,
        }
    }
}

#[async_trait::async_trait]
impl ContentProvider for TidalHttpAdapter {
    async fn resolve_metadata(&self, id: &str, kind: ContentType) -> Result<ContentMetadata> {
        let raw_id = catalog_id(id, kind);
        let metadata = match kind {
            ContentType::Playlist => {
                let playlist = content::get_playlist(&self.client, &self.session, raw_id).await?;
                ContentMetadata {
                    id: id.to_string(),
                    cover_url: playlist
                        .square_image
                        .or(playlist.image)
                        .map(|uuid| image_url(&uuid, COVER_SIZE)),
                    name: playlist.title,
                    track_count: playlist.number_of_tracks,
                }
            }
            ContentType::Album => {
                let album = content::get_album(&self.client, &self.session, raw_id).await?;
                ContentMetadata {
                    id: id.to_string(),
                    name: album.title.as_deref().map(album_display_name),
                    track_count: album.number_of_tracks,
                    cover_url: album.cover.map(|uuid| image_url(&uuid, COVER_SIZE)),
                }
            }
            ContentType::Mix => {
                let mix = content::get_mix_page(&self.client, &self.session, raw_id).await?;
                ContentMetadata {
                    id: id.to_string(),
                    name: mix.title,
                    ..Default::default()
                }
            }
            ContentType::Favorites => ContentMetadata {
                id: FAVORITES_ID.to_string(),
                name: Some(FAVORITES_NAME.to_string()),
                ..Default::default()
            },
        };
        Ok(metadata)
    }

    async fn fetch_tracks(&self, id: &str, kind: ContentType) -> Result<Vec<ProviderTrack>> {
        let raw_id = catalog_id(id, kind);
        let fetched = match kind {
            ContentType::Playlist => {
                tracks::get_playlist_tracks(&self.client, &self.session, raw_id).await?
            }
            ContentType::Album => tracks::get_album_tracks(&self.client, &self.session, raw_id).await?,
            ContentType::Mix => tracks::get_mix_tracks(&self.client, &self.session, raw_id).await?,
            ContentType::Favorites => tracks::get_favorite_tracks(&self.client, &self.session).await?,
        };
        log::info!("Fetched {} tracks from {} {}", fetched.len(), kind, id);

        Ok(fetched.into_iter().map(ProviderTrack::from).collect())
    }

    async fn create_playlist(&self, name: &str) -> Result<CreatedPlaylist> {
        let created = playlist::create_playlist(&self.client, &self.session, name, "").await?;
        log::info!("Created playlist: {} - {}", created.uuid, name);

        Ok(CreatedPlaylist {
            name: created.title.unwrap_or_else(|| name.to_string()),
            id: created.uuid,
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
        batch_size: usize,
        on_batch: Arc<dyn BatchProgress>,
    ) -> Result<()> {
        if track_ids.is_empty() {
            log::warn!("No tracks to add");
            return Ok(());
        }

        let batches = plan_batches(track_ids, batch_size);
        let total_batches = batches.len();

        for (index, numeric_ids) in batches.into_iter().enumerate() {
            let current_batch = index + 1;
            on_batch.batch_started(current_batch, total_batches);

            if numeric_ids.is_empty() {
                log::warn!(
                    "Skipping batch {}/{}: no usable track ids",
                    current_batch,
                    total_batches
                );
                continue;
            }
            playlist::add_tracks_to_playlist(&self.client, &self.session, playlist_id, &numeric_ids)
                .await?;
            log::info!(
                "Added batch {}/{}: {} tracks",
                current_batch,
                total_batches,
                numeric_ids.len()
            );
        }

        Ok(())
    }

    async fn delete_playlist(&self, playlist_id: &str) -> Result<bool> {
        let deleted = playlist::delete_playlist(&self.client, &self.session, playlist_id).await?;
        if deleted {
            log::info!("Deleted playlist: {}", playlist_id);
        }
        Ok(deleted)
    }

    async fn list_user_playlists(&self) -> Result<Vec<ContentSummary>> {
        let playlists = playlist::get_user_playlists(&self.client, &self.session).await?;

        let mut summaries = Vec::with_capacity(playlists.len() + 1);
        summaries.push(favorites_summary());
        summaries.extend(playlists.into_iter().map(ContentSummary::from));
        Ok(summaries)
    }
}
