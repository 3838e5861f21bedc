use color_eyre::eyre::Result;
use reqwest::Client;

use super::types::{TidalItemWrapper, TidalTrack};
use super::{PAGE_SIZE, TidalSession, get_all_pages};

/// All tracks of a playlist, in playlist order.
///
/// Endpoint
/// - `GET /playlists/{uuid}/tracks?offset&limit`
pub async fn get_playlist_tracks(
    client: &Client,
    session: &TidalSession,
    playlist_id: &str,
) -> Result<Vec<TidalTrack>> {
    get_all_pages(
        client,
        session,
        &format!("playlists/{}/tracks", playlist_id),
        PAGE_SIZE,
    )
    .await
}

/// Endpoint
/// - `GET /albums/{id}/tracks?offset&limit`
pub async fn get_album_tracks(
    client: &Client,
    session: &TidalSession,
    album_id: &str,
) -> Result<Vec<TidalTrack>> {
    get_all_pages(
        client,
        session,
        &format!("albums/{}/tracks", album_id),
        PAGE_SIZE,
    )
    .await
}

/// Mix items can be videos as well; only tracks are returned.
///
/// Endpoint
/// - `GET /mixes/{id}/items?offset&limit`
pub async fn get_mix_tracks(
    client: &Client,
    session: &TidalSession,
    mix_id: &str,
) -> Result<Vec<TidalTrack>> {
    let items: Vec<TidalItemWrapper<TidalTrack>> =
        get_all_pages(client, session, &format!("mixes/{}/items", mix_id), PAGE_SIZE).await?;
    Ok(unwrap_tracks(items))
}

/// The user's favorite tracks.
///
/// Endpoint
/// - `GET /users/{userId}/favorites/tracks?offset&limit`
pub async fn get_favorite_tracks(client: &Client, session: &TidalSession) -> Result<Vec<TidalTrack>> {
    let items: Vec<TidalItemWrapper<TidalTrack>> = get_all_pages(
        client,
        session,
        &format!("users/{}/favorites/tracks", session.user_id),
        PAGE_SIZE,
    )
    .await?;
    Ok(unwrap_tracks(items))
}

fn unwrap_tracks(items: Vec<TidalItemWrapper<TidalTrack>>) -> Vec<TidalTrack> {
    items
        .into_iter()
        .filter(|wrapper| wrapper.item_type.as_deref().is_none_or(|t| t == "track"))
        .map(|wrapper| wrapper.item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_tracks_skips_videos() {
        let items: Vec<TidalItemWrapper<TidalTrack>> = serde_json::from_str(
            r#"[
                {"type": "track", "item": {"id": 1, "title": "One"}},
                {"type": "video", "item": {"id": 2, "title": "Clip"}},
                {"item": {"id": 3, "title": "Three"}}
            ]"#,
        )
        .unwrap();

        let titles: Vec<String> = unwrap_tracks(items)
            .into_iter()
            .filter_map(|t| t.title)
            .collect();
        assert_eq!(titles, ["One", "Three"]);
    }
}
