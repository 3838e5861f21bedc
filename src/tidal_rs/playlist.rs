use color_eyre::eyre::{OptionExt, Result, WrapErr};
use reqwest::{Client, StatusCode, header};

use super::types::TidalPlaylist;
use super::{PAGE_SIZE, TidalSession, get_all_pages};

/// Creates an empty playlist owned by the session user.
///
/// Endpoint
/// - `POST /users/{userId}/playlists` (form: `title`, `description`)
pub async fn create_playlist(
    client: &Client,
    session: &TidalSession,
    title: &str,
    description: &str,
) -> Result<TidalPlaylist> {
    let url = session.endpoint(&format!("users/{}/playlists", session.user_id))?;

    let res = session
        .authorize(client.post(url))
        .form(&[("title", title), ("description", description)])
        .send()
        .await?
        .error_for_status()?
        .json::<TidalPlaylist>()
        .await
        .wrap_err("Failed to deserialize create playlist response")?;
    Ok(res)
}

/// The playlist's current ETag. Tidal rejects edits that don't present it.
pub async fn get_playlist_etag(
    client: &Client,
    session: &TidalSession,
    playlist_id: &str,
) -> Result<String> {
    let url = session.endpoint(&format!("playlists/{}", playlist_id))?;

    let res = session
        .authorize(client.get(url))
        .send()
        .await?
        .error_for_status()?;

    res.headers()
        .get(header::ETAG)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_eyre("Tidal playlist response had no ETag")
}

/// Appends tracks to the end of a playlist in one request.
///
/// Endpoint
/// - `POST /playlists/{uuid}/items` (form: `trackIds`, `onDupes=ADD`) with `If-None-Match`
pub async fn add_tracks_to_playlist(
    client: &Client,
    session: &TidalSession,
    playlist_id: &str,
    track_ids: &[u64],
) -> Result<()> {
    let etag = get_playlist_etag(client, session, playlist_id).await?;
    let url = session.endpoint(&format!("playlists/{}/items", playlist_id))?;

    session
        .authorize(client.post(url))
        .header(header::IF_NONE_MATCH, etag)
        .form(&[
            ("trackIds", join_track_ids(track_ids).as_str()),
            ("onDupes", "ADD"),
            ("onArtifactNotFound", "SKIP"),
        ])
        .send()
        .await?
        .error_for_status()
        .wrap_err("Failed to add tracks to playlist")?;

    Ok(())
}

/// Deletes a playlist. Returns `false` when it did not exist.
///
/// Endpoint
/// - `DELETE /playlists/{uuid}`
pub async fn delete_playlist(
    client: &Client,
    session: &TidalSession,
    playlist_id: &str,
) -> Result<bool> {
    let url = session.endpoint(&format!("playlists/{}", playlist_id))?;

    let res = session.authorize(client.delete(url)).send().await?;
    if res.status() == StatusCode::NOT_FOUND {
        return Ok(false);
    }
    res.error_for_status()
        .wrap_err("Failed to delete playlist")?;

    Ok(true)
}

/// Endpoint
/// - `GET /users/{userId}/playlists?offset&limit`
pub async fn get_user_playlists(client: &Client, session: &TidalSession) -> Result<Vec<TidalPlaylist>> {
    get_all_pages(
        client,
        session,
        &format!("users/{}/playlists", session.user_id),
        PAGE_SIZE,
    )
    .await
}

pub fn join_track_ids(track_ids: &[u64]) -> String {
    track_ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_track_ids() {
        assert_eq!(join_track_ids(&[1, 22, 333]), "1,22,333");
        assert_eq!(join_track_ids(&[]), "");
    }
}
