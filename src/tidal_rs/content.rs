use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;

use super::TidalSession;
use super::types::{TidalAlbum, TidalMixPage, TidalPlaylist};

/// Fetch playlist metadata.
///
/// Endpoint
/// - `GET /playlists/{uuid}`
pub async fn get_playlist(
    client: &Client,
    session: &TidalSession,
    playlist_id: &str,
) -> Result<TidalPlaylist> {
    let url = session.endpoint(&format!("playlists/{}", playlist_id))?;

    let res = session
        .authorize(client.get(url))
        .send()
        .await?
        .error_for_status()?
        .json::<TidalPlaylist>()
        .await
        .wrap_err("Failed to deserialize Tidal playlist")?;
    Ok(res)
}

/// Fetch album metadata.
///
/// Endpoint
/// - `GET /albums/{id}`
pub async fn get_album(client: &Client, session: &TidalSession, album_id: &str) -> Result<TidalAlbum> {
    let url = session.endpoint(&format!("albums/{}", album_id))?;

    let res = session
        .authorize(client.get(url))
        .send()
        .await?
        .error_for_status()?
        .json::<TidalAlbum>()
        .await
        .wrap_err("Failed to deserialize Tidal album")?;
    Ok(res)
}

/// Fetch the page describing a mix, which carries its title.
///
/// Endpoint
/// - `GET /pages/mix?mixId={id}`
pub async fn get_mix_page(
    client: &Client,
    session: &TidalSession,
    mix_id: &str,
) -> Result<TidalMixPage> {
    let mut url = session.endpoint("pages/mix")?;
    url.query_pairs_mut()
        .append_pair("mixId", mix_id)
        .append_pair("deviceType", "BROWSER");

    let res = session
        .authorize(client.get(url))
        .send()
        .await?
        .error_for_status()?
        .json::<TidalMixPage>()
        .await
        .wrap_err("Failed to deserialize Tidal mix page")?;
    Ok(res)
}
