use serde::Deserialize;

/* ---------- Shared envelope ---------- */

/// The list envelope returned by paginated v1 endpoints.
///
/// Notes
/// - `totalNumberOfItems` is missing on some endpoints, so paging also stops on a short page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalPage<T> {
    #[serde(default)]
    pub total_number_of_items: Option<u32>,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Favorites and mix listings wrap each track in an `item` field.
#[derive(Debug, Clone, Deserialize)]
pub struct TidalItemWrapper<T> {
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    pub item: T,
}

/* ---------- Catalog objects ---------- */

#[derive(Debug, Clone, Deserialize)]
pub struct TidalArtist {
    #[serde(default)]
    pub name: Option<String>,
}

/// A track as returned by playlist, album, mix and favorites listings.
///
/// Ids are numeric on the wire but can be `null` for unavailable tracks.
#[derive(Debug, Clone, Deserialize)]
pub struct TidalTrack {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<TidalArtist>,
    #[serde(default)]
    pub artists: Vec<TidalArtist>,
}

impl TidalTrack {
    /// The id in its textual form, whether Tidal sent a number or a string.
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn artist_name(&self) -> Option<&str> {
        self.artist
            .as_ref()
            .or_else(|| self.artists.first())
            .and_then(|artist| artist.name.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalPlaylist {
    pub uuid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub number_of_tracks: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    /// Image uuids; the square one is preferred for previews.
    #[serde(default)]
    pub square_image: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalAlbum {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub number_of_tracks: Option<u32>,
    #[serde(default)]
    pub cover: Option<String>,
}

/// The page document describing a mix. Only its title is read.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidalMixPage {
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_accepts_numeric_and_missing_ids() {
        let page: TidalPage<TidalTrack> = serde_json::from_str(
            r#"{
                "limit": 100,
                "offset": 0,
                "totalNumberOfItems": 3,
                "items": [
                    {"id": 12345, "title": "One", "artist": {"name": "A"}},
                    {"id": null, "title": "Gone"},
                    {"id": "678", "title": "Three", "artists": [{"name": "B"}, {"name": "C"}]}
                ]
            }"#,
        )
        .unwrap();

        let ids: Vec<Option<String>> = page.items.iter().map(|t| t.id_string()).collect();
        assert_eq!(ids, [Some("12345".into()), None, Some("678".into())]);
        assert_eq!(page.items[0].artist_name(), Some("A"));
        assert_eq!(page.items[1].artist_name(), None);
        assert_eq!(page.items[2].artist_name(), Some("B"));
        assert_eq!(page.total_number_of_items, Some(3));
    }

    #[test]
    fn test_playlist_reads_image_uuids() {
        let playlist: TidalPlaylist = serde_json::from_str(
            r#"{"uuid": "abc", "title": "Mine", "squareImage": null, "image": "11-22"}"#,
        )
        .unwrap();
        assert_eq!(playlist.square_image, None);
        assert_eq!(playlist.image.as_deref(), Some("11-22"));
    }

    #[test]
    fn test_page_without_items_is_empty() {
        let page: TidalPage<TidalTrack> = serde_json::from_str(r#"{"limit": 100}"#).unwrap();
        assert!(page.items.is_empty());
    }
}
