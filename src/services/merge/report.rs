use serde::Serialize;

use super::aggregate::Aggregation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKind {
    Cross,
    Intra,
}

/// Where a duplicate was found: every source for cross duplicates, a `"Name (3x)"`
/// summary for intra duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AppearedIn {
    Sources(Vec<String>),
    Summary(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateRecord {
    pub name: String,
    pub artist: String,
    pub appeared_in: AppearedIn,
    #[serde(rename = "type")]
    pub kind: DuplicateKind,
}

/// Final report of a merge, serialized as the `result` of the completion event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    /// Id of the playlist that was created.
    pub id: String,
    pub track_count: usize,
    pub total_fetched: usize,
    pub duplicates_removed: usize,
    pub cross_playlist_duplicates: usize,
    pub intra_playlist_duplicates: usize,
    /// Track count of each source before dedup, in merge order.
    pub playlist_counts: Vec<usize>,
    /// Capped, sorted duplicate list.
    pub duplicates: Vec<DuplicateRecord>,
    /// Length of the duplicate list before the cap.
    pub total_duplicate_tracks: usize,
    pub was_truncated: bool,
    pub truncated_count: usize,
}

/// Builds the full, uncapped duplicate list sorted case-insensitively by track name.
///
/// Intra records are only reported in tidy mode, since otherwise the repeats stay in the
/// merged playlist.
pub fn build_duplicate_report(aggregation: &Aggregation) -> Vec<DuplicateRecord> {
    let mut records: Vec<DuplicateRecord> = aggregation
        .first_occurrences()
        .iter()
        .filter(|occurrence| occurrence.playlists.len() > 1)
        .map(|occurrence| DuplicateRecord {
            name: occurrence.name.clone(),
            artist: occurrence.artist.clone(),
            appeared_in: AppearedIn::Sources(occurrence.playlists.clone()),
            kind: DuplicateKind::Cross,
        })
        .collect();

    if aggregation.keep_it_tidy() {
        records.extend(
            aggregation
                .intra_duplicated()
                .map(|occurrence| DuplicateRecord {
                    name: occurrence.name.clone(),
                    artist: occurrence.artist.clone(),
                    appeared_in: AppearedIn::Summary(format!(
                        "{} ({}x)",
                        occurrence.playlists[0],
                        occurrence.intra_duplicates + 1
                    )),
                    kind: DuplicateKind::Intra,
                }),
        );
    }

    // Stable, so equal names keep cross-before-intra and discovery order.
    records.sort_by_cached_key(|record| record.name.to_lowercase());
    records
}
