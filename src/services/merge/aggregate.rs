use std::collections::{HashMap, HashSet};

use crate::ports::content_provider::ProviderTrack;

pub const UNKNOWN_TRACK_NAME: &str = "Unknown";
pub const UNKNOWN_ARTIST_NAME: &str = "Unknown Artist";

/// The earliest appearance of a track id, plus every later source it recurred in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstOccurrence {
    pub name: String,
    pub artist: String,
    /// Display names of the sources containing this track, first source first, no repeats.
    pub playlists: Vec<String>,
    /// Repeats of this id inside a single source, summed over all sources.
    pub intra_duplicates: usize,
}

/// How one incoming track was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    New,
    Cross,
    Intra,
}

/// Accumulates tracks source by source into a deduplicated sequence.
///
/// Sources must be added in merge order: the first source containing an id owns its
/// [`FirstOccurrence`], and every later source is credited as a cross duplicate.
#[derive(Debug)]
pub struct Aggregation {
    keep_it_tidy: bool,
    /// Track ids in output order. Holds intra repeats unless tidy mode is on.
    track_ids: Vec<String>,
    /// Indexed by the seen-id map, so the seen set and the first occurrences never diverge.
    first_occurrences: Vec<FirstOccurrence>,
    seen: HashMap<String, usize>,
    /// First-occurrence indices in the order their first intra repeat was found.
    intra_order: Vec<usize>,
    total_fetched: usize,
    cross_duplicates: usize,
    intra_duplicates: usize,
    source_counts: Vec<usize>,
}

impl Aggregation {
    pub fn new(keep_it_tidy: bool) -> Self {
        Self {
            keep_it_tidy,
            track_ids: Vec::new(),
            first_occurrences: Vec::new(),
            seen: HashMap::new(),
            intra_order: Vec::new(),
            total_fetched: 0,
            cross_duplicates: 0,
            intra_duplicates: 0,
            source_counts: Vec::new(),
        }
    }

    /// Folds one source's tracks in, in their original order.
    ///
    /// Tracks without an id are skipped and do not count as fetched, but they do count
    /// toward the source's own track count.
    pub fn add_source(&mut self, display_name: &str, tracks: &[ProviderTrack]) {
        self.source_counts.push(tracks.len());

        let mut in_this_source: HashSet<&str> = HashSet::new();
        for track in tracks {
            let Some(track_id) = track.id.as_deref() else {
                continue;
            };
            self.total_fetched += 1;

            let occurrence = if !in_this_source.insert(track_id) {
                Occurrence::Intra
            } else if self.seen.contains_key(track_id) {
                Occurrence::Cross
            } else {
                Occurrence::New
            };

            match occurrence {
                Occurrence::Intra => self.record_intra(track_id),
                Occurrence::Cross => self.record_cross(track_id, display_name),
                Occurrence::New => self.record_new(track_id, track, display_name),
            }
        }
    }

    fn record_new(&mut self, track_id: &str, track: &ProviderTrack, display_name: &str) {
        self.seen
            .insert(track_id.to_string(), self.first_occurrences.len());
        self.first_occurrences.push(FirstOccurrence {
            name: track
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_TRACK_NAME.to_string()),
            artist: track
                .artist
                .clone()
                .unwrap_or_else(|| UNKNOWN_ARTIST_NAME.to_string()),
            playlists: vec![display_name.to_string()],
            intra_duplicates: 0,
        });
        self.track_ids.push(track_id.to_string());
    }

    fn record_cross(&mut self, track_id: &str, display_name: &str) {
        self.cross_duplicates += 1;
        let index = self.seen[track_id];
        let occurrence = &mut self.first_occurrences[index];
        if !occurrence.playlists.iter().any(|p| p == display_name) {
            occurrence.playlists.push(display_name.to_string());
        }
    }

    fn record_intra(&mut self, track_id: &str) {
        self.intra_duplicates += 1;
        // An intra repeat was necessarily seen earlier in this same source.
        let index = self.seen[track_id];
        let occurrence = &mut self.first_occurrences[index];
        if occurrence.intra_duplicates == 0 {
            self.intra_order.push(index);
        }
        occurrence.intra_duplicates += 1;

        if !self.keep_it_tidy {
            self.track_ids.push(track_id.to_string());
        }
    }

    pub fn keep_it_tidy(&self) -> bool {
        self.keep_it_tidy
    }

    #[cfg(test)]
    pub fn track_ids(&self) -> &[String] {
        &self.track_ids
    }

    pub fn into_track_ids(self) -> Vec<String> {
        self.track_ids
    }

    pub fn first_occurrences(&self) -> &[FirstOccurrence] {
        &self.first_occurrences
    }

    #[cfg(test)]
    pub fn first_occurrence(&self, track_id: &str) -> Option<&FirstOccurrence> {
        self.seen
            .get(track_id)
            .map(|&index| &self.first_occurrences[index])
    }

    /// First occurrences with at least one intra repeat, in discovery order.
    pub fn intra_duplicated(&self) -> impl Iterator<Item = &FirstOccurrence> {
        self.intra_order
            .iter()
            .map(|&index| &self.first_occurrences[index])
    }

    pub fn unique_count(&self) -> usize {
        self.seen.len()
    }

    pub fn total_fetched(&self) -> usize {
        self.total_fetched
    }

    pub fn cross_duplicates(&self) -> usize {
        self.cross_duplicates
    }

    pub fn intra_duplicates(&self) -> usize {
        self.intra_duplicates
    }

    /// Duplicates dropped from the output. Intra repeats only count when tidy mode drops them.
    pub fn duplicates_removed(&self) -> usize {
        if self.keep_it_tidy {
            self.cross_duplicates + self.intra_duplicates
        } else {
            self.cross_duplicates
        }
    }

    pub fn source_counts(&self) -> &[usize] {
        &self.source_counts
    }
}
