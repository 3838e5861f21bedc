use serde::Serialize;

use crate::ports::content_provider::ContentType;

/// Share of the progress bar spent fetching sources.
const FETCH_PHASE_END: f64 = 40.0;
const WRITE_PHASE_START: f64 = 70.0;
const WRITE_PHASE_SPAN: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
    pub message: String,
    /// Percentage between 0 and 100.
    pub progress: f64,
}

impl ProgressUpdate {
    pub fn new(message: impl Into<String>, progress: f64) -> Self {
        Self {
            message: message.into(),
            progress,
        }
    }

    pub fn fetching(kind: ContentType, index: usize, total: usize) -> Self {
        let progress = if total > 0 {
            (index as f64 / total as f64) * FETCH_PHASE_END
        } else {
            0.0
        };
        Self::new(
            format!("Fetching {} {} of {}...", kind.label(), index + 1, total),
            progress,
        )
    }

    pub fn found_unique(
        unique: usize,
        duplicates_removed: usize,
        intra_duplicates: usize,
        keep_it_tidy: bool,
    ) -> Self {
        let message = if duplicates_removed == 0 {
            format!("Found {} unique tracks", unique)
        } else if keep_it_tidy && intra_duplicates > 0 {
            format!(
                "Found {} unique tracks ({} duplicates removed, including {} within content)",
                unique, duplicates_removed, intra_duplicates
            )
        } else {
            format!(
                "Found {} unique tracks ({} duplicates removed)",
                unique, duplicates_removed
            )
        };
        Self::new(message, 50.0)
    }

    pub fn creating_playlist() -> Self {
        Self::new("Creating new playlist...", 60.0)
    }

    pub fn adding_tracks(count: usize) -> Self {
        Self::new(
            format!("Adding {} tracks to playlist...", count),
            WRITE_PHASE_START,
        )
    }

    pub fn batch(current: usize, total: usize) -> Self {
        let fraction = if total > 0 {
            current as f64 / total as f64
        } else {
            0.0
        };
        Self::new(
            format!("Adding tracks (batch {}/{})...", current, total),
            WRITE_PHASE_START + fraction * WRITE_PHASE_SPAN,
        )
    }

    pub fn cleaning_up() -> Self {
        Self::new("Merge failed, cleaning up...", 0.0)
    }

    pub fn complete() -> Self {
        Self::new("Complete!", 100.0)
    }
}

/// Receives progress updates in the order a merge produces them.
///
/// `send` must not block: the merge keeps running while the update is delivered.
pub trait ProgressSink: Send + Sync {
    fn send(&self, update: ProgressUpdate);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetching_progress_spans_first_forty_percent() {
        let first = ProgressUpdate::fetching(ContentType::Playlist, 0, 4);
        assert_eq!(first.message, "Fetching Playlist 1 of 4...");
        assert_eq!(first.progress, 0.0);

        let last = ProgressUpdate::fetching(ContentType::Album, 3, 4);
        assert_eq!(last.message, "Fetching Album 4 of 4...");
        assert_eq!(last.progress, 30.0);
    }

    #[test]
    fn test_found_unique_variants() {
        assert_eq!(
            ProgressUpdate::found_unique(10, 0, 0, false).message,
            "Found 10 unique tracks"
        );
        assert_eq!(
            ProgressUpdate::found_unique(10, 3, 2, false).message,
            "Found 10 unique tracks (3 duplicates removed)"
        );
        assert_eq!(
            ProgressUpdate::found_unique(10, 5, 2, true).message,
            "Found 10 unique tracks (5 duplicates removed, including 2 within content)"
        );
        assert_eq!(
            ProgressUpdate::found_unique(10, 5, 0, true).message,
            "Found 10 unique tracks (5 duplicates removed)"
        );
    }

    #[test]
    fn test_batch_progress_interpolates() {
        let half = ProgressUpdate::batch(2, 4);
        assert_eq!(half.message, "Adding tracks (batch 2/4)...");
        assert_eq!(half.progress, 82.5);
        assert_eq!(ProgressUpdate::batch(4, 4).progress, 95.0);
    }

    #[test]
    fn test_update_serializes_flat() {
        let json = serde_json::to_value(ProgressUpdate::complete()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "message": "Complete!", "progress": 100.0 })
        );
    }
}
