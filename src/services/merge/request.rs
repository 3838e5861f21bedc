use serde::Deserialize;

use crate::ports::content_provider::{ContentRef, ContentType};

pub const MIN_MERGE_SOURCES: usize = 2;

/// Rejections raised before a merge starts. Nothing has been touched on the provider yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No content provided")]
    NoContent,
    #[error("Playlist name is required")]
    MissingName,
    #[error("At least 2 items required")]
    TooFewSources,
    #[error("Too many items: at most {max} can be merged")]
    TooManySources { max: usize },
    #[error("Got {ids} content ids but {types} content types")]
    LengthMismatch { ids: usize, types: usize },
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),
}

/// Body of a merge request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    #[serde(default)]
    pub content_ids: Vec<String>,
    #[serde(default)]
    pub content_types: Vec<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub keep_it_tidy: bool,
}

impl MergeRequest {
    /// Checks the request and pairs ids with their types, preserving order.
    pub fn validate(&self, max_sources: usize) -> Result<Vec<ContentRef>, ValidationError> {
        if self.content_ids.is_empty() {
            return Err(ValidationError::NoContent);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.content_ids.len() < MIN_MERGE_SOURCES {
            return Err(ValidationError::TooFewSources);
        }
        if self.content_ids.len() != self.content_types.len() {
            return Err(ValidationError::LengthMismatch {
                ids: self.content_ids.len(),
                types: self.content_types.len(),
            });
        }
        if self.content_ids.len() > max_sources {
            return Err(ValidationError::TooManySources { max: max_sources });
        }

        self.content_ids
            .iter()
            .zip(&self.content_types)
            .map(|(id, kind)| {
                let kind = kind
                    .parse::<ContentType>()
                    .map_err(|e| ValidationError::UnknownContentType(e.0))?;
                Ok(ContentRef::new(id.clone(), kind))
            })
            .collect()
    }

    /// The name the new playlist gets, trimmed.
    pub fn playlist_name(&self) -> &str {
        self.name.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(ids: &[&str], types: &[&str], name: &str) -> MergeRequest {
        MergeRequest {
            content_ids: ids.iter().map(|s| s.to_string()).collect(),
            content_types: types.iter().map(|s| s.to_string()).collect(),
            name: name.to_string(),
            keep_it_tidy: false,
        }
    }

    #[test]
    fn test_valid_request_pairs_ids_and_types() {
        let refs = request(&["p1", "a1"], &["playlist", "Album"], "Merged")
            .validate(200)
            .unwrap();

        assert_eq!(
            refs,
            vec![
                ContentRef::new("p1", ContentType::Playlist),
                ContentRef::new("a1", ContentType::Album),
            ]
        );
    }

    #[test]
    fn test_rejects_empty_content() {
        assert_eq!(
            request(&[], &[], "Merged").validate(200),
            Err(ValidationError::NoContent)
        );
    }

    #[test]
    fn test_rejects_blank_name() {
        assert_eq!(
            request(&["p1", "p2"], &["playlist", "playlist"], "   ").validate(200),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn test_rejects_single_source() {
        let err = request(&["p1"], &["playlist"], "Merged")
            .validate(200)
            .unwrap_err();
        assert_eq!(err, ValidationError::TooFewSources);
        assert_eq!(err.to_string(), "At least 2 items required");
    }

    #[test]
    fn test_rejects_length_mismatch() {
        assert_eq!(
            request(&["p1", "p2"], &["playlist"], "Merged").validate(200),
            Err(ValidationError::LengthMismatch { ids: 2, types: 1 })
        );
    }

    #[test]
    fn test_rejects_too_many_sources() {
        assert_eq!(
            request(&["p1", "p2", "p3"], &["mix", "mix", "mix"], "Merged").validate(2),
            Err(ValidationError::TooManySources { max: 2 })
        );
    }

    #[test]
    fn test_rejects_unknown_type() {
        assert_eq!(
            request(&["p1", "p2"], &["playlist", "artist"], "Merged").validate(200),
            Err(ValidationError::UnknownContentType("artist".into()))
        );
    }

    #[test]
    fn test_deserializes_camel_case_body() {
        let request: MergeRequest = serde_json::from_str(
            r#"{"contentIds":["a","b"],"contentTypes":["mix","favorites"],"name":"X","keepItTidy":true}"#,
        )
        .unwrap();

        assert!(request.keep_it_tidy);
        assert_eq!(request.content_types, ["mix", "favorites"]);
    }
}
