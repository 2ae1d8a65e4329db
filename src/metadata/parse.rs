use std::{fs, path::Path};

use tracing::info;

use crate::error::{Error, Result};

use super::model::CdMetadata;

/// Parse a metadata YAML file and run structural validation.
///
/// Failure is a hard error; no partial metadata is ever returned.
pub fn parse(path: &Path) -> Result<CdMetadata> {
    if !path.is_file() {
        return Err(Error::Metadata(format!(
            "metadata file not found: {}",
            path.display()
        )));
    }

    let data = fs::read_to_string(path)?;
    let meta: CdMetadata = serde_yaml::from_str(&data)?;
    validate_structure(&meta)?;

    info!(
        "parsed metadata: {} - {} ({} tracks)",
        meta.album.artist,
        meta.album.title,
        meta.tracks.len()
    );

    Ok(meta)
}

/// Structural rules: the fields without which the rip cannot even name its
/// output files. Distinct from the business rules in `validate.rs`.
pub(super) fn validate_structure(meta: &CdMetadata) -> Result<()> {
    if meta.album.title.is_empty() {
        return Err(Error::Metadata("album title is required".to_string()));
    }
    if meta.album.artist.is_empty() {
        return Err(Error::Metadata("album artist is required".to_string()));
    }
    if meta.tracks.is_empty() {
        return Err(Error::Metadata("at least one track is required".to_string()));
    }

    for (i, track) in meta.tracks.iter().enumerate() {
        if track.number == 0 {
            return Err(Error::Metadata(format!(
                "track {}: invalid track number {}",
                i + 1,
                track.number
            )));
        }
        if track.title.is_empty() {
            return Err(Error::Metadata(format!(
                "track {}: track title is required",
                track.number
            )));
        }
    }

    Ok(())
}
