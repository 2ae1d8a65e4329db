use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::config::Settings;
use crate::error::{Error, Result};

use super::model::{CdMetadata, VALID_PACKAGING};
use super::parse::parse;

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}(-\d{2})?(-\d{2})?$").unwrap())
}

fn barcode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{12,14}$").unwrap())
}

fn country_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2}$").unwrap())
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?$").unwrap())
}

fn isrc_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2}[A-Z0-9]{3}\d{7}$").unwrap())
}

/// Parse a metadata file and check the business rules on top of the
/// structural ones. This is the `validate` subcommand.
pub fn validate(_cfg: &Settings, path: &Path) -> Result<()> {
    info!("validating metadata file: {}", path.display());
    let meta = parse(path)?;
    check_rules(&meta)?;
    info!("metadata validation passed");
    Ok(())
}

/// Field-format rules. Each mismatch names the offending field and value.
pub(crate) fn check_rules(meta: &CdMetadata) -> Result<()> {
    let album = &meta.album;

    if let Some(date) = non_empty(album.date.as_deref()) {
        if !date_re().is_match(date) {
            return Err(Error::Validation(format!(
                "invalid date format: {date} (use YYYY, YYYY-MM, or YYYY-MM-DD)"
            )));
        }
    }

    if let Some(barcode) = non_empty(album.barcode.as_deref()) {
        if !barcode_re().is_match(barcode) {
            return Err(Error::Validation(format!(
                "invalid barcode format: {barcode} (must be 12-14 digits)"
            )));
        }
    }

    if let Some(country) = non_empty(album.country.as_deref()) {
        if !country_re().is_match(country) {
            return Err(Error::Validation(format!(
                "invalid country code: {country} (must be 2-letter ISO 3166-1 alpha-2)"
            )));
        }
    }

    if let Some(total) = non_empty(album.total_time.as_deref()) {
        if !time_re().is_match(total) {
            return Err(Error::Validation(format!(
                "invalid total time format: {total} (use MM:SS or HH:MM:SS)"
            )));
        }
    }

    if let Some(packaging) = non_empty(album.packaging.as_deref()) {
        if !VALID_PACKAGING.contains(&packaging) {
            return Err(Error::Validation(format!(
                "invalid packaging: {packaging} (valid options: {})",
                VALID_PACKAGING.join(", ")
            )));
        }
    }

    for track in &meta.tracks {
        if track.number < 1 || track.number > 99 {
            return Err(Error::Validation(format!(
                "track {}: track number must be between 1 and 99",
                track.number
            )));
        }

        if let Some(length) = non_empty(track.length.as_deref()) {
            if !time_re().is_match(length) {
                return Err(Error::Validation(format!(
                    "track {}: invalid length format: {length} (use MM:SS)",
                    track.number
                )));
            }
        }

        if let Some(isrc) = non_empty(track.isrc.as_deref()) {
            if !isrc_re().is_match(isrc) {
                return Err(Error::Validation(format!(
                    "track {}: invalid ISRC format: {isrc}",
                    track.number
                )));
            }
        }
    }

    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
