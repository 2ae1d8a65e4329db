use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{Error, Result};

use super::model::{CdMetadata, VALID_PACKAGING};

pub const SCHEMA_FILENAME: &str = "cd-metadata-schema.json";

/// Write a sample metadata file to `<metadata dir>/template.yaml`.
///
/// Also generates the JSON schema so editors pick up completion from the
/// yaml-language-server header; a schema failure is only a warning.
pub fn generate_template(cfg: &Settings, overwrite: bool) -> Result<PathBuf> {
    if let Err(e) = generate_schema(cfg, overwrite) {
        warn!("failed to auto-generate schema: {e}");
    }

    let path = cfg.paths.metadata.join("template.yaml");
    if path.exists() && !overwrite {
        return Err(Error::AlreadyExists(path));
    }

    // Sibling directory under the workspace, so a relative path is stable.
    let schema_rel = format!(
        "../{}/{}",
        cfg.workspace.dir_structure.schemas, SCHEMA_FILENAME
    );

    let mut out = String::new();
    out.push_str(&format!(
        "# yaml-language-server: $schema={schema_rel}\n"
    ));
    out.push_str("# CD metadata template\n");
    out.push_str("# Edit this file with your album information.\n");
    out.push_str("# Use 'rip-cd validate' to check your metadata before ripping.\n\n");
    out.push_str(&serde_yaml::to_string(&CdMetadata::sample())?);

    fs::write(&path, out)?;

    info!("template generated: {}", path.display());
    info!("edit it with your album information, then run:");
    info!("  rip-cd validate {}", path.display());
    info!("  rip-cd rip {}", path.display());
    Ok(path)
}

/// Write the draft-07 JSON schema to `<schemas dir>/cd-metadata-schema.json`.
///
/// The schema exists for editor tooling only; the internal validator in
/// `validate.rs` is hand-written and is the one that counts.
pub fn generate_schema(cfg: &Settings, overwrite: bool) -> Result<PathBuf> {
    let path = cfg.paths.schemas.join(SCHEMA_FILENAME);
    if path.exists() && !overwrite {
        return Err(Error::AlreadyExists(path));
    }

    let schema = build_schema();
    fs::write(&path, serde_json::to_string_pretty(&schema)?)?;

    info!("schema generated: {}", path.display());
    Ok(path)
}

fn string_or_list() -> serde_json::Value {
    json!({
        "oneOf": [
            { "type": "string" },
            { "type": "array", "items": { "type": "string" } }
        ]
    })
}

pub(super) fn build_schema() -> serde_json::Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "CD Metadata Schema",
        "description": "Schema for CD ripping metadata files",
        "type": "object",
        "required": ["album", "tracks"],
        "properties": {
            "album": {
                "type": "object",
                "required": ["title", "artist"],
                "properties": {
                    "title": { "type": "string", "minLength": 1 },
                    "artist": { "type": "string", "minLength": 1 },
                    "date": { "type": "string", "pattern": "^\\d{4}(-\\d{2})?(-\\d{2})?$" },
                    "label": { "type": "string" },
                    "catalog_number": { "type": "string" },
                    "barcode": { "type": "string", "pattern": "^\\d{12,14}$" },
                    "genre": { "type": "string" },
                    "country": { "type": "string", "pattern": "^[A-Z]{2}$" },
                    "disambiguation": { "type": "string" },
                    "total_time": { "type": "string", "pattern": "^\\d{1,2}:\\d{2}(:\\d{2})?$" },
                    "packaging": { "type": "string", "enum": VALID_PACKAGING },
                    "pressing_plant": { "type": "string" },
                    "media_type": { "type": "string" },
                    "edition": { "type": "string" },
                    "asin": { "type": "string" },
                    "musicbrainz_id": { "type": "string" },
                    "discogs_id": { "type": "string" },
                    "matrix": {
                        "type": "object",
                        "properties": {
                            "side_a": { "type": "string" },
                            "side_b": { "type": "string" },
                            "mould_sid": { "type": "string" },
                            "mastering_code": { "type": "string" },
                            "ifpi_codes": { "type": "array", "items": { "type": "string" } }
                        }
                    }
                }
            },
            "tracks": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": ["number", "title"],
                    "properties": {
                        "number": { "type": "integer", "minimum": 1, "maximum": 99 },
                        "title": { "type": "string", "minLength": 1 },
                        "artist": { "type": "string" },
                        "length": { "type": "string", "pattern": "^\\d{1,2}:\\d{2}(:\\d{2})?$" },
                        "isrc": { "type": "string", "pattern": "^[A-Z]{2}[A-Z0-9]{3}\\d{7}$" },
                        "peak": { "type": "number" },
                        "rms": { "type": "number" },
                        "crc32": { "type": "string" },
                        "read_errors": { "type": "integer", "minimum": 0 },
                        "skip_errors": { "type": "integer", "minimum": 0 },
                        "test_crc": { "type": "string" },
                        "copy_crc": { "type": "string" },
                        "accurate_rip": {
                            "type": "object",
                            "properties": {
                                "confidence": { "type": "integer", "minimum": 0 },
                                "crc": { "type": "string" },
                                "matched": { "type": "boolean" },
                                "database_hits": { "type": "integer", "minimum": 0 }
                            }
                        }
                    }
                }
            },
            "credits": {
                "type": "object",
                "properties": {
                    "producer": string_or_list(),
                    "engineer": string_or_list(),
                    "mastered_by": string_or_list(),
                    "mixed_by": string_or_list(),
                    "recorded_at": { "type": "string" }
                }
            },
            "notes": { "type": "string" },
            "ripping": {
                "type": "object",
                "properties": {
                    "drive": { "type": "string" },
                    "ripper": { "type": "string" },
                    "date": { "type": "string" },
                    "checksum": { "type": "string" },
                    "log": { "type": "string" },
                    "spectrograms": { "type": "array", "items": { "type": "string" } },
                    "drive_info": {
                        "type": "object",
                        "properties": {
                            "manufacturer": { "type": "string" },
                            "model": { "type": "string" },
                            "firmware": { "type": "string" },
                            "read_offset": { "type": "integer" },
                            "c2_support": { "type": "boolean" },
                            "accurate_stream": { "type": "boolean" }
                        }
                    },
                    "settings": {
                        "type": "object",
                        "properties": {
                            "secure_mode": { "type": "boolean" },
                            "c2_error_correction": { "type": "boolean" },
                            "test_and_copy": { "type": "boolean" },
                            "accurate_rip": { "type": "boolean" },
                            "max_retries": { "type": "integer" },
                            "compression_level": { "type": "integer" }
                        }
                    },
                    "stats": {
                        "type": "object",
                        "properties": {
                            "total_time": { "type": "string" },
                            "total_tracks": { "type": "integer" },
                            "tracks_with_errors": { "type": "integer" },
                            "total_errors": { "type": "integer" },
                            "accurate_rip_matches": { "type": "integer" },
                            "peak_level": { "type": "number" },
                            "rms_level": { "type": "number" }
                        }
                    }
                }
            }
        }
    })
}
