//! Post-rip checksum verification.
//!
//! Computes a CRC32 over each produced file and records it in the
//! AccurateRip slot of the matching track. No database lookup happens;
//! `matched` and `confidence` stay at zero until a real client exists.

use std::fs::File;
use std::io::{BufReader, Read as _};
use std::path::Path;

use crc32fast::Hasher;
use tracing::{info, warn};

use crate::error::Result;
use crate::metadata::{AccurateRipResult, Track};

pub struct VerificationSummary {
    pub verified: usize,
    pub matches: usize,
}

/// Hash each file and attach the result to the track at the same sorted
/// position. Files without a corresponding track are skipped.
pub fn verify_tracks(tracks: &mut [Track], files: &[impl AsRef<Path>]) -> VerificationSummary {
    let mut summary = VerificationSummary {
        verified: 0,
        matches: 0,
    };

    for (idx, file) in files.iter().enumerate() {
        let Some(track) = tracks.get_mut(idx) else {
            warn!(
                "more audio files than tracks, ignoring {}",
                file.as_ref().display()
            );
            break;
        };
        match file_crc32(file.as_ref()) {
            Ok(crc) => {
                track.crc32 = Some(crc.clone());
                track.accurate_rip = Some(AccurateRipResult {
                    confidence: 0,
                    crc,
                    matched: false,
                    database_hits: 0,
                });
                summary.verified += 1;
            }
            Err(e) => {
                warn!("checksum failed for {}: {e}", file.as_ref().display());
            }
        }
    }

    info!(
        "verified {} of {} tracks (no database lookup performed)",
        summary.verified,
        tracks.len()
    );
    summary
}

/// Streaming CRC32 of a file's content, as 8 uppercase hex digits.
pub fn file_crc32(path: &Path) -> Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Hasher::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:08X}", hasher.finalize()))
}
