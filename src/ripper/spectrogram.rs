//! Spectrogram generation via sox.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::config::SpectrogramSettings;

/// Generate spectrogram images for the given audio files into
/// `<output_dir>/spectrograms/`. Returns the paths of the images actually
/// written, relative to `output_dir`. Any sox failure is logged and skipped.
pub fn generate(
    settings: &SpectrogramSettings,
    output_dir: &Path,
    files: &[PathBuf],
) -> Vec<String> {
    if !settings.enabled || files.is_empty() {
        return Vec::new();
    }

    let spec_dir = output_dir.join("spectrograms");
    if let Err(e) = std::fs::create_dir_all(&spec_dir) {
        warn!("could not create {}: {e}", spec_dir.display());
        return Vec::new();
    }

    let selected: Vec<&PathBuf> = if settings.generate_all {
        files.iter().collect()
    } else if settings.generate_sample {
        // A single representative track from the middle of the disc.
        vec![&files[files.len() / 2]]
    } else {
        Vec::new()
    };

    let mut written = Vec::new();
    for file in selected {
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "track".to_string());
        let image = spec_dir.join(format!("{stem}.{}", settings.format));

        let status = Command::new("sox")
            .arg(file)
            .args(["-n", "spectrogram"])
            .args(["-x", &settings.resolution.to_string()])
            .args(["-t", &stem])
            .arg("-o")
            .arg(&image)
            .status();

        match status {
            Ok(s) if s.success() => {
                written.push(format!("spectrograms/{stem}.{}", settings.format));
            }
            Ok(s) => warn!("sox exited with {s} for {}", file.display()),
            Err(e) => {
                warn!("spectrogram skipped for {}: {e}", file.display());
                // sox is missing entirely, no point trying the rest.
                break;
            }
        }
    }

    if !written.is_empty() {
        info!("generated {} spectrogram(s)", written.len());
    }
    written
}
