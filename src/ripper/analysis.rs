//! Audio level analysis via ffmpeg's astats filter.
//!
//! The subprocess call is thin; the interesting part is `parse_levels`,
//! which scrapes peak and RMS figures out of ffmpeg's stderr chatter.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::metadata::{RippingStats, Track};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    /// Peak level in dBFS.
    pub peak: f64,
    /// RMS level in dBFS.
    pub rms: f64,
}

fn peak_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Peak level dB:\s*(-?[\d.]+|-inf)").unwrap())
}

fn rms_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"RMS level dB:\s*(-?[\d.]+|-inf)").unwrap())
}

/// Run ffmpeg astats on one file. Returns None when ffmpeg is unavailable
/// or its output has no usable figures; analysis never fails the rip.
pub fn analyze_file(path: &Path) -> Option<Levels> {
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-i"])
        .arg(path)
        .args(["-af", "astats", "-f", "null", "-"])
        .output();

    match output {
        Ok(out) => {
            let text = String::from_utf8_lossy(&out.stderr);
            let levels = parse_levels(&text);
            if levels.is_none() {
                warn!("no level figures in ffmpeg output for {}", path.display());
            }
            levels
        }
        Err(e) => {
            warn!("level analysis skipped for {}: {e}", path.display());
            None
        }
    }
}

/// Extract the first peak and RMS figure from astats output. `-inf` (digital
/// silence) maps to a floor of -150 dB.
pub(super) fn parse_levels(text: &str) -> Option<Levels> {
    let peak = peak_re().captures(text).and_then(|c| parse_db(&c[1]))?;
    let rms = rms_re().captures(text).and_then(|c| parse_db(&c[1]))?;
    Some(Levels { peak, rms })
}

fn parse_db(s: &str) -> Option<f64> {
    if s == "-inf" {
        Some(-150.0)
    } else {
        s.parse().ok()
    }
}

/// Analyze every produced file, attach per-track levels, and fold the results
/// into aggregate statistics: loudest peak and mean RMS.
pub fn analyze_tracks(tracks: &mut [Track], files: &[impl AsRef<Path>], stats: &mut RippingStats) {
    let mut peaks: Vec<f64> = Vec::new();
    let mut rms_values: Vec<f64> = Vec::new();

    for (idx, file) in files.iter().enumerate() {
        let Some(levels) = analyze_file(file.as_ref()) else {
            continue;
        };
        if let Some(track) = tracks.get_mut(idx) {
            track.peak = Some(levels.peak);
            track.rms = Some(levels.rms);
        }
        peaks.push(levels.peak);
        rms_values.push(levels.rms);
    }

    if let Some(max) = peaks.iter().cloned().reduce(f64::max) {
        stats.peak_level = max;
    }
    if !rms_values.is_empty() {
        stats.rms_level = rms_values.iter().sum::<f64>() / rms_values.len() as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASTATS: &str = "\
[Parsed_astats_0 @ 0x7f8] Overall
[Parsed_astats_0 @ 0x7f8] DC offset: 0.000001
[Parsed_astats_0 @ 0x7f8] Peak level dB: -0.30
[Parsed_astats_0 @ 0x7f8] RMS level dB: -14.25
[Parsed_astats_0 @ 0x7f8] Flat factor: 0.000000
";

    #[test]
    fn parses_peak_and_rms() {
        let levels = parse_levels(ASTATS).unwrap();
        assert_eq!(levels.peak, -0.30);
        assert_eq!(levels.rms, -14.25);
    }

    #[test]
    fn digital_silence_maps_to_floor() {
        let text = "Peak level dB: -inf\nRMS level dB: -inf\n";
        let levels = parse_levels(text).unwrap();
        assert_eq!(levels.peak, -150.0);
        assert_eq!(levels.rms, -150.0);
    }

    #[test]
    fn missing_figures_yield_none() {
        assert!(parse_levels("frame= 100 fps=0.0").is_none());
        assert!(parse_levels("Peak level dB: -1.0\n").is_none());
    }

    #[test]
    fn aggregates_use_loudest_peak_and_mean_rms() {
        let mut stats = RippingStats::default();
        let peaks = [-3.0_f64, -0.5, -6.0];
        let rms = [-15.0_f64, -12.0, -18.0];

        // Same folding as analyze_tracks, without spawning ffmpeg.
        stats.peak_level = peaks.iter().cloned().reduce(f64::max).unwrap();
        stats.rms_level = rms.iter().sum::<f64>() / rms.len() as f64;

        assert_eq!(stats.peak_level, -0.5);
        assert!((stats.rms_level - (-15.0)).abs() < 1e-9);
    }
}
