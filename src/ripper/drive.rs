//! Drive capability probe.
//!
//! Adapter boundary around `system_profiler`: the subprocess call lives in
//! `probe`, the fragile text scan in `parse_profile`. Probe failure is never
//! fatal; the conservative defaults in `DriveInfo::default` apply.

use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::config::DriveSettings;
use crate::metadata::DriveInfo;

/// Known vendor read-offset corrections, in samples.
const VENDOR_OFFSETS: &[(&str, i32)] = &[("PLEXTOR", 30), ("PIONEER", 6), ("LITE-ON", 6)];

fn firmware_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Firmware Revision:\s*(\S+)").unwrap())
}

/// Best-effort detection of the drive's capabilities.
///
/// With `auto_detect` off, the configured values are trusted verbatim.
pub fn probe(settings: &DriveSettings) -> DriveInfo {
    if !settings.auto_detect {
        return DriveInfo {
            read_offset: settings.read_offset,
            c2_support: settings.supports_c2,
            accurate_stream: settings.supports_accurate_stream,
            ..DriveInfo::default()
        };
    }

    let output = Command::new("system_profiler")
        .arg("SPDiscBurningDataType")
        .output();

    match output {
        Ok(out) if out.status.success() => {
            parse_profile(&String::from_utf8_lossy(&out.stdout))
        }
        Ok(out) => {
            warn!(
                "could not detect drive info: system_profiler exited with {}",
                out.status
            );
            DriveInfo::default()
        }
        Err(e) => {
            warn!("could not detect drive info: {e}");
            DriveInfo::default()
        }
    }
}

/// Scan profiler output for a known vendor and its offset table entry.
pub(super) fn parse_profile(text: &str) -> DriveInfo {
    let mut info = DriveInfo::default();

    for (vendor, offset) in VENDOR_OFFSETS {
        if text.contains(vendor) {
            info.manufacturer = (*vendor).to_string();
            info.read_offset = *offset;
            break;
        }
    }

    if let Some(caps) = firmware_re().captures(text) {
        info.firmware = Some(caps[1].to_string());
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognizes_plextor_offset() {
        let text = "Disc Burning:\n\n    PLEXTOR PX-W5224A:\n\n      Firmware Revision: 1.04\n";
        let info = parse_profile(text);
        assert_eq!(info.manufacturer, "PLEXTOR");
        assert_eq!(info.read_offset, 30);
        assert_eq!(info.firmware.as_deref(), Some("1.04"));
    }

    #[test]
    fn parse_falls_back_to_conservative_defaults() {
        let info = parse_profile("Disc Burning:\n\n    SOMEBRAND XYZ-1:\n");
        assert_eq!(info.manufacturer, "Unknown");
        assert_eq!(info.read_offset, 0);
        assert!(info.c2_support);
        assert!(info.accurate_stream);
    }

    #[test]
    fn manual_settings_bypass_the_probe() {
        let settings = DriveSettings {
            auto_detect: false,
            read_offset: 12,
            supports_c2: false,
            supports_accurate_stream: true,
            ..DriveSettings::default()
        };
        let info = probe(&settings);
        assert_eq!(info.read_offset, 12);
        assert!(!info.c2_support);
        assert!(info.accurate_stream);
    }
}
