//! EAC-style archival log.
//!
//! Mirrors the familiar Exact Audio Copy layout closely enough for humans
//! (and some trackers) to read at a glance, with a CRC32 self-checksum as the
//! last line. The checksum covers everything before its own line.

use chrono::Local;

use crate::config::Settings;
use crate::metadata::{CdMetadata, DriveInfo};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the full log text, checksum line included.
pub fn render(cfg: &Settings, meta: &CdMetadata, drive: &DriveInfo) -> String {
    let mut log = String::new();
    let now = Local::now().format("%d. %B %Y, %H:%M");

    log.push_str(&format!("rip-cd v{VERSION} extraction logfile from {now}\n\n"));
    log.push_str(&format!("{} / {}\n\n", meta.album.artist, meta.album.title));

    if cfg.ripper.quality.logging.drive_info {
        log.push_str(&format!(
            "Used drive  : {} {}",
            drive.manufacturer, drive.model
        ));
        if let Some(fw) = &drive.firmware {
            log.push_str(&format!("   Firmware: {fw}"));
        }
        log.push('\n');
        log.push_str(&format!(
            "Read offset correction                      : {}\n",
            drive.read_offset
        ));
        log.push_str(&format!(
            "Overread into Lead-In and Lead-Out          : No\n\
             Fill up missing offset samples with silence : Yes\n\
             C2 error correction                         : {}\n\
             Accurate stream                             : {}\n\n",
            yes_no(drive.c2_support),
            yes_no(drive.accurate_stream),
        ));
    }

    let quality = &cfg.ripper.quality;
    log.push_str(&format!(
        "Ripper                                      : {}\n\
         Read mode                                   : {}\n\
         Test & Copy                                 : {}\n\
         Error correction attempts                   : {}\n\
         Maximum retry count                         : {}\n\n",
        cfg.ripper.engine,
        if quality.secure_ripping { "Secure" } else { "Burst" },
        yes_no(quality.test_and_copy),
        quality.error_correction,
        quality.max_retry_attempts,
    ));

    if cfg.matrix.enabled {
        if let Some(matrix) = &meta.album.matrix {
            log.push_str("Matrix / runout information\n");
            if let Some(a) = &matrix.side_a {
                log.push_str(&format!("    Side A      : {a}\n"));
            }
            if let Some(b) = &matrix.side_b {
                log.push_str(&format!("    Side B      : {b}\n"));
            }
            if let Some(sid) = &matrix.mould_sid {
                log.push_str(&format!("    Mould SID   : {sid}\n"));
            }
            for code in &matrix.ifpi_codes {
                log.push_str(&format!("    IFPI        : {code}\n"));
            }
            log.push('\n');
        }
    }

    for track in &meta.tracks {
        log.push_str(&format!("Track {:2}\n", track.number));
        log.push_str(&format!("     Title : {}\n", track.title));
        if let Some(peak) = track.peak {
            log.push_str(&format!("     Peak level {peak:.1} dB\n"));
        }
        if let Some(crc) = &track.crc32 {
            log.push_str(&format!("     Copy CRC {crc}\n"));
        }
        if let Some(ar) = &track.accurate_rip {
            if ar.matched {
                log.push_str(&format!(
                    "     Accurately ripped (confidence {})  [{}]\n",
                    ar.confidence, ar.crc
                ));
            } else {
                log.push_str(&format!("     Cannot be verified  [{}]\n", ar.crc));
            }
        }
        let errs = track.read_errors.unwrap_or(0) + track.skip_errors.unwrap_or(0);
        if errs == 0 {
            log.push_str("     Copy OK\n");
        } else {
            log.push_str(&format!("     {errs} error(s) occurred\n"));
        }
        log.push('\n');
    }

    log.push_str("End of status report\n\n");
    let sum = checksum(&log);
    log.push_str(&format!("==== Log checksum {sum} ====\n"));
    log
}

/// CRC32 of the log body, 8 uppercase hex digits.
pub fn checksum(body: &str) -> String {
    format!("{:08X}", crc32fast::hash(body.as_bytes()))
}

fn yes_no(v: bool) -> &'static str {
    if v { "Yes" } else { "No" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Album, MatrixInfo, Track};

    fn meta() -> CdMetadata {
        CdMetadata {
            album: Album {
                title: "Test Album".to_string(),
                artist: "Test Artist".to_string(),
                matrix: Some(MatrixInfo {
                    side_a: Some("ABC-123-A1".to_string()),
                    ..MatrixInfo::default()
                }),
                ..Album::default()
            },
            tracks: vec![
                Track {
                    number: 1,
                    title: "One".to_string(),
                    crc32: Some("DEADBEEF".to_string()),
                    ..Track::default()
                },
                Track {
                    number: 2,
                    title: "Two".to_string(),
                    read_errors: Some(3),
                    ..Track::default()
                },
            ],
            credits: None,
            notes: None,
            ripping: None,
        }
    }

    #[test]
    fn log_carries_header_tracks_and_checksum_footer() {
        let cfg = Settings::default();
        let log = render(&cfg, &meta(), &DriveInfo::default());

        assert!(log.starts_with(&format!("rip-cd v{VERSION} extraction logfile from ")));
        assert!(log.contains("Test Artist / Test Album"));
        assert!(log.contains("Used drive  : Unknown Unknown"));
        assert!(log.contains("Read mode                                   : Secure"));
        assert!(log.contains("Side A      : ABC-123-A1"));
        assert!(log.contains("Copy CRC DEADBEEF"));
        assert!(log.contains("3 error(s) occurred"));

        let last = log.lines().last().unwrap();
        assert!(last.starts_with("==== Log checksum "));
        assert!(last.ends_with(" ===="));
        let sum = last
            .trim_start_matches("==== Log checksum ")
            .trim_end_matches(" ====");
        assert_eq!(sum.len(), 8);
        let body = log.strip_suffix(&format!("==== Log checksum {sum} ====\n")).unwrap();
        assert_eq!(checksum(body), sum);
    }

    #[test]
    fn drive_section_respects_logging_toggle() {
        let mut cfg = Settings::default();
        cfg.ripper.quality.logging.drive_info = false;
        let log = render(&cfg, &meta(), &DriveInfo::default());
        assert!(!log.contains("Used drive"));
    }

    #[test]
    fn matrix_section_respects_toggle() {
        let mut cfg = Settings::default();
        cfg.matrix.enabled = false;
        let log = render(&cfg, &meta(), &DriveInfo::default());
        assert!(!log.contains("Matrix / runout"));
    }
}
