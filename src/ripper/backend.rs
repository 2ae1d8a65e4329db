//! Ripping engine backends.
//!
//! Each engine knows how to turn settings plus detected drive capabilities
//! into a command line. Engines that cannot honour a configured option log a
//! warning and continue rather than failing the rip.

use std::path::Path;

use tracing::warn;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::metadata::DriveInfo;

pub trait RipperBackend {
    /// Short engine name as it appears in configuration.
    fn name(&self) -> &'static str;

    /// Executable to look up when no explicit path is configured.
    fn default_executable(&self) -> &'static str;

    /// Configured executable path, falling back to the default name.
    fn executable(&self, cfg: &Settings) -> String {
        let configured = cfg.ripper.xld.executable_path.trim();
        if !configured.is_empty() && self.name() == "xld" {
            configured.to_string()
        } else {
            self.default_executable().to_string()
        }
    }

    /// Full argument list for ripping into `output_dir`.
    fn build_args(&self, cfg: &Settings, drive: &DriveInfo, output_dir: &Path) -> Vec<String>;

    /// Whether the command must run with `output_dir` as its working
    /// directory instead of receiving it as an argument.
    fn runs_in_output_dir(&self) -> bool {
        false
    }
}

pub fn for_engine(engine: &str) -> Result<Box<dyn RipperBackend>> {
    match engine {
        "xld" => Ok(Box::new(Xld)),
        "cdparanoia" => Ok(Box::new(Cdparanoia)),
        other => Err(Error::Config(format!(
            "unknown ripper engine '{other}' (supported: xld, cdparanoia)"
        ))),
    }
}

pub struct Xld;

impl RipperBackend for Xld {
    fn name(&self) -> &'static str {
        "xld"
    }

    fn default_executable(&self) -> &'static str {
        "xld"
    }

    fn build_args(&self, cfg: &Settings, drive: &DriveInfo, output_dir: &Path) -> Vec<String> {
        let quality = &cfg.ripper.quality;
        let mut args = vec![
            "-c".to_string(),
            cfg.ripper.xld.profile.clone(),
            "-o".to_string(),
            output_dir.display().to_string(),
        ];

        if quality.secure_ripping {
            args.push("--secure-ripper".to_string());
        }
        args.push("--cddb-skip".to_string());

        match quality.format.as_str() {
            "flac" => {
                args.push(format!("--flac-compression={}", quality.compression));
                if quality.verify {
                    args.push("--flac-verify".to_string());
                }
            }
            "mp3" => args.push("--mp3-bitrate=320".to_string()),
            other => warn!("unrecognized output format '{other}', leaving encoder at profile defaults"),
        }

        if quality.verify {
            args.push("--verify".to_string());
        }
        if quality.test_and_copy {
            args.push("--test-and-copy".to_string());
        }
        args.push(format!("--error-correction={}", quality.error_correction));
        args.push(format!("--max-retry={}", quality.max_retry_attempts));
        if quality.c2_error_correction && drive.c2_support {
            args.push("--c2-error-correction".to_string());
        }
        if drive.read_offset != 0 {
            args.push(format!("--read-offset={}", drive.read_offset));
        }
        if quality.accurate_rip.enabled {
            args.push("--accurate-rip".to_string());
        }
        if quality.logging.save_logs {
            args.push("--detailed-log".to_string());
            args.push("--log-file".to_string());
            args.push(output_dir.join("xld.log").display().to_string());
        }

        args.extend(cfg.ripper.xld.extra_args.iter().cloned());

        if !cfg.drive.device_path.is_empty() {
            args.push("-d".to_string());
            args.push(cfg.drive.device_path.clone());
        }

        args
    }
}

pub struct Cdparanoia;

impl RipperBackend for Cdparanoia {
    fn name(&self) -> &'static str {
        "cdparanoia"
    }

    fn default_executable(&self) -> &'static str {
        "cdparanoia"
    }

    fn build_args(&self, cfg: &Settings, drive: &DriveInfo, _output_dir: &Path) -> Vec<String> {
        let quality = &cfg.ripper.quality;
        let mut args = vec!["-B".to_string()];

        if !quality.secure_ripping {
            args.push("-Z".to_string());
        }
        args.push(format!("--never-skip={}", quality.max_retry_attempts));

        if quality.format != "wav" {
            warn!(
                "cdparanoia only produces WAV; ignoring configured format '{}'",
                quality.format
            );
        }
        if quality.test_and_copy {
            warn!("cdparanoia does not support test & copy, skipping");
        }
        if quality.accurate_rip.enabled {
            warn!("cdparanoia has no AccurateRip integration, skipping");
        }
        if drive.read_offset != 0 {
            args.push(format!("--sample-offset={}", drive.read_offset));
        }

        if !cfg.drive.device_path.is_empty() {
            args.push("-d".to_string());
            args.push(cfg.drive.device_path.clone());
        }

        args
    }

    fn runs_in_output_dir(&self) -> bool {
        true
    }
}
