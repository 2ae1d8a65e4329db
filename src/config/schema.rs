use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `~/.rip-cd.yaml`.
///
/// File format: YAML
///
/// Precedence (highest wins):
/// 1) `--workspace` CLI override (base directory only)
/// 2) Environment variables (prefix `RIPCD__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
///
/// Every field has a safe default, so the tool is usable with zero
/// configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub workspace: WorkspaceSettings,
    pub ripper: RipperSettings,
    pub output: OutputSettings,
    pub integrations: IntegrationSettings,
    pub drive: DriveSettings,
    pub matrix: MatrixSettings,

    /// Derived filesystem paths, computed once after merging. Never read from
    /// or written to the config file.
    #[serde(skip)]
    pub paths: Paths,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workspace: WorkspaceSettings::default(),
            ripper: RipperSettings::default(),
            output: OutputSettings::default(),
            integrations: IntegrationSettings::default(),
            drive: DriveSettings::default(),
            matrix: MatrixSettings::default(),
            paths: Paths::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Base directory for all ripping operations. `~` is expanded.
    pub base_dir: PathBuf,
    /// Whether to create the workspace subdirectories automatically.
    pub auto_create_dirs: bool,
    /// Subdirectory names within the workspace.
    pub dir_structure: DirStructure,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("~/cd_ripping"),
            auto_create_dirs: true,
            dir_structure: DirStructure::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DirStructure {
    pub metadata: String,
    pub schemas: String,
    pub output: String,
    pub logs: String,
    pub temp: String,
}

impl Default for DirStructure {
    fn default() -> Self {
        Self {
            metadata: "metadata".to_string(),
            schemas: "schemas".to_string(),
            output: "output".to_string(),
            logs: "logs".to_string(),
            temp: "temp".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RipperSettings {
    /// Ripping engine to use (`xld` or `cdparanoia`).
    pub engine: String,
    pub xld: XldSettings,
    pub quality: QualitySettings,
}

impl Default for RipperSettings {
    fn default() -> Self {
        Self {
            engine: "xld".to_string(),
            xld: XldSettings::default(),
            quality: QualitySettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct XldSettings {
    /// XLD profile name.
    pub profile: String,
    /// Path to the executable. Empty means resolve from PATH.
    pub executable_path: String,
    /// Extra arguments appended verbatim to the command line.
    pub extra_args: Vec<String>,
}

impl Default for XldSettings {
    fn default() -> Self {
        Self {
            profile: "flac_rip".to_string(),
            executable_path: String::new(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QualitySettings {
    /// Output format (`flac` or `mp3`).
    pub format: String,
    /// FLAC compression level (0-8).
    pub compression: u8,
    /// Verify after ripping.
    pub verify: bool,
    /// Error correction attempts passed to the ripper.
    pub error_correction: u32,
    /// Hardware-level C2 error correction, when the drive supports it.
    pub c2_error_correction: bool,
    /// Maximum retry attempts for bad sectors.
    pub max_retry_attempts: u32,
    /// Secure ripping mode (slowest, most accurate).
    pub secure_ripping: bool,
    /// Test & Copy dual-pass mode.
    pub test_and_copy: bool,
    pub accurate_rip: AccurateRipSettings,
    pub spectrograms: SpectrogramSettings,
    pub logging: RipLogSettings,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            format: "flac".to_string(),
            compression: 8,
            verify: true,
            error_correction: 10,
            c2_error_correction: true,
            max_retry_attempts: 20,
            secure_ripping: true,
            test_and_copy: true,
            accurate_rip: AccurateRipSettings::default(),
            spectrograms: SpectrogramSettings::default(),
            logging: RipLogSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccurateRipSettings {
    pub enabled: bool,
    /// Fail the rip when no database match is found.
    pub require_match: bool,
    /// Minimum number of matching submissions to count as verified.
    pub min_confidence: u32,
}

impl Default for AccurateRipSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            require_match: false,
            min_confidence: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpectrogramSettings {
    /// Generate spectrograms at all (requires sox).
    pub enabled: bool,
    /// One image per track.
    pub generate_all: bool,
    /// A single representative (middle) track only.
    pub generate_sample: bool,
    /// Image width in pixels passed to sox (`-x`).
    pub resolution: u32,
    pub format: String,
}

impl Default for SpectrogramSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            generate_all: false,
            generate_sample: true,
            resolution: 2048,
            format: "png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RipLogSettings {
    /// Produce an EAC-style archival log.
    pub eac_style: bool,
    /// Include drive information in the log.
    pub drive_info: bool,
    /// Write the log to `rip.log` next to the audio files.
    pub save_logs: bool,
}

impl Default for RipLogSettings {
    fn default() -> Self {
        Self {
            eac_style: true,
            drive_info: true,
            save_logs: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Template for track filenames. Variables: `{{Number}}`, `{{Title}}`.
    pub filename_template: String,
    /// Template for the album directory. Variables: `{{Artist}}`, `{{Album}}`,
    /// `{{Year}}`, `{{Date}}`, `{{Label}}`.
    pub dir_template: String,
    /// Strip characters that are invalid in filenames.
    pub sanitize_filenames: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            filename_template: "{{Number}} - {{Title}}".to_string(),
            dir_template: "{{Artist}} - {{Album}} ({{Year}})".to_string(),
            sanitize_filenames: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IntegrationSettings {
    pub musicbrainz: MusicBrainzSettings,
    pub beets: BeetsSettings,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            musicbrainz: MusicBrainzSettings::default(),
            beets: BeetsSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MusicBrainzSettings {
    pub enabled: bool,
    pub server_url: String,
    /// Requests per second.
    pub rate_limit: f64,
    pub user_agent: String,
}

impl Default for MusicBrainzSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            server_url: "https://musicbrainz.org/ws/2".to_string(),
            rate_limit: 1.0,
            user_agent: format!("rip-cd/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BeetsSettings {
    pub enabled: bool,
    /// Path to the beets executable. Empty means resolve `beet` from PATH.
    pub executable_path: String,
    /// Path to a beets config file. Empty means beets' own default.
    pub config_path: String,
    /// Import the output directory after a successful rip.
    pub auto_import: bool,
}

impl Default for BeetsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            executable_path: String::new(),
            config_path: String::new(),
            auto_import: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DriveSettings {
    /// Probe drive capabilities instead of trusting the values below.
    pub auto_detect: bool,
    /// Specific device path. Empty means let the ripper pick.
    pub device_path: String,
    /// Read offset correction in samples.
    pub read_offset: i32,
    pub supports_c2: bool,
    pub supports_accurate_stream: bool,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            auto_detect: true,
            device_path: String::new(),
            read_offset: 0,
            supports_c2: true,
            supports_accurate_stream: true,
        }
    }
}

/// Matrix/runout identifiers found etched in the dead wax. Recorded in the
/// archival log when present.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatrixSettings {
    pub enabled: bool,
    pub side_a: String,
    pub side_b: String,
    pub mould_sid: String,
    pub ifpi_codes: Vec<String>,
}

impl Default for MatrixSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            side_a: String::new(),
            side_b: String::new(),
            mould_sid: String::new(),
            ifpi_codes: Vec::new(),
        }
    }
}

/// Derived directories under the workspace base. Computed by
/// `Settings::load`, never persisted.
#[derive(Debug, Clone, Default)]
pub struct Paths {
    pub workspace: PathBuf,
    pub metadata: PathBuf,
    pub schemas: PathBuf,
    pub output: PathBuf,
    pub logs: PathBuf,
    pub temp: PathBuf,
}
