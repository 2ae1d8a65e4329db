use serde::{Deserialize, Serialize};

/// Complete metadata for one CD: the album, its ordered tracks, optional
/// credits and notes, and (after a rip) the ripping record.
///
/// The same value is parsed from the user's YAML file, enriched in place by
/// the orchestrator, and serialized back out next to the audio files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdMetadata {
    pub album: Album,
    pub tracks: Vec<Track>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ripping: Option<Ripping>,
}

/// Album-level metadata. Title and artist are the identity fields; everything
/// else is optional enrichment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Album {
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<MatrixInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressing_plant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub musicbrainz_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discogs_id: Option<String>,
}

/// One track. Number and title are mandatory; the quality fields are only
/// populated after ripping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    pub number: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isrc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accurate_rip: Option<AccurateRipResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crc32: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_errors: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_errors: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_crc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_crc: Option<String>,
}

/// A credit that may name one person or several.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Production credits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineer: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastered_by: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixed_by: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

/// Matrix/runout identifiers etched in the dead wax.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatrixInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_b: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mould_sid: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ifpi_codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastering_code: Option<String>,
}

/// The ripping record, written by the orchestrator after a successful rip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ripping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ripper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_info: Option<DriveInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<RippingSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<RippingStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spectrograms: Vec<String>,
}

/// Capabilities and identity of the drive that performed the rip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveInfo {
    pub manufacturer: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,
    pub read_offset: i32,
    pub c2_support: bool,
    pub accurate_stream: bool,
}

impl Default for DriveInfo {
    /// Conservative capability set used when the probe fails.
    fn default() -> Self {
        Self {
            manufacturer: "Unknown".to_string(),
            model: "Unknown".to_string(),
            firmware: None,
            read_offset: 0,
            c2_support: true,
            accurate_stream: true,
        }
    }
}

/// Snapshot of the quality settings the rip actually used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RippingSettings {
    pub secure_mode: bool,
    pub c2_error_correction: bool,
    pub test_and_copy: bool,
    pub accurate_rip: bool,
    pub max_retries: u32,
    pub compression_level: u8,
}

/// Aggregate statistics over all ripped tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RippingStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    pub total_tracks: usize,
    #[serde(default)]
    pub tracks_with_errors: usize,
    #[serde(default)]
    pub total_errors: usize,
    #[serde(default)]
    pub accurate_rip_matches: usize,
    /// Highest peak level across tracks, in dBFS.
    #[serde(default)]
    pub peak_level: f64,
    /// Mean RMS level across tracks, in dBFS.
    #[serde(default)]
    pub rms_level: f64,
}

/// AccurateRip verification result for one track.
///
/// This tool never queries the AccurateRip database: `crc` is a CRC32 of the
/// produced file's content, and `matched`/`confidence` stay at their zero
/// values. The shape is kept so a future real lookup slots in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccurateRipResult {
    pub confidence: u32,
    pub crc: String,
    pub matched: bool,
    pub database_hits: u32,
}

/// Valid values for `album.packaging`.
pub const VALID_PACKAGING: &[&str] = &[
    "Jewel Case",
    "Digipak",
    "Cardboard Sleeve",
    "Gatefold Cover",
    "Other",
];

impl CdMetadata {
    /// Canned example used by `generate template`.
    pub fn sample() -> Self {
        Self {
            album: Album {
                title: "Album Title Here".to_string(),
                artist: "Artist Name Here".to_string(),
                date: Some("2023".to_string()),
                label: Some("Record Label".to_string()),
                catalog_number: Some("CAT-123".to_string()),
                barcode: Some("123456789012".to_string()),
                genre: Some("Genre".to_string()),
                country: Some("US".to_string()),
                disambiguation: None,
                total_time: Some("45:30".to_string()),
                packaging: Some("Jewel Case".to_string()),
                matrix: Some(MatrixInfo {
                    side_a: Some("MATRIX-A1".to_string()),
                    side_b: None,
                    mould_sid: Some("IFPI L123".to_string()),
                    ifpi_codes: vec!["IFPI 1234".to_string()],
                    mastering_code: None,
                }),
                pressing_plant: Some("Pressing Plant Name".to_string()),
                media_type: Some("CD".to_string()),
                edition: Some("First Press".to_string()),
                asin: Some("B000ABCDEF".to_string()),
                musicbrainz_id: Some("12345678-1234-1234-1234-123456789012".to_string()),
                discogs_id: Some("123456".to_string()),
            },
            tracks: vec![
                Track {
                    number: 1,
                    title: "First Track Title".to_string(),
                    artist: Some("Track Artist".to_string()),
                    length: Some("3:45".to_string()),
                    isrc: Some("USRC11234567".to_string()),
                    ..Track::default()
                },
                Track {
                    number: 2,
                    title: "Second Track Title".to_string(),
                    length: Some("4:20".to_string()),
                    ..Track::default()
                },
            ],
            credits: Some(Credits {
                producer: Some(OneOrMany::One("Producer Name".to_string())),
                engineer: Some(OneOrMany::Many(vec![
                    "First Engineer".to_string(),
                    "Second Engineer".to_string(),
                ])),
                mastered_by: Some(OneOrMany::One("Mastering Engineer".to_string())),
                mixed_by: None,
                recorded_at: Some("Studio Name".to_string()),
            }),
            notes: Some(
                "Any additional information about this release.\n\
                 Rare pressing, special edition notes, etc."
                    .to_string(),
            ),
            ripping: None,
        }
    }
}
