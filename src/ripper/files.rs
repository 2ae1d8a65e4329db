use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::config::OutputSettings;
use crate::metadata::{Album, Track};

/// Extensions counted as produced audio when enumerating the output dir.
pub const AUDIO_EXTENSIONS: &[&str] = &["flac", "mp3", "wav", "m4a"];

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

/// Enumerate audio files under the output directory, sorted by path so track
/// order matches filename order (`01 - ...`, `02 - ...`).
pub fn find_created_files(output_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(output_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && is_audio_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn invalid_chars_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap())
}

fn multi_space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Replace characters that are invalid in filenames, collapse runs of
/// whitespace and trim the ends.
pub fn sanitize_filename(name: &str) -> String {
    let name = invalid_chars_re().replace_all(name, "_");
    let name = multi_space_re().replace_all(&name, " ");
    name.trim().to_string()
}

/// Year is the first four characters of the (already validated) date.
pub fn extract_year(date: &str) -> &str {
    if date.len() >= 4 { &date[..4] } else { date }
}

/// Render the album directory name from the configured template.
pub fn render_dir_name(output: &OutputSettings, album: &Album) -> String {
    let date = album.date.as_deref().unwrap_or("");
    let name = output
        .dir_template
        .replace("{{Artist}}", &album.artist)
        .replace("{{Album}}", &album.title)
        .replace("{{Year}}", extract_year(date))
        .replace("{{Date}}", date)
        .replace("{{Label}}", album.label.as_deref().unwrap_or(""));

    if output.sanitize_filenames {
        sanitize_filename(&name)
    } else {
        name
    }
}

/// Render one track's filename (without the directory) from the configured
/// template: `NN - Title.ext`.
pub fn render_track_filename(output: &OutputSettings, track: &Track, ext: &str) -> String {
    let name = output
        .filename_template
        .replace("{{Number}}", &format!("{:02}", track.number))
        .replace("{{Title}}", &track.title);

    let name = if output.sanitize_filenames {
        sanitize_filename(&name)
    } else {
        name
    };
    format!("{name}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Album;
    use std::fs;
    use tempfile::tempdir;

    fn album() -> Album {
        Album {
            title: "Test Album".to_string(),
            artist: "Test Artist".to_string(),
            date: Some("2023-12-01".to_string()),
            label: Some("Test Label".to_string()),
            ..Album::default()
        }
    }

    #[test]
    fn dir_template_renders_year_from_date() {
        let output = OutputSettings::default();
        assert_eq!(
            render_dir_name(&output, &album()),
            "Test Artist - Test Album (2023)"
        );
    }

    #[test]
    fn dir_template_supports_date_and_label() {
        let output = OutputSettings {
            dir_template: "{{Label}}/{{Date}} {{Album}}".to_string(),
            sanitize_filenames: false,
            ..OutputSettings::default()
        };
        assert_eq!(
            render_dir_name(&output, &album()),
            "Test Label/2023-12-01 Test Album"
        );
    }

    #[test]
    fn missing_date_renders_empty_year() {
        let output = OutputSettings::default();
        let mut a = album();
        a.date = None;
        assert_eq!(render_dir_name(&output, &a), "Test Artist - Test Album ()");
    }

    #[test]
    fn sanitize_replaces_invalid_characters() {
        assert_eq!(sanitize_filename("File/With\\Slashes"), "File_With_Slashes");
        assert_eq!(sanitize_filename("a<b>c:d\"e|f?g*h"), "a_b_c_d_e_f_g_h");
    }

    #[test]
    fn sanitize_collapses_and_trims_whitespace() {
        assert_eq!(sanitize_filename("  too   many	spaces  "), "too many spaces");
    }

    #[test]
    fn track_filename_is_zero_padded() {
        let output = OutputSettings::default();
        let track = Track {
            number: 3,
            title: "Some Song".to_string(),
            ..Track::default()
        };
        assert_eq!(
            render_track_filename(&output, &track, "flac"),
            "03 - Some Song.flac"
        );
    }

    #[test]
    fn find_created_files_filters_by_audio_extension() {
        let dir = tempdir().unwrap();
        for name in [
            "track01.flac",
            "track02.flac",
            "track03.mp3",
            "cover.jpg",
            "metadata.yaml",
        ] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = find_created_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["track01.flac", "track02.flac", "track03.mp3"]);
    }

    #[test]
    fn extract_year_handles_short_dates() {
        assert_eq!(extract_year("2023-12-01"), "2023");
        assert_eq!(extract_year("2023"), "2023");
        assert_eq!(extract_year("99"), "99");
    }
}
