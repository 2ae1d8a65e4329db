use std::fs;
use std::path::Path;

use crate::config::Settings;
use crate::error::Error;

use super::{dry_run, rip};

const METADATA: &str = "\
album:
  title: Test Album
  artist: Test Artist
  date: \"2023\"
tracks:
  - number: 1
    title: First
  - number: 2
    title: Second
";

fn settings_in(workspace: &Path) -> Settings {
    let mut cfg = Settings::default();
    cfg.workspace.base_dir = workspace.to_path_buf();
    cfg.paths.workspace = workspace.to_path_buf();
    cfg.paths.metadata = workspace.join("metadata");
    cfg.paths.schemas = workspace.join("schemas");
    cfg.paths.output = workspace.join("output");
    cfg.paths.logs = workspace.join("logs");
    cfg.paths.temp = workspace.join("temp");
    // Point at a ripper that cannot exist.
    cfg.ripper.xld.executable_path = "/definitely/not/here/xld".to_string();
    // Keep the pipeline local.
    cfg.integrations.beets.enabled = false;
    cfg
}

// Stand-in engine that prints a recognizable line and exits clean, so the
// post-rip pipeline runs without a drive.
fn fake_engine(dir: &Path, line: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("fake-engine");
    fs::write(&path, format!("#!/bin/sh\necho '{line}'\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn saved_ripping(cfg: &Settings) -> crate::metadata::Ripping {
    let saved = cfg
        .paths
        .output
        .join("Test Artist - Test Album (2023)")
        .join("metadata.yaml");
    let meta: crate::metadata::CdMetadata =
        serde_yaml::from_str(&fs::read_to_string(saved).unwrap()).unwrap();
    meta.ripping.unwrap()
}

#[test]
fn ripping_record_carries_raw_output_when_eac_style_is_off() {
    let dir = tempfile::tempdir().unwrap();
    let meta_file = dir.path().join("album.yaml");
    fs::write(&meta_file, METADATA).unwrap();

    let mut cfg = settings_in(dir.path());
    cfg.ripper.xld.executable_path = fake_engine(dir.path(), "Ripping track 1 of 2")
        .display()
        .to_string();
    cfg.ripper.quality.logging.eac_style = false;
    cfg.ripper.quality.spectrograms.enabled = false;

    rip(&cfg, &meta_file).unwrap();

    let ripping = saved_ripping(&cfg);
    assert!(ripping.log.unwrap().contains("Ripping track 1 of 2"));
}

#[test]
fn ripping_record_carries_rendered_log_when_eac_style_is_on() {
    let dir = tempfile::tempdir().unwrap();
    let meta_file = dir.path().join("album.yaml");
    fs::write(&meta_file, METADATA).unwrap();

    let mut cfg = settings_in(dir.path());
    cfg.ripper.xld.executable_path =
        fake_engine(dir.path(), "done").display().to_string();
    cfg.ripper.quality.spectrograms.enabled = false;

    rip(&cfg, &meta_file).unwrap();

    let album_dir = cfg.paths.output.join("Test Artist - Test Album (2023)");
    let log_file = fs::read_to_string(album_dir.join("rip.log")).unwrap();
    assert!(log_file.starts_with("rip-cd v"));

    // The record carries the log text itself, not a filename.
    let ripping = saved_ripping(&cfg);
    let recorded = ripping.log.unwrap();
    assert!(recorded.contains("Test Artist / Test Album"));
    assert!(recorded.contains("==== Log checksum "));
    assert!(ripping.checksum.unwrap().len() == 8);
}

#[test]
fn rip_aborts_before_any_side_effect_when_ripper_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let meta_file = dir.path().join("album.yaml");
    fs::write(&meta_file, METADATA).unwrap();

    let cfg = settings_in(dir.path());
    let err = rip(&cfg, &meta_file).unwrap_err();
    assert!(matches!(err, Error::ToolMissing { .. }));

    // The album directory must not have been created.
    assert!(!cfg.paths.output.join("Test Artist - Test Album (2023)").exists());
    assert!(!cfg.paths.output.exists());
}

#[test]
fn rip_rejects_invalid_metadata_before_touching_the_drive() {
    let dir = tempfile::tempdir().unwrap();
    let meta_file = dir.path().join("album.yaml");
    fs::write(
        &meta_file,
        "album:\n  title: X\n  artist: Y\n  barcode: \"12\"\ntracks:\n  - number: 1\n    title: T\n",
    )
    .unwrap();

    let cfg = settings_in(dir.path());
    let err = rip(&cfg, &meta_file).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn rip_rejects_unknown_engine() {
    let dir = tempfile::tempdir().unwrap();
    let meta_file = dir.path().join("album.yaml");
    fs::write(&meta_file, METADATA).unwrap();

    let mut cfg = settings_in(dir.path());
    cfg.ripper.engine = "eac".to_string();
    let err = rip(&cfg, &meta_file).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn dry_run_succeeds_without_the_ripper_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let meta_file = dir.path().join("album.yaml");
    fs::write(&meta_file, METADATA).unwrap();

    let cfg = settings_in(dir.path());
    dry_run(&cfg, &meta_file).unwrap();

    assert!(!cfg.paths.output.exists());
}

#[test]
fn dry_run_still_validates_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let meta_file = dir.path().join("album.yaml");
    fs::write(&meta_file, "album:\n  title: \"\"\n  artist: Y\ntracks: []\n").unwrap();

    let cfg = settings_in(dir.path());
    assert!(dry_run(&cfg, &meta_file).is_err());
}
