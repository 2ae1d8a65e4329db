//! The rip pipeline.
//!
//! Errors split in two tiers: anything up to and including the ripper run
//! aborts the rip, while post-processing steps (verification, spectrograms,
//! level analysis, logging, beets) log a warning and continue. A partially
//! post-processed rip is still a rip.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::metadata::{self, CdMetadata, Ripping, RippingSettings, RippingStats};

use super::{analysis, backend, drive, exec, files, log as riplog, spectrogram, verify};

/// What a completed rip produced.
#[derive(Debug)]
pub struct RipResult {
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Run the full pipeline for one metadata file.
pub fn rip(cfg: &Settings, metadata_file: &Path) -> Result<RipResult> {
    let mut meta = load_metadata(metadata_file)?;
    let engine = backend::for_engine(&cfg.ripper.engine)?;

    let executable = engine.executable(cfg);
    let Some(resolved) = exec::lookup(&executable) else {
        return Err(Error::ToolMissing { tool: executable });
    };

    let output_dir = cfg
        .paths
        .output
        .join(files::render_dir_name(&cfg.output, &meta.album));
    info!("output directory: {}", output_dir.display());

    let drive_info = drive::probe(&cfg.drive);
    info!(
        "drive: {} {} (offset {})",
        drive_info.manufacturer, drive_info.model, drive_info.read_offset
    );

    let args = engine.build_args(cfg, &drive_info, &output_dir);

    std::fs::create_dir_all(&output_dir)?;

    let mut cmd = Command::new(&resolved);
    cmd.args(&args);
    if engine.runs_in_output_dir() {
        cmd.current_dir(&output_dir);
    }

    info!("running {} with {} argument(s)", resolved.display(), args.len());
    let run = exec::run_streamed(cmd)?;
    if !run.status.success() {
        return Err(Error::RipperFailed {
            tool: engine.name().to_string(),
            status: run.status.to_string(),
            elapsed_secs: run.elapsed.as_secs_f64(),
        });
    }
    info!("rip finished in {}s", run.elapsed.as_secs());

    // From here on nothing is fatal.
    let created = post_process(cfg, &mut meta, &output_dir, &drive_info, run.elapsed, &run.log);

    persist_metadata(&meta, &output_dir);
    import_into_beets(cfg, &output_dir);

    Ok(RipResult {
        output_dir,
        files: created,
    })
}

/// Steps 1 through 4 of the pipeline with no side effects: validate, resolve
/// the tool, probe the drive, print the command line and expected layout.
pub fn dry_run(cfg: &Settings, metadata_file: &Path) -> Result<()> {
    let meta = load_metadata(metadata_file)?;
    let engine = backend::for_engine(&cfg.ripper.engine)?;

    let executable = engine.executable(cfg);
    let resolved = exec::lookup(&executable);

    let output_dir = cfg
        .paths
        .output
        .join(files::render_dir_name(&cfg.output, &meta.album));
    let drive_info = drive::probe(&cfg.drive);
    let args = engine.build_args(cfg, &drive_info, &output_dir);

    println!("Dry run. Nothing will be written.");
    println!();
    println!("Album      : {} / {}", meta.album.artist, meta.album.title);
    println!("Engine     : {}", engine.name());
    match resolved {
        Some(p) => println!("Executable : {}", p.display()),
        None => println!("Executable : {executable} (NOT FOUND on PATH)"),
    }
    println!(
        "Drive      : {} {} (offset {})",
        drive_info.manufacturer, drive_info.model, drive_info.read_offset
    );
    println!("Output dir : {}", output_dir.display());
    println!();
    println!("Command    : {executable} {}", args.join(" "));
    println!();
    println!("Expected files:");
    let ext = if cfg.ripper.quality.format.is_empty() {
        "flac"
    } else {
        cfg.ripper.quality.format.as_str()
    };
    for track in &meta.tracks {
        println!(
            "  {}",
            files::render_track_filename(&cfg.output, track, ext)
        );
    }
    Ok(())
}

fn load_metadata(path: &Path) -> Result<CdMetadata> {
    let meta = metadata::parse(path)?;
    metadata::check_rules(&meta)?;
    Ok(meta)
}

fn post_process(
    cfg: &Settings,
    meta: &mut CdMetadata,
    output_dir: &Path,
    drive_info: &crate::metadata::DriveInfo,
    elapsed: std::time::Duration,
    tool_output: &str,
) -> Vec<PathBuf> {
    let created = files::find_created_files(output_dir);
    if created.len() != meta.tracks.len() {
        warn!(
            "expected {} audio files, found {}",
            meta.tracks.len(),
            created.len()
        );
    }

    let mut stats = RippingStats {
        total_time: Some(format_elapsed(elapsed)),
        total_tracks: meta.tracks.len(),
        ..RippingStats::default()
    };

    if cfg.ripper.quality.accurate_rip.enabled {
        let summary = verify::verify_tracks(&mut meta.tracks, &created);
        stats.accurate_rip_matches = summary.matches;
        if cfg.ripper.quality.accurate_rip.require_match && summary.matches == 0 {
            warn!("no AccurateRip matches (verification is local-only)");
        }
    }

    let spectrograms =
        spectrogram::generate(&cfg.ripper.quality.spectrograms, output_dir, &created);

    analysis::analyze_tracks(&mut meta.tracks, &created, &mut stats);

    stats.tracks_with_errors = meta
        .tracks
        .iter()
        .filter(|t| t.read_errors.unwrap_or(0) + t.skip_errors.unwrap_or(0) > 0)
        .count();
    stats.total_errors = meta
        .tracks
        .iter()
        .map(|t| (t.read_errors.unwrap_or(0) + t.skip_errors.unwrap_or(0)) as usize)
        .sum();

    // With EAC-style logging on, the record carries the rendered archival
    // log; otherwise it carries the ripper's raw output verbatim.
    let quality = &cfg.ripper.quality;
    let mut checksum = None;
    let log_text = if quality.logging.eac_style {
        let log = riplog::render(cfg, meta, drive_info);
        checksum = log
            .lines()
            .last()
            .map(|l| {
                l.trim_start_matches("==== Log checksum ")
                    .trim_end_matches(" ====")
                    .to_string()
            });
        if quality.logging.save_logs {
            let log_path = output_dir.join("rip.log");
            if let Err(e) = std::fs::write(&log_path, &log) {
                warn!("could not write {}: {e}", log_path.display());
            }
        }
        log
    } else {
        tool_output.to_string()
    };

    meta.ripping = Some(Ripping {
        drive: Some(format!(
            "{} {}",
            drive_info.manufacturer, drive_info.model
        )),
        ripper: Some(format!("{} via rip-cd {}", cfg.ripper.engine, env!("CARGO_PKG_VERSION"))),
        date: Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        checksum,
        drive_info: Some(drive_info.clone()),
        settings: Some(RippingSettings {
            secure_mode: quality.secure_ripping,
            c2_error_correction: quality.c2_error_correction,
            test_and_copy: quality.test_and_copy,
            accurate_rip: quality.accurate_rip.enabled,
            max_retries: quality.max_retry_attempts,
            compression_level: quality.compression,
        }),
        stats: Some(stats),
        log: (!log_text.is_empty()).then_some(log_text),
        spectrograms,
    });

    created
}

fn persist_metadata(meta: &CdMetadata, output_dir: &Path) {
    let path = output_dir.join("metadata.yaml");
    match serde_yaml::to_string(meta) {
        Ok(yaml) => {
            if let Err(e) = std::fs::write(&path, yaml) {
                warn!("could not write {}: {e}", path.display());
            } else {
                info!("metadata saved to {}", path.display());
            }
        }
        Err(e) => warn!("could not serialize metadata: {e}"),
    }
}

fn import_into_beets(cfg: &Settings, output_dir: &Path) {
    let beets = &cfg.integrations.beets;
    if !beets.enabled || !beets.auto_import {
        return;
    }
    let executable = if beets.executable_path.is_empty() {
        "beet"
    } else {
        &beets.executable_path
    };
    if exec::lookup(executable).is_none() {
        warn!("beets import skipped: {executable} not found");
        return;
    }

    let mut cmd = Command::new(executable);
    if !beets.config_path.is_empty() {
        cmd.arg("-c").arg(&beets.config_path);
    }
    cmd.arg("import").arg(output_dir);

    match exec::run_streamed(cmd) {
        Ok(run) if run.status.success() => info!("beets import complete"),
        Ok(run) => warn!("beets import exited with {}", run.status),
        Err(e) => warn!("beets import failed: {e}"),
    }
}

fn format_elapsed(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
