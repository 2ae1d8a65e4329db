use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::{Error, Result};

use super::load::default_config_path;
use super::schema::Settings;

/// Write a commented default config file to `~/.rip-cd.yaml`.
///
/// Refuses to clobber an existing file unless `overwrite` is set.
pub fn write_default_config(overwrite: bool) -> Result<PathBuf> {
    let path = default_config_path()
        .ok_or_else(|| Error::Config("HOME is not set, cannot place config file".to_string()))?;

    if path.exists() && !overwrite {
        return Err(Error::AlreadyExists(path));
    }

    let defaults = Settings::default();
    fs::write(&path, render_template(&defaults))?;

    info!("created default configuration file: {}", path.display());
    info!("edit this file to customize your CD ripping settings");
    Ok(path)
}

/// Render the commented template. All keys are present but commented out
/// except the workspace base dir, so the generated file is valid YAML that
/// changes nothing until the user uncomments something.
fn render_template(d: &Settings) -> String {
    let q = &d.ripper.quality;
    format!(
        "\
# rip-cd configuration file
# Zero-configuration CD ripping with sane defaults.
# All settings are optional - defaults work out of the box.
# Uncomment and modify values to customize behavior.

workspace:
  # Base directory for all ripping operations
  base_dir: \"{base_dir}\"
  # auto_create_dirs: {auto_create}
  # dir_structure:
  #   metadata: \"metadata\"   # YAML metadata files
  #   schemas: \"schemas\"     # JSON validation schemas
  #   output: \"output\"       # ripped audio files
  #   logs: \"logs\"           # ripping log files
  #   temp: \"temp\"           # temporary files

# ripper:
  # Ripping engine (options: xld, cdparanoia)
  # engine: \"{engine}\"
  # xld:
  #   profile: \"{profile}\"
  #   executable_path: \"\"   # empty = resolve from PATH
  #   extra_args: []
  # quality:
  #   format: \"{format}\"
  #   compression: {compression}
  #   verify: {verify}
  #   error_correction: {error_correction}
  #   c2_error_correction: {c2}
  #   max_retry_attempts: {retries}
  #   secure_ripping: {secure}
  #   test_and_copy: {tac}
  #   accurate_rip:
  #     enabled: {ar_enabled}
  #     require_match: {ar_require}
  #     min_confidence: {ar_conf}
  #   spectrograms:
  #     enabled: {sp_enabled}
  #     generate_all: {sp_all}
  #     generate_sample: {sp_sample}
  #     resolution: {sp_res}
  #     format: \"{sp_fmt}\"
  #   logging:
  #     eac_style: {log_eac}
  #     drive_info: {log_drive}
  #     save_logs: {log_save}

# output:
  # Available variables: {{{{Number}}}}, {{{{Title}}}}
  # filename_template: \"{fname_tpl}\"
  # Available variables: {{{{Artist}}}}, {{{{Album}}}}, {{{{Year}}}}, {{{{Date}}}}, {{{{Label}}}}
  # dir_template: \"{dir_tpl}\"
  # sanitize_filenames: {sanitize}

# drive:
  # auto_detect: {drv_auto}
  # device_path: \"\"
  # read_offset: {drv_offset}
  # supports_c2: {drv_c2}
  # supports_accurate_stream: {drv_as}

# matrix:
  # enabled: {mx_enabled}
  # side_a: \"\"
  # side_b: \"\"
  # mould_sid: \"\"
  # ifpi_codes: []

# integrations:
  # musicbrainz:
  #   enabled: {mb_enabled}
  #   server_url: \"{mb_url}\"
  #   rate_limit: {mb_rate}
  #   user_agent: \"{mb_agent}\"
  # beets:
  #   enabled: {bt_enabled}
  #   executable_path: \"\"   # empty = resolve `beet` from PATH
  #   config_path: \"\"
  #   auto_import: {bt_import}
",
        base_dir = d.workspace.base_dir.display(),
        auto_create = d.workspace.auto_create_dirs,
        engine = d.ripper.engine,
        profile = d.ripper.xld.profile,
        format = q.format,
        compression = q.compression,
        verify = q.verify,
        error_correction = q.error_correction,
        c2 = q.c2_error_correction,
        retries = q.max_retry_attempts,
        secure = q.secure_ripping,
        tac = q.test_and_copy,
        ar_enabled = q.accurate_rip.enabled,
        ar_require = q.accurate_rip.require_match,
        ar_conf = q.accurate_rip.min_confidence,
        sp_enabled = q.spectrograms.enabled,
        sp_all = q.spectrograms.generate_all,
        sp_sample = q.spectrograms.generate_sample,
        sp_res = q.spectrograms.resolution,
        sp_fmt = q.spectrograms.format,
        log_eac = q.logging.eac_style,
        log_drive = q.logging.drive_info,
        log_save = q.logging.save_logs,
        fname_tpl = d.output.filename_template,
        dir_tpl = d.output.dir_template,
        sanitize = d.output.sanitize_filenames,
        drv_auto = d.drive.auto_detect,
        drv_offset = d.drive.read_offset,
        drv_c2 = d.drive.supports_c2,
        drv_as = d.drive.supports_accurate_stream,
        mx_enabled = d.matrix.enabled,
        mb_enabled = d.integrations.musicbrainz.enabled,
        mb_url = d.integrations.musicbrainz.server_url,
        mb_rate = d.integrations.musicbrainz.rate_limit,
        mb_agent = d.integrations.musicbrainz.user_agent,
        bt_enabled = d.integrations.beets.enabled,
        bt_import = d.integrations.beets.auto_import,
    )
}
