use std::{env, fs, path::Path, path::PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

use super::schema::{Paths, Settings};

/// Configuration loading helpers.
///
/// `Settings::load` layers struct defaults, an optional YAML config file,
/// environment variables (prefix `RIPCD__`) and finally an explicit
/// workspace override from the CLI.
impl Settings {
    /// Load settings and compute the derived workspace paths.
    ///
    /// A missing file at an explicit path is tolerated and falls back to
    /// defaults; a file with an extension other than `.yaml`/`.yml` is a hard
    /// error. Directory creation failures (when `auto_create_dirs` is on) are
    /// fatal.
    pub fn load(file: Option<&Path>, workspace_override: Option<&Path>) -> Result<Self> {
        let config_path = match file {
            Some(p) => {
                check_extension(p)?;
                Some(p.to_path_buf())
            }
            None => resolve_config_path(),
        };

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            debug!("loading config from {}", path.display());
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("RIPCD")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let mut settings: Settings = cfg.try_deserialize()?;

        // The CLI override always wins, regardless of file or environment.
        if let Some(ws) = workspace_override {
            settings.workspace.base_dir = ws.to_path_buf();
        }

        settings.paths = settings.compute_paths();

        if settings.workspace.auto_create_dirs {
            settings.create_directories()?;
        }

        Ok(settings)
    }

    fn compute_paths(&self) -> Paths {
        let base = expand_tilde(&self.workspace.base_dir);
        let s = &self.workspace.dir_structure;
        Paths {
            metadata: base.join(&s.metadata),
            schemas: base.join(&s.schemas),
            output: base.join(&s.output),
            logs: base.join(&s.logs),
            temp: base.join(&s.temp),
            workspace: base,
        }
    }

    fn create_directories(&self) -> Result<()> {
        let dirs = [
            &self.paths.workspace,
            &self.paths.metadata,
            &self.paths.schemas,
            &self.paths.output,
            &self.paths.logs,
            &self.paths.temp,
        ];
        for dir in dirs {
            fs::create_dir_all(dir).map_err(|e| {
                Error::Config(format!("failed to create directory {}: {e}", dir.display()))
            })?;
        }
        Ok(())
    }
}

fn check_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(()),
        _ => Err(Error::Config(format!(
            "unsupported config file format: {} (only .yaml/.yml supported)",
            path.display()
        ))),
    }
}

/// Resolve the config path from `RIPCD_CONFIG_PATH` or the conventional
/// default, when that file exists.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("RIPCD_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path().filter(|p| p.is_file())
}

/// Compute the default config path, `~/.rip-cd.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".rip-cd.yaml"))
}

/// Expand a leading `~/` to the home directory. Paths without a tilde pass
/// through untouched.
pub(crate) fn expand_tilde(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}
