use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of a streamed subprocess run.
pub struct ExecOutput {
    pub status: ExitStatus,
    /// Combined stdout+stderr, in arrival order per stream.
    pub log: String,
    pub elapsed: Duration,
}

/// Resolve a tool against `PATH`, mirroring the shell's lookup. A name
/// containing a path separator is checked directly instead.
pub fn lookup(tool: &str) -> Option<PathBuf> {
    let as_path = Path::new(tool);
    if as_path.components().count() > 1 {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file())
}

/// Run a child process to completion, teeing its stdout/stderr to the
/// console while capturing both for the archival log, and measuring
/// wall-clock duration. Blocking; the orchestrator imposes no timeout.
pub fn run_streamed(mut cmd: Command) -> std::io::Result<ExecOutput> {
    let start = Instant::now();

    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn()?;

    let log = Arc::new(Mutex::new(String::new()));
    let mut readers = Vec::new();

    if let Some(stdout) = child.stdout.take() {
        let log = Arc::clone(&log);
        readers.push(thread::spawn(move || {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                println!("{line}");
                if let Ok(mut log) = log.lock() {
                    log.push_str(&line);
                    log.push('\n');
                }
            }
        }));
    }

    if let Some(stderr) = child.stderr.take() {
        let log = Arc::clone(&log);
        readers.push(thread::spawn(move || {
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                eprintln!("{line}");
                if let Ok(mut log) = log.lock() {
                    log.push_str(&line);
                    log.push('\n');
                }
            }
        }));
    }

    let status = child.wait()?;
    for reader in readers {
        let _ = reader.join();
    }

    let log = log.lock().map(|l| l.clone()).unwrap_or_default();

    Ok(ExecOutput {
        status,
        log,
        elapsed: start.elapsed(),
    })
}
