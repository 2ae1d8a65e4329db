//! The `setup` subcommand: check for the external tools the pipeline drives
//! and install the missing ones through Homebrew.
//!
//! Every failure here is a warning. A missing spectrogram tool should not
//! block someone who only wants to rip.

use std::process::Command;

use tracing::warn;

use crate::error::Result;
use crate::ripper::exec;

struct Tool {
    /// Name looked up on PATH.
    binary: &'static str,
    /// Homebrew package that provides it.
    package: &'static str,
    /// Installed with `brew install --cask`.
    cask: bool,
    purpose: &'static str,
}

const TOOLS: &[Tool] = &[
    Tool {
        binary: "xld",
        package: "xld",
        cask: true,
        purpose: "CD ripping engine",
    },
    Tool {
        binary: "flac",
        package: "flac",
        cask: false,
        purpose: "FLAC encoding and verification",
    },
    Tool {
        binary: "ffmpeg",
        package: "ffmpeg",
        cask: false,
        purpose: "audio level analysis",
    },
    Tool {
        binary: "sox",
        package: "sox",
        cask: false,
        purpose: "spectrogram generation",
    },
    Tool {
        binary: "sndfile-info",
        package: "libsndfile",
        cask: false,
        purpose: "audio file format support",
    },
    Tool {
        binary: "beet",
        package: "beets",
        cask: false,
        purpose: "library import",
    },
];

pub fn run(dry_run: bool) -> Result<()> {
    let missing: Vec<&Tool> = TOOLS
        .iter()
        .filter(|t| exec::lookup(t.binary).is_none())
        .collect();

    for tool in TOOLS {
        let status = if missing.iter().any(|m| m.binary == tool.binary) {
            "MISSING"
        } else {
            "ok"
        };
        println!("{:10} {:8} {}", tool.binary, status, tool.purpose);
    }

    if missing.is_empty() {
        println!("\nEverything is in place.");
        return Ok(());
    }

    if exec::lookup("brew").is_none() {
        warn!("Homebrew not found; install the missing tools manually");
        return Ok(());
    }

    for tool in missing {
        if dry_run {
            println!(
                "would run: brew install {}{}",
                if tool.cask { "--cask " } else { "" },
                tool.package
            );
            continue;
        }
        println!("installing {}...", tool.package);
        let mut cmd = Command::new("brew");
        cmd.arg("install");
        if tool.cask {
            cmd.arg("--cask");
        }
        cmd.arg(tool.package);
        match cmd.status() {
            Ok(s) if s.success() => println!("installed {}", tool.package),
            Ok(s) => warn!("brew install {} exited with {s}", tool.package),
            Err(e) => warn!("could not run brew: {e}"),
        }
    }

    Ok(())
}
