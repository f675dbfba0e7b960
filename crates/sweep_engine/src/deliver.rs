//! Hands a compiled report to the user: write it, then try to show it.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use sweep_core::RunResult;
use sweep_logging::{sweep_info, sweep_warn};

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredReport {
    pub report_path: PathBuf,
    pub manifest_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("could not write the report: {0}")]
    Persist(#[from] PersistError),
    #[error("could not serialize the run manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error(
        "the report viewer was blocked ({reason}); allow it to open and retry, \
         or open {} manually",
        .path.display()
    )]
    ViewerBlocked { path: PathBuf, reason: String },
}

/// Writes `{stem}.html` and a `{stem}.json` manifest of `run` into `output_dir`.
pub fn deliver_report(
    output_dir: &Path,
    stem: &str,
    html: &str,
    run: &RunResult,
) -> Result<DeliveredReport, DeliveryError> {
    let manifest = serde_json::to_string_pretty(run)?;
    let writer = AtomicFileWriter::new(output_dir);
    let report_path = writer.write(&format!("{stem}.html"), html.as_bytes())?;
    let manifest_path = writer.write(&format!("{stem}.json"), manifest.as_bytes())?;
    sweep_info!("report written to {}", report_path.display());
    Ok(DeliveredReport {
        report_path,
        manifest_path,
    })
}

/// Something that can show a written report in a new viewing context.
pub trait ReportViewer {
    fn open(&self, path: &Path) -> Result<(), DeliveryError>;
}

/// Launches the platform's default handler for the file.
#[derive(Debug, Clone)]
pub struct SystemViewer {
    program: String,
    leading_args: Vec<String>,
}

impl SystemViewer {
    pub fn platform_default() -> Self {
        if cfg!(target_os = "windows") {
            Self::with_command("cmd", &["/C", "start", ""])
        } else if cfg!(target_os = "macos") {
            Self::with_command("open", &[])
        } else {
            Self::with_command("xdg-open", &[])
        }
    }

    pub fn with_command(program: &str, leading_args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            leading_args: leading_args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl ReportViewer for SystemViewer {
    fn open(&self, path: &Path) -> Result<(), DeliveryError> {
        let blocked = |reason: String| {
            sweep_warn!("viewer {:?} failed: {}", self.program, reason);
            DeliveryError::ViewerBlocked {
                path: path.to_path_buf(),
                reason,
            }
        };
        let status = Command::new(&self.program)
            .args(&self.leading_args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| blocked(err.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(blocked(format!("{} exited with {status}", self.program)))
        }
    }
}
