//! One conflict check from term list to delivered report.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Local;
use sweep_core::{compile_report, parse_terms, ReportOptions, RunResult, SearchTerm};
use sweep_engine::{
    deliver_report, read_account_name, report_file_stem, run_session, CancellationToken,
    DeliveredReport, ProgressSink, ReplayScript, ReplaySurface, ReportViewer, SweepEvent,
    SweepSettings, SystemViewer, UiSurface,
};
use sweep_logging::{sweep_info, sweep_warn};

use crate::cli::Cli;

pub const CANCEL_NOTICE: &str = "Conflict check cancelled by user.";

#[derive(Debug)]
pub struct RunSummary {
    pub run: RunResult,
    pub delivered: DeliveredReport,
}

pub async fn execute(cli: &Cli) -> Result<RunSummary> {
    let terms = read_terms(cli.terms.as_deref())?;
    let settings = load_settings(cli.settings.as_deref())?;
    let script = ReplayScript::load(&cli.replay)
        .with_context(|| format!("loading replay script {}", cli.replay.display()))?;
    let surface = ReplaySurface::new(script);

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));
    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let result = sweep_and_deliver(
        &surface,
        &terms,
        &settings,
        &cancel,
        &cli.output,
        &generated_at,
        &StderrProgress,
    )
    .await;
    watcher.abort();
    let summary = result?;

    if summary.run.is_cancelled() {
        eprintln!("{CANCEL_NOTICE}");
    }
    if cli.open {
        if let Err(err) = SystemViewer::platform_default().open(&summary.delivered.report_path) {
            eprintln!("{err}");
        }
    }
    Ok(summary)
}

/// Runs the session, then compiles and writes whatever was collected,
/// cancelled or not.
pub async fn sweep_and_deliver<S>(
    surface: &S,
    terms: &[SearchTerm],
    settings: &SweepSettings,
    cancel: &CancellationToken,
    output_dir: &Path,
    generated_at: &str,
    sink: &dyn ProgressSink,
) -> Result<RunSummary>
where
    S: UiSurface + ?Sized,
{
    let run = run_session(surface, terms, settings, cancel, sink).await;

    let account = read_account_name(surface).await;
    let options = ReportOptions::new(account, generated_at).with_base_url(settings.base_url.clone());
    let html = compile_report(&run, &options);
    let stem = report_file_stem(&options.account_name, terms);
    let delivered = deliver_report(output_dir, &stem, &html, &run)
        .with_context(|| format!("delivering report to {}", output_dir.display()))?;

    Ok(RunSummary { run, delivered })
}

fn read_terms(source: Option<&Path>) -> Result<Vec<SearchTerm>> {
    let raw = match source {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading terms from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading terms from stdin")?;
            buf
        }
    };
    let terms = parse_terms(&raw);
    if terms.is_empty() {
        bail!("no search terms given; supply at least one non-blank line");
    }
    sweep_info!("{} search terms loaded", terms.len());
    Ok(terms)
}

fn load_settings(path: Option<&Path>) -> Result<SweepSettings> {
    match path {
        Some(path) => SweepSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(SweepSettings::default()),
    }
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        sweep_warn!("interrupt received, cancelling");
        cancel.cancel();
    }
}

struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn emit(&self, event: SweepEvent) {
        match event {
            SweepEvent::TermFinished { failed: false, .. } => {}
            other => eprintln!("{other}"),
        }
    }
}
