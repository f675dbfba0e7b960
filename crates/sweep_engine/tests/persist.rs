use std::fs;

use pretty_assertions::assert_eq;
use sweep_core::{RunResult, SearchTerm, TermOutcome};
use sweep_engine::{
    deliver_report, ensure_output_dir, AtomicFileWriter, DeliveryError, PersistError,
    ReportViewer, SystemViewer,
};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("reports").join("2025");
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn file_in_place_of_dir_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let err = ensure_output_dir(&file_path).unwrap_err();
    assert!(matches!(err, PersistError::OutputDir { .. }));
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path());

    let first = writer.write("report.html", b"first").unwrap();
    let second = writer.write("report.html", b"second").unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "second");
    let leftovers = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn delivery_writes_report_and_manifest() {
    let temp = TempDir::new().unwrap();
    let mut run = RunResult::new();
    run.push(TermOutcome::failure(SearchTerm::new("acme").unwrap(), "cancelled"));
    run.mark_cancelled();

    let delivered = deliver_report(temp.path(), "conflict-check--x--00000000", "<html></html>", &run)
        .unwrap();

    assert_eq!(
        delivered.report_path.file_name().unwrap(),
        "conflict-check--x--00000000.html"
    );
    assert_eq!(fs::read_to_string(&delivered.report_path).unwrap(), "<html></html>");
    let manifest: RunResult =
        serde_json::from_str(&fs::read_to_string(&delivered.manifest_path).unwrap()).unwrap();
    assert_eq!(manifest, run);
}

#[test]
fn delivery_into_a_file_path_fails_cleanly() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();

    let err = deliver_report(&blocker, "r", "<html></html>", &RunResult::new()).unwrap_err();
    assert!(matches!(err, DeliveryError::Persist(_)));
    assert!(!temp.path().join("r.html").exists());
}

#[test]
fn unlaunchable_viewer_reports_blocked() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("r.html");
    fs::write(&report, "<html></html>").unwrap();

    let viewer = SystemViewer::with_command("sweep-viewer-that-does-not-exist", &[]);
    let err = viewer.open(&report).unwrap_err();

    match &err {
        DeliveryError::ViewerBlocked { path, .. } => assert_eq!(path, &report),
        other => panic!("expected ViewerBlocked, got {other:?}"),
    }
    assert!(err.to_string().contains("allow it to open and retry"));
}
