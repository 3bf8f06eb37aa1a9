use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn invoice(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_invoice"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn invoice binary")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn writes_invoice_pdf_into_the_working_directory() {
    let dir = tempfile::tempdir().expect("scratch dir");

    let output = invoice(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let bytes = fs::read(dir.path().join("invoice.pdf")).expect("read invoice.pdf");
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn oversized_rate_exits_successfully() {
    let dir = tempfile::tempdir().expect("scratch dir");

    let output = invoice(dir.path(), &["--hourly-rate", "1e80"]);

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(dir.path().join("invoice.pdf").is_file());
}

#[test]
fn write_failure_exits_with_one_and_reports_the_cause() {
    let dir = tempfile::tempdir().expect("scratch dir");
    // A directory in the way of the output file makes the write fail.
    fs::create_dir(dir.path().join("invoice.pdf")).expect("block output path");

    let output = invoice(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let report = stderr(&output);
    assert!(report.contains("Error: failed to write invoice.pdf"), "{report}");
    assert!(report.contains("  caused by: "), "{report}");
}

#[test]
fn malformed_number_exits_with_two_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("scratch dir");

    let output = invoice(dir.path(), &["--hourly-rate", "ten"]);

    assert_eq!(output.status.code(), Some(2));
    let report = stderr(&output);
    assert!(report.contains("--hourly-rate"), "{report}");
    assert!(report.contains("ten"), "{report}");
    assert!(!dir.path().join("invoice.pdf").exists());
}

#[test]
fn unknown_log_level_is_a_usage_error() {
    let dir = tempfile::tempdir().expect("scratch dir");

    let output = invoice(dir.path(), &["--log-level", "verbos"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--log-level"));
}
