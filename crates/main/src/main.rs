use std::error::Error;
use std::path::Path;

use chrono::{DateTime, Local};
use clap::Parser;
use log::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use invoice_pdf::{
    layout_invoice, PdfBuildError, PdfBuilder, DATE_FORMAT, DEFAULT_OUTPUT, DOCUMENT_TITLE,
};

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    if let Err(err) = run(&cli, Local::now(), Path::new(DEFAULT_OUTPUT)) {
        eprintln!("Error: {}", err);
        print_error_sources(&err);
        std::process::exit(1);
    }
}

/// Renders the invoice described by `cli`, dated `now`, to `output`.
fn run(cli: &Cli, now: DateTime<Local>, output: &Path) -> Result<(), PdfBuildError> {
    let invoice = cli.invoice();
    let date = now.format(DATE_FORMAT).to_string();

    let pdf = PdfBuilder::new(layout_invoice(&invoice, &date))
        .with_title(DOCUMENT_TITLE)
        .with_creation_date(&now)
        .write_to(output)?;

    info!("Generated {} ({} bytes)", output.display(), pdf.bytes.len());
    Ok(())
}

fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("invoice_cli_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn writes_invoice_with_defaults() {
        let dir = scratch_dir("defaults");
        let output = dir.join(DEFAULT_OUTPUT);
        let cli = Cli::try_parse_from(["invoice"]).expect("defaults parse");

        run(&cli, Local::now(), &output).expect("render invoice");

        let bytes = fs::read(&output).expect("read invoice");
        assert!(bytes.starts_with(b"%PDF-"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn overwrites_existing_output() {
        let dir = scratch_dir("overwrite");
        let output = dir.join(DEFAULT_OUTPUT);
        fs::write(&output, b"stale").expect("seed output");
        let cli = Cli::try_parse_from(["invoice", "--hours-worked", "0"]).expect("parse");

        run(&cli, Local::now(), &output).expect("render invoice");

        assert!(fs::read(&output).expect("read invoice").starts_with(b"%PDF-"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unwritable_output_is_reported() {
        let dir = scratch_dir("unwritable");
        let output = dir.join("missing").join(DEFAULT_OUTPUT);
        let cli = Cli::try_parse_from(["invoice"]).expect("defaults parse");

        let error = run(&cli, Local::now(), &output).unwrap_err();

        assert!(matches!(error, PdfBuildError::Write { .. }));
        assert!(error.source().is_some());
        fs::remove_dir_all(&dir).ok();
    }
}
