use chrono::{TimeZone, Utc};
use invoice_pdf::{
    layout_invoice, render_invoice, CompanyDetails, Customer, Invoice, LineItem, PdfBuildError,
    PdfBuilder,
};
use lopdf::content::Content;
use lopdf::{Document, Object};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

const DATE: &str = "Sun, Oct 18, 2026";

fn sample_invoice(rate: f64, hours: i64) -> Invoice {
    Invoice::new(
        Customer::new(
            "Google, Inc.",
            "Some street in a fancy area, STE 1999",
            "Palo Alto",
            "CA",
            "92201",
        ),
        CompanyDetails::new(
            "Simpsons Software",
            "12.232.232/0001-22",
            "Bart Simpson",
            "023.323.323-83",
        ),
        LineItem::new("Software Engineering Services", rate, hours),
    )
}

fn render_sample_pdf(invoice: &Invoice) -> Vec<u8> {
    PdfBuilder::new(layout_invoice(invoice, DATE))
        .with_title("Invoice")
        .with_compression(false)
        .render()
        .expect("render sample pdf")
        .bytes
}

fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("invoice_pdf_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir.join("invoice.pdf")
}

fn shown_text(bytes: &[u8]) -> Vec<String> {
    let document = Document::load_mem(bytes).expect("parse rendered pdf");
    let pages = document.get_pages();
    assert_eq!(pages.len(), 1, "invoice must fit on one page");

    let raw = document
        .get_page_content(pages[&1])
        .expect("page content");
    Content::decode(&raw)
        .expect("decode content stream")
        .operations
        .into_iter()
        .filter(|operation| operation.operator == "Tj")
        .filter_map(|operation| match operation.operands.into_iter().next() {
            Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            _ => None,
        })
        .collect()
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    if data[cursor] == terminator {
                        break;
                    }
                    data[cursor] = b'0';
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/CreationDate (", b')');
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_non_empty_output() {
    let bytes = render_sample_pdf(&sample_invoice(10.0, 10));
    assert!(
        bytes.starts_with(b"%PDF-"),
        "rendered PDF should contain at least a header"
    );
}

#[test]
fn default_invoice_shows_hundred_dollar_total() {
    let text = shown_text(&render_sample_pdf(&sample_invoice(10.0, 10)));

    assert_eq!(text.first().map(String::as_str), Some("INVOICE"));
    assert_eq!(text.iter().filter(|t| *t == "$100.000000").count(), 2);
    assert!(text.iter().any(|t| t == "$10.000000/hr"));
    assert!(text.iter().any(|t| t == "10 hrs"));
    assert!(text.iter().any(|t| t == "DATE: Sun, Oct 18, 2026"));
}

#[test]
fn subtotal_and_grand_total_match() {
    let text = shown_text(&render_sample_pdf(&sample_invoice(50.0, 8)));

    let grand_total = text
        .iter()
        .position(|t| t == "GRAND TOTAL")
        .expect("grand total label");
    assert_eq!(text[grand_total + 1], "$400.000000");
    assert_eq!(text[grand_total - 1], "$400.000000");
}

#[test]
fn zero_hours_renders_zero_total() {
    let text = shown_text(&render_sample_pdf(&sample_invoice(10.0, 0)));
    assert_eq!(text.iter().filter(|t| *t == "$0.000000").count(), 2);
}

#[test]
fn rendering_is_deterministic() {
    let invoice = sample_invoice(10.0, 10);
    let bytes_a = render_sample_pdf(&invoice);
    let bytes_b = render_sample_pdf(&invoice);

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic"
    );
}

#[test]
fn creation_date_is_the_only_difference_between_runs() {
    let invoice = sample_invoice(10.0, 10);
    let render_at = |hour| {
        PdfBuilder::new(layout_invoice(&invoice, DATE))
            .with_compression(false)
            .with_creation_date(&Utc.with_ymd_and_hms(2026, 10, 18, hour, 0, 0).unwrap())
            .render()
            .expect("render dated pdf")
            .bytes
    };

    let morning = render_at(9);
    let evening = render_at(18);

    assert_ne!(morning, evening);
    assert_eq!(normalized_hash(&morning), normalized_hash(&evening));
}

#[test]
fn render_invoice_writes_the_file() {
    let path = scratch_path("write");
    let rendered = render_invoice(&sample_invoice(10.0, 10), DATE, &path).expect("write invoice");

    let on_disk = fs::read(&path).expect("read invoice");
    assert_eq!(on_disk, rendered.bytes);
    fs::remove_file(&path).ok();
}

#[test]
fn oversized_rate_still_writes_the_invoice() {
    let path = scratch_path("oversized");
    let invoice = sample_invoice(1e80, 10);

    let rendered = render_invoice(&invoice, DATE, &path).expect("overflowing amounts still render");

    assert_eq!(fs::read(&path).expect("read invoice"), rendered.bytes);
    let text = shown_text(&render_sample_pdf(&invoice));
    let total = invoice.line_item().total_label();
    assert_eq!(text.iter().filter(|t| **t == total).count(), 2);
    fs::remove_file(&path).ok();
}

#[test]
fn unwritable_path_is_reported() {
    let path = scratch_path("unwritable")
        .with_file_name("missing")
        .join("invoice.pdf");

    match render_invoice(&sample_invoice(10.0, 10), DATE, &path) {
        Err(PdfBuildError::Write { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected a write error, got {other:?}"),
    }
}
