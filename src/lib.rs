//! Core entry point for the invoice_pdf crate.
//!
//! An [`Invoice`] is laid out by [`invoice::layout_invoice`] into a
//! [`layout::Layout`], which [`builder::PdfBuilder`] serializes to a
//! single-page PDF.  [`render_invoice`] runs both steps and writes the file.

pub mod builder;
pub mod fonts;
pub mod invoice;
pub mod layout;
pub mod model;
pub mod richtext;

pub use builder::{PdfBuildError, PdfBuilder, RenderedPdf};
pub use invoice::{layout_invoice, render_invoice, DATE_FORMAT, DEFAULT_OUTPUT, DOCUMENT_TITLE};
pub use model::{CompanyDetails, Customer, Invoice, LineItem};
