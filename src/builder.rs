//! Serialization of a [`Layout`] into a PDF document built with `lopdf`.

use std::error::Error as StdError;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use log::{debug, info, warn};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use thiserror::Error;

use crate::fonts::{self, FontStyle};
use crate::layout::{Instruction, Layout, Paint, Rgb};

const PDF_VERSION: &str = "1.5";
const PRODUCER: &str = concat!("invoice_pdf ", env!("CARGO_PKG_VERSION"));

type BoxedError = Box<dyn StdError + Send + Sync>;

/// Errors raised while turning a layout into PDF bytes or writing them out.
#[derive(Debug, Error)]
pub enum PdfBuildError {
    #[error("failed to encode page content")]
    Encode(#[source] BoxedError),

    #[error("failed to serialize PDF document")]
    Serialize(#[source] BoxedError),

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A serialized PDF document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPdf {
    /// The complete file contents.
    pub bytes: Vec<u8>,
}

/// Builder that interprets a [`Layout`] into a single-page PDF.
///
/// Text is set in the base-14 Helvetica faces, so the output embeds no font
/// data.  Without a creation date the output is byte-for-byte reproducible for
/// the same layout.
#[derive(Debug)]
pub struct PdfBuilder {
    layout: Layout,
    title: Option<String>,
    creation_date: Option<String>,
    compress: bool,
}

impl PdfBuilder {
    /// Creates a builder for the given page layout with compression enabled.
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            title: None,
            creation_date: None,
            compress: true,
        }
    }

    /// Sets the document title stored in the information dictionary.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Stamps the document with a creation date.
    pub fn with_creation_date<Tz: TimeZone>(mut self, at: &DateTime<Tz>) -> Self {
        let utc = at.with_timezone(&Utc);
        self.creation_date = Some(utc.format("D:%Y%m%d%H%M%SZ").to_string());
        self
    }

    /// Enables or disables Flate compression of content streams.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Serializes the layout to PDF bytes.
    ///
    /// Geometry problems in the layout are logged as warnings and drawn as is.
    pub fn render(self) -> Result<RenderedPdf, PdfBuildError> {
        let PdfBuilder {
            layout,
            title,
            creation_date,
            compress,
        } = self;

        for issue in layout.issues() {
            warn!("Drawing layout as is: {}", issue);
        }
        let page = layout.page();
        let instruction_count = layout.instructions().len();

        let mut document = Document::with_version(PDF_VERSION);
        let pages_id = document.new_object_id();

        let mut font_resources = Dictionary::new();
        for style in FontStyle::ALL {
            let font_id = document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => style.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            font_resources.set(style.resource_name(), Object::Reference(font_id));
        }
        let resources_id = document.add_object(dictionary! {
            "Font" => font_resources,
        });

        let content = Content {
            operations: content_operations(layout),
        };
        let encoded = content
            .encode()
            .map_err(|err| PdfBuildError::Encode(err.into()))?;
        let content_id = document.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(fonts::mm_to_pt(page.width)),
                real(fonts::mm_to_pt(page.height)),
            ],
        });
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        document.trailer.set("Root", Object::Reference(catalog_id));

        let mut info = Dictionary::new();
        info.set("Producer", Object::string_literal(PRODUCER));
        if let Some(title) = title {
            info.set("Title", Object::string_literal(fonts::encode_win_ansi(&title)));
        }
        if let Some(date) = creation_date {
            info.set("CreationDate", Object::string_literal(date));
        }
        let info_id = document.add_object(info);
        document.trailer.set("Info", Object::Reference(info_id));

        if compress {
            document.compress();
        }

        let mut bytes = Vec::new();
        document
            .save_to(&mut bytes)
            .map_err(|err| PdfBuildError::Serialize(err.into()))?;

        debug!(
            "Serialized {} layout instructions into {} bytes",
            instruction_count,
            bytes.len()
        );
        Ok(RenderedPdf { bytes })
    }

    /// Renders the document and writes it to `path`, replacing any existing file.
    pub fn write_to(self, path: impl AsRef<Path>) -> Result<RenderedPdf, PdfBuildError> {
        let path = path.as_ref();
        let rendered = self.render()?;
        fs::write(path, &rendered.bytes).map_err(|source| PdfBuildError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote {} ({} bytes)", path.display(), rendered.bytes.len());
        Ok(rendered)
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as _)
}

fn color_operands(color: Rgb) -> Vec<Object> {
    color.components().into_iter().map(real).collect()
}

fn paint_operator(paint: Paint) -> &'static str {
    match paint {
        Paint::Fill => "f",
        Paint::Stroke => "S",
        Paint::FillStroke => "B",
    }
}

/// Translates instructions into content stream operators.
///
/// Layout coordinates have a top-left origin in millimetres, PDF user space has
/// a bottom-left origin in points.
fn content_operations(layout: Layout) -> Vec<Operation> {
    let page_height = layout.page().height;
    let mut operations = Vec::new();

    for instruction in layout {
        match instruction {
            Instruction::Rect {
                origin,
                width,
                height,
                paint,
                fill,
                line_width,
            } => {
                operations.push(Operation::new("q", vec![]));
                operations.push(Operation::new("rg", color_operands(fill)));
                operations.push(Operation::new("RG", color_operands(Rgb::BLACK)));
                operations.push(Operation::new("w", vec![real(fonts::mm_to_pt(line_width))]));
                operations.push(Operation::new(
                    "re",
                    vec![
                        real(fonts::mm_to_pt(origin.x)),
                        real(fonts::mm_to_pt(page_height - origin.y - height)),
                        real(fonts::mm_to_pt(width)),
                        real(fonts::mm_to_pt(height)),
                    ],
                ));
                operations.push(Operation::new(paint_operator(paint), vec![]));
                operations.push(Operation::new("Q", vec![]));
            }
            Instruction::Text { origin, font, text } => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("rg", color_operands(Rgb::BLACK)));
                operations.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(font.style.resource_name().as_bytes().to_vec()),
                        real(font.size),
                    ],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![
                        real(fonts::mm_to_pt(origin.x)),
                        real(fonts::mm_to_pt(page_height - origin.y)),
                    ],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(fonts::encode_win_ansi(&text))],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
        }
    }

    operations
}
