//! Page layout with an explicit write cursor.
//!
//! [`LayoutContext`] mimics the "write then move" drawing model of classic PDF
//! generators, but keeps the cursor as plain state and records every drawing
//! operation as an [`Instruction`] instead of emitting PDF operators directly.
//! The finished [`Layout`] can be inspected and checked for geometry problems
//! without a rendering backend and is consumed once by
//! [`crate::builder::PdfBuilder`].  Problems are reported, never fatal: text
//! that runs past the page edge is still drawn.
//!
//! All lengths are millimetres measured from the top-left corner of the page.
//! Font sizes are points.

use thiserror::Error;

use crate::fonts::{self, FontStyle, UNDERLINE_POSITION, UNDERLINE_THICKNESS};
use crate::richtext::Span;

/// Inner horizontal padding applied to cell text.
pub const CELL_PADDING_MM: f64 = 1.0;

/// Stroke width used for cell borders.
pub const DEFAULT_LINE_WIDTH_MM: f64 = 0.2;

const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Physical page dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    /// Page width.
    pub width: f64,
    /// Page height.
    pub height: f64,
}

impl PageSize {
    /// ISO A4 in portrait orientation.
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };
}

/// Page margins.  There is no bottom margin since layouts never paginate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
}

impl Margins {
    pub fn new(left: f64, top: f64, right: f64) -> Self {
        Self { left, top, right }
    }
}

/// A point on the page.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An RGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Returns a neutral gray of the given level.
    pub const fn gray(level: u8) -> Self {
        Rgb(level, level, level)
    }

    /// Returns the channels scaled to the `0.0..=1.0` range used by PDF operators.
    pub fn components(self) -> [f64; 3] {
        [self.0, self.1, self.2].map(|channel| f64::from(channel) / 255.0)
    }
}

/// Horizontal placement of text inside a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
}

/// How a rectangle is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Fill,
    Stroke,
    FillStroke,
}

/// A font face at a given size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub style: FontStyle,
    /// Size in points.
    pub size: f64,
}

impl Font {
    pub fn new(style: FontStyle, size: f64) -> Self {
        Self { style, size }
    }

    /// Returns the font size in millimetres.
    pub fn size_mm(&self) -> f64 {
        fonts::pt_to_mm(self.size)
    }

    /// Measures `text` in this font, in millimetres.
    pub fn width_of(&self, text: &str) -> f64 {
        fonts::string_width(text, self.style, self.size)
    }
}

/// A single drawing operation with every coordinate resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// An axis-aligned rectangle with its top-left corner at `origin`.
    Rect {
        origin: Position,
        width: f64,
        height: f64,
        paint: Paint,
        fill: Rgb,
        line_width: f64,
    },
    /// A run of black text whose baseline starts at `origin`.
    Text {
        origin: Position,
        font: Font,
        text: String,
    },
}

impl Instruction {
    /// Returns the text of a text instruction.
    pub fn text(&self) -> Option<&str> {
        match self {
            Instruction::Text { text, .. } => Some(text.as_str()),
            Instruction::Rect { .. } => None,
        }
    }

    fn bounds(&self) -> (Position, Position) {
        match self {
            Instruction::Rect {
                origin,
                width,
                height,
                ..
            } => (
                *origin,
                Position::new(origin.x + width, origin.y + height),
            ),
            Instruction::Text { origin, .. } => (*origin, *origin),
        }
    }
}

/// A cell: a box of fixed size with optional border and fill and a single line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    width: f64,
    height: f64,
    text: String,
    border: bool,
    fill: bool,
    alignment: HorizontalAlignment,
    line_break: bool,
}

impl Cell {
    /// Creates an unbordered, unfilled, left-aligned cell.
    ///
    /// A width of zero extends the cell to the right margin.
    pub fn new(width: f64, height: f64, text: impl Into<String>) -> Self {
        Self {
            width,
            height,
            text: text.into(),
            border: false,
            fill: false,
            alignment: HorizontalAlignment::Left,
            line_break: false,
        }
    }

    /// Draws a border around the cell.
    pub fn bordered(mut self) -> Self {
        self.border = true;
        self
    }

    /// Paints the cell background with the current fill color.
    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }

    /// Sets the text alignment.
    pub fn aligned(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Moves the cursor to the start of the next line after the cell.
    pub fn ends_line(mut self) -> Self {
        self.line_break = true;
        self
    }
}

/// A geometry problem found by [`Layout::issues`].
#[derive(Debug, Error, PartialEq)]
pub enum LayoutIssue {
    #[error("instruction {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("instruction {index} reaches ({x:.2}, {y:.2}) mm, outside the {width}x{height} mm page")]
    OutOfBounds {
        index: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    #[error("layout contains no instructions")]
    Empty,
}

/// Mutable drawing state threaded through a single page layout.
#[derive(Clone, Debug)]
pub struct LayoutContext {
    page: PageSize,
    margins: Margins,
    cursor: Position,
    font: Font,
    underline: bool,
    fill: Rgb,
    line_width: f64,
    instructions: Vec<Instruction>,
}

impl LayoutContext {
    /// Starts a page with the cursor at the top-left margin.
    pub fn new(page: PageSize, margins: Margins) -> Self {
        Self {
            page,
            margins,
            cursor: Position::new(margins.left, margins.top),
            font: Font::new(FontStyle::Regular, DEFAULT_FONT_SIZE),
            underline: false,
            fill: Rgb::WHITE,
            line_width: DEFAULT_LINE_WIDTH_MM,
            instructions: Vec::new(),
        }
    }

    /// Returns the current write position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Returns the active font.
    pub fn font(&self) -> Font {
        self.font
    }

    /// Selects face and size.  Clears underline.
    pub fn set_font(&mut self, style: FontStyle, size: f64) {
        self.font = Font::new(style, size);
        self.underline = false;
    }

    /// Selects the face and underline flag, keeping the size.
    pub fn set_style(&mut self, style: FontStyle, underline: bool) {
        self.font.style = style;
        self.underline = underline;
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font.size = size;
    }

    /// Sets the color used by filled cells and rectangles.
    pub fn set_fill_color(&mut self, color: Rgb) {
        self.fill = color;
    }

    /// Moves the cursor horizontally to an absolute position.
    pub fn set_x(&mut self, x: f64) -> Position {
        self.cursor.x = x;
        self.cursor
    }

    /// Moves the cursor to an absolute position.
    pub fn set_xy(&mut self, x: f64, y: f64) -> Position {
        self.cursor = Position::new(x, y);
        self.cursor
    }

    /// Returns to the left margin and moves down by `height`.
    pub fn line_break(&mut self, height: f64) -> Position {
        self.cursor = Position::new(self.margins.left, self.cursor.y + height);
        self.cursor
    }

    /// Writes `text` inline on a line of the given height and advances past it.
    ///
    /// Text that does not fit before the right margin wraps at the last space,
    /// or mid-word when there is none, and continues from the left margin one
    /// `height` lower.  A `\n` forces a break.
    pub fn write(&mut self, height: f64, text: &str) -> Position {
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let chars: Vec<char> = text.chars().collect();

        let mut start = 0;
        let mut separator = None;
        let mut index = 0;
        while index < chars.len() {
            if chars[index] == '\n' {
                self.write_line(height, &text[offsets[start]..offsets[index]]);
                index += 1;
                start = index;
                separator = None;
                continue;
            }
            if chars[index] == ' ' {
                separator = Some(index);
            }

            let run = self.font.width_of(&text[offsets[start]..offsets[index + 1]]);
            if run <= self.available_width() {
                index += 1;
                continue;
            }

            match separator {
                None if self.cursor.x > self.margins.left => {
                    // Nothing to break at on this line, retry the word on a fresh one.
                    self.cursor = Position::new(self.margins.left, self.cursor.y + height);
                    index = start;
                    continue;
                }
                None => {
                    let end = if index == start { index + 1 } else { index };
                    self.write_line(height, &text[offsets[start]..offsets[end]]);
                    index = end;
                }
                Some(space) => {
                    self.write_line(height, &text[offsets[start]..offsets[space]]);
                    index = space + 1;
                }
            }
            start = index;
            separator = None;
        }

        if start < chars.len() {
            let rest = &text[offsets[start]..];
            let width = self.font.width_of(rest);
            self.push_text(self.cursor.x + CELL_PADDING_MM, height, rest, width);
            self.cursor.x += width;
        }
        self.cursor
    }

    /// Writes each span inline, switching face per span.
    ///
    /// The face active before the call is restored afterwards.
    pub fn write_spans<'a, I>(&mut self, height: f64, spans: I) -> Position
    where
        I: IntoIterator<Item = &'a Span>,
    {
        let (style, underline) = (self.font.style, self.underline);
        for span in spans {
            self.set_style(span.font_style(), underline);
            self.write(height, span.text());
        }
        self.set_style(style, underline);
        self.cursor
    }

    /// Draws a cell at the cursor and advances past it.
    pub fn cell(&mut self, cell: Cell) -> Position {
        let width = if cell.width == 0.0 {
            self.page.width - self.margins.right - self.cursor.x
        } else {
            cell.width
        };

        let paint = match (cell.fill, cell.border) {
            (true, true) => Some(Paint::FillStroke),
            (true, false) => Some(Paint::Fill),
            (false, true) => Some(Paint::Stroke),
            (false, false) => None,
        };
        if let Some(paint) = paint {
            self.rect(self.cursor, width, cell.height, paint);
        }

        if !cell.text.is_empty() {
            let text_width = self.font.width_of(&cell.text);
            let x = match cell.alignment {
                HorizontalAlignment::Left => self.cursor.x + CELL_PADDING_MM,
                HorizontalAlignment::Center => self.cursor.x + (width - text_width) / 2.0,
                HorizontalAlignment::Right => {
                    self.cursor.x + width - CELL_PADDING_MM - text_width
                }
            };
            self.push_text(x, cell.height, &cell.text, text_width);
        }

        if cell.line_break {
            self.cursor = Position::new(self.margins.left, self.cursor.y + cell.height);
        } else {
            self.cursor.x += width;
        }
        self.cursor
    }

    /// Draws a rectangle with the current fill color.  The cursor does not move.
    pub fn rect(&mut self, origin: Position, width: f64, height: f64, paint: Paint) {
        self.instructions.push(Instruction::Rect {
            origin,
            width,
            height,
            paint,
            fill: self.fill,
            line_width: self.line_width,
        });
    }

    /// Finishes the page.
    pub fn finish(self) -> Layout {
        Layout {
            page: self.page,
            instructions: self.instructions,
        }
    }

    fn available_width(&self) -> f64 {
        self.page.width - self.margins.right - self.cursor.x - 2.0 * CELL_PADDING_MM
    }

    fn write_line(&mut self, height: f64, text: &str) {
        if !text.is_empty() {
            let width = self.font.width_of(text);
            self.push_text(self.cursor.x + CELL_PADDING_MM, height, text, width);
        }
        self.cursor = Position::new(self.margins.left, self.cursor.y + height);
    }

    fn push_text(&mut self, x: f64, line_height: f64, text: &str, width: f64) {
        let size_mm = self.font.size_mm();
        let baseline = self.cursor.y + 0.5 * line_height + 0.3 * size_mm;
        self.instructions.push(Instruction::Text {
            origin: Position::new(x, baseline),
            font: self.font,
            text: text.to_owned(),
        });

        if self.underline {
            self.instructions.push(Instruction::Rect {
                origin: Position::new(x, baseline - UNDERLINE_POSITION / 1000.0 * size_mm),
                width,
                height: UNDERLINE_THICKNESS / 1000.0 * size_mm,
                paint: Paint::Fill,
                fill: Rgb::BLACK,
                line_width: self.line_width,
            });
        }
    }
}

/// The ordered drawing instructions of one page.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    page: PageSize,
    instructions: Vec<Instruction>,
}

impl Layout {
    /// Returns the page the instructions are laid out on.
    pub fn page(&self) -> PageSize {
        self.page
    }

    /// Returns the instructions in drawing order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterates over the text of all text instructions in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(Instruction::text)
    }

    /// Lists instructions with non-finite coordinates or that reach off the page.
    ///
    /// At most one issue is reported per instruction.
    pub fn issues(&self) -> Vec<LayoutIssue> {
        if self.instructions.is_empty() {
            return vec![LayoutIssue::Empty];
        }

        let mut issues = Vec::new();
        for (index, instruction) in self.instructions.iter().enumerate() {
            let (start, end) = instruction.bounds();
            for point in [start, end] {
                if !point.x.is_finite() || !point.y.is_finite() {
                    issues.push(LayoutIssue::NonFinite { index });
                    break;
                }
                let on_page = (0.0..=self.page.width).contains(&point.x)
                    && (0.0..=self.page.height).contains(&point.y);
                if !on_page {
                    issues.push(LayoutIssue::OutOfBounds {
                        index,
                        x: point.x,
                        y: point.y,
                        width: self.page.width,
                        height: self.page.height,
                    });
                    break;
                }
            }
        }
        issues
    }
}

impl IntoIterator for Layout {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}
