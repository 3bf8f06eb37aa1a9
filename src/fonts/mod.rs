//! Built-in font handling for the invoice renderer.
//!
//! The renderer only uses the Helvetica family from the PDF base-14 set, which
//! every conforming viewer ships with.  Nothing has to be embedded or located on
//! disk, but text still has to be measured for alignment, so the glyph widths of
//! the printable ASCII range are tabulated here (in 1/1000 em, as published in
//! the Adobe core font metrics).  Characters outside that range fall back to
//! [`FALLBACK_WIDTH`].

use log::warn;

/// Number of PDF points in one millimetre.
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Width used for glyphs without a tabulated metric.
pub const FALLBACK_WIDTH: u16 = 556;

/// Underline offset below the baseline, in 1/1000 em.
pub const UNDERLINE_POSITION: f64 = -100.0;

/// Underline bar thickness, in 1/1000 em.
pub const UNDERLINE_THICKNESS: f64 = 50.0;

const FIRST_TABULATED: u32 = 32;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Weight of a base-14 Helvetica face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontStyle {
    /// Helvetica.
    #[default]
    Regular,
    /// Helvetica-Bold.
    Bold,
}

impl FontStyle {
    /// All faces the renderer registers as page resources.
    pub const ALL: [FontStyle; 2] = [FontStyle::Regular, FontStyle::Bold];

    /// Returns the resource name the face is registered under in page resources.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
        }
    }

    /// Returns the PostScript name of the base-14 face.
    pub fn base_font(self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            FontStyle::Regular => &HELVETICA_WIDTHS,
            FontStyle::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Returns the advance width of `ch` in 1/1000 em.
    pub fn char_width(self, ch: char) -> u16 {
        let code = ch as u32;
        code.checked_sub(FIRST_TABULATED)
            .and_then(|index| self.widths().get(index as usize))
            .copied()
            .unwrap_or(FALLBACK_WIDTH)
    }
}

/// Converts a length in points to millimetres.
pub fn pt_to_mm(points: f64) -> f64 {
    points / POINTS_PER_MM
}

/// Converts a length in millimetres to points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Measures `text` set in `style` at `size` points and returns the width in millimetres.
pub fn string_width(text: &str, style: FontStyle, size: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| u32::from(style.char_width(ch))).sum();
    pt_to_mm(f64::from(units) * size / 1000.0)
}

fn win_ansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match ch {
            '€' => Some(0x80),
            '‚' => Some(0x82),
            'ƒ' => Some(0x83),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '†' => Some(0x86),
            '‡' => Some(0x87),
            'ˆ' => Some(0x88),
            '‰' => Some(0x89),
            'Š' => Some(0x8A),
            '‹' => Some(0x8B),
            'Œ' => Some(0x8C),
            'Ž' => Some(0x8E),
            '‘' => Some(0x91),
            '’' => Some(0x92),
            '“' => Some(0x93),
            '”' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '˜' => Some(0x98),
            '™' => Some(0x99),
            'š' => Some(0x9A),
            '›' => Some(0x9B),
            'œ' => Some(0x9C),
            'ž' => Some(0x9E),
            'Ÿ' => Some(0x9F),
            _ => None,
        },
    }
}

/// Encodes `text` for a base-14 font using WinAnsiEncoding.
///
/// Characters without a WinAnsi code point are replaced by `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut replaced = 0usize;
    let bytes = text
        .chars()
        .map(|ch| {
            win_ansi_byte(ch).unwrap_or_else(|| {
                replaced += 1;
                b'?'
            })
        })
        .collect();

    if replaced > 0 {
        warn!(
            "Replaced {} character(s) without a WinAnsi code point in '{}'",
            replaced, text
        );
    }

    bytes
}
