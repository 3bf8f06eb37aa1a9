//! Utilities for working with styled text fragments.
//!
//! A [`Span`] is a piece of text that is either regular or bold.  Sequences of
//! spans are written one after another on the same line by
//! [`crate::layout::LayoutContext::write_spans`], which is how labelled fields
//! such as `Company Name: <value>` mix a regular label with a bold value.

use crate::fonts::FontStyle;

/// A slice of text together with its font weight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Returns the font face the span is set in.
    pub fn font_style(&self) -> FontStyle {
        if self.bold {
            FontStyle::Bold
        } else {
            FontStyle::Regular
        }
    }
}

/// Builds the `label` + bold `value` pair used for labelled fields.
pub fn labelled(label: impl Into<String>, value: impl Into<String>) -> [Span; 2] {
    [Span::new(label), Span::new(value).bold()]
}
