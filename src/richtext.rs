//! Inline text fragments used inside guide paragraphs.
//!
//! A [`Span`] carries the only inline styling the guide needs, bold, and converts into a
//! [`genpdf`] [`StyledString`] at render time.  The paragraph-level attributes (font size,
//! leading, color, alignment) live in [`crate::styles::ParagraphStyle`] and are merged with the
//! span style when the paragraph is laid out.

use genpdf::style::{Style, StyledString};

/// A slice of text together with inline style attributes.
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

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if self.bold {
            style.set_bold();
        }
        style
    }

    /// Converts the span to a [`StyledString`].
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }
}

impl From<&str> for Span {
    fn from(text: &str) -> Self {
        Span::new(text)
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        span.to_styled_string()
    }
}

impl From<Span> for StyledString {
    fn from(span: Span) -> Self {
        span.to_styled_string()
    }
}

/// Concatenates the text of all spans, dropping inline styling.
pub fn plain_text<'a, I>(spans: I) -> String
where
    I: IntoIterator<Item = &'a Span>,
{
    spans.into_iter().map(Span::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_span_converts_to_bold_style() {
        let styled = Span::new("スタック機能:").bold().to_styled_string();
        assert_eq!(styled.s, "スタック機能:");
        assert!(styled.style.is_bold());
        assert!(!styled.style.is_italic());
    }

    #[test]
    fn plain_span_has_no_inline_style() {
        let styled = StyledString::from(Span::from("黒が先手"));
        assert!(!styled.style.is_bold());
        assert!(!styled.style.is_italic());
        assert_eq!(styled.style.color(), None);
    }

    #[test]
    fn plain_text_joins_spans() {
        let spans = [Span::new("• "), Span::new("AI対戦:").bold(), Span::new(" CPU")];
        assert_eq!(plain_text(&spans), "• AI対戦: CPU");
    }
}
