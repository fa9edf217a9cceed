//! Paragraph styles for the guide.
//!
//! Styles are plain values: a small base stylesheet provides the `Normal` and `Heading1`-`3`
//! defaults, and the guide styles are derived from it by overriding individual attributes.  The
//! conversion into a [`genpdf::style::Style`] happens only at render time.

use genpdf::style::{Color, Style};

use crate::model::HorizontalAlignment;

/// Logical font name used when no font has been resolved yet.
pub const BASE_FONT_NAME: &str = "Helvetica";

/// Font line height relative to the font size for typical sans-serif metrics.
const FONT_LINE_HEIGHT_EM: f64 = 1.2;

/// Roles a text block can reference.  A [`StyleSet`] defines a style for every role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleRole {
    /// Document title.
    Title,
    /// Top-level section heading.
    Heading,
    /// Heading nested below a section heading.
    SubHeading,
    /// Body paragraph, including bullet lines.
    Body,
}

impl StyleRole {
    /// All roles in declaration order.
    pub const ALL: [StyleRole; 4] = [
        StyleRole::Title,
        StyleRole::Heading,
        StyleRole::SubHeading,
        StyleRole::Body,
    ];
}

/// A named, immutable bundle of paragraph presentation attributes.
///
/// Sizes and spacings are expressed in points.
#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphStyle {
    name: String,
    parent: Option<String>,
    font_name: String,
    font_size: u8,
    leading: f64,
    text_color: Color,
    alignment: HorizontalAlignment,
    space_before: f64,
    space_after: f64,
    bold: bool,
    italic: bool,
}

impl ParagraphStyle {
    fn base(name: &str, font_size: u8, leading: f64) -> Self {
        Self {
            name: name.to_owned(),
            parent: None,
            font_name: BASE_FONT_NAME.to_owned(),
            font_size,
            leading,
            text_color: Color::Rgb(0, 0, 0),
            alignment: HorizontalAlignment::Left,
            space_before: 0.0,
            space_after: 0.0,
            bold: false,
            italic: false,
        }
    }

    /// Creates a new style named `name` that inherits every attribute from `self`.
    pub fn derive(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(self.name.clone()),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the style this one was derived from, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    pub fn leading(&self) -> f64 {
        self.leading
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn space_before(&self) -> f64 {
        self.space_before
    }

    pub fn space_after(&self) -> f64 {
        self.space_after
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Switches to `font_name`.  The face is part of the font name, so bold and italic are
    /// reset to the regular face.
    pub fn with_font_name(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self.bold = false;
        self.italic = false;
        self
    }

    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_leading(mut self, leading: f64) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_space_before(mut self, space_before: f64) -> Self {
        self.space_before = space_before;
        self
    }

    pub fn with_space_after(mut self, space_after: f64) -> Self {
        self.space_after = space_after;
        self
    }

    fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Line spacing factor handed to `genpdf`, which multiplies the font's own line height.
    pub fn line_spacing(&self) -> f64 {
        let natural = f64::from(self.font_size) * FONT_LINE_HEIGHT_EM;
        if natural <= f64::EPSILON {
            return 1.0;
        }
        (self.leading / natural).max(1.0)
    }

    /// Builds the `genpdf` text style for this paragraph style.
    ///
    /// Alignment and vertical spacing are not part of a `genpdf` text style; the renderer applies
    /// them to the paragraph element directly.
    pub fn to_genpdf_style(&self) -> Style {
        let mut style = Style::new()
            .with_font_size(self.font_size)
            .with_line_spacing(self.line_spacing())
            .with_color(self.text_color);
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }
}

/// The base stylesheet the guide styles are derived from.
#[derive(Clone, Debug)]
pub struct SampleStyleSheet {
    pub normal: ParagraphStyle,
    pub heading1: ParagraphStyle,
    pub heading2: ParagraphStyle,
    pub heading3: ParagraphStyle,
}

impl Default for SampleStyleSheet {
    fn default() -> Self {
        let normal = ParagraphStyle::base("Normal", 10, 12.0);
        let heading1 = normal
            .derive("Heading1")
            .with_font_size(18)
            .with_leading(22.0)
            .with_space_after(6.0)
            .with_bold(true);
        let heading2 = normal
            .derive("Heading2")
            .with_font_size(14)
            .with_leading(18.0)
            .with_space_before(12.0)
            .with_space_after(6.0)
            .with_bold(true);
        let heading3 = normal
            .derive("Heading3")
            .with_font_size(12)
            .with_leading(14.4)
            .with_space_before(12.0)
            .with_space_after(6.0)
            .with_bold(true)
            .with_italic(true);

        Self {
            normal,
            heading1,
            heading2,
            heading3,
        }
    }
}

/// The four paragraph styles used by the guide, all referencing the same logical font.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSet {
    title: ParagraphStyle,
    heading: ParagraphStyle,
    sub_heading: ParagraphStyle,
    body: ParagraphStyle,
}

impl StyleSet {
    /// Builds the guide styles for `font_name`.  Total and deterministic for any font name.
    pub fn new(font_name: &str) -> Self {
        let sample = SampleStyleSheet::default();

        let title = sample
            .heading1
            .derive("CustomTitle")
            .with_font_size(32)
            .with_text_color(Color::Rgb(0x1a, 0x47, 0x2a))
            .with_space_after(30.0)
            .with_alignment(HorizontalAlignment::Center)
            .with_font_name(font_name)
            .with_leading(40.0);

        let heading = sample
            .heading2
            .derive("CustomHeading")
            .with_font_size(18)
            .with_text_color(Color::Rgb(0x2d, 0x5a, 0x3d))
            .with_space_after(12.0)
            .with_space_before(20.0)
            .with_font_name(font_name)
            .with_leading(24.0);

        let body = sample
            .normal
            .derive("CustomBody")
            .with_font_size(11)
            .with_text_color(Color::Rgb(0, 0, 0))
            .with_space_after(8.0)
            .with_alignment(HorizontalAlignment::Left)
            .with_font_name(font_name)
            .with_leading(16.0);

        let sub_heading = sample
            .heading3
            .derive("CustomSubHeading")
            .with_font_size(13)
            .with_text_color(Color::Rgb(0x4a, 0x7c, 0x59))
            .with_space_after(8.0)
            .with_space_before(12.0)
            .with_font_name(font_name)
            .with_leading(18.0);

        Self {
            title,
            heading,
            sub_heading,
            body,
        }
    }

    /// Returns the style defined for `role`.
    pub fn get(&self, role: StyleRole) -> &ParagraphStyle {
        match role {
            StyleRole::Title => &self.title,
            StyleRole::Heading => &self.heading,
            StyleRole::SubHeading => &self.sub_heading,
            StyleRole::Body => &self.body,
        }
    }

    /// Iterates over all styles together with their role.
    pub fn iter(&self) -> impl Iterator<Item = (StyleRole, &ParagraphStyle)> {
        StyleRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(styles: &StyleSet) -> Vec<(StyleRole, String, u8, Color, HorizontalAlignment)> {
        styles
            .iter()
            .map(|(role, style)| {
                (
                    role,
                    style.name().to_owned(),
                    style.font_size(),
                    style.text_color(),
                    style.alignment(),
                )
            })
            .collect()
    }

    #[test]
    fn shape_is_independent_of_font_name() {
        let japanese = StyleSet::new("Japanese");
        let fallback = StyleSet::new("Helvetica");
        let odd = StyleSet::new("");

        assert_eq!(shape(&japanese), shape(&fallback));
        assert_eq!(shape(&japanese), shape(&odd));
        assert_eq!(japanese.iter().count(), 4);
    }

    #[test]
    fn every_style_uses_the_supplied_font() {
        let styles = StyleSet::new("Japanese");
        assert!(styles.iter().all(|(_, style)| style.font_name() == "Japanese"));
    }

    #[test]
    fn building_twice_is_deterministic() {
        assert_eq!(StyleSet::new("Japanese"), StyleSet::new("Japanese"));
    }

    #[test]
    fn guide_styles_override_their_parents() {
        let styles = StyleSet::new("Japanese");

        let title = styles.get(StyleRole::Title);
        assert_eq!(title.parent(), Some("Heading1"));
        assert_eq!(title.font_size(), 32);
        assert_eq!(title.leading(), 40.0);
        assert_eq!(title.alignment(), HorizontalAlignment::Center);
        assert_eq!(title.text_color(), Color::Rgb(0x1a, 0x47, 0x2a));
        assert_eq!(title.space_after(), 30.0);

        let heading = styles.get(StyleRole::Heading);
        assert_eq!(heading.parent(), Some("Heading2"));
        assert_eq!(heading.font_size(), 18);
        assert_eq!(heading.space_before(), 20.0);
        assert_eq!(heading.space_after(), 12.0);

        let sub_heading = styles.get(StyleRole::SubHeading);
        assert_eq!(sub_heading.parent(), Some("Heading3"));
        assert_eq!(sub_heading.font_size(), 13);
        assert_eq!(sub_heading.text_color(), Color::Rgb(0x4a, 0x7c, 0x59));

        let body = styles.get(StyleRole::Body);
        assert_eq!(body.parent(), Some("Normal"));
        assert_eq!(body.font_size(), 11);
        assert_eq!(body.leading(), 16.0);
        assert_eq!(body.alignment(), HorizontalAlignment::Left);
    }

    #[test]
    fn guide_styles_use_the_regular_face() {
        let sample = SampleStyleSheet::default();
        assert!(sample.heading1.is_bold());
        assert!(sample.heading3.is_italic());

        for font in ["Japanese", "Helvetica"] {
            let styles = StyleSet::new(font);
            for (role, style) in styles.iter() {
                assert!(!style.is_bold(), "{role:?} should not be bold");
                assert!(!style.is_italic(), "{role:?} should not be italic");

                let rendered = style.to_genpdf_style();
                assert!(!rendered.is_bold());
                assert!(!rendered.is_italic());
            }
        }
    }

    #[test]
    fn line_spacing_never_shrinks_below_font_height() {
        let style = ParagraphStyle::base("Tight", 20, 10.0);
        assert_eq!(style.line_spacing(), 1.0);

        let body = StyleSet::new("Japanese").get(StyleRole::Body).clone();
        assert!(body.line_spacing() > 1.0);
    }
}
