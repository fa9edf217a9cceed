//! Document construction and rendering for the guide.

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use genpdf::elements::PageBreak;
use genpdf::error::Error;
use genpdf::style;
use genpdf::{self, Margins, PageDecorator, Size};
use log::{debug, info};

use crate::elements::{self, VerticalSpace};
use crate::error::{PdfBuildError, Result};
use crate::fonts::ResolvedFont;
use crate::model::{Block, RichParagraph};
use crate::story::Story;
use crate::styles::{StyleRole, StyleSet};

/// Page size and margins, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    width: f64,
    height: f64,
    /// Margins in `top`, `right`, `bottom`, `left` order.
    margins: [f64; 4],
}

impl PageGeometry {
    pub const A4_WIDTH_MM: f64 = 210.0;
    pub const A4_HEIGHT_MM: f64 = 297.0;

    /// An A4 page with the given margins.
    pub fn a4(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            width: Self::A4_WIDTH_MM,
            height: Self::A4_HEIGHT_MM,
            margins: [top, right, bottom, left],
        }
    }

    pub fn width_mm(&self) -> f64 {
        self.width
    }

    pub fn height_mm(&self) -> f64 {
        self.height
    }

    pub fn margins_mm(&self) -> [f64; 4] {
        self.margins
    }

    /// Width left for content between the left and right margins.
    pub fn content_width_mm(&self) -> f64 {
        self.width - self.margins[1] - self.margins[3]
    }

    pub fn paper_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn margins(&self) -> Margins {
        let [top, right, bottom, left] = self.margins;
        Margins::trbl(top, right, bottom, left)
    }
}

impl Default for PageGeometry {
    /// A4 with 25 mm top and bottom and 30 mm side margins.
    fn default() -> Self {
        Self::a4(25.0, 30.0, 25.0, 30.0)
    }
}

/// A rendered PDF held in memory.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl RenderedPdf {
    /// Writes the PDF to `path`, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, &self.bytes).map_err(|source| PdfBuildError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(())
    }
}

/// Builder for the guide document.
#[derive(Clone, Debug, Default)]
pub struct PdfBuilder {
    geometry: PageGeometry,
    title: Option<String>,
}

impl PdfBuilder {
    /// Creates a new builder with the default page geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size and margins.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Lays out `story` with `styles` on pages of the configured geometry and serialises it.
    ///
    /// The story is consumed: each block is converted into its `genpdf` element exactly once.
    pub fn render(self, font: ResolvedFont, styles: &StyleSet, story: Story) -> Result<RenderedPdf> {
        let font_name = font.name().to_owned();
        let tables: Vec<_> = story
            .blocks()
            .iter()
            .filter_map(|block| match block {
                Block::Table(table) => Some(table),
                _ => None,
            })
            .collect();
        elements::ensure_fonts_registered(&font_name, styles, &tables)?;

        let family = font.into_family()?;
        let mut document = genpdf::Document::new(family);
        document.set_paper_size(self.geometry.paper_size());
        if let Some(title) = self.title {
            document.set_title(title);
        }

        let pages = Rc::new(Cell::new(0));
        document.set_page_decorator(MarginPageDecorator::new(
            self.geometry.margins(),
            Rc::clone(&pages),
        ));

        let text = |role, paragraph: &RichParagraph| {
            elements::paragraph_element(paragraph, styles.get(role))
        };

        for block in story {
            match block {
                Block::Title(paragraph) => document.push(text(StyleRole::Title, &paragraph)),
                Block::Heading(paragraph) => document.push(text(StyleRole::Heading, &paragraph)),
                Block::SubHeading(paragraph) => {
                    document.push(text(StyleRole::SubHeading, &paragraph))
                }
                Block::Body(paragraph) => document.push(text(StyleRole::Body, &paragraph)),
                Block::Table(table) => document.push(elements::table_element(&table)?),
                Block::Spacer(height) => document.push(VerticalSpace::new(height)),
                Block::PageBreak => document.push(PageBreak::new()),
            }
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(PdfBuildError::Layout)?;
        let page_count = pages.get();
        debug!(
            "Rendered {} page(s) with font '{}' ({} bytes)",
            page_count,
            font_name,
            bytes.len()
        );

        Ok(RenderedPdf { bytes, page_count })
    }
}

/// Page decorator applying the page margins and counting rendered pages.
struct MarginPageDecorator {
    margins: Margins,
    pages: Rc<Cell<usize>>,
}

impl MarginPageDecorator {
    fn new(margins: Margins, pages: Rc<Cell<usize>>) -> Self {
        Self { margins, pages }
    }
}

impl PageDecorator for MarginPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        _context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        _style: style::Style,
    ) -> std::result::Result<genpdf::render::Area<'a>, Error> {
        self.pages.set(self.pages.get() + 1);
        area.add_margins(self.margins);
        Ok(area)
    }
}
