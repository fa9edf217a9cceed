//! End-to-end generation of the guide PDF.

use std::path::PathBuf;

use log::info;

use crate::builder::{PageGeometry, PdfBuilder};
use crate::content;
use crate::error::Result;
use crate::fonts::FontResolver;
use crate::story;
use crate::styles::StyleSet;

/// File name of the guide, written relative to the working directory by default.
pub const DEFAULT_OUTPUT_FILE: &str = "Stack_Othello_説明資料.pdf";

/// Inputs of a generation run.  The defaults reproduce the fixed guide.
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    pub output: PathBuf,
    pub fonts: FontResolver,
    pub geometry: PageGeometry,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            fonts: FontResolver::default(),
            geometry: PageGeometry::default(),
        }
    }
}

/// Summary of a successful run.
#[derive(Clone, Debug)]
pub struct GeneratedGuide {
    pub path: PathBuf,
    pub font_name: String,
    pub size: usize,
    pub page_count: usize,
}

/// Resolves the font, builds styles and story, renders them and writes the output file.
pub fn generate(options: &GenerateOptions) -> Result<GeneratedGuide> {
    let font = options.fonts.resolve();
    let font_name = font.name().to_owned();

    let styles = StyleSet::new(&font_name);
    let story = story::build_story(&styles);
    info!("Built story of {} blocks using font '{}'", story.len(), font_name);

    let pdf = PdfBuilder::new()
        .with_geometry(options.geometry)
        .with_title(content::DOCUMENT_TITLE)
        .render(font, &styles, story)?;
    pdf.write_to(&options.output)?;

    Ok(GeneratedGuide {
        path: options.output.clone(),
        font_name,
        size: pdf.bytes.len(),
        page_count: pdf.page_count,
    })
}
