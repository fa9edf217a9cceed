//! Assembly of the guide's ordered block list.

use genpdf::style::Color;

use crate::content::{self, BulletLine, Subsection};
use crate::model::{
    Block, Border, CellRange, HorizontalAlignment, RichParagraph, TableBlock, TableDirective,
    VerticalAlignment,
};
use crate::richtext::Span;
use crate::styles::{StyleRole, StyleSet};

const FEATURE_LABEL_BACKGROUND: Color = Color::Rgb(0xe8, 0xf5, 0xe9);
const GRID_COLOR: Color = Color::Rgb(0x80, 0x80, 0x80);

/// Ordered, append-only sequence of blocks.  Block order equals document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Story {
    blocks: Vec<Block>,
}

impl Story {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block at the end of the story.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    fn text(&mut self, role: StyleRole, paragraph: RichParagraph) {
        let block = match role {
            StyleRole::Title => Block::Title(paragraph),
            StyleRole::Heading => Block::Heading(paragraph),
            StyleRole::SubHeading => Block::SubHeading(paragraph),
            StyleRole::Body => Block::Body(paragraph),
        };
        self.push(block);
    }

    fn plain(&mut self, role: StyleRole, text: &str) {
        self.text(role, RichParagraph::plain(text));
    }

    fn bullets(&mut self, lines: &[BulletLine]) {
        for line in lines {
            self.text(StyleRole::Body, bullet_paragraph(line));
        }
    }

    fn subsections(&mut self, subsections: &[Subsection]) {
        for subsection in subsections {
            self.plain(StyleRole::SubHeading, subsection.title);
            self.bullets(subsection.lines);
        }
    }
}

impl IntoIterator for Story {
    type Item = Block;
    type IntoIter = std::vec::IntoIter<Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

fn bullet_paragraph(line: &BulletLine) -> RichParagraph {
    match line.label {
        Some(label) => RichParagraph::new(vec![
            Span::new(content::BULLET),
            Span::new(label).bold(),
            Span::new(format!(" {}", line.text)),
        ]),
        None => RichParagraph::plain(format!("{}{}", content::BULLET, line.text)),
    }
}

/// Builds the features table with its cell styling rules.  `font_name` is the logical font of
/// the cell text.
pub fn features_table(font_name: &str) -> TableBlock {
    let rows = content::FEATURES
        .iter()
        .map(|(label, description)| vec![(*label).to_owned(), (*description).to_owned()])
        .collect();

    TableBlock::new(rows, content::FEATURE_COLUMN_WIDTHS_MM.to_vec())
        .with_rule(
            CellRange::column(0),
            TableDirective::Background(FEATURE_LABEL_BACKGROUND),
        )
        .with_rule(
            CellRange::all(),
            TableDirective::TextColor(Color::Rgb(0, 0, 0)),
        )
        .with_rule(
            CellRange::all(),
            TableDirective::Align(HorizontalAlignment::Left),
        )
        .with_rule(
            CellRange::all(),
            TableDirective::FontName(font_name.to_owned()),
        )
        .with_rule(CellRange::all(), TableDirective::FontSize(10))
        .with_rule(CellRange::all(), TableDirective::BottomPadding(8.0))
        .with_rule(CellRange::all(), TableDirective::TopPadding(8.0))
        .with_rule(
            CellRange::all(),
            TableDirective::Grid(Border {
                width: 1.0,
                color: GRID_COLOR,
            }),
        )
        .with_rule(
            CellRange::all(),
            TableDirective::VAlign(VerticalAlignment::Middle),
        )
}

/// Builds the complete guide story.
///
/// The content is static; `styles` only supplies the font name used by the table rules, so the
/// shape of the result never depends on which font was resolved.
pub fn build_story(styles: &StyleSet) -> Story {
    let mut story = Story::new();

    story.plain(StyleRole::Title, content::TITLE);
    story.push(Block::Spacer(content::TITLE_GAP_MM));

    story.plain(StyleRole::Heading, content::OVERVIEW_HEADING);
    story.plain(StyleRole::Body, content::OVERVIEW);
    story.push(Block::Spacer(content::SECTION_GAP_MM));

    story.plain(StyleRole::Heading, content::FEATURES_HEADING);
    story.push(Block::Table(features_table(
        styles.get(StyleRole::Body).font_name(),
    )));
    story.push(Block::Spacer(content::SECTION_GAP_MM));

    story.plain(StyleRole::Heading, content::RULES_HEADING);
    story.plain(StyleRole::Body, content::RULES_INTRO);
    story.bullets(&content::RULES);
    story.push(Block::Spacer(content::SECTION_GAP_MM));

    story.plain(StyleRole::Heading, content::CONTROLS_HEADING);
    story.subsections(&content::CONTROLS);
    story.push(Block::Spacer(content::SECTION_GAP_MM));

    story.plain(StyleRole::Heading, content::GAME_MODES_HEADING);
    story.plain(StyleRole::Body, content::GAME_MODES_INTRO);
    story.subsections(&content::GAME_MODES);

    story
}
