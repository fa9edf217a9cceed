//! Data structures describing the logical content of the guide.
//!
//! The types in this module mirror the building blocks the renderer hands to `genpdf`, but stay
//! independent of the layout engine's element types so the story can be inspected and tested
//! without rendering it.  Text blocks reference their paragraph style by [`StyleRole`]; tables
//! carry their own range-addressed styling rules.

use genpdf::style::Color;

use crate::richtext::{self, Span};
use crate::styles::StyleRole;

/// Horizontal alignment of paragraphs and table cells.
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

impl From<HorizontalAlignment> for genpdf::Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => genpdf::Alignment::Left,
            HorizontalAlignment::Center => genpdf::Alignment::Center,
            HorizontalAlignment::Right => genpdf::Alignment::Right,
        }
    }
}

/// Vertical alignment of table cell content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Paragraph made of inline-styled spans.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
}

impl RichParagraph {
    /// Creates a paragraph from the provided spans.
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
        }
    }

    /// Creates a paragraph holding a single unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Span::new(text)])
    }

    /// Returns the spans that make up the paragraph.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns the paragraph text without inline styling.
    pub fn plain_text(&self) -> String {
        richtext::plain_text(&self.spans)
    }
}

/// A single content block of the story.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Title(RichParagraph),
    Heading(RichParagraph),
    SubHeading(RichParagraph),
    Body(RichParagraph),
    Table(TableBlock),
    /// Fixed vertical gap, in millimetres.
    Spacer(f64),
    PageBreak,
}

/// Discriminant of a [`Block`], convenient for inspecting the shape of a story.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Title,
    Heading,
    SubHeading,
    Body,
    Table,
    Spacer,
    PageBreak,
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Title(_) => BlockKind::Title,
            Block::Heading(_) => BlockKind::Heading,
            Block::SubHeading(_) => BlockKind::SubHeading,
            Block::Body(_) => BlockKind::Body,
            Block::Table(_) => BlockKind::Table,
            Block::Spacer(_) => BlockKind::Spacer,
            Block::PageBreak => BlockKind::PageBreak,
        }
    }

    /// Paragraph style referenced by a text block; `None` for tables, spacers and page breaks.
    pub fn style_role(&self) -> Option<StyleRole> {
        match self {
            Block::Title(_) => Some(StyleRole::Title),
            Block::Heading(_) => Some(StyleRole::Heading),
            Block::SubHeading(_) => Some(StyleRole::SubHeading),
            Block::Body(_) => Some(StyleRole::Body),
            Block::Table(_) | Block::Spacer(_) | Block::PageBreak => None,
        }
    }

    /// Paragraph carried by a text block.
    pub fn paragraph(&self) -> Option<&RichParagraph> {
        match self {
            Block::Title(p) | Block::Heading(p) | Block::SubHeading(p) | Block::Body(p) => Some(p),
            Block::Table(_) | Block::Spacer(_) | Block::PageBreak => None,
        }
    }
}

/// Rectangular cell range addressed by `(column, row)` corners, both inclusive.
///
/// Negative indices count from the end, so `(0, 0)..(-1, -1)` covers the whole grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    start: (isize, isize),
    end: (isize, isize),
}

impl CellRange {
    pub fn new(start: (isize, isize), end: (isize, isize)) -> Self {
        Self { start, end }
    }

    /// The range covering every cell.
    pub fn all() -> Self {
        Self::new((0, 0), (-1, -1))
    }

    /// The range covering every cell of a single column.
    pub fn column(column: isize) -> Self {
        Self::new((column, 0), (column, -1))
    }

    /// Whether the cell at `(column, row)` lies inside the range for a grid of the given size.
    pub fn contains(&self, column: usize, row: usize, columns: usize, rows: usize) -> bool {
        let within = |index: usize, from: isize, to: isize, len: usize| {
            match (normalize(from, len), normalize(to, len)) {
                (Some(from), Some(to)) => from <= index && index <= to,
                _ => false,
            }
        };
        within(column, self.start.0, self.end.0, columns) && within(row, self.start.1, self.end.1, rows)
    }
}

fn normalize(index: isize, len: usize) -> Option<usize> {
    let len = isize::try_from(len).ok()?;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// Grid line definition; the width is given in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    pub width: f64,
    pub color: Color,
}

/// A single formatting directive applied over a [`CellRange`].
#[derive(Clone, Debug, PartialEq)]
pub enum TableDirective {
    Background(Color),
    TextColor(Color),
    Align(HorizontalAlignment),
    FontName(String),
    FontSize(u8),
    TopPadding(f64),
    BottomPadding(f64),
    LeftPadding(f64),
    RightPadding(f64),
    Grid(Border),
    VAlign(VerticalAlignment),
}

/// A directive together with the cells it applies to.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRule {
    pub range: CellRange,
    pub directive: TableDirective,
}

impl TableRule {
    pub fn new(range: CellRange, directive: TableDirective) -> Self {
        Self { range, directive }
    }
}

/// Effective styling of one cell after applying every matching rule in order.
#[derive(Clone, Debug, PartialEq)]
pub struct CellStyle {
    pub background: Option<Color>,
    pub text_color: Color,
    pub alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub font_name: Option<String>,
    pub font_size: u8,
    /// Paddings in points, in `top`, `right`, `bottom`, `left` order.
    pub padding: [f64; 4],
    pub border: Option<Border>,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            background: None,
            text_color: Color::Rgb(0, 0, 0),
            alignment: HorizontalAlignment::Left,
            vertical_alignment: VerticalAlignment::Bottom,
            font_name: None,
            font_size: 10,
            padding: [3.0, 6.0, 3.0, 6.0],
            border: None,
        }
    }
}

impl CellStyle {
    fn apply(&mut self, directive: &TableDirective) {
        match directive {
            TableDirective::Background(color) => self.background = Some(*color),
            TableDirective::TextColor(color) => self.text_color = *color,
            TableDirective::Align(alignment) => self.alignment = *alignment,
            TableDirective::FontName(name) => self.font_name = Some(name.clone()),
            TableDirective::FontSize(size) => self.font_size = *size,
            TableDirective::TopPadding(value) => self.padding[0] = *value,
            TableDirective::RightPadding(value) => self.padding[1] = *value,
            TableDirective::BottomPadding(value) => self.padding[2] = *value,
            TableDirective::LeftPadding(value) => self.padding[3] = *value,
            TableDirective::Grid(border) => self.border = Some(*border),
            TableDirective::VAlign(alignment) => self.vertical_alignment = *alignment,
        }
    }
}

/// A table of plain-text cells with fixed column widths and range-addressed styling rules.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    rows: Vec<Vec<String>>,
    column_widths_mm: Vec<f64>,
    rules: Vec<TableRule>,
}

impl TableBlock {
    /// Creates a table from its rows; every row is expected to have one cell per column width.
    pub fn new(rows: Vec<Vec<String>>, column_widths_mm: Vec<f64>) -> Self {
        Self {
            rows,
            column_widths_mm,
            rules: Vec::new(),
        }
    }

    /// Appends a styling rule and returns the updated table.
    pub fn with_rule(mut self, range: CellRange, directive: TableDirective) -> Self {
        self.rules.push(TableRule::new(range, directive));
        self
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths_mm.len()
    }

    pub fn column_widths_mm(&self) -> &[f64] {
        &self.column_widths_mm
    }

    pub fn rules(&self) -> &[TableRule] {
        &self.rules
    }

    /// Text of the cell at `(column, row)`.
    pub fn cell(&self, column: usize, row: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Resolves the effective style of the cell at `(column, row)`.
    pub fn cell_style(&self, column: usize, row: usize) -> CellStyle {
        let (columns, rows) = (self.column_count(), self.row_count());
        let mut style = CellStyle::default();
        for rule in &self.rules {
            if rule.range.contains(column, row, columns, rows) {
                style.apply(&rule.directive);
            }
        }
        style
    }

    /// Resolves the style of every cell, indexed as `[row][column]`.
    pub fn cell_styles(&self) -> Vec<Vec<CellStyle>> {
        (0..self.row_count())
            .map(|row| {
                (0..self.column_count())
                    .map(|column| self.cell_style(column, row))
                    .collect()
            })
            .collect()
    }
}
