//! Conversion of story blocks into `genpdf` elements.
//!
//! `genpdf`'s own paragraph only breaks lines at spaces and silently drops a word wider than the
//! column, which loses most Japanese sentences.  Text blocks are therefore laid out by
//! [`TextBlock`], which may break between any two CJK characters.  Tables are drawn by
//! [`GridTable`], which measures every row before drawing so cell backgrounds end up underneath
//! the text.  The layout engine has no fixed-height gap element, so [`VerticalSpace`] provides
//! one.

use std::collections::VecDeque;

use genpdf::elements::PaddedElement;
use genpdf::error::Error;
use genpdf::fonts::FontCache;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Alignment, Element, Margins, Mm, Position, RenderResult, Size};

use crate::error::PdfBuildError;
use crate::model::{CellStyle, RichParagraph, TableBlock, VerticalAlignment};
use crate::richtext::Span;
use crate::styles::{ParagraphStyle, StyleSet};

/// Stroke width `genpdf` draws every line with; it never changes the PDF default pen.
const PEN_WIDTH_PT: f64 = 1.0;

/// Characters that must not start a line.
const NO_BREAK_BEFORE: &str = "、。，．：；？！）」』】〕ー";

/// Converts a length in points into `genpdf` millimetres.
pub fn pt_to_mm(value: f64) -> Mm {
    let mm: printpdf::Mm = printpdf::Pt(value).into();
    Mm::from(mm)
}

/// Extracts the raw millimetre value of a `genpdf` length.
pub fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// A fixed vertical gap.
///
/// When less space than requested is left on the page the gap is truncated instead of being
/// carried over, so a gap never starts a new page on its own.
pub struct VerticalSpace {
    height: Mm,
}

impl VerticalSpace {
    /// Creates a gap of `height_mm` millimetres.
    pub fn new(height_mm: f64) -> Self {
        Self {
            height: Mm::from(height_mm),
        }
    }
}

impl Element for VerticalSpace {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };

        let mut result = RenderResult::default();
        result.size = Size::new(0, height);
        Ok(result)
    }
}

/// A laid-out line of text.
#[derive(Clone, Debug, Default)]
pub(crate) struct Line {
    fragments: Vec<StyledString>,
    width: Mm,
    last_span: Option<usize>,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn push(&mut self, span: usize, text: &str, style: Style, width: Mm) {
        match self.fragments.last_mut() {
            Some(fragment) if self.last_span == Some(span) => fragment.s.push_str(text),
            _ => self.fragments.push(StyledString::new(text, style)),
        }
        self.last_span = Some(span);
        self.width += width;
    }

    /// Drops trailing whitespace and measures the final width.
    fn finish(mut self, font_cache: &FontCache) -> Self {
        if let Some(fragment) = self.fragments.last_mut() {
            let trimmed = fragment.s.trim_end().len();
            fragment.s.truncate(trimmed);
        }
        self.fragments.retain(|fragment| !fragment.s.is_empty());
        self.width = self
            .fragments
            .iter()
            .map(|fragment| fragment.width(font_cache))
            .sum();
        self
    }

    pub(crate) fn text(&self) -> String {
        self.fragments.iter().map(|fragment| fragment.s.as_str()).collect()
    }

    pub(crate) fn width(&self) -> Mm {
        self.width
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_ascii_punctuation()
}

/// Splits `text` at line break opportunities.
///
/// Runs of ASCII word characters stay together; any other character may start a unit, except
/// whitespace and closing punctuation, which stick to the unit before them.
fn break_units(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;
    let mut previous: Option<char> = None;

    for (index, c) in text.char_indices() {
        if let Some(prev) = previous {
            let joins = c.is_whitespace()
                || NO_BREAK_BEFORE.contains(c)
                || (is_word_char(prev) && is_word_char(c));
            if !joins {
                units.push(&text[start..index]);
                start = index;
            }
        }
        previous = Some(c);
    }
    if start < text.len() {
        units.push(&text[start..]);
    }
    units
}

/// Breaks `spans` into lines no wider than `width`.
///
/// A unit that is wider than a whole line on its own is split between characters.
pub(crate) fn layout_lines(spans: &[StyledString], font_cache: &FontCache, width: Mm) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = Line::default();

    let mut place = |current: &mut Line, span: usize, unit: &str, style: Style| {
        let unit_width = style.str_width(font_cache, unit);
        if !current.is_empty() && current.width + unit_width > width {
            lines.push(std::mem::take(current).finish(font_cache));
        }
        let unit = if current.is_empty() {
            unit.trim_start()
        } else {
            unit
        };
        if !unit.is_empty() {
            let unit_width = style.str_width(font_cache, unit);
            current.push(span, unit, style, unit_width);
        }
    };

    for (index, span) in spans.iter().enumerate() {
        for unit in break_units(&span.s) {
            if span.style.str_width(font_cache, unit) > width {
                let mut buf = [0; 4];
                for c in unit.chars() {
                    place(&mut current, index, &*c.encode_utf8(&mut buf), span.style);
                }
            } else {
                place(&mut current, index, unit, span.style);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current.finish(font_cache));
    }
    lines
}

fn alignment_offset(alignment: Alignment, line_width: Mm, available: Mm) -> Mm {
    let offset = match alignment {
        Alignment::Left => Mm::from(0),
        Alignment::Center => (available - line_width) / 2.0,
        Alignment::Right => available - line_width,
    };
    offset.max(Mm::from(0))
}

/// Prints one line at `position`; returns `false` when it does not fit into `area`.
fn print_line(
    area: &render::Area<'_>,
    font_cache: &FontCache,
    position: Position,
    line: &Line,
    style: Style,
) -> Result<bool, Error> {
    match area.text_section(font_cache, position, style) {
        Some(mut section) => {
            for fragment in &line.fragments {
                section.print_str(&fragment.s, fragment.style)?;
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

/// A paragraph of styled spans, wrapped to the available width and split across pages.
pub struct TextBlock {
    spans: Vec<StyledString>,
    style: Style,
    alignment: Alignment,
    lines: Option<VecDeque<Line>>,
}

impl TextBlock {
    pub fn new(spans: Vec<StyledString>, style: Style, alignment: Alignment) -> Self {
        Self {
            spans,
            style,
            alignment,
            lines: None,
        }
    }
}

impl Element for TextBlock {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let font_cache = &context.font_cache;
        let width = area.size().width;

        // Merging styles keeps the parent's line spacing, so the own factor is restored.
        let mut style = style.and(self.style);
        style.set_line_spacing(self.style.line_spacing());

        let spans = &self.spans;
        let lines = self.lines.get_or_insert_with(|| {
            let merged: Vec<StyledString> = spans
                .iter()
                .map(|span| StyledString::new(span.s.clone(), style.and(span.style)))
                .collect();
            layout_lines(&merged, font_cache, width).into()
        });

        let line_height = style.line_height(font_cache);
        let mut result = RenderResult::default();
        while let Some(line) = lines.front() {
            let y = result.size.height;
            let position = Position::new(alignment_offset(self.alignment, line.width, width), y);
            if y + line_height > area.size().height
                || !print_line(&area, font_cache, position, line, style)?
            {
                result.has_more = true;
                break;
            }
            result.size.width = result.size.width.max(line.width);
            result.size.height += line_height;
            lines.pop_front();
        }
        Ok(result)
    }
}

/// Builds the element for a text block rendered with `style`.
pub fn paragraph_element(
    paragraph: &RichParagraph,
    style: &ParagraphStyle,
) -> PaddedElement<TextBlock> {
    let spans = paragraph
        .spans()
        .iter()
        .map(Span::to_styled_string)
        .collect();

    TextBlock::new(spans, style.to_genpdf_style(), style.alignment().into()).padded(
        Margins::trbl(
            pt_to_mm(style.space_before()),
            0,
            pt_to_mm(style.space_after()),
            0,
        ),
    )
}

/// Paints a filled rectangle of `size` at the area origin.
///
/// `genpdf` can only stroke paths, so the rectangle is covered with overlapping horizontal
/// strokes of the default pen.
fn fill_rect(area: &render::Area<'_>, size: Size, color: Color) {
    let height = mm_to_f64(size.height);
    if height <= 0.0 {
        return;
    }
    let pen = mm_to_f64(pt_to_mm(PEN_WIDTH_PT));
    let span = (height - pen).max(0.0);
    let strokes = (span / (pen * 0.8)).ceil() as usize + 1;
    let style = Style::new().with_color(color);

    for index in 0..strokes {
        let y = if strokes == 1 {
            height / 2.0
        } else {
            pen / 2.0 + span * index as f64 / (strokes - 1) as f64
        };
        area.draw_line(vec![Position::new(0, y), Position::new(size.width, y)], style);
    }
}

fn stroke_rect(area: &render::Area<'_>, size: Size, color: Color) {
    area.draw_line(
        vec![
            Position::new(0, 0),
            Position::new(size.width, 0),
            Position::new(size.width, size.height),
            Position::new(0, size.height),
            Position::new(0, 0),
        ],
        Style::new().with_color(color),
    );
}

struct GridCell {
    text: String,
    style: CellStyle,
}

/// A cell whose lines have been laid out for a known column width.
struct MeasuredCell {
    lines: Vec<Line>,
    text_style: Style,
    /// Padding in `top`, `right`, `bottom`, `left` order.
    padding: [Mm; 4],
    line_height: Mm,
    height: Mm,
}

impl GridCell {
    fn measure(&self, font_cache: &FontCache, inherited: Style, width: Mm) -> MeasuredCell {
        let padding = self.style.padding.map(pt_to_mm);
        let text_style = inherited.and(
            Style::new()
                .with_font_size(self.style.font_size)
                .with_color(self.style.text_color),
        );
        let inner_width = width - padding[1] - padding[3];
        let lines = layout_lines(
            &[StyledString::new(self.text.as_str(), text_style)],
            font_cache,
            inner_width,
        );
        let line_height = text_style.line_height(font_cache);
        let height = line_height * lines.len() as f64 + padding[0] + padding[2];

        MeasuredCell {
            lines,
            text_style,
            padding,
            line_height,
            height,
        }
    }

    /// Draws background, text and border into `area`, whose size is the cell's size.
    fn draw(
        &self,
        area: &render::Area<'_>,
        font_cache: &FontCache,
        cell: &MeasuredCell,
    ) -> Result<(), Error> {
        let size = area.size();
        if let Some(color) = self.style.background {
            fill_rect(area, size, color);
        }

        let [top, right, bottom, left] = cell.padding;
        let inner_width = size.width - left - right;
        let free = size.height - top - bottom - cell.line_height * cell.lines.len() as f64;
        let shift = match self.style.vertical_alignment {
            VerticalAlignment::Top => Mm::from(0),
            VerticalAlignment::Middle => free / 2.0,
            VerticalAlignment::Bottom => free,
        };
        let alignment = self.style.alignment.into();

        let mut y = top + shift;
        for line in &cell.lines {
            let x = left + alignment_offset(alignment, line.width, inner_width);
            if !print_line(area, font_cache, Position::new(x, y), line, cell.text_style)? {
                break;
            }
            y += cell.line_height;
        }

        if let Some(border) = self.style.border {
            stroke_rect(area, size, border.color);
        }
        Ok(())
    }
}

/// Table of plain-text cells with per-cell background, grid, padding and alignment.
///
/// Rows are never split; a row that does not fit moves to the next page.
pub struct GridTable {
    weights: Vec<f64>,
    rows: Vec<Vec<GridCell>>,
    next_row: usize,
}

impl Element for GridTable {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let font_cache = &context.font_cache;
        let width = area.size().width;
        let total: f64 = self.weights.iter().sum();
        let widths: Vec<Mm> = self
            .weights
            .iter()
            .map(|weight| width * (weight / total))
            .collect();

        let mut result = RenderResult::default();
        let mut y = Mm::from(0);
        while let Some(row) = self.rows.get(self.next_row) {
            let measured: Vec<MeasuredCell> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| cell.measure(font_cache, style, *width))
                .collect();
            let height = measured
                .iter()
                .map(|cell| cell.height)
                .fold(Mm::from(0), Mm::max);
            if y + height > area.size().height {
                result.has_more = true;
                break;
            }

            let mut x = Mm::from(0);
            for ((cell, measured), cell_width) in row.iter().zip(&measured).zip(&widths) {
                let mut cell_area = area.clone();
                cell_area.add_offset(Position::new(x, y));
                cell_area.set_size(Size::new(*cell_width, height));
                cell.draw(&cell_area, font_cache, measured)?;
                x += *cell_width;
            }

            y += height;
            self.next_row += 1;
        }

        if y > Mm::from(0) {
            result.size = Size::new(width, y);
        }
        Ok(result)
    }
}

/// Builds the grid element for `table`.  Column widths become proportional weights.
pub fn table_element(table: &TableBlock) -> Result<GridTable, PdfBuildError> {
    let columns = table.column_count();
    let cell_styles = table.cell_styles();

    let rows = table
        .rows()
        .iter()
        .zip(cell_styles)
        .enumerate()
        .map(|(index, (row, styles))| {
            if row.len() != columns {
                return Err(PdfBuildError::RaggedTable {
                    row: index,
                    cells: row.len(),
                    columns,
                });
            }
            Ok(row
                .iter()
                .zip(styles)
                .map(|(text, style)| GridCell {
                    text: text.clone(),
                    style,
                })
                .collect())
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GridTable {
        weights: table
            .column_widths_mm()
            .iter()
            .map(|width| width.max(f64::EPSILON))
            .collect(),
        rows,
        next_row: 0,
    })
}

/// Checks that every style and table font rule names the registered font.
pub fn ensure_fonts_registered(
    registered: &str,
    styles: &StyleSet,
    tables: &[&TableBlock],
) -> Result<(), PdfBuildError> {
    let unregistered = |owner: &str, font: &str| PdfBuildError::UnregisteredFont {
        owner: owner.to_owned(),
        font: font.to_owned(),
        registered: registered.to_owned(),
    };

    for (_, style) in styles.iter() {
        if style.font_name() != registered {
            return Err(unregistered(style.name(), style.font_name()));
        }
    }

    for table in tables {
        for row in table.cell_styles() {
            if let Some(font) = row.iter().find_map(|cell| {
                cell.font_name
                    .as_deref()
                    .filter(|font| *font != registered)
            }) {
                return Err(unregistered("table", font));
            }
        }
    }

    Ok(())
}
