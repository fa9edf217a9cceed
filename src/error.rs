//! Error types for building the guide.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a font file cannot be used.
#[derive(Debug, Error)]
pub enum FontFileError {
    #[error("cannot read font data")]
    Read(#[from] io::Error),

    /// The data ends before a header, table directory or table it declares.
    #[error("font data ends early ({len} bytes)")]
    Truncated { len: usize },

    #[error("not a TrueType or OpenType font or collection")]
    UnknownFormat,

    #[error("font collection holds no faces")]
    EmptyCollection,

    #[error("font face does not fit the 32-bit sfnt offsets")]
    Oversized,

    /// The layout engine rejected otherwise well-formed font data.
    #[error("font data rejected by the layout engine")]
    Parse(#[from] genpdf::error::Error),
}

/// Errors raised while turning the resolved font into a `genpdf` font family.
#[derive(Debug, Error)]
pub enum FontError {
    /// No Helvetica-compatible family was found to back the fallback font.
    #[error("no fallback font family found (searched: {searched})")]
    NoFallback { searched: String },

    /// A font face exists on disk but could not be loaded.
    #[error("failed to load {style} font at {}", .path.display())]
    Load {
        path: PathBuf,
        style: &'static str,
        #[source]
        source: FontFileError,
    },
}

/// Errors raised while rendering the guide or writing it to disk.
#[derive(Debug, Error)]
pub enum PdfBuildError {
    #[error(transparent)]
    FontLoad(#[from] FontError),

    /// A style or table rule names a font that was never registered with the document.
    #[error("`{owner}` references font '{font}', but only '{registered}' is registered")]
    UnregisteredFont {
        owner: String,
        font: String,
        registered: String,
    },

    /// A table row does not have one cell per column.
    #[error("table row {row} has {cells} cell(s), expected {columns}")]
    RaggedTable {
        row: usize,
        cells: usize,
        columns: usize,
    },

    /// The layout engine failed to paginate or serialise the document.
    #[error("failed to lay out document")]
    Layout(#[source] genpdf::error::Error),

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = PdfBuildError> = std::result::Result<T, E>;
