//! Renders the Stack Othello game guide to a PDF file.
//!
//! The pipeline resolves a font ([`fonts`]), derives the paragraph styles ([`styles`]), assembles
//! the static block list ([`story`]) and hands it to `genpdf` for pagination ([`builder`]).
//! [`generate()`] runs all steps and writes the result to disk.

pub mod builder;
pub mod content;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod model;
pub mod richtext;
pub mod story;
pub mod styles;

mod generate;

pub use error::{FontError, PdfBuildError};
pub use generate::{generate, GenerateOptions, GeneratedGuide, DEFAULT_OUTPUT_FILE};
