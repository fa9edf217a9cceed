use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use stack_othello_guide::fonts::FontResolver;
use stack_othello_guide::{generate, GenerateOptions, DEFAULT_OUTPUT_FILE};

/// Renders the Stack Othello guide to PDF.
///
/// Without arguments the guide is written to the working directory using the system Japanese
/// font, or a Helvetica-compatible fallback family when that font is unavailable.
#[derive(Parser)]
#[command(author, version, about = "Render the Stack Othello guide to PDF")]
struct Cli {
    /// Output file; an existing file is replaced.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Japanese font to embed instead of the system default.
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Directory searched first for the fallback font family (repeatable).
    #[arg(long = "fonts-dir", value_name = "DIR")]
    fonts_dirs: Vec<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    fn into_options(self) -> GenerateOptions {
        let mut fonts = FontResolver::new().with_extra_fallback_dirs(self.fonts_dirs);
        if let Some(font) = self.font {
            fonts = fonts.with_primary_path(font);
        }

        GenerateOptions {
            output: self.output,
            fonts,
            ..GenerateOptions::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    match generate(&cli.into_options()) {
        Ok(guide) => {
            let name = guide
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| guide.path.display().to_string());
            println!("PDFファイル '{}' を作成しました。", name);
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
