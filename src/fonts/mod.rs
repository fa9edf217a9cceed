//! Font resolution for the guide.
//!
//! The guide prefers a Japanese system font found at a fixed, OS-specific path.  Resolution is
//! total: any failure to read or parse that font yields the fallback logical name instead of an
//! error.  Because `genpdf` needs real glyph metrics for every font (and its built-in PDF fonts
//! only encode Windows-1252 text), the fallback name is backed by an embedded sans-serif family
//! metric-compatible with Helvetica, searched for on disk when the document is built.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::fonts::{FontData, FontFamily};
use log::{debug, info, warn};

use crate::error::{FontError, FontFileError};

mod sfnt;

/// Logical name of the registered Japanese font.
pub const PRIMARY_FONT_NAME: &str = "Japanese";

/// Logical name used when the Japanese font is unavailable.
pub const FALLBACK_FONT_NAME: &str = "Helvetica";

/// Fixed location probed for the Japanese font.
#[cfg(windows)]
pub const PRIMARY_FONT_PATH: &str = "C:/Windows/Fonts/msgothic.ttc";
#[cfg(target_os = "macos")]
pub const PRIMARY_FONT_PATH: &str = "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc";
#[cfg(not(any(windows, target_os = "macos")))]
pub const PRIMARY_FONT_PATH: &str = "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc";

/// File names of a four-style font family.
struct FamilyFiles {
    family: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

impl FamilyFiles {
    fn paths(&self, directory: &Path) -> [(PathBuf, &'static str); 4] {
        [
            (directory.join(self.regular), "regular"),
            (directory.join(self.bold), "bold"),
            (directory.join(self.italic), "italic"),
            (directory.join(self.bold_italic), "bold italic"),
        ]
    }

    fn present_in(&self, directory: &Path) -> bool {
        self.paths(directory).iter().all(|(path, _)| path.is_file())
    }
}

/// Families metric-compatible with Helvetica, in order of preference.
const FALLBACK_FAMILIES: &[FamilyFiles] = &[
    FamilyFiles {
        family: "Liberation Sans",
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
    },
    FamilyFiles {
        family: "Arial",
        regular: "arial.ttf",
        bold: "arialbd.ttf",
        italic: "ariali.ttf",
        bold_italic: "arialbi.ttf",
    },
    FamilyFiles {
        family: "DejaVu Sans",
        regular: "DejaVuSans.ttf",
        bold: "DejaVuSans-Bold.ttf",
        italic: "DejaVuSans-Oblique.ttf",
        bold_italic: "DejaVuSans-BoldOblique.ttf",
    },
];

const SYSTEM_FONT_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu-sans-fonts",
    "/usr/share/fonts/dejavu",
    "/Library/Fonts",
    "C:/Windows/Fonts",
];

/// Outcome of probing the primary font path.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The font was read and parsed.
    Registered,
    /// Nothing exists at the path.
    Missing,
    /// The file exists but could not be read.
    Unreadable(io::Error),
    /// The file was read but is not a usable font.
    Invalid(FontFileError),
}

enum FontSource {
    Primary(FontData),
    Fallback,
}

/// The font chosen for the guide: a logical name plus the data backing it.
pub struct ResolvedFont {
    name: &'static str,
    source: FontSource,
    outcome: ProbeOutcome,
    fallback_dirs: Vec<PathBuf>,
}

impl ResolvedFont {
    /// Logical font name referenced by styles.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Whether the fallback font was chosen.
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, FontSource::Fallback)
    }

    /// What happened when the primary font was probed.
    pub fn outcome(&self) -> &ProbeOutcome {
        &self.outcome
    }

    /// Turns the resolved font into a `genpdf` font family.
    ///
    /// The Japanese font has a single face, so it backs all four styles.  The fallback loads a
    /// Helvetica-compatible family from the configured directories and fails when none is
    /// installed.
    pub fn into_family(self) -> Result<FontFamily<FontData>, FontError> {
        match self.source {
            FontSource::Primary(data) => Ok(FontFamily {
                regular: data.clone(),
                bold: data.clone(),
                italic: data.clone(),
                bold_italic: data,
            }),
            FontSource::Fallback => load_fallback_family(&self.fallback_dirs),
        }
    }
}

/// Probes the primary font and picks the logical font for the guide.
#[derive(Clone, Debug)]
pub struct FontResolver {
    primary_path: PathBuf,
    fallback_dirs: Vec<PathBuf>,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self {
            primary_path: PathBuf::from(PRIMARY_FONT_PATH),
            fallback_dirs: default_fallback_directories(),
        }
    }
}

impl FontResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the path probed for the Japanese font.
    pub fn with_primary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.primary_path = path.into();
        self
    }

    /// Puts `directories` ahead of the default fallback font directories.
    pub fn with_extra_fallback_dirs<I>(mut self, directories: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut dirs: Vec<PathBuf> = directories.into_iter().collect();
        for dir in self.fallback_dirs.drain(..) {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        self.fallback_dirs = dirs;
        self
    }

    /// Replaces the fallback font directories entirely.
    pub fn with_fallback_dirs(mut self, directories: Vec<PathBuf>) -> Self {
        self.fallback_dirs = directories;
        self
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary_path
    }

    pub fn fallback_dirs(&self) -> &[PathBuf] {
        &self.fallback_dirs
    }

    /// Resolves the guide font.  Never fails: every probe failure selects the fallback name.
    pub fn resolve(&self) -> ResolvedFont {
        let (source, outcome) = match probe(&self.primary_path) {
            Ok(data) => {
                info!(
                    "Registered font '{}' from {}",
                    PRIMARY_FONT_NAME,
                    self.primary_path.display()
                );
                (FontSource::Primary(data), ProbeOutcome::Registered)
            }
            Err(outcome) => {
                match &outcome {
                    ProbeOutcome::Missing => debug!(
                        "No font at {}; using '{}'",
                        self.primary_path.display(),
                        FALLBACK_FONT_NAME
                    ),
                    ProbeOutcome::Unreadable(err) => warn!(
                        "Cannot read font at {} ({}); using '{}'",
                        self.primary_path.display(),
                        err,
                        FALLBACK_FONT_NAME
                    ),
                    ProbeOutcome::Invalid(err) => warn!(
                        "Font at {} is not usable ({}); using '{}'",
                        self.primary_path.display(),
                        err,
                        FALLBACK_FONT_NAME
                    ),
                    ProbeOutcome::Registered => {}
                }
                (FontSource::Fallback, outcome)
            }
        };

        let name = match source {
            FontSource::Primary(_) => PRIMARY_FONT_NAME,
            FontSource::Fallback => FALLBACK_FONT_NAME,
        };

        ResolvedFont {
            name,
            source,
            outcome,
            fallback_dirs: self.fallback_dirs.clone(),
        }
    }

    /// Indicates whether a fallback family is installed in any of the fallback directories.
    pub fn fallback_available(&self) -> bool {
        find_fallback_family(&self.fallback_dirs).is_some()
    }
}

fn probe(path: &Path) -> Result<FontData, ProbeOutcome> {
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ProbeOutcome::Missing,
        _ => ProbeOutcome::Unreadable(err),
    })?;
    font_data(bytes).map_err(ProbeOutcome::Invalid)
}

/// Validates `bytes` and hands the first face to `genpdf`.
fn font_data(bytes: Vec<u8>) -> Result<FontData, FontFileError> {
    let face = sfnt::first_face(bytes)?;
    Ok(FontData::new(face, None)?)
}

fn default_fallback_directories() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            candidates.push(bin_dir.join("assets/fonts"));
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates.extend(SYSTEM_FONT_DIRECTORIES.iter().map(PathBuf::from));
    candidates
}

fn find_fallback_family(directories: &[PathBuf]) -> Option<(&PathBuf, &'static FamilyFiles)> {
    directories.iter().find_map(|directory| {
        FALLBACK_FAMILIES
            .iter()
            .find(|files| files.present_in(directory))
            .map(|files| (directory, files))
    })
}

fn load_face(path: PathBuf, style: &'static str) -> Result<FontData, FontError> {
    fs::read(&path)
        .map_err(FontFileError::from)
        .and_then(font_data)
        .map_err(|source| FontError::Load {
            path,
            style,
            source,
        })
}

fn load_fallback_family(directories: &[PathBuf]) -> Result<FontFamily<FontData>, FontError> {
    let Some((directory, files)) = find_fallback_family(directories) else {
        let searched = directories
            .iter()
            .map(|dir| dir.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(FontError::NoFallback { searched });
    };

    info!(
        "Backing '{}' with the {} family from {}",
        FALLBACK_FONT_NAME,
        files.family,
        directory.display()
    );

    let [regular, bold, italic, bold_italic] = files.paths(directory);
    Ok(FontFamily {
        regular: load_face(regular.0, regular.1)?,
        bold: load_face(bold.0, bold.1)?,
        italic: load_face(italic.0, italic.1)?,
        bold_italic: load_face(bold_italic.0, bold_italic.1)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolved = FontResolver::new()
            .with_primary_path(dir.path().join("msgothic.ttc"))
            .resolve();

        assert_eq!(resolved.name(), FALLBACK_FONT_NAME);
        assert!(resolved.is_fallback());
        assert!(matches!(resolved.outcome(), ProbeOutcome::Missing));
    }

    #[test]
    fn corrupt_font_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("msgothic.ttc");
        fs::write(&path, b"definitely not a font file").expect("write corrupt font");

        let resolved = FontResolver::new().with_primary_path(&path).resolve();

        assert_eq!(resolved.name(), FALLBACK_FONT_NAME);
        assert!(matches!(resolved.outcome(), ProbeOutcome::Invalid(_)));
    }

    #[test]
    fn empty_and_tiny_font_files_fall_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, contents) in [("empty.ttc", &b""[..]), ("tiny.ttc", &b"ab"[..])] {
            let path = dir.path().join(name);
            fs::write(&path, contents).expect("write short font");

            let resolved = FontResolver::new().with_primary_path(&path).resolve();

            assert_eq!(resolved.name(), FALLBACK_FONT_NAME, "{name}");
            assert!(
                matches!(
                    resolved.outcome(),
                    ProbeOutcome::Invalid(FontFileError::Truncated { .. })
                ),
                "{name}: {:?}",
                resolved.outcome()
            );
        }
    }

    #[test]
    fn multi_face_collection_registers_its_first_face() {
        let installed = FontResolver::new();
        let Some((directory, files)) = find_fallback_family(installed.fallback_dirs()) else {
            eprintln!("Skipping: no fallback font family installed");
            return;
        };
        let face = fs::read(directory.join(files.regular)).expect("read installed font");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("two_faces.ttc");
        fs::write(&path, sfnt::collection(&face, 2)).expect("write collection");

        let resolved = FontResolver::new().with_primary_path(&path).resolve();
        assert_eq!(resolved.name(), PRIMARY_FONT_NAME);
        assert!(matches!(resolved.outcome(), ProbeOutcome::Registered));
        assert!(resolved.into_family().is_ok());
    }

    #[test]
    fn directory_in_place_of_font_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolved = FontResolver::new().with_primary_path(dir.path()).resolve();

        assert_eq!(resolved.name(), FALLBACK_FONT_NAME);
        assert!(matches!(resolved.outcome(), ProbeOutcome::Unreadable(_)));
    }

    #[test]
    fn installed_fallback_font_registers_as_primary() {
        let resolver = FontResolver::new();
        let Some((directory, files)) = find_fallback_family(resolver.fallback_dirs()) else {
            eprintln!("Skipping: no fallback font family installed");
            return;
        };

        let resolved = resolver
            .clone()
            .with_primary_path(directory.join(files.regular))
            .resolve();
        assert_eq!(resolved.name(), PRIMARY_FONT_NAME);
        assert!(matches!(resolved.outcome(), ProbeOutcome::Registered));
        assert!(resolved.into_family().is_ok());
    }

    #[test]
    fn fallback_without_font_directories_reports_search_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolved = FontResolver::new()
            .with_primary_path(dir.path().join("missing.ttc"))
            .with_fallback_dirs(vec![dir.path().to_path_buf()])
            .resolve();

        match resolved.into_family() {
            Err(FontError::NoFallback { searched }) => {
                assert!(searched.contains(&dir.path().display().to_string()));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("empty directory cannot provide a fallback family"),
        }
    }

    #[test]
    fn extra_fallback_dirs_are_searched_first() {
        let resolver = FontResolver::new().with_extra_fallback_dirs(vec![PathBuf::from("/opt/fonts")]);
        assert_eq!(resolver.fallback_dirs()[0], PathBuf::from("/opt/fonts"));
        assert!(resolver.fallback_dirs().len() > 1);
    }
}
