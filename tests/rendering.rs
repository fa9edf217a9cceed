use stack_othello_guide::builder::PdfBuilder;
use stack_othello_guide::fonts::{FontResolver, FALLBACK_FONT_NAME};
use stack_othello_guide::model::{Block, RichParagraph};
use stack_othello_guide::story::{build_story, features_table, Story};
use stack_othello_guide::styles::StyleSet;
use stack_othello_guide::{generate, GenerateOptions, PdfBuildError};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Resolver that never finds the Japanese font, so the fallback path is exercised.
fn fallback_resolver(scratch: &Path) -> Option<FontResolver> {
    let resolver = FontResolver::new().with_primary_path(scratch.join("absent-font.ttc"));
    if resolver.fallback_available() {
        Some(resolver)
    } else {
        None
    }
}

fn render_guide(resolver: &FontResolver) -> Vec<u8> {
    let font = resolver.resolve();
    let styles = StyleSet::new(font.name());
    let story = build_story(&styles);
    PdfBuilder::new()
        .render(font, &styles, story)
        .expect("render guide")
        .bytes
}

fn render_story(resolver: &FontResolver, story: Story) -> usize {
    let font = resolver.resolve();
    let styles = StyleSet::new(font.name());
    let pdf = PdfBuilder::new()
        .render(font, &styles, story)
        .expect("render story");
    assert!(pdf.bytes.starts_with(b"%PDF"));
    pdf.page_count
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

const SKIP_NOTE: &str =
    "no Helvetica-compatible font family installed; copy Liberation Sans into assets/fonts";

#[test]
fn renders_pdf_with_fallback_font() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let Some(resolver) = fallback_resolver(scratch.path()) else {
        eprintln!("Skipping renders_pdf_with_fallback_font: {SKIP_NOTE}");
        return;
    };

    let bytes = render_guide(&resolver);
    assert!(bytes.starts_with(b"%PDF"), "output should carry a PDF header");
}

#[test]
fn renders_a_story_holding_only_the_features_table() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let Some(resolver) = fallback_resolver(scratch.path()) else {
        eprintln!("Skipping renders_a_story_holding_only_the_features_table: {SKIP_NOTE}");
        return;
    };

    let mut story = Story::new();
    story.push(Block::Table(features_table(FALLBACK_FONT_NAME)));
    assert_eq!(render_story(&resolver, story), 1);
}

#[test]
fn long_japanese_text_flows_onto_further_pages() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let Some(resolver) = fallback_resolver(scratch.path()) else {
        eprintln!("Skipping long_japanese_text_flows_onto_further_pages: {SKIP_NOTE}");
        return;
    };

    // No spaces anywhere, so every line break falls between CJK characters.
    let paragraph = "石を置くたびに盤面の高さが変わり、角を取るだけでは勝てない。".repeat(40);
    let mut story = Story::new();
    for _ in 0..4 {
        story.push(Block::Body(RichParagraph::plain(paragraph.as_str())));
    }
    story.push(Block::Table(features_table(FALLBACK_FONT_NAME)));

    assert!(render_story(&resolver, story) >= 2);
}

#[test]
fn truncated_primary_font_falls_back_and_renders() {
    let scratch = tempfile::tempdir().expect("tempdir");
    if fallback_resolver(scratch.path()).is_none() {
        eprintln!("Skipping truncated_primary_font_falls_back_and_renders: {SKIP_NOTE}");
        return;
    }

    for contents in [&b""[..], &b"\x00\x01"[..]] {
        let primary = scratch.path().join("broken.ttc");
        fs::write(&primary, contents).expect("write broken font");
        let resolver = FontResolver::new().with_primary_path(&primary);

        let font = resolver.resolve();
        assert!(font.is_fallback());
        assert_eq!(font.name(), FALLBACK_FONT_NAME);
        render_guide(&resolver);
    }
}

#[test]
fn rendering_is_deterministic() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let Some(resolver) = fallback_resolver(scratch.path()) else {
        eprintln!("Skipping rendering_is_deterministic: {SKIP_NOTE}");
        return;
    };

    let bytes_a = render_guide(&resolver);
    let bytes_b = render_guide(&resolver);

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn generate_writes_and_overwrites_the_output_file() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let Some(fonts) = fallback_resolver(scratch.path()) else {
        eprintln!("Skipping generate_writes_and_overwrites_the_output_file: {SKIP_NOTE}");
        return;
    };

    let output = scratch.path().join("Stack_Othello_説明資料.pdf");
    fs::write(&output, b"previous run").expect("seed existing output");

    let options = GenerateOptions {
        output: output.clone(),
        fonts,
        ..GenerateOptions::default()
    };
    let guide = generate(&options).expect("generate guide");

    assert_eq!(guide.path, output);
    assert_eq!(guide.font_name, FALLBACK_FONT_NAME);
    assert!(guide.page_count >= 1);

    let written = fs::read(&output).expect("read output");
    assert_eq!(written.len(), guide.size);
    assert!(written.starts_with(b"%PDF"));
}

#[test]
fn generate_into_missing_directory_fails() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let Some(fonts) = fallback_resolver(scratch.path()) else {
        eprintln!("Skipping generate_into_missing_directory_fails: {SKIP_NOTE}");
        return;
    };

    let output = scratch.path().join("no-such-dir").join("guide.pdf");
    let options = GenerateOptions {
        output: output.clone(),
        fonts,
        ..GenerateOptions::default()
    };

    match generate(&options) {
        Err(PdfBuildError::Write { path, .. }) => assert_eq!(path, output),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("writing into a missing directory must fail"),
    }
    assert!(!output.exists());
}

#[test]
fn missing_fallback_family_aborts_generation() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let options = GenerateOptions {
        output: scratch.path().join("guide.pdf"),
        fonts: FontResolver::new()
            .with_primary_path(scratch.path().join("absent-font.ttc"))
            .with_fallback_dirs(vec![scratch.path().to_path_buf()]),
        ..GenerateOptions::default()
    };

    assert!(matches!(
        generate(&options),
        Err(PdfBuildError::FontLoad(_))
    ));
    assert!(!scratch.path().join("guide.pdf").exists());
}
