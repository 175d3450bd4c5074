//! PDF export of the finished brochure.
//!
//! Three stages: parse the markdown into a closed set of block
//! variants, map those onto styled blocks, then render the styled
//! blocks through printpdf's HTML path into one paginated document.
//! Block kinds outside the closed set are silently skipped.

use pulldown_cmark::{Event, Parser, Tag};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::ExportError;

/// US Letter, in millimeters.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;

/// A top-level markdown block the exporter understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownBlock {
    Heading { level: u32, text: String },
    Paragraph(String),
    List(Vec<String>),
}

/// Visual style of an emitted block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// Document title (level-1 heading)
    Title,
    /// Section heading (level-2/3 headings)
    Section,
    /// Body text (paragraphs and list items)
    Body,
}

/// One styled paragraph of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledBlock {
    pub style: BlockStyle,
    pub text: String,
}

impl StyledBlock {
    fn new(style: BlockStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

/// Convert the brochure markdown into PDF bytes.
pub fn export_pdf(markdown: &str) -> Result<Vec<u8>, ExportError> {
    let blocks = parse_blocks(markdown);
    let styled = style_blocks(blocks);
    debug!(blocks = styled.len(), "exporting brochure to PDF");
    render_pdf(&styled)
}

/// Parse markdown into the closed block set.
///
/// Inline markup is flattened to its text; blocks other than headings,
/// paragraphs, and lists contribute nothing at the top level.
pub fn parse_blocks(markdown: &str) -> Vec<MarkdownBlock> {
    let mut blocks = Vec::new();
    let mut text = String::new();
    let mut items: Vec<String> = Vec::new();
    let mut list_depth = 0usize;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading(..)) | Event::Start(Tag::Paragraph) => {
                if list_depth == 0 {
                    text.clear();
                }
            }
            Event::Start(Tag::Item) => text.clear(),
            Event::Start(Tag::List(_)) => {
                list_depth += 1;
                if list_depth == 1 {
                    items.clear();
                }
            }
            Event::End(Tag::Heading(level, ..)) => blocks.push(MarkdownBlock::Heading {
                level: level as u32,
                text: std::mem::take(&mut text),
            }),
            Event::End(Tag::Paragraph) => {
                if list_depth == 0 {
                    blocks.push(MarkdownBlock::Paragraph(std::mem::take(&mut text)));
                }
            }
            Event::End(Tag::Item) => items.push(std::mem::take(&mut text)),
            Event::End(Tag::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    blocks.push(MarkdownBlock::List(std::mem::take(&mut items)));
                }
            }
            // Fenced/indented code is outside the closed block set;
            // drop its text so it cannot leak into the next block.
            Event::End(Tag::CodeBlock(_)) => text.clear(),
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            _ => {}
        }
    }

    blocks
}

/// Map parsed blocks onto styled blocks.
///
/// Level-1 headings become the title style, level-2/3 the section
/// style; paragraphs and bullet-prefixed list items become body text.
/// Deeper heading levels are skipped.
pub fn style_blocks(blocks: Vec<MarkdownBlock>) -> Vec<StyledBlock> {
    let mut styled = Vec::new();

    for block in blocks {
        match block {
            MarkdownBlock::Heading { level: 1, text } => {
                styled.push(StyledBlock::new(BlockStyle::Title, text));
            }
            MarkdownBlock::Heading { level: 2 | 3, text } => {
                styled.push(StyledBlock::new(BlockStyle::Section, text));
            }
            MarkdownBlock::Heading { .. } => {}
            MarkdownBlock::Paragraph(text) => {
                styled.push(StyledBlock::new(BlockStyle::Body, text));
            }
            MarkdownBlock::List(items) => {
                for item in items {
                    styled.push(StyledBlock::new(BlockStyle::Body, format!("• {}", item)));
                }
            }
        }
    }

    styled
}

/// Render styled blocks to simple HTML for the PDF engine.
///
/// Plain block elements with fixed spacing after each; anything fancier
/// risks outrunning what the PDF HTML layout supports.
fn blocks_to_html(blocks: &[StyledBlock]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html><html><head><style>\
         body { font-family: sans-serif; } \
         h1 { font-size: 24px; color: #2c3e50; margin-bottom: 12px; } \
         h2 { font-size: 16px; color: #34495e; margin-bottom: 12px; } \
         p { font-size: 11px; margin-bottom: 12px; } \
         </style></head><body>",
    );

    for block in blocks {
        let (open, close) = match block.style {
            BlockStyle::Title => ("<h1>", "</h1>"),
            BlockStyle::Section => ("<h2>", "</h2>"),
            BlockStyle::Body => ("<p>", "</p>"),
        };
        html.push_str(open);
        html.push_str(&escape_html(&block.text));
        html.push_str(close);
    }

    html.push_str("</body></html>");
    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build the paginated PDF in one pass.
fn render_pdf(blocks: &[StyledBlock]) -> Result<Vec<u8>, ExportError> {
    use printpdf::{GeneratePdfOptions, PdfDocument};

    let html = blocks_to_html(blocks);
    let options = GeneratePdfOptions {
        page_width: Some(PAGE_WIDTH_MM),
        page_height: Some(PAGE_HEIGHT_MM),
        ..Default::default()
    };

    let mut warnings = Vec::new();
    let doc = PdfDocument::from_html(
        &html,
        &BTreeMap::new(),
        &BTreeMap::new(),
        &options,
        &mut warnings,
    )
    .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let bytes = doc.save(&Default::default(), &mut warnings);
    if !warnings.is_empty() {
        debug!(warnings = warnings.len(), "PDF generation produced warnings");
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blocks_closed_set() {
        let blocks = parse_blocks("# Title\n\nBody text.\n\n- item one\n- item two");

        assert_eq!(
            blocks,
            vec![
                MarkdownBlock::Heading {
                    level: 1,
                    text: "Title".to_string()
                },
                MarkdownBlock::Paragraph("Body text.".to_string()),
                MarkdownBlock::List(vec!["item one".to_string(), "item two".to_string()]),
            ]
        );
    }

    #[test]
    fn test_parse_blocks_flattens_inline_markup() {
        let blocks = parse_blocks("Some **bold** and `code` text");
        assert_eq!(
            blocks,
            vec![MarkdownBlock::Paragraph("Some bold and code text".to_string())]
        );
    }

    #[test]
    fn test_parse_blocks_ordered_list() {
        let blocks = parse_blocks("1. first\n2. second");
        assert_eq!(
            blocks,
            vec![MarkdownBlock::List(vec![
                "first".to_string(),
                "second".to_string()
            ])]
        );
    }

    #[test]
    fn test_parse_blocks_skips_code_blocks() {
        let blocks = parse_blocks("```\nlet x = 1;\n```\n\nAfter.");
        assert_eq!(
            blocks,
            vec![MarkdownBlock::Paragraph("After.".to_string())]
        );
    }

    #[test]
    fn test_styled_blocks_for_brochure_scenario() {
        let styled = style_blocks(parse_blocks(
            "# Title\n\nBody text.\n\n- item one\n- item two",
        ));

        assert_eq!(
            styled,
            vec![
                StyledBlock::new(BlockStyle::Title, "Title"),
                StyledBlock::new(BlockStyle::Body, "Body text."),
                StyledBlock::new(BlockStyle::Body, "• item one"),
                StyledBlock::new(BlockStyle::Body, "• item two"),
            ]
        );
    }

    #[test]
    fn test_heading_styles() {
        let styled = style_blocks(parse_blocks("# One\n\n## Two\n\n### Three\n\n#### Four"));

        assert_eq!(
            styled.iter().map(|b| b.style).collect::<Vec<_>>(),
            vec![BlockStyle::Title, BlockStyle::Section, BlockStyle::Section]
        );
    }

    #[test]
    fn test_export_pdf_produces_document_bytes() {
        let bytes = export_pdf("# Acme\n\nYour partner in widgets.\n\n- fast\n- reliable")
            .expect("export should succeed");

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_html_escaping() {
        let html = blocks_to_html(&[StyledBlock::new(BlockStyle::Body, "a < b & c > d")]);
        assert!(html.contains("<p>a &lt; b &amp; c &gt; d</p>"));
    }

    #[test]
    fn test_blocks_to_html_order() {
        let html = blocks_to_html(&[
            StyledBlock::new(BlockStyle::Title, "Acme"),
            StyledBlock::new(BlockStyle::Section, "About"),
            StyledBlock::new(BlockStyle::Body, "We make widgets."),
        ]);

        let title = html.find("<h1>Acme</h1>").unwrap();
        let section = html.find("<h2>About</h2>").unwrap();
        let body = html.find("<p>We make widgets.</p>").unwrap();
        assert!(title < section && section < body);
    }
}
