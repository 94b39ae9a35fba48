//! Markdown and PDF renderings of an edited resume.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::editor::document::EditableResume;
use crate::editor::error::ExportError;

// ─── Markdown ─────────────────────────────────────────────────────────────────

pub fn to_markdown(resume: &EditableResume) -> String {
    let mut out = String::from("# Resume\n");

    for section in &resume.sections {
        let lines = export_lines(&section.format_for_display());
        if lines.is_empty() {
            continue;
        }
        out.push_str(&format!("\n## {}\n\n", section.name));
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Display lines with `•` bullets normalised to `-`.
fn export_lines(formatted: &str) -> Vec<String> {
    formatted
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix('•') {
            Some(rest) => format!("- {}", rest.trim_start()),
            None => line.to_string(),
        })
        .collect()
}

// ─── PDF ──────────────────────────────────────────────────────────────────────

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;
const LEFT: f32 = 20.0;
const BODY_INDENT: f32 = 25.0;
const WRAP_CHARS: usize = 95;

/// Keeps track of the current page and cursor, starting a new page when the
/// cursor would drop below the bottom margin.
struct PageWriter<'a> {
    doc: &'a printpdf::PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
}

impl PageWriter<'_> {
    fn ensure_room(&mut self, needed: f32) {
        if self.y.0 - needed < BOTTOM {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(TOP);
        }
    }

    fn line(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef, advance: f32) {
        self.ensure_room(advance);
        self.layer.use_text(text, size, Mm(x), self.y, font);
        self.y -= Mm(advance);
    }

    fn gap(&mut self, mm: f32) {
        self.y -= Mm(mm);
    }
}

/// Renders the resume as an A4 PDF and returns the bytes.
pub fn to_pdf(resume: &EditableResume) -> Result<Vec<u8>, ExportError> {
    let (doc, page1, layer1) = PdfDocument::new("Resume", PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Font(e.to_string()))?;

    let mut writer = PageWriter {
        doc: &doc,
        layer: doc.get_page(page1).get_layer(layer1),
        y: Mm(TOP),
    };

    writer.line("Resume", 16.0, LEFT, &bold, 10.0);

    for section in &resume.sections {
        let lines = export_lines(&section.format_for_display());
        if lines.is_empty() {
            continue;
        }

        writer.gap(2.0);
        writer.line(&section.name.to_uppercase(), 11.0, LEFT, &bold, 6.0);
        for line in &lines {
            for wrapped in wrap_text(line, WRAP_CHARS) {
                writer.line(&wrapped, 9.0, BODY_INDENT, &font, 4.5);
            }
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Write(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| ExportError::Write(e.to_string()))
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ─── Tests ────────────────────────────────────────────────────────────────────
