//! Minimal PDF 1.4 writer: A4 pages of left-aligned text in the standard
//! Helvetica fonts, with word wrapping and automatic page breaks.

use std::fmt::Write as _;
use thiserror::Error;

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 40.0;
const LINE_SPACING: f32 = 1.35;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.52;
const MAX_PAGES: usize = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdfError {
    #[error("document has no content")]
    Empty,

    #[error("document exceeds {0} pages")]
    TooManyPages(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Lays out text top to bottom, starting a new page whenever the next line
/// would cross the bottom margin.
#[derive(Debug)]
pub struct PdfWriter {
    title: String,
    pages: Vec<String>,
    current: String,
    cursor_y: f32,
    has_content: bool,
}

impl PdfWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
            current: String::new(),
            cursor_y: PAGE_HEIGHT - MARGIN,
            has_content: false,
        }
    }

    /// Write `text` wrapped to the page width, indented by `indent` points.
    pub fn text(&mut self, font: Font, size: f32, indent: f32, text: &str) -> Result<(), PdfError> {
        let width = PAGE_WIDTH - 2.0 * MARGIN - indent;
        let max_chars = ((width / (size * AVG_GLYPH_WIDTH)).floor() as usize).max(1);
        let line_height = size * LINE_SPACING;

        for line in wrap(text, max_chars) {
            if self.cursor_y - line_height < MARGIN {
                self.new_page()?;
            }
            self.cursor_y -= line_height;
            let _ = writeln!(
                self.current,
                "BT /{} {:.1} Tf {:.2} {:.2} Td ({}) Tj ET",
                font.resource(),
                size,
                MARGIN + indent,
                self.cursor_y,
                escape(&line)
            );
            self.has_content = true;
        }
        Ok(())
    }

    /// Vertical whitespace. Never starts a page by itself.
    pub fn gap(&mut self, points: f32) {
        self.cursor_y = (self.cursor_y - points).max(MARGIN);
    }

    fn new_page(&mut self) -> Result<(), PdfError> {
        if self.pages.len() + 1 >= MAX_PAGES {
            return Err(PdfError::TooManyPages(MAX_PAGES));
        }
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor_y = PAGE_HEIGHT - MARGIN;
        Ok(())
    }

    /// Serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>, PdfError> {
        if !self.has_content {
            return Err(PdfError::Empty);
        }
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }

        // 1 catalog, 2 page tree, 3-4 fonts, then page + content pairs, then info.
        let page_count = self.pages.len();
        let info_id = 5 + 2 * page_count;
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::with_capacity(info_id);

        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 5 + 2 * i)).collect();
        let mut objects: Vec<Vec<u8>> = vec![
            b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), page_count)
                .into_bytes(),
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_vec(),
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_vec(),
        ];
        for (i, content) in self.pages.iter().enumerate() {
            let content_id = 6 + 2 * i;
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    PAGE_WIDTH, PAGE_HEIGHT, content_id
                )
                .into_bytes(),
            );
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(content.as_bytes());
            stream.extend_from_slice(b"\nendstream");
            objects.push(stream);
        }
        objects.push(format!("<< /Title ({}) /Producer (trip-planner-backend) >>", escape(&self.title)).into_bytes());

        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in &offsets {
            let _ = write!(xref, "{:010} 00000 n \n", offset);
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            info_id,
            xref_offset
        );
        out.extend_from_slice(xref.as_bytes());

        Ok(out)
    }
}

/// Greedy word wrap on an approximate character budget. Words longer than
/// a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if len > 0 && len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            len += word.len();
            line.extend(word);
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Escape a string for a PDF literal, mapping text to WinAnsi bytes written
/// as octal escapes where they are not printable ASCII.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{20b9}' => out.push_str("INR "),
            _ => match win_ansi(c) {
                Some(byte) => {
                    let _ = write!(out, "\\{:03o}", byte);
                }
                None => out.push('?'),
            },
        }
    }
    out
}

fn win_ansi(c: char) -> Option<u8> {
    match c {
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201c}' => Some(0x93),
        '\u{201d}' => Some(0x94),
        '\u{20ac}' => Some(0x80),
        '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_offsets(pdf: &[u8]) -> Vec<usize> {
        // the binary marker in the header is not UTF-8, so only slice text
        // that follows it
        let text = String::from_utf8_lossy(pdf);
        let startxref = text.rfind("startxref\n").unwrap() + "startxref\n".len();
        let xref_offset: usize = text[startxref..].lines().next().unwrap().parse().unwrap();
        assert!(pdf[xref_offset..].starts_with(b"xref\n"));

        String::from_utf8_lossy(&pdf[xref_offset..])
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect()
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let mut writer = PdfWriter::new("Test");
        writer.text(Font::Bold, 24.0, 0.0, "Travel Itinerary").unwrap();
        writer.text(Font::Regular, 12.0, 0.0, "Caf\u{e9} (open) \u{2013} \u{2022} \u{20b9}50").unwrap();
        let pdf = writer.finish().unwrap();

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        let offsets = object_offsets(&pdf);
        assert_eq!(offsets.len(), 7);
        for (i, offset) in offsets.iter().enumerate() {
            assert!(pdf[*offset..].starts_with(format!("{} 0 obj", i + 1).as_bytes()));
        }
    }

    #[test]
    fn text_is_escaped_for_literals() {
        assert_eq!(escape("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape("Caf\u{e9}"), "Caf\\351");
        assert_eq!(escape("Nov 7 \u{2013} Nov 15"), "Nov 7 \\226 Nov 15");
        assert_eq!(escape("\u{20b9}300"), "INR 300");
        assert_eq!(escape("\u{6771}\u{4eac}"), "??");
    }

    #[test]
    fn long_content_breaks_pages() {
        let mut writer = PdfWriter::new("Long");
        for i in 0..200 {
            writer.text(Font::Regular, 12.0, 0.0, &format!("Line {}", i)).unwrap();
        }
        let pdf = writer.finish().unwrap();
        let text = String::from_utf8_lossy(&pdf);
        let pages = text.matches("/Type /Page ").count();
        assert!(pages > 1);
        assert!(text.contains(&format!("/Count {}", pages)));
        assert_eq!(text.matches(") Tj ET").count(), 200);
    }

    #[test]
    fn wrap_respects_budget() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
        assert_eq!(wrap("abcdefghijkl", 5), vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn empty_document_is_an_error() {
        assert_eq!(PdfWriter::new("x").finish().unwrap_err(), PdfError::Empty);
    }
}
