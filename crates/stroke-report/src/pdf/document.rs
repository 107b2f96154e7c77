use chrono::{DateTime, Utc};

use super::metrics::string_width;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
pub const BREAK_MARGIN: f32 = 20.0;
pub const CELL_MARGIN: f32 = 1.0;
/// Points per millimetre.
const K: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One positioned line of text. `x`/`baseline` are millimetres from the
/// top-left corner; `text` holds only Latin-1 characters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub page: usize,
    pub x: f32,
    pub baseline: f32,
    pub size: f32,
    pub text: String,
}

#[derive(Debug, Clone)]
struct Header {
    text: String,
    size: f32,
    height: f32,
}

#[derive(Debug, Clone)]
pub struct PdfDocument {
    runs: Vec<TextRun>,
    pages: usize,
    x: f32,
    y: f32,
    font_size: f32,
    header: Option<Header>,
    title: String,
    created_at: Option<DateTime<Utc>>,
}

impl Default for PdfDocument {
    fn default() -> Self { Self::new() }
}

/// Replace every character above U+00FF with `?`.
pub fn to_latin1(text: &str) -> String {
    text.chars().map(|c| if u32::from(c) <= 0xFF { c } else { '?' }).collect()
}

fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars().map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?')).collect()
}

impl PdfDocument {
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            pages: 0,
            x: MARGIN,
            y: MARGIN,
            font_size: 12.0,
            header: None,
            title: String::new(),
            created_at: None,
        }
    }

    /// Text centered at the top of every page added afterwards.
    pub fn set_header(&mut self, text: &str, size: f32, height: f32) {
        self.header = Some(Header { text: to_latin1(text), size, height });
    }

    pub fn set_title(&mut self, title: &str) { self.title = to_latin1(title); }

    pub fn set_creation_date(&mut self, at: DateTime<Utc>) { self.created_at = Some(at); }

    pub fn set_font_size(&mut self, size: f32) { self.font_size = size; }

    pub fn page_count(&self) -> usize { self.pages }

    pub fn runs(&self) -> &[TextRun] { &self.runs }

    pub fn add_page(&mut self) {
        self.pages += 1;
        self.x = MARGIN;
        self.y = MARGIN;
        if let Some(header) = self.header.clone() {
            let size = self.font_size;
            self.font_size = header.size;
            self.place(0.0, header.height, &header.text, Align::Center, true);
            self.font_size = size;
        }
    }

    /// Width of `text` in millimetres at the current font size.
    pub fn text_width(&self, text: &str) -> f32 {
        string_width(&latin1_bytes(&to_latin1(text))) as f32 * self.font_size / 1000.0 / K
    }

    /// A single-line cell `w` wide (`0` extends to the right margin). With
    /// `newline` the cursor moves to the start of the next line, otherwise to
    /// the right of the cell.
    pub fn cell(&mut self, w: f32, h: f32, text: &str, align: Align, newline: bool) {
        if self.pages == 0 || self.y + h > PAGE_HEIGHT - BREAK_MARGIN {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
        self.place(w, h, text, align, newline);
    }

    /// Left-aligned paragraph wrapped at word boundaries to fit `w`.
    pub fn multi_cell(&mut self, w: f32, h: f32, text: &str) {
        let width = if w == 0.0 { PAGE_WIDTH - MARGIN - self.x } else { w };
        let start_x = self.x;
        for line in self.wrap(text, width - 2.0 * CELL_MARGIN) {
            self.x = start_x;
            self.cell(width, h, &line, Align::Left, true);
        }
        self.x = start_x;
    }

    pub fn ln(&mut self, h: f32) {
        self.x = MARGIN;
        self.y += h;
    }

    fn place(&mut self, w: f32, h: f32, text: &str, align: Align, newline: bool) {
        let width = if w == 0.0 { PAGE_WIDTH - MARGIN - self.x } else { w };
        let text = to_latin1(text);
        if !text.is_empty() {
            let dx = match align {
                Align::Left => CELL_MARGIN,
                Align::Center => (width - self.text_width(&text)) / 2.0,
            };
            self.runs.push(TextRun {
                page: self.pages,
                x: self.x + dx,
                baseline: self.y + 0.5 * h + 0.3 * self.font_size / K,
                size: self.font_size,
                text,
            });
        }
        if newline {
            self.x = MARGIN;
            self.y += h;
        } else {
            self.x += width;
        }
    }

    fn wrap(&self, text: &str, max: f32) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            if self.text_width(paragraph) <= max {
                lines.push(paragraph.to_string());
                continue;
            }
            let mut line = String::new();
            for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
                let candidate = if line.is_empty() { word.to_string() } else { format!("{line} {word}") };
                if self.text_width(&candidate) <= max {
                    line = candidate;
                    continue;
                }
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                if self.text_width(word) <= max {
                    line = word.to_string();
                } else {
                    for c in word.chars() {
                        let mut next = line.clone();
                        next.push(c);
                        if !line.is_empty() && self.text_width(&next) > max {
                            lines.push(std::mem::take(&mut line));
                            line.push(c);
                        } else {
                            line = next;
                        }
                    }
                }
            }
            lines.push(line);
        }
        lines
    }

    /// Serialize to PDF bytes. Output depends only on the document contents.
    pub fn to_bytes(&self) -> Vec<u8> {
        let pages = self.pages.max(1);
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();
        out.extend_from_slice(b"%PDF-1.3\n%\xE2\xE3\xCF\xD3\n");

        let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", 5 + 2 * i)).collect();
        let page_w = PAGE_WIDTH * K;
        let page_h = PAGE_HEIGHT * K;

        begin_object(&mut out, &mut offsets);
        out.extend_from_slice(b"<< /Type /Catalog /Pages 2 0 R >>");
        end_object(&mut out);

        begin_object(&mut out, &mut offsets);
        out.extend_from_slice(
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} /MediaBox [0 0 {:.2} {:.2}] >>",
                kids.join(" "),
                pages,
                page_w,
                page_h
            )
            .as_bytes(),
        );
        end_object(&mut out);

        begin_object(&mut out, &mut offsets);
        out.extend_from_slice(b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>");
        end_object(&mut out);

        begin_object(&mut out, &mut offsets);
        out.extend_from_slice(b"<< /Producer (stroke-report)");
        if !self.title.is_empty() {
            out.extend_from_slice(b" /Title ");
            push_string(&mut out, &self.title);
        }
        if let Some(at) = self.created_at {
            out.extend_from_slice(format!(" /CreationDate (D:{})", at.format("%Y%m%d%H%M%SZ")).as_bytes());
        }
        out.extend_from_slice(b" >>");
        end_object(&mut out);

        for page in 1..=pages {
            let content = self.page_content(page);
            begin_object(&mut out, &mut offsets);
            out.extend_from_slice(
                format!(
                    "<< /Type /Page /Parent 2 0 R /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                    offsets.len() + 1
                )
                .as_bytes(),
            );
            end_object(&mut out);

            begin_object(&mut out, &mut offsets);
            out.extend_from_slice(format!("<< /Length {} >>\nstream\n", content.len()).as_bytes());
            out.extend_from_slice(&content);
            out.extend_from_slice(b"\nendstream");
            end_object(&mut out);
        }

        let xref = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1).as_bytes());
        for offset in &offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R /Info 4 0 R >>\nstartxref\n{}\n%%EOF\n",
                offsets.len() + 1,
                xref
            )
            .as_bytes(),
        );
        out
    }

    fn page_content(&self, page: usize) -> Vec<u8> {
        let mut content = Vec::new();
        for run in self.runs.iter().filter(|r| r.page == page) {
            content.extend_from_slice(
                format!(
                    "BT /F1 {:.2} Tf {:.2} {:.2} Td ",
                    run.size,
                    run.x * K,
                    (PAGE_HEIGHT - run.baseline) * K
                )
                .as_bytes(),
            );
            push_string(&mut content, &run.text);
            content.extend_from_slice(b" Tj ET\n");
        }
        content
    }
}

fn begin_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>) {
    offsets.push(out.len());
    out.extend_from_slice(format!("{} 0 obj\n", offsets.len()).as_bytes());
}

fn end_object(out: &mut Vec<u8>) { out.extend_from_slice(b"\nendobj\n"); }

/// Write `text` as a PDF literal string in Latin-1.
fn push_string(out: &mut Vec<u8>, text: &str) {
    out.push(b'(');
    for b in latin1_bytes(text) {
        match b {
            b'\\' | b'(' | b')' => {
                out.push(b'\\');
                out.push(b);
            }
            b'\r' => out.extend_from_slice(b"\\r"),
            _ => out.push(b),
        }
    }
    out.push(b')');
}
