//! PDF serialization
//!
//! Writes a laid-out `Document` as a PDF 1.4 file using the two standard
//! Helvetica faces, so no fonts are embedded. Text is encoded as WinAnsi;
//! characters outside it become '?'. A JPEG logo is embedded unchanged with
//! the DCT filter.

use std::io::Write;

use super::document::{Document, DrawOp, Page, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::{ReportError, ReportResult};

const PT_PER_MM: f32 = 72.0 / 25.4;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_REGULAR_ID: usize = 3;
const FONT_BOLD_ID: usize = 4;
const LOGO_ID: usize = 5;

fn pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// PDF y coordinate for a distance from the top of the page
fn flip(y_mm: f32) -> f32 {
    pt(PAGE_HEIGHT - y_mm)
}

fn color(c: Rgb) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        c.0 as f32 / 255.0,
        c.1 as f32 / 255.0,
        c.2 as f32 / 255.0
    )
}

/// Map a char to its WinAnsi byte
fn win_ansi(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '€' => 0x80,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        _ => b'?',
    }
}

/// Encode text as a PDF literal string body
fn encode_text(text: &str, out: &mut Vec<u8>) {
    for c in text.chars() {
        let byte = win_ansi(c);
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
}

fn content_stream(page: &Page, has_logo: bool) -> ReportResult<Vec<u8>> {
    let mut out = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                writeln!(
                    out,
                    "{} rg {:.2} {:.2} {:.2} {:.2} re f",
                    color(*fill),
                    pt(*x),
                    flip(y + height),
                    pt(*width),
                    pt(*height)
                )?;
            }
            DrawOp::Text {
                x,
                y,
                size,
                bold,
                color: c,
                text,
            } => {
                let font = if *bold { "F2" } else { "F1" };
                write!(
                    out,
                    "BT /{} {:.1} Tf {} rg {:.2} {:.2} Td (",
                    font,
                    size,
                    color(*c),
                    pt(*x),
                    flip(*y)
                )?;
                encode_text(text, &mut out);
                writeln!(out, ") Tj ET")?;
            }
            DrawOp::Logo {
                x,
                y,
                width,
                height,
            } if has_logo => {
                writeln!(
                    out,
                    "q {:.2} 0 0 {:.2} {:.2} {:.2} cm /Im1 Do Q",
                    pt(*width),
                    pt(*height),
                    pt(*x),
                    flip(y + height)
                )?;
            }
            DrawOp::Logo { .. } => {}
        }
    }
    Ok(out)
}

/// Accumulates numbered objects and their byte offsets
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = b"%PDF-1.4\n".to_vec();
        // Binary marker so transfer tools treat the file as binary
        buf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn begin(&mut self, id: usize) -> ReportResult<()> {
        if self.offsets.len() < id {
            self.offsets.resize(id, 0);
        }
        self.offsets[id - 1] = self.buf.len();
        writeln!(self.buf, "{} 0 obj", id)?;
        Ok(())
    }

    fn object(&mut self, id: usize, body: &str) -> ReportResult<()> {
        self.begin(id)?;
        write!(self.buf, "{}\nendobj\n", body)?;
        Ok(())
    }

    fn stream(&mut self, id: usize, dict: &str, data: &[u8]) -> ReportResult<()> {
        self.begin(id)?;
        write!(self.buf, "<< {} /Length {} >>\nstream\n", dict, data.len())?;
        self.buf.extend_from_slice(data);
        write!(self.buf, "\nendstream\nendobj\n")?;
        Ok(())
    }

    fn finish(mut self) -> ReportResult<Vec<u8>> {
        if self.offsets.iter().any(|&offset| offset == 0) {
            return Err(ReportError::ExportFailed(
                "PDF object numbering has gaps".into(),
            ));
        }
        let xref = self.buf.len();
        let size = self.offsets.len() + 1;
        write!(self.buf, "xref\n0 {}\n0000000000 65535 f \n", size)?;
        for offset in &self.offsets {
            write!(self.buf, "{:010} 00000 n \n", offset)?;
        }
        write!(
            self.buf,
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, CATALOG_ID, xref
        )?;
        Ok(self.buf)
    }
}

/// Serialize a document to PDF bytes
///
/// Everything is built in memory; nothing touches the filesystem.
pub fn to_pdf_bytes(document: &Document) -> ReportResult<Vec<u8>> {
    let mut writer = PdfWriter::new();
    let has_logo = document.logo.is_some();
    // Pages take the id after the fonts, or after the logo when there is one
    let first_page_id = if has_logo { LOGO_ID + 1 } else { LOGO_ID };
    // Each page takes two ids: the page dictionary and its content stream
    let page_ids: Vec<usize> = (0..document.pages.len())
        .map(|i| first_page_id + i * 2)
        .collect();

    writer.object(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID),
    )?;

    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    writer.object(
        PAGES_ID,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_ids.len()
        ),
    )?;

    writer.object(
        FONT_REGULAR_ID,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    )?;
    writer.object(
        FONT_BOLD_ID,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    )?;

    if let Some(logo) = &document.logo {
        let color_space = match logo.components {
            1 => "/DeviceGray",
            4 => "/DeviceCMYK",
            _ => "/DeviceRGB",
        };
        let dict = format!(
            "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {} /BitsPerComponent 8 /Filter /DCTDecode",
            logo.width_px, logo.height_px, color_space
        );
        writer.stream(LOGO_ID, &dict, &logo.data)?;
    }

    let x_objects = if has_logo {
        format!(" /XObject << /Im1 {} 0 R >>", LOGO_ID)
    } else {
        String::new()
    };

    for (page, &page_id) in document.pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        writer.object(
            page_id,
            &format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << /F1 {} 0 R /F2 {} 0 R >>{} >> /Contents {} 0 R >>",
                PAGES_ID,
                pt(PAGE_WIDTH),
                pt(PAGE_HEIGHT),
                FONT_REGULAR_ID,
                FONT_BOLD_ID,
                x_objects,
                content_id
            ),
        )?;
        let content = content_stream(page, has_logo)?;
        writer.stream(content_id, "", &content)?;
    }

    writer.finish()
}
