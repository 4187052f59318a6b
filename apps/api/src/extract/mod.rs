//! Text Extraction Adapter: turns an uploaded resume into plain text.
//!
//! Supported: PDF (`pdf-extract`), Word `.docx` (the `word/document.xml` part
//! of the zip container), and plain text. The declared media type decides
//! the parser; anything else is rejected before the bytes are read.

pub mod handlers;

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("could not read {media_type} file: {detail}")]
    Unreadable {
        media_type: &'static str,
        detail: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Pdf,
    Docx,
    PlainText,
}

impl MediaType {
    /// Parses a MIME type, ignoring parameters such as `; charset=utf-8`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(MediaType::Pdf),
            DOCX_MIME => Some(MediaType::Docx),
            "text/plain" => Some(MediaType::PlainText),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Pdf => "pdf",
            MediaType::Docx => "docx",
            MediaType::PlainText => "plain_text",
        }
    }
}

/// Extracts plain text from `bytes` according to the declared media type.
pub fn extract(bytes: &[u8], declared_media_type: &str) -> Result<(MediaType, String), ExtractError> {
    let media_type = MediaType::from_mime(declared_media_type)
        .ok_or_else(|| ExtractError::UnsupportedFormat(declared_media_type.to_string()))?;

    let unreadable = |detail: String| ExtractError::Unreadable {
        media_type: media_type.as_str(),
        detail,
    };

    let text = match media_type {
        MediaType::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| unreadable(e.to_string()))?,
        MediaType::Docx => extract_docx(bytes).map_err(unreadable)?,
        MediaType::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    debug!(
        "Extracted {} chars from {} upload ({} bytes)",
        text.len(),
        media_type.as_str(),
        bytes.len()
    );
    Ok((media_type, text.trim().to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| e.to_string())?
        .read_to_string(&mut xml)
        .map_err(|e| e.to_string())?;
    docx_xml_to_text(&xml).map_err(|e| e.to_string())
}

/// Collects the text runs (`<w:t>`) of a WordprocessingML body, one line per
/// paragraph (`</w:p>`). Tabs and breaks inside a run become whitespace;
/// tab-stop definitions inside `<w:pPr>`/`<w:rPr>` are ignored.
fn docx_xml_to_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;
    let mut run_depth = 0usize;
    let mut props_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:r" => run_depth += 1,
                b"w:pPr" | b"w:rPr" => props_depth += 1,
                name => push_break(&mut out, name, run_depth, props_depth),
            },
            Event::Empty(e) => push_break(&mut out, e.name().as_ref(), run_depth, props_depth),
            Event::Text(t) if in_text => out.push_str(&t.unescape()?),
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:pPr" | b"w:rPr" => props_depth = props_depth.saturating_sub(1),
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn push_break(out: &mut String, name: &[u8], run_depth: usize, props_depth: usize) {
    if run_depth == 0 || props_depth > 0 {
        return;
    }
    match name {
        b"w:tab" => out.push('\t'),
        b"w:br" | b"w:cr" => out.push('\n'),
        _ => {}
    }
}
