//! Resume upload: turns an uploaded document into plain text for resume-mode extraction.
//!
//! PDF goes through `pdf-extract`, DOCX through `docx-rs`. Both parsers are
//! synchronous, so extraction runs on the blocking pool.

use bytes::Bytes;
use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use tracing::{debug, warn};

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK";
const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Unknown,
}

/// Classifies an upload by magic bytes first, then declared type, then extension.
pub fn detect_format(file_name: Option<&str>, content_type: Option<&str>, data: &[u8]) -> ResumeFormat {
    if data.starts_with(PDF_MAGIC) {
        return ResumeFormat::Pdf;
    }
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match (content_type, extension.as_deref()) {
        (Some(PDF_MIME), _) | (_, Some("pdf")) => ResumeFormat::Pdf,
        (Some(DOCX_MIME), _) | (_, Some("docx")) | (_, Some("doc")) => ResumeFormat::Docx,
        _ => ResumeFormat::Unknown,
    }
}

fn pdf_to_text(data: &[u8]) -> Result<String, AppError> {
    if !data.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation(
            "Uploaded file is not a valid PDF".to_string(),
        ));
    }
    pdf_extract::extract_text_from_mem(data).map_err(|e| {
        warn!("PDF text extraction failed: {e}");
        AppError::Validation("Could not read text from the uploaded PDF".to_string())
    })
}

// ────────────────────────────────────────────────────────────────────────────
// DOCX
// ────────────────────────────────────────────────────────────────────────────

fn docx_to_text(data: &[u8]) -> Result<String, AppError> {
    let unreadable = || AppError::Validation("Could not read text from the uploaded DOCX document".to_string());
    if !data.starts_with(ZIP_MAGIC) {
        return Err(unreadable());
    }
    let package = read_docx(data).map_err(|e| {
        warn!("DOCX text extraction failed: {e}");
        unreadable()
    })?;

    let mut lines = Vec::new();
    for child in &package.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => push_paragraph(paragraph, &mut lines),
            DocumentChild::Table(table) => push_table(table, &mut lines),
            _ => {}
        }
    }
    Ok(lines.join("\n"))
}

fn push_paragraph(paragraph: &Paragraph, lines: &mut Vec<String>) {
    let mut text = String::new();
    for child in &paragraph.children {
        append_paragraph_child(child, &mut text);
    }
    let text = text.trim();
    if !text.is_empty() {
        lines.push(text.to_string());
    }
}

fn append_paragraph_child(child: &ParagraphChild, text: &mut String) {
    match child {
        ParagraphChild::Run(run) => append_run(run, text),
        ParagraphChild::Hyperlink(link) => {
            for inner in &link.children {
                append_paragraph_child(inner, text);
            }
        }
        _ => {}
    }
}

fn append_run(run: &Run, text: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Break(_) => text.push('\n'),
            RunChild::Tab(_) => text.push('\t'),
            _ => {}
        }
    }
}

#[allow(irrefutable_let_patterns)]
fn push_table(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row else { continue };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else { continue };
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => push_paragraph(paragraph, lines),
                    TableCellContent::Table(inner) => push_table(inner, lines),
                    _ => {}
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Extracts plain text from an uploaded PDF or DOCX resume.
pub async fn extract_resume_text(
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: Bytes,
) -> Result<String, AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded resume is empty".to_string()));
    }

    let format = detect_format(file_name, content_type, &data);
    let parse: fn(&[u8]) -> Result<String, AppError> = match format {
        ResumeFormat::Pdf => pdf_to_text,
        ResumeFormat::Docx => docx_to_text,
        ResumeFormat::Unknown => {
            return Err(AppError::Validation(
                "Unsupported resume format; please upload a PDF or Word document".to_string(),
            ))
        }
    };

    let text = tokio::task::spawn_blocking(move || parse(&data))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    debug!(?format, chars = text.len(), "Extracted resume text");

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "The uploaded resume contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}
