use crate::error::EnrichmentError;
use orchestrator_core::{ContentType, UnifiedMessage};
use std::path::Path;

const MAX_CHARS: usize = 3000;
const MAX_SPREADSHEET_ROWS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    Spreadsheet,
    Word,
    PlainText,
}

fn classify(mime_type: Option<&str>, media_url: Option<&str>) -> Option<DocumentKind> {
    if let Some(mime) = mime_type {
        match mime {
            "application/pdf" => return Some(DocumentKind::Pdf),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel" => return Some(DocumentKind::Spreadsheet),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                return Some(DocumentKind::Word)
            }
            "text/plain" | "text/csv" => return Some(DocumentKind::PlainText),
            _ => {}
        }
    }
    let ext = media_url.and_then(|u| Path::new(u).extension()).and_then(|e| e.to_str())?;
    match ext.to_lowercase().as_str() {
        "pdf" => Some(DocumentKind::Pdf),
        "xlsx" | "xls" | "ods" => Some(DocumentKind::Spreadsheet),
        "docx" => Some(DocumentKind::Word),
        "txt" | "csv" | "md" => Some(DocumentKind::PlainText),
        _ => None,
    }
}

fn truncate(text: String) -> (String, bool) {
    if text.chars().count() <= MAX_CHARS {
        (text, false)
    } else {
        (text.chars().take(MAX_CHARS).collect(), true)
    }
}

/// Dispatches by MIME type or file extension to a PDF, spreadsheet, Word
/// or plain-text extractor, truncates to 3000 chars, and replaces message
/// content with the extracted text — spec §4.6.
pub async fn enrich_with_document_extract(message: &mut UnifiedMessage) -> Result<bool, EnrichmentError> {
    if message.content_type != ContentType::Document {
        return Ok(false);
    }
    let Some(media_url) = message.media_url.clone() else {
        return Ok(false);
    };
    let Some(kind) = classify(message.mime_type.as_deref(), Some(&media_url)) else {
        return Ok(false);
    };

    let extracted = extract(kind, &media_url).await?;
    let (text, truncated) = truncate(extracted);

    message.content = text;
    message.record_analysis(
        "document_extract",
        serde_json::json!({ "kind": format!("{kind:?}"), "truncated": truncated }),
    );
    Ok(true)
}

async fn extract(kind: DocumentKind, path: &str) -> Result<String, EnrichmentError> {
    let path = path.to_string();
    match kind {
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .map_err(|e| EnrichmentError::ExtractionFailed(e.to_string()))?
            .map_err(|e| EnrichmentError::ExtractionFailed(e.to_string())),
        DocumentKind::Spreadsheet => tokio::task::spawn_blocking(move || extract_spreadsheet(&path))
            .await
            .map_err(|e| EnrichmentError::ExtractionFailed(e.to_string()))?,
        DocumentKind::Word => tokio::task::spawn_blocking(move || extract_docx(&path))
            .await
            .map_err(|e| EnrichmentError::ExtractionFailed(e.to_string()))?,
        DocumentKind::PlainText => tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| EnrichmentError::ExtractionFailed(e.to_string())),
    }
}

fn extract_spreadsheet(path: &str) -> Result<String, EnrichmentError> {
    use calamine::Reader;
    let mut workbook: calamine::Sheets<_> =
        calamine::open_workbook_auto(path).map_err(|e| EnrichmentError::ExtractionFailed(e.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| EnrichmentError::ExtractionFailed("workbook has no sheets".into()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| EnrichmentError::ExtractionFailed(e.to_string()))?;
    let lines: Vec<String> = range
        .rows()
        .take(MAX_SPREADSHEET_ROWS)
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>().join("|"))
        .collect();
    Ok(lines.join("\n"))
}

fn extract_docx(path: &str) -> Result<String, EnrichmentError> {
    let bytes = std::fs::read(path).map_err(|e| EnrichmentError::ExtractionFailed(e.to_string()))?;
    let document = docx_rs::read_docx(&bytes).map_err(|e| EnrichmentError::ExtractionFailed(e.to_string()))?;
    let mut out = String::new();
    for child in document.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            for run_child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = run_child {
                    for text_child in run.children {
                        if let docx_rs::RunChild::Text(t) = text_child {
                            out.push_str(&t.text);
                        }
                    }
                }
            }
            out.push('\n');
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_mime_type_first() {
        assert_eq!(classify(Some("application/pdf"), Some("file")), Some(DocumentKind::Pdf));
    }

    #[test]
    fn falls_back_to_extension() {
        assert_eq!(classify(None, Some("/tmp/report.xlsx")), Some(DocumentKind::Spreadsheet));
        assert_eq!(classify(None, Some("/tmp/notes.txt")), Some(DocumentKind::PlainText));
    }

    #[test]
    fn unknown_extension_is_none() {
        assert_eq!(classify(None, Some("/tmp/file.xyz")), None);
    }

    #[test]
    fn truncates_past_3000_chars_and_flags_it() {
        let long = "a".repeat(4000);
        let (text, truncated) = truncate(long);
        assert_eq!(text.chars().count(), MAX_CHARS);
        assert!(truncated);
    }

    #[test]
    fn short_text_is_not_truncated() {
        let (text, truncated) = truncate("short".to_string());
        assert_eq!(text, "short");
        assert!(!truncated);
    }
}
