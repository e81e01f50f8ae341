use crate::error::ToolError;
use crate::tool::{Tool, ToolContext};
use async_trait::async_trait;
use orchestrator_core::Parameters;
use serde_json::{json, Value};
use std::path::Path;

fn require_path<'a>(parameters: &'a Parameters) -> Result<&'a str, ToolError> {
    parameters
        .get("path")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidParameters("missing required string parameter \"path\"".into()))
}

fn blocking_read_error(err: impl std::fmt::Display) -> ToolError {
    ToolError::ExecutionFailed(err.to_string())
}

/// Extracts text from a PDF file. Grounded in the desktop research
/// assistant's document-ingestion pipeline, which reaches for
/// `pdf-extract` for the same purpose.
pub struct ReadPdf;

#[async_trait]
impl Tool for ReadPdf {
    fn id(&self) -> &str {
        "readPdf"
    }

    fn description(&self) -> &str {
        "Extracts plain text from a PDF file at a given path."
    }

    async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let path = require_path(parameters)?.to_string();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .map_err(blocking_read_error)?
            .map_err(blocking_read_error)?;
        Ok(json!({ "text": text }))
    }
}

/// Reads the first sheet of a spreadsheet into rows of cell strings, via
/// `calamine` (xlsx/xls/ods), the same crate the desktop teacher uses for
/// its spreadsheet ingestion path.
pub struct ReadExcel;

#[async_trait]
impl Tool for ReadExcel {
    fn id(&self) -> &str {
        "readExcel"
    }

    fn description(&self) -> &str {
        "Reads the first sheet of a spreadsheet file and returns its rows."
    }

    async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let path = require_path(parameters)?.to_string();
        let rows = tokio::task::spawn_blocking(move || -> Result<Vec<Vec<String>>, String> {
            use calamine::Reader;
            let mut workbook: calamine::Sheets<_> =
                calamine::open_workbook_auto(&path).map_err(|e| e.to_string())?;
            let sheet_name = workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| "workbook has no sheets".to_string())?;
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| e.to_string())?;
            Ok(range
                .rows()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect())
        })
        .await
        .map_err(blocking_read_error)?
        .map_err(ToolError::ExecutionFailed)?;

        Ok(json!({ "rows": rows }))
    }
}

/// Extracts paragraph text from a `.docx` file via `docx-rs`.
pub struct ReadDocx;

#[async_trait]
impl Tool for ReadDocx {
    fn id(&self) -> &str {
        "readDocx"
    }

    fn description(&self) -> &str {
        "Extracts paragraph text from a Word (.docx) document."
    }

    async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let path = require_path(parameters)?.to_string();
        let text = tokio::task::spawn_blocking(move || -> Result<String, String> {
            let bytes = std::fs::read(&path).map_err(|e| e.to_string())?;
            let document = docx_rs::read_docx(&bytes).map_err(|e| e.to_string())?;
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
        })
        .await
        .map_err(blocking_read_error)?
        .map_err(ToolError::ExecutionFailed)?;

        Ok(json!({ "text": text }))
    }
}

/// Reads a UTF-8 text file verbatim.
pub struct ReadText;

#[async_trait]
impl Tool for ReadText {
    fn id(&self) -> &str {
        "readText"
    }

    fn description(&self) -> &str {
        "Reads a plain text file and returns its contents."
    }

    async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let path = require_path(parameters)?.to_string();
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        Ok(json!({ "text": text }))
    }
}

/// Reads a CSV file into rows of string fields. Hand-rolled comma/newline
/// split rather than a dedicated parser crate: this tool is a thin
/// convenience reader, not a general CSV engine, so it does not need
/// RFC4180 quoting support.
pub struct ReadCsv;

#[async_trait]
impl Tool for ReadCsv {
    fn id(&self) -> &str {
        "readCsv"
    }

    fn description(&self) -> &str {
        "Reads a CSV file and returns its rows as arrays of field strings."
    }

    async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let path = require_path(parameters)?;
        if Path::new(path).extension().is_none() {
            log::debug!("readCsv called on extensionless path {path}");
        }
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        let rows: Vec<Vec<String>> = contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| line.split(',').map(|field| field.trim().to_string()).collect())
            .collect();
        Ok(json!({ "rows": rows }))
    }
}
