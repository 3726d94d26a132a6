//! Flattening parsed reports into CSV rows.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    context::extract_context,
    error::{AdLabelError, Result},
    parser::parse_report,
    types::{AnalysisOutcome, AnalysisRecord, ExportRow, Report, UNKNOWN},
};

pub const CSV_HEADER: &str =
    "Video Filename,Section,Item Number,Content,Detected Vertical,Detected Platform";

pub const CSV_MIME_TYPE: &str = "text/csv";

/// Rows for a single report, one per parsed item.
pub fn report_rows(source_label: &str, raw_text: &str) -> Vec<ExportRow> {
    let context = extract_context(raw_text);
    let parsed = parse_report(raw_text);

    let mut rows = Vec::with_capacity(parsed.item_count());
    for section in &parsed {
        for (i, item) in section.items.iter().enumerate() {
            rows.push(ExportRow {
                source_label: source_label.to_string(),
                section_title: section.title.clone(),
                item_index: i + 1,
                item_content: item.clone(),
                detected_vertical: context.vertical.clone(),
                detected_platform: context.platform.clone(),
            });
        }
    }
    rows
}

/// Flatten a batch into rows, keeping input order. Failed analyses are
/// skipped and contribute no rows.
pub fn flatten_reports(records: &[AnalysisRecord]) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for record in records {
        match &record.outcome {
            AnalysisOutcome::Completed(raw_text) => {
                let report_rows = report_rows(&record.source_label, raw_text);
                if report_rows.is_empty() {
                    warn!(source = %record.source_label, "no sections found in analysis text");
                }
                rows.extend(report_rows);
            }
            AnalysisOutcome::Failed(reason) => {
                warn!(source = %record.source_label, %reason, "skipping failed analysis");
            }
        }
    }
    rows
}

/// Serialize rows behind the fixed header. Every data field is quoted and
/// embedded quotes are doubled; newlines inside a field are written as-is.
pub fn write_csv(rows: &[ExportRow]) -> Result<String> {
    let mut buf = Vec::with_capacity(CSV_HEADER.len() + 1 + rows.len() * 96);
    buf.extend_from_slice(CSV_HEADER.as_bytes());
    buf.push(b'\n');

    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buf);

    for row in rows {
        let index = row.item_index.to_string();
        wtr.write_record([
            row.source_label.as_str(),
            row.section_title.as_str(),
            index.as_str(),
            row.item_content.as_str(),
            row.detected_vertical.as_str(),
            row.detected_platform.as_str(),
        ])?;
    }

    let buf = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(buf).map_err(|e| AdLabelError::invalid_input(e.to_string()))
}

pub fn export_csv(records: &[AnalysisRecord]) -> Result<String> {
    let rows = flatten_reports(records);
    info!(reports = records.len(), rows = rows.len(), "csv export built");
    write_csv(&rows)
}

pub fn export_reports(reports: &[Report]) -> Result<String> {
    let records: Vec<AnalysisRecord> = reports.iter().cloned().map(Into::into).collect();
    export_csv(&records)
}

/// Read a batch of `{ videoInfo, analysis }` results.
///
/// Accepts a bare array or an object with an `analysisResults` array. The
/// analysis may be a string or an object carrying the text under `analysis`.
pub fn records_from_json(value: &Value) -> Result<Vec<AnalysisRecord>> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("analysisResults") {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(AdLabelError::invalid_input(
                    "analysisResults must be an array",
                ));
            }
            None => {
                return Err(AdLabelError::invalid_input(
                    "no analysis results provided",
                ));
            }
        },
        _ => {
            return Err(AdLabelError::invalid_input(
                "expected an array of analysis results",
            ));
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| record_from_entry(i, entry))
        .collect()
}

fn record_from_entry(index: usize, entry: &Value) -> Result<AnalysisRecord> {
    let Value::Object(map) = entry else {
        return Err(AdLabelError::invalid_input(format!(
            "analysis result {index} is not an object"
        )));
    };

    let source_label = match map.get("videoInfo") {
        None | Some(Value::Null) => UNKNOWN.to_string(),
        Some(Value::Object(info)) => match info.get("filename") {
            None | Some(Value::Null) => UNKNOWN.to_string(),
            Some(Value::String(name)) => name.clone(),
            Some(_) => {
                return Err(AdLabelError::invalid_input(format!(
                    "analysis result {index} has a non-string videoInfo.filename"
                )));
            }
        },
        Some(_) => {
            return Err(AdLabelError::invalid_input(format!(
                "analysis result {index} has a non-object videoInfo"
            )));
        }
    };

    if let Some(error) = map.get("error").filter(|e| !e.is_null()) {
        let reason = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Ok(AnalysisRecord::failed(source_label, reason));
    }
    if map.get("status").and_then(Value::as_str) == Some("failed") {
        return Ok(AnalysisRecord::failed(source_label, "analysis failed"));
    }

    let text = match map.get("analysis") {
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Object(inner)) => inner
            .get("analysis")
            .and_then(Value::as_str)
            .map(str::to_string),
        None | Some(Value::Null) => None,
        Some(_) => {
            return Err(AdLabelError::invalid_input(format!(
                "analysis result {index} has an analysis that is neither text nor an object"
            )));
        }
    };

    Ok(match text {
        Some(text) => AnalysisRecord::completed(source_label, text),
        None => AnalysisRecord::failed(source_label, "no analysis text"),
    })
}

pub fn export_csv_json(value: &Value) -> Result<String> {
    let records = records_from_json(value)?;
    export_csv(&records)
}

/// Build the `analysisResults` payload that [`records_from_json`] reads back.
pub fn records_to_json(records: &[AnalysisRecord]) -> Value {
    let results: Vec<Value> = records
        .iter()
        .map(|record| match &record.outcome {
            AnalysisOutcome::Completed(text) => serde_json::json!({
                "videoInfo": { "filename": record.source_label },
                "analysis": text,
            }),
            AnalysisOutcome::Failed(reason) => serde_json::json!({
                "videoInfo": { "filename": record.source_label },
                "error": reason,
                "status": "failed",
            }),
        })
        .collect();
    serde_json::json!({ "analysisResults": results })
}

/// `video-analysis-2025-01-31.csv` for a `2025-01-31` date string.
pub fn default_export_filename(date: &str) -> String {
    format!("video-analysis-{date}.csv")
}
