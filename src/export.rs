// 💾 Export - reply documents and batch reports to disk

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::batch::{BatchReport, Reply, REPORT_COLUMNS};
use crate::composer::ResponseDocument;
use crate::errors::ExportError;
use crate::resolver::CaseRecord;

/// `Yanit_{identifier}_{YYYYMMDD}.{ext}`; refuses when the case has no identifier
pub fn reply_file_name(case: &CaseRecord, ext: &str, today: NaiveDate) -> Result<String, ExportError> {
    let identifier = case
        .fields
        .identifier()
        .ok_or(ExportError::MissingIdentifier)?;

    Ok(format!(
        "Yanit_{}_{}.{}",
        identifier.value(),
        today.format("%Y%m%d"),
        ext
    ))
}

/// `TBB_Rapor_{YYYYMMDD_HHMM}.csv`
pub fn report_file_name(now: NaiveDateTime) -> String {
    format!("TBB_Rapor_{}.csv", now.format("%Y%m%d_%H%M"))
}

/// Write the reply's plain-text rendering into `dir`, returning the file path
pub fn save_reply_text(
    dir: &Path,
    case: &CaseRecord,
    document: &ResponseDocument,
    today: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(reply_file_name(case, "txt", today)?);
    fs::write(&path, document.to_plain_text())?;
    Ok(path)
}

/// Write the styled paragraph structure as JSON into `dir`
pub fn save_reply_json(
    dir: &Path,
    case: &CaseRecord,
    document: &ResponseDocument,
    today: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(reply_file_name(case, "json", today)?);
    fs::write(&path, serde_json::to_string_pretty(document)?)?;
    Ok(path)
}

/// Save every reply as text. A reply that cannot be saved is logged and
/// skipped; returns how many were written.
pub fn save_replies(dir: &Path, replies: &[Reply], today: NaiveDate) -> usize {
    let mut saved = 0;
    for reply in replies {
        match save_reply_text(dir, &reply.case, &reply.document, today) {
            Ok(path) => {
                info!(path = %path.display(), "reply saved");
                saved += 1;
            }
            Err(e) => {
                warn!(file = %reply.case.source_file_name, error = %e, "reply not saved");
            }
        }
    }
    saved
}

/// Write the report as CSV with the fixed column order. The header line is
/// written even when there are no rows.
pub fn write_report_csv(path: &Path, report: &BatchReport) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(REPORT_COLUMNS)?;
    for row in &report.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = report.len(), "report written");
    Ok(())
}
