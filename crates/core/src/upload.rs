//! Upload validation and file naming rules.
//!
//! Uploaded workbooks live in a per-job directory so concurrent submissions
//! never share a writable path; translated workbooks are written under a
//! name that embeds both a timestamp and the job id.

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::types::JobId;

/// Extensions (lowercase, without dot) accepted by `POST /translate`.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];

/// MIME type used when serving translated workbooks.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// MIME type of macro-enabled workbooks.
pub const XLSM_MIME_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.12";

/// Prefix of every translated output file.
pub const OUTPUT_PREFIX: &str = "translated_";

/// Name used when sanitizing strips the whole stem.
const FALLBACK_STEM: &str = "workbook";

/// Validate the client-supplied file name of an upload.
///
/// Rejects empty names and names whose extension is not a workbook format
/// this service can rewrite.
pub fn validate_upload_name(file_name: &str) -> Result<(), CoreError> {
    if file_name.trim().is_empty() {
        return Err(CoreError::Validation("No file selected".to_string()));
    }
    match extension_of(file_name) {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(CoreError::Validation(
            "Invalid file type. Please upload an Excel file".to_string(),
        )),
    }
}

/// Lowercased extension of `file_name`, if it has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let base = base_name(file_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Drops any directory part, keeps ASCII alphanumerics plus `-`, `_` and
/// `.`, turns whitespace into `_` and strips leading/trailing dots and
/// underscores. Never returns an empty string.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = base_name(file_name);
    let mut cleaned = String::with_capacity(base.len());
    for ch in base.chars() {
        // A run of dots would read as `..` to the download route.
        if ch == '.' && cleaned.ends_with('.') {
            continue;
        }
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            cleaned.push(ch);
        } else if ch.is_whitespace() {
            cleaned.push('_');
        }
    }

    let (stem, ext) = match cleaned.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            (stem, Some(ext))
        }
        _ => (cleaned.as_str(), None),
    };
    let stem = stem.trim_matches(|c| c == '.' || c == '_');
    // Keep the extension even when the stem was stripped away entirely.
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };

    match ext {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}

/// Directory holding the upload of a single job.
pub fn job_upload_dir(upload_root: &Path, job_id: JobId) -> PathBuf {
    upload_root.join(job_id.to_string())
}

/// Full path of a job's uploaded workbook.
pub fn job_upload_path(upload_root: &Path, job_id: JobId, sanitized_name: &str) -> PathBuf {
    job_upload_dir(upload_root, job_id).join(sanitized_name)
}

/// File name of a job's translated workbook.
pub fn output_file_name(unix_timestamp: i64, job_id: JobId, sanitized_name: &str) -> String {
    format!("{OUTPUT_PREFIX}{unix_timestamp}_{job_id}_{sanitized_name}")
}

/// Validate a file name requested through `GET /download/{filename}`.
///
/// Only bare file names are served; anything that could address a path
/// outside the output directory is rejected.
pub fn validate_download_name(file_name: &str) -> Result<(), CoreError> {
    let invalid = file_name.is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains("..")
        || file_name.contains('\0');
    if invalid {
        return Err(CoreError::Validation(format!(
            "Invalid file name: '{file_name}'"
        )));
    }
    Ok(())
}

/// MIME type for serving a workbook file.
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("xlsm") => XLSM_MIME_TYPE,
        _ => XLSX_MIME_TYPE,
    }
}

fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name)
}
