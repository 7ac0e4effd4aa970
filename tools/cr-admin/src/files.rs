//! Local file handling for uploads and downloads.

use anyhow::{bail, Context, Result};
use shared_types::{CertificateDocument, Upload};
use std::path::{Path, PathBuf};

const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS: &str = "application/vnd.ms-excel";
const PDF: &str = "application/pdf";
const OCTET_STREAM: &str = "application/octet-stream";

/// Content type from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("xlsx") => XLSX,
        Some("xls") => XLS,
        Some("pdf") => PDF,
        _ => OCTET_STREAM,
    }
}

pub fn read_upload(path: &Path) -> Result<Upload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("{} has no usable file name", path.display()))?;
    Ok(Upload::new(file_name, content_type_for(path), bytes))
}

/// Write a downloaded document into `dir`, refusing to overwrite.
pub fn save_document(dir: &Path, document: &CertificateDocument) -> Result<PathBuf> {
    // Never trust a server-supplied name as a path.
    let name = Path::new(&document.file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.pdf", document.certificate_id));
    let target = dir.join(name);
    if target.exists() {
        bail!("{} already exists", target.display());
    }
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    std::fs::write(&target, &document.bytes)
        .with_context(|| format!("writing {}", target.display()))?;
    Ok(target)
}
