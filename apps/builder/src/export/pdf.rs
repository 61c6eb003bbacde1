//! PDF file handling on the local side: download naming, writing the
//! generated document, and validating a file chosen for import.

use std::path::{Path, PathBuf};

use crate::backend::FileUpload;

pub const BUSY_LABEL: &str = "⏳ Generating PDF...";
pub const UPLOAD_BUSY_LABEL: &str = "⏳ Extracting...";

/// `<Name_With_Underscores>_Resume.pdf`, falling back to `Resume`.
pub fn download_file_name(full_name: &str) -> String {
    let parts: Vec<String> = full_name
        .split_whitespace()
        .map(|part| part.replace(['/', '\\'], "_"))
        .collect();
    let stem = if parts.is_empty() {
        "Resume".to_string()
    } else {
        parts.join("_")
    };
    format!("{stem}_Resume.pdf")
}

/// Writes the document into `dir`, replacing any earlier download of the same name.
pub async fn save_download(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Reads a selected file for upload.
pub async fn read_upload(path: &Path) -> std::io::Result<FileUpload> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(FileUpload { file_name, bytes })
}
