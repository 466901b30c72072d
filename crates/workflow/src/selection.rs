//! Document selection from local paths.

use docchat_api::{DocumentFile, FileRef};
use docchat_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when walking a directory.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// Read every document named by `paths` into memory.
///
/// Files are taken as given, whatever their extension; directories are walked
/// recursively and only contribute files with an accepted extension, in
/// file-name order.
pub async fn collect_documents(paths: &[PathBuf]) -> AppResult<Vec<DocumentFile>> {
    let mut documents = Vec::new();

    for path in paths {
        if path.is_file() {
            documents.push(DocumentFile::from_path(path).await?);
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file() && is_accepted(entry_path) {
                    documents.push(DocumentFile::from_path(entry_path).await?);
                }
            }
        } else {
            return Err(AppError::Other(format!(
                "No such file or directory: {}",
                path.display()
            )));
        }
    }

    tracing::debug!("Collected {} documents from {} paths", documents.len(), paths.len());
    Ok(documents)
}

fn is_accepted(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// One `• name (N KB)` line per file; empty when nothing is selected.
pub fn render_listing(files: &[FileRef]) -> String {
    files
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
