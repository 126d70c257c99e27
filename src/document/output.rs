//! Output file location

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::error::DocumentError;

/// Directory under the user's Documents folder
pub const OUTPUT_DIR_NAME: &str = "Website-Translation-Tool-Outputs";

/// Directory used when the preferred one cannot be created
pub const FALLBACK_OUTPUT_DIR: &str = "translation_outputs";

/// Which variant of the document is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentMode {
    Translated,
    ContentOnly,
}

/// `<company>.xlsx` or `<company>_content_only.xlsx`
///
/// Path separators in the company name are replaced so the file always
/// lands directly in the output directory.
pub fn output_file_name(company_name: &str, mode: DocumentMode) -> String {
    let mut stem: String = company_name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if stem.is_empty() {
        stem = "output".to_string();
    }
    match mode {
        DocumentMode::Translated => format!("{}.xlsx", stem),
        DocumentMode::ContentOnly => format!("{}_content_only.xlsx", stem),
    }
}

/// `~/Documents/Website-Translation-Tool-Outputs`
pub fn default_output_dir() -> Option<PathBuf> {
    let dirs = directories::UserDirs::new()?;
    let documents = dirs
        .document_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dirs.home_dir().join("Documents"));
    Some(documents.join(OUTPUT_DIR_NAME))
}

/// First configured directory: explicit, then saved config, then default
pub fn choose_output_dir(explicit: Option<PathBuf>, configured: Option<PathBuf>) -> PathBuf {
    explicit
        .or(configured)
        .or_else(default_output_dir)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_OUTPUT_DIR))
}

/// Create `preferred`, falling back once to `fallback`
pub fn prepare_output_dir(preferred: &Path, fallback: &Path) -> Result<PathBuf, DocumentError> {
    match fs::create_dir_all(preferred) {
        Ok(()) => Ok(preferred.to_path_buf()),
        Err(e) => {
            warn!(
                "Cannot use output directory {}: {}, falling back to {}",
                preferred.display(),
                e,
                fallback.display()
            );
            fs::create_dir_all(fallback).map_err(|source| DocumentError::OutputDir {
                primary: preferred.to_path_buf(),
                fallback: fallback.to_path_buf(),
                source,
            })?;
            info!("Writing output to {}", fallback.display());
            Ok(fallback.to_path_buf())
        }
    }
}
