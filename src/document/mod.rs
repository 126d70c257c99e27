//! Spreadsheet document creation
//!
//! [`create_document`] is the top of the pipeline: it prepares the output
//! directory, runs a [`DocumentAssembler`] over the URLs and saves the
//! workbook, reporting progress along the way.

mod assembler;
mod error;
pub mod output;
pub mod progress;
pub mod sheet_names;
pub mod workbook;

pub use assembler::{
    AssemblyStats, ContentPayload, DocumentAssembler, DocumentConfig, DocumentConfigBuilder,
};
pub use error::DocumentError;
pub use output::DocumentMode;
pub use progress::{AssemblyStage, NoProgress, ProgressReporter, ProgressSink, ProgressUpdate};
pub use sheet_names::SheetNaming;
pub use workbook::{CellStyle, MemoryWorkbook, WorkbookSink, XlsxWorkbook};

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::page::PageExtractor;
use crate::translation::{TranslationGateway, TranslationProvider};
use output::{FALLBACK_OUTPUT_DIR, output_file_name, prepare_output_dir};

/// Result of a finished document run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub path: PathBuf,
    pub mode: DocumentMode,
    pub pages_written: usize,
    pub pages_failed: usize,
    pub translations_requested: usize,
    pub cache_hits: u64,
}

/// Build an `.xlsx` document for `urls` in `output_dir`
///
/// The document is translated when a gateway is given and at least one
/// target language is configured; otherwise it is content-only.
pub async fn create_document<P, S>(
    extractor: PageExtractor,
    gateway: Option<TranslationGateway<P>>,
    config: DocumentConfig,
    urls: &[String],
    output_dir: &Path,
    progress: S,
) -> Result<DocumentSummary, DocumentError>
where
    P: TranslationProvider,
    S: ProgressSink,
{
    let mut workbook = XlsxWorkbook::new();
    build_document(
        extractor,
        gateway,
        config,
        urls,
        output_dir,
        &mut workbook,
        progress,
    )
    .await
}

/// [`create_document`] with an explicit workbook
#[instrument(skip_all, fields(company = %config.company_name, urls = urls.len()))]
pub async fn build_document<P, W, S>(
    extractor: PageExtractor,
    gateway: Option<TranslationGateway<P>>,
    config: DocumentConfig,
    urls: &[String],
    output_dir: &Path,
    workbook: &mut W,
    progress: S,
) -> Result<DocumentSummary, DocumentError>
where
    P: TranslationProvider,
    W: WorkbookSink,
    S: ProgressSink,
{
    let mut progress = ProgressReporter::new(progress);
    progress
        .report(
            AssemblyStage::Init,
            5,
            "Starting...",
            "",
            "Preparing output directory...",
        )
        .await;
    let dir = prepare_output_dir(output_dir, Path::new(FALLBACK_OUTPUT_DIR))?;

    let mut assembler = DocumentAssembler::new(extractor, gateway, config);
    let mode = assembler.mode();
    let path = dir.join(output_file_name(&assembler.config().company_name, mode));

    let stats = assembler.assemble(urls, workbook, &mut progress).await?;

    progress
        .report(
            AssemblyStage::Finalizing,
            95,
            "Finalizing document...",
            "",
            "Saving Excel file...",
        )
        .await;
    workbook.save(&path)?;

    let done = match mode {
        DocumentMode::Translated => "Translation complete!",
        DocumentMode::ContentOnly => "Content extraction complete!",
    };
    progress.report(AssemblyStage::Done, 100, done, "", "").await;
    info!("Document saved to {}", path.display());

    Ok(DocumentSummary {
        path,
        mode,
        pages_written: stats.pages_written,
        pages_failed: stats.pages_failed,
        translations_requested: stats.translations_requested,
        cache_hits: assembler
            .gateway()
            .map(|gateway| gateway.cache().stats().hits)
            .unwrap_or_default(),
    })
}
