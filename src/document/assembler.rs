//! Workbook assembly
//!
//! Drives the page extractor and, in translated mode, the translation
//! gateway across a list of URLs, writing one sheet per page behind a
//! table of contents.
//!
//! Every content sheet has the same layout (0-based rows):
//!
//! | row | column A | columns B.. |
//! |-----|----------|-------------|
//! | 0 | page URL | page title (B1) |
//! | 1 | source language | target languages |
//! | 3 | `Title Tag:` | |
//! | 4 | title | translations |
//! | 6 | `Meta Description:` | |
//! | 7 | meta description or `None` | translations |
//! | 9 | `Content (ordered):` | |
//! | 10.. | content | translations |

use tracing::{debug, info, instrument, warn};

use super::error::DocumentError;
use super::progress::{AssemblyStage, ProgressReporter, ProgressSink, UrlStep};
use super::sheet_names::{SheetNamer, SheetNaming, TOC_SHEET_NAME, index_name};
use super::workbook::{CellStyle, WorkbookSink};
use super::DocumentMode;
use crate::page::{ContentNode, PageContent, PageExtractor, parse_page};
use crate::translation::languages::{normalize_code, normalize_targets, same_language};
use crate::translation::{TranslationGateway, TranslationProvider};

const URL_ROW: u32 = 0;
const LANGUAGE_ROW: u32 = 1;
const TITLE_LABEL_ROW: u32 = 3;
const META_LABEL_ROW: u32 = 6;
const CONTENT_LABEL_ROW: u32 = 9;

/// Column holding the original page title in the table of contents
const TOC_TITLE_COL: u16 = 2;

/// Settings for one document
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Used for the output file name
    pub company_name: String,

    /// Language of the site, e.g. `EN-US`
    pub source_language: String,

    /// Translation columns, in order
    pub target_languages: Vec<String>,

    pub sheet_naming: SheetNaming,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            source_language: "EN-US".to_string(),
            target_languages: Vec::new(),
            sheet_naming: SheetNaming::default(),
        }
    }
}

impl DocumentConfig {
    pub fn builder() -> DocumentConfigBuilder {
        DocumentConfigBuilder::default()
    }
}

/// Builder for [`DocumentConfig`]
#[derive(Debug, Default)]
pub struct DocumentConfigBuilder {
    config: DocumentConfig,
}

impl DocumentConfigBuilder {
    pub fn company_name(mut self, name: impl Into<String>) -> Self {
        self.config.company_name = name.into();
        self
    }

    /// Source language code, normalized
    pub fn source_language(mut self, code: &str) -> Self {
        self.config.source_language = normalize_code(code);
        self
    }

    /// Target language codes, normalized and de-duplicated
    pub fn target_languages<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.target_languages = normalize_targets(codes);
        self
    }

    pub fn sheet_naming(mut self, naming: SheetNaming) -> Self {
        self.config.sheet_naming = naming;
        self
    }

    pub fn build(self) -> DocumentConfig {
        self.config
    }
}

/// Text written to a sheet, either one string or a run of content nodes
#[derive(Debug, Clone, Copy)]
pub enum ContentPayload<'a> {
    Single(&'a str),
    Many(&'a [ContentNode]),
}

/// Counters from one assembly run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub pages_written: usize,
    pub pages_failed: usize,
    /// Gateway calls, including cache hits
    pub translations_requested: usize,
}

/// Writes pages into a workbook
pub struct DocumentAssembler<P: TranslationProvider> {
    extractor: PageExtractor,
    gateway: Option<TranslationGateway<P>>,
    config: DocumentConfig,
    /// Target columns that need translating, as `(column, code)`
    translation_columns: Vec<(u16, String)>,
    stats: AssemblyStats,
}

impl<P: TranslationProvider> DocumentAssembler<P> {
    /// Create an assembler
    ///
    /// Without a gateway, or without target languages, the assembler runs
    /// in content-only mode.
    pub fn new(
        extractor: PageExtractor,
        gateway: Option<TranslationGateway<P>>,
        config: DocumentConfig,
    ) -> Self {
        let translation_columns = config
            .target_languages
            .iter()
            .enumerate()
            .filter(|(_, target)| !same_language(target, &config.source_language))
            .map(|(idx, target)| (idx as u16 + 1, target.clone()))
            .collect();

        Self {
            extractor,
            gateway,
            config,
            translation_columns,
            stats: AssemblyStats::default(),
        }
    }

    pub fn mode(&self) -> DocumentMode {
        if self.gateway.is_some() && !self.config.target_languages.is_empty() {
            DocumentMode::Translated
        } else {
            DocumentMode::ContentOnly
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn gateway(&self) -> Option<&TranslationGateway<P>> {
        self.gateway.as_ref()
    }

    /// Give back the gateway so its cache can outlive this document
    pub fn into_gateway(self) -> Option<TranslationGateway<P>> {
        self.gateway
    }

    /// Write the table of contents and one sheet per URL
    ///
    /// In translated mode the first page or translation failure aborts the
    /// run. In content-only mode a failed page gets a sheet with the error
    /// message and the run continues.
    #[instrument(skip_all, fields(urls = urls.len(), mode = ?self.mode()))]
    pub async fn assemble<W, S>(
        &mut self,
        urls: &[String],
        workbook: &mut W,
        progress: &mut ProgressReporter<S>,
    ) -> Result<AssemblyStats, DocumentError>
    where
        W: WorkbookSink,
        S: ProgressSink,
    {
        self.stats = AssemblyStats::default();

        progress
            .report(
                AssemblyStage::WritingToc,
                10,
                "Creating table of contents...",
                "",
                "Organizing URLs...",
            )
            .await;
        let toc = workbook.add_sheet(TOC_SHEET_NAME)?;
        for (i, url) in urls.iter().enumerate() {
            workbook.write(toc, i as u32, 0, url, CellStyle::Plain)?;
            workbook.write(toc, i as u32, 1, &index_name(i), CellStyle::Plain)?;
        }

        let mut namer = SheetNamer::new(self.config.sheet_naming);
        for (i, url) in urls.iter().enumerate() {
            self.process_url(i, urls.len(), url, toc, &mut namer, workbook, progress)
                .await?;
        }

        info!(
            "Assembled {} pages ({} failed)",
            self.stats.pages_written, self.stats.pages_failed
        );
        Ok(self.stats)
    }

    #[allow(clippy::too_many_arguments)]
    #[instrument(
        skip(self, toc, namer, workbook, progress),
        fields(stage = %AssemblyStage::ProcessingUrl(index))
    )]
    async fn process_url<W, S>(
        &mut self,
        index: usize,
        total: usize,
        url: &str,
        toc: usize,
        namer: &mut SheetNamer,
        workbook: &mut W,
        progress: &mut ProgressReporter<S>,
    ) -> Result<(), DocumentError>
    where
        W: WorkbookSink,
        S: ProgressSink,
    {
        progress.url_step(index, total, url, UrlStep::Fetch).await;
        let fetched = self.extractor.fetch_html(url).await;

        progress.url_step(index, total, url, UrlStep::Parse).await;
        let page = fetched.and_then(|html| parse_page(&html));

        let page = match (page, self.mode()) {
            (Ok(page), _) => page,
            (Err(source), DocumentMode::Translated) => {
                return Err(DocumentError::Page {
                    url: url.to_string(),
                    source,
                });
            }
            (Err(e), DocumentMode::ContentOnly) => {
                warn!("Error processing {}: {}", url, e);
                let name = namer.name_for(index, None);
                let sheet = workbook.add_sheet(&name)?;
                workbook.write_link(toc, index as u32, 1, &name, &name)?;
                workbook.write(sheet, URL_ROW, 0, url, CellStyle::Plain)?;
                let message = format!("Error: {}", e);
                workbook.write(sheet, TITLE_LABEL_ROW, 0, &message, CellStyle::Plain)?;
                self.stats.pages_failed += 1;
                return Ok(());
            }
        };

        progress.url_step(index, total, url, UrlStep::Write).await;
        let name = namer.name_for(index, page.title.as_deref());
        debug!("Writing {} to sheet {:?}", url, name);
        let sheet = workbook.add_sheet(&name)?;

        workbook.write_link(toc, index as u32, 1, &name, &name)?;
        if let Some(title) = &page.title {
            workbook.write(toc, index as u32, TOC_TITLE_COL, title, CellStyle::Plain)?;
        }

        self.write_page(workbook, sheet, url, &page).await?;
        self.stats.pages_written += 1;
        Ok(())
    }

    async fn write_page<W: WorkbookSink>(
        &mut self,
        workbook: &mut W,
        sheet: usize,
        url: &str,
        page: &PageContent,
    ) -> Result<(), DocumentError> {
        workbook.write(sheet, URL_ROW, 0, url, CellStyle::Plain)?;
        if let Some(title) = &page.title {
            workbook.write(sheet, URL_ROW, 1, title, CellStyle::Plain)?;
        }

        match self.mode() {
            DocumentMode::Translated => {
                let source = &self.config.source_language;
                workbook.write(sheet, LANGUAGE_ROW, 0, source, CellStyle::Plain)?;
                for (idx, target) in self.config.target_languages.iter().enumerate() {
                    let col = idx as u16 + 1;
                    workbook.write(sheet, LANGUAGE_ROW, col, target, CellStyle::Plain)?;
                }
            }
            DocumentMode::ContentOnly => {
                let header = format!("Source Language: {}", self.config.source_language);
                workbook.write(sheet, LANGUAGE_ROW, 0, &header, CellStyle::Plain)?;
            }
        }

        workbook.write(sheet, TITLE_LABEL_ROW, 0, "Title Tag:", CellStyle::Bold)?;
        if let Some(title) = &page.title {
            self.write_payload(workbook, sheet, TITLE_LABEL_ROW + 1, ContentPayload::Single(title))
                .await?;
        }

        workbook.write(sheet, META_LABEL_ROW, 0, "Meta Description:", CellStyle::Bold)?;
        match &page.meta_description {
            Some(meta) => {
                let payload = ContentPayload::Single(meta);
                self.write_payload(workbook, sheet, META_LABEL_ROW + 1, payload)
                    .await?;
            }
            None => {
                workbook.write(
                    sheet,
                    META_LABEL_ROW + 1,
                    0,
                    page.meta_description_or_sentinel(),
                    CellStyle::Plain,
                )?;
            }
        }

        workbook.write(sheet, CONTENT_LABEL_ROW, 0, "Content (ordered):", CellStyle::Bold)?;
        self.write_payload(
            workbook,
            sheet,
            CONTENT_LABEL_ROW + 1,
            ContentPayload::Many(&page.ordered_elements),
        )
        .await?;
        Ok(())
    }

    /// Write a payload starting at `row`, returning the next free row
    async fn write_payload<W: WorkbookSink>(
        &mut self,
        workbook: &mut W,
        sheet: usize,
        row: u32,
        payload: ContentPayload<'_>,
    ) -> Result<u32, DocumentError> {
        match payload {
            ContentPayload::Single(text) => {
                self.write_row(workbook, sheet, row, text, CellStyle::Plain).await?;
                Ok(row + 1)
            }
            ContentPayload::Many(nodes) => {
                let mut row = row;
                for node in nodes {
                    let style = if node.is_heading() {
                        CellStyle::Bold
                    } else {
                        CellStyle::Plain
                    };
                    self.write_row(workbook, sheet, row, &node.text, style).await?;
                    row += 1;
                }
                Ok(row)
            }
        }
    }

    /// Source text in column A and one translation per target column
    async fn write_row<W: WorkbookSink>(
        &mut self,
        workbook: &mut W,
        sheet: usize,
        row: u32,
        text: &str,
        style: CellStyle,
    ) -> Result<(), DocumentError> {
        workbook.write(sheet, row, 0, text, style)?;

        if self.mode() == DocumentMode::ContentOnly {
            return Ok(());
        }
        let Some(gateway) = self.gateway.as_mut() else {
            return Ok(());
        };
        for (col, target) in &self.translation_columns {
            let translated = gateway.translate(text, target).await?;
            self.stats.translations_requested += 1;
            workbook.write(sheet, row, *col, &translated, style)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::progress::NoProgress;
    use crate::document::workbook::MemoryWorkbook;
    use crate::http::HttpClient;
    use crate::translation::TranslationError;
    use mockito::{Server, ServerGuard};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeProvider {
        calls: AtomicUsize,
    }

    impl TranslationProvider for FakeProvider {
        async fn translate(
            &self,
            text: &str,
            target_language: &str,
        ) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match (text, target_language) {
                ("", _) => Err(TranslationError::InvalidRequest("empty text".to_string())),
                ("Hello", "FR") => Ok("Bonjour".to_string()),
                (_, "XX") => Err(TranslationError::InvalidRequest("bad target".to_string())),
                _ => Ok(format!("{} ({})", text, target_language)),
            }
        }
    }

    const HELLO_PAGE: &str = r#"<html><head><title>Home</title></head>
        <body><main><h1>Hello</h1><p></p><li>World</li></main></body></html>"#;

    async fn site(pages: &[(&str, u16, &str)]) -> (ServerGuard, Vec<mockito::Mock>, Vec<String>) {
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();
        let mut urls = Vec::new();
        for (path, status, body) in pages {
            mocks.push(
                server
                    .mock("GET", *path)
                    .with_status(*status as usize)
                    .with_header("content-type", "text/html")
                    .with_body(*body)
                    .create_async()
                    .await,
            );
            urls.push(format!("{}{}", server.url(), path));
        }
        (server, mocks, urls)
    }

    fn translated_config(targets: &[&str]) -> DocumentConfig {
        DocumentConfig::builder()
            .company_name("Acme")
            .source_language("EN-US")
            .target_languages(targets.iter().copied())
            .build()
    }

    #[tokio::test]
    async fn test_target_equal_to_source_is_skipped() {
        let (_server, _mocks, urls) = site(&[("/home", 200, HELLO_PAGE)]).await;
        let mut assembler = DocumentAssembler::new(
            PageExtractor::new(HttpClient::new()),
            Some(TranslationGateway::new(FakeProvider::default())),
            translated_config(&["EN-US", "FR"]),
        );
        let mut workbook = MemoryWorkbook::new();
        let mut progress = ProgressReporter::new(NoProgress);

        let stats = assembler
            .assemble(&urls, &mut workbook, &mut progress)
            .await
            .unwrap();
        assert_eq!(stats.pages_written, 1);

        let sheet = workbook.sheet("Home").unwrap();
        assert_eq!(sheet.text(0, 0), Some(urls[0].as_str()));
        assert_eq!(sheet.text(1, 0), Some("EN-US"));
        assert_eq!(sheet.text(1, 1), Some("EN-US"));
        assert_eq!(sheet.text(1, 2), Some("FR"));

        // First content row is the heading
        assert_eq!(sheet.text(10, 0), Some("Hello"));
        assert_eq!(sheet.text(10, 1), None);
        assert_eq!(sheet.text(10, 2), Some("Bonjour"));
        assert_eq!(sheet.cell(10, 0).unwrap().style, CellStyle::Bold);
        assert_eq!(sheet.cell(10, 2).unwrap().style, CellStyle::Bold);

        assert_eq!(sheet.text(11, 0), Some("World"));
        assert_eq!(sheet.cell(11, 2).unwrap().style, CellStyle::Plain);
        assert_eq!(sheet.text(12, 0), None);
    }

    #[tokio::test]
    async fn test_missing_meta_is_sentinel_and_not_translated() {
        let (_server, _mocks, urls) = site(&[("/home", 200, HELLO_PAGE)]).await;
        let mut assembler = DocumentAssembler::new(
            PageExtractor::new(HttpClient::new()),
            Some(TranslationGateway::new(FakeProvider::default())),
            translated_config(&["FR"]),
        );
        let mut workbook = MemoryWorkbook::new();

        assembler
            .assemble(&urls, &mut workbook, &mut ProgressReporter::new(NoProgress))
            .await
            .unwrap();

        let sheet = workbook.sheet("Home").unwrap();
        assert_eq!(sheet.text(3, 0), Some("Title Tag:"));
        assert_eq!(sheet.text(4, 0), Some("Home"));
        assert_eq!(sheet.text(4, 1), Some("Home (FR)"));
        assert_eq!(sheet.text(6, 0), Some("Meta Description:"));
        assert_eq!(sheet.text(7, 0), Some("None"));
        assert_eq!(sheet.text(7, 1), None);
        assert_eq!(sheet.text(9, 0), Some("Content (ordered):"));
    }

    #[tokio::test]
    async fn test_blank_meta_is_sentinel_and_not_translated() {
        let page = r#"<html><head><title>Home</title>
            <meta name="description" content="  "></head>
            <body><main><p>Text</p></main></body></html>"#;
        let (_server, _mocks, urls) = site(&[("/home", 200, page)]).await;
        let mut assembler = DocumentAssembler::new(
            PageExtractor::new(HttpClient::new()),
            Some(TranslationGateway::new(FakeProvider::default())),
            translated_config(&["FR"]),
        );
        let mut workbook = MemoryWorkbook::new();

        let stats = assembler
            .assemble(&urls, &mut workbook, &mut ProgressReporter::new(NoProgress))
            .await
            .unwrap();
        assert_eq!(stats.pages_written, 1);

        let sheet = workbook.sheet("Home").unwrap();
        assert_eq!(sheet.text(7, 0), Some("None"));
        assert_eq!(sheet.text(7, 1), None);
        assert_eq!(sheet.text(10, 1), Some("Text (FR)"));
    }

    #[tokio::test]
    async fn test_duplicate_titles_stay_addressable_from_toc() {
        let (_server, _mocks, urls) =
            site(&[("/a", 200, HELLO_PAGE), ("/b", 200, HELLO_PAGE)]).await;
        let mut assembler = DocumentAssembler::new(
            PageExtractor::new(HttpClient::new()),
            None::<TranslationGateway<FakeProvider>>,
            translated_config(&[]),
        );
        let mut workbook = MemoryWorkbook::new();

        assembler
            .assemble(&urls, &mut workbook, &mut ProgressReporter::new(NoProgress))
            .await
            .unwrap();

        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Table of Contents", "Home", "Duplicate title Error 1"]);

        let toc = workbook.sheet("Table of Contents").unwrap();
        assert_eq!(toc.text(0, 0), Some(urls[0].as_str()));
        assert_eq!(toc.text(1, 0), Some(urls[1].as_str()));
        assert_eq!(toc.cell(0, 1).unwrap().link.as_deref(), Some("Home"));
        assert_eq!(
            toc.cell(1, 1).unwrap().link.as_deref(),
            Some("Duplicate title Error 1")
        );
        assert_eq!(toc.text(1, 2), Some("Home"));

        let second = workbook.sheet("Duplicate title Error 1").unwrap();
        assert_eq!(second.text(0, 0), Some(urls[1].as_str()));
        assert_eq!(second.text(0, 1), Some("Home"));
    }

    #[tokio::test]
    async fn test_content_only_never_calls_gateway() {
        let (_server, _mocks, urls) = site(&[("/home", 200, HELLO_PAGE)]).await;
        let mut assembler = DocumentAssembler::new(
            PageExtractor::new(HttpClient::new()),
            Some(TranslationGateway::new(FakeProvider::default())),
            translated_config(&[]),
        );
        assert_eq!(assembler.mode(), DocumentMode::ContentOnly);

        let mut workbook = MemoryWorkbook::new();
        let stats = assembler
            .assemble(&urls, &mut workbook, &mut ProgressReporter::new(NoProgress))
            .await
            .unwrap();

        assert_eq!(stats.translations_requested, 0);
        let gateway = assembler.into_gateway().unwrap();
        assert_eq!(gateway.provider().calls.load(Ordering::SeqCst), 0);

        let sheet = workbook.sheet("Home").unwrap();
        assert_eq!(sheet.text(1, 0), Some("Source Language: EN-US"));
        assert_eq!(sheet.text(1, 1), None);
        assert_eq!(sheet.text(10, 1), None);
    }

    #[tokio::test]
    async fn test_content_only_continues_past_failed_page() {
        let (_server, _mocks, urls) =
            site(&[("/missing", 404, ""), ("/home", 200, HELLO_PAGE)]).await;
        let mut assembler = DocumentAssembler::new(
            PageExtractor::new(HttpClient::new()),
            None::<TranslationGateway<FakeProvider>>,
            DocumentConfig::default(),
        );
        let mut workbook = MemoryWorkbook::new();

        let stats = assembler
            .assemble(&urls, &mut workbook, &mut ProgressReporter::new(NoProgress))
            .await
            .unwrap();

        assert_eq!(stats, AssemblyStats {
            pages_written: 1,
            pages_failed: 1,
            translations_requested: 0
        });
        let failed = workbook.sheet("Sheet 2").unwrap();
        assert!(failed.text(3, 0).unwrap().starts_with("Error: "));
        assert!(workbook.sheet("Home").is_some());
    }

    #[tokio::test]
    async fn test_translated_mode_propagates_page_failure() {
        let (_server, _mocks, urls) = site(&[("/missing", 500, "")]).await;
        let mut assembler = DocumentAssembler::new(
            PageExtractor::new(HttpClient::new()),
            Some(TranslationGateway::new(FakeProvider::default())),
            translated_config(&["FR"]),
        );
        let mut workbook = MemoryWorkbook::new();

        let result = assembler
            .assemble(&urls, &mut workbook, &mut ProgressReporter::new(NoProgress))
            .await;
        assert!(matches!(result, Err(DocumentError::Page { .. })));
    }

    #[tokio::test]
    async fn test_translation_failure_propagates() {
        let (_server, _mocks, urls) = site(&[("/home", 200, HELLO_PAGE)]).await;
        let mut assembler = DocumentAssembler::new(
            PageExtractor::new(HttpClient::new()),
            Some(TranslationGateway::new(FakeProvider::default())),
            translated_config(&["XX"]),
        );
        let mut workbook = MemoryWorkbook::new();

        let result = assembler
            .assemble(&urls, &mut workbook, &mut ProgressReporter::new(NoProgress))
            .await;
        assert!(matches!(result, Err(DocumentError::Translation(_))));
    }

    #[tokio::test]
    async fn test_repeated_text_uses_cache() {
        let page = r#"<html><head><title>Repeat</title></head>
            <body><main><p>Same</p><p>Same</p><p>Same</p></main></body></html>"#;
        let (_server, _mocks, urls) = site(&[("/r", 200, page)]).await;
        let mut assembler = DocumentAssembler::new(
            PageExtractor::new(HttpClient::new()),
            Some(TranslationGateway::new(FakeProvider::default())),
            translated_config(&["FR"]),
        );
        let mut workbook = MemoryWorkbook::new();

        let stats = assembler
            .assemble(&urls, &mut workbook, &mut ProgressReporter::new(NoProgress))
            .await
            .unwrap();

        // Title plus three paragraphs
        assert_eq!(stats.translations_requested, 4);
        let gateway = assembler.into_gateway().unwrap();
        assert_eq!(gateway.provider().calls.load(Ordering::SeqCst), 2);
        assert_eq!(gateway.cache().stats().hits, 2);
    }

    #[test]
    fn test_builder_normalizes_languages() {
        let config = DocumentConfig::builder()
            .source_language("en-us - English (US)")
            .target_languages(["fr", "FR", "de"])
            .build();

        assert_eq!(config.source_language, "EN-US");
        assert_eq!(config.target_languages, vec!["FR", "DE"]);
    }
}
