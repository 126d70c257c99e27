//! # webtranslator CLI
//!
//! Command-line front end for the extraction and translation pipeline.
//!
//! - `urls`: list the page URLs found in a site's sitemap
//! - `build`: extract (and translate) every page into an `.xlsx` workbook
//! - `set-key`: save a new DeepL API key
//! - `languages`: list the supported language codes
//!
//! Progress of `build` is shown with a progress bar fed from the pipeline
//! over a channel.

mod telemetry;

use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use telemetry::OtelGuard;
use tokio::sync::mpsc;
use tracing::{instrument, warn};
use url::Url;
use webtranslator::config::AppConfig;
use webtranslator::credentials::Credentials;
use webtranslator::document::output::choose_output_dir;
use webtranslator::document::{
    DocumentConfig, DocumentMode, ProgressUpdate, SheetNaming, create_document,
};
use webtranslator::http::HttpClient;
use webtranslator::page::PageExtractor;
use webtranslator::sitemap::{ResolverConfig, SitemapResolver, normalize_root};
use webtranslator::translation::languages::LANGUAGES;
use webtranslator::translation::{DeeplTranslator, RateLimitedProvider, TranslationGateway};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Extract website content into a translated spreadsheet",
    long_about = None
)]
struct Cli {
    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the page URLs from a site's sitemap
    Urls(UrlsArgs),

    /// Build the spreadsheet for a site
    Build(BuildArgs),

    /// Save a DeepL API key to the config file
    SetKey(SetKeyArgs),

    /// List supported language codes
    Languages,
}

/// Sitemap filtering options shared by `urls` and `build`
#[derive(Args, Debug)]
struct SitemapArgs {
    /// Include the blog post sitemap
    #[arg(long)]
    include_blog_posts: bool,

    /// Page URL to leave out (repeatable)
    #[arg(long = "ignore")]
    ignore: Vec<String>,

    /// Leave out the standard legal and blog index pages
    #[arg(long)]
    default_ignores: bool,
}

#[derive(Args, Debug)]
struct UrlsArgs {
    /// Site root, e.g. https://example.com
    #[arg(required = true)]
    site: String,

    #[command(flatten)]
    sitemap: SitemapArgs,

    /// Print a JSON array instead of one URL per line
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SheetNames {
    /// Name sheets after the page title
    Title,
    /// Name sheets `Sheet N`
    Index,
}

impl From<SheetNames> for SheetNaming {
    fn from(names: SheetNames) -> Self {
        match names {
            SheetNames::Title => SheetNaming::PageTitle,
            SheetNames::Index => SheetNaming::Index,
        }
    }
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Site root, e.g. https://example.com
    #[arg(required_unless_present = "urls_file")]
    site: Option<String>,

    /// Company name, used for the file name
    #[arg(short, long)]
    company: String,

    /// Source language code
    #[arg(short, long, default_value = "EN-US")]
    source: String,

    /// Target language code (repeatable or comma-separated)
    #[arg(short, long = "target", value_delimiter = ',')]
    targets: Vec<String>,

    #[command(flatten)]
    sitemap: SitemapArgs,

    /// Only process these URLs from the sitemap (repeatable)
    #[arg(long)]
    only: Vec<String>,

    /// Read URLs from a file, one per line, instead of the sitemap
    #[arg(long)]
    urls_file: Option<PathBuf>,

    /// Skip translation even if targets and a key are available
    #[arg(long)]
    content_only: bool,

    /// Directory for the workbook
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// How to name page sheets
    #[arg(long, value_enum, default_value = "title")]
    sheet_names: SheetNames,

    /// DeepL API key, overriding the environment and config file
    #[arg(long)]
    api_key: Option<String>,

    /// Maximum translation requests per minute
    #[arg(long, default_value = "600")]
    translate_rpm: NonZeroU32,
}

#[derive(Args, Debug)]
struct SetKeyArgs {
    /// The new DeepL API key
    #[arg(required = true)]
    key: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel: OtelGuard = telemetry::init_tracing_subscriber(cli.log_dir.as_deref())?;

    match cli.command {
        Some(Commands::Urls(args)) => {
            urls_command(args).await?;
        }
        Some(Commands::Build(args)) => {
            build_command(args).await?;
        }
        Some(Commands::SetKey(args)) => {
            set_key_command(args)?;
        }
        Some(Commands::Languages) => {
            for (code, name) in LANGUAGES {
                println!("{:<8} {}", code, name);
            }
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["webtranslator", "--help"]);
        }
    }

    Ok(())
}

fn resolver_config(site: &str, args: &SitemapArgs) -> anyhow::Result<ResolverConfig> {
    let mut config = ResolverConfig::builder()
        .include_blog_posts(args.include_blog_posts)
        .ignored_urls(args.ignore.iter().cloned())
        .build();
    if args.default_ignores {
        config = config.with_default_ignored_paths(&normalize_root(site)?);
    }
    Ok(config)
}

async fn resolve_urls(site: &str, args: &SitemapArgs) -> anyhow::Result<Vec<String>> {
    let resolver = SitemapResolver::new(HttpClient::new(), resolver_config(site, args)?);
    let urls = resolver.resolve(site).await?;
    Ok(urls.into_iter().collect())
}

#[instrument]
async fn urls_command(args: UrlsArgs) -> anyhow::Result<()> {
    let urls = resolve_urls(&args.site, &args.sitemap).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&urls)?);
    } else {
        for url in &urls {
            println!("{}", url);
        }
        eprintln!("Found {} pages", urls.len());
    }
    Ok(())
}

/// URLs from a file: one per line, blank lines and `#` comments skipped
fn read_urls_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;

    let mut seen = BTreeSet::new();
    let mut urls = Vec::new();
    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        Url::parse(line).map_err(|e| anyhow!("Invalid URL '{}': {}", line, e))?;
        if seen.insert(line.to_string()) {
            urls.push(line.to_string());
        }
    }
    Ok(urls)
}

#[instrument(skip(args), fields(company = %args.company))]
async fn build_command(args: BuildArgs) -> anyhow::Result<()> {
    let mut urls = match (&args.urls_file, &args.site) {
        (Some(path), _) => read_urls_file(path)?,
        (None, Some(site)) => {
            println!("Reading sitemap for {}...", site);
            resolve_urls(site, &args.sitemap).await?
        }
        (None, None) => bail!("either a site or --urls-file is required"),
    };
    if !args.only.is_empty() {
        let only: BTreeSet<&str> = args.only.iter().map(String::as_str).collect();
        urls.retain(|url| only.contains(url.as_str()));
    }
    if urls.is_empty() {
        bail!("No URLs to process");
    }
    println!("Processing {} pages...", urls.len());

    let config = DocumentConfig::builder()
        .company_name(&args.company)
        .source_language(&args.source)
        .target_languages(&args.targets)
        .sheet_naming(args.sheet_names.into())
        .build();

    let gateway = if args.content_only || config.target_languages.is_empty() {
        None
    } else {
        // The key lookup may prompt on stdin
        let explicit = args.api_key.clone();
        let key = tokio::task::spawn_blocking(move || {
            let mut credentials = Credentials::new(explicit);
            credentials.get().map(|(key, _)| key.to_string())
        })
        .await?;
        match key {
            Ok(key) => {
                let provider = RateLimitedProvider::per_minute(
                    DeeplTranslator::from_key(key),
                    args.translate_rpm,
                );
                Some(TranslationGateway::new(provider))
            }
            Err(e) => {
                warn!("No translation credential: {}", e);
                eprintln!("{}; creating a content-only document", e);
                None
            }
        }
    };

    let app_config = AppConfig::load().unwrap_or_default();
    let output_dir = choose_output_dir(args.output_dir.clone(), app_config.output_dir);

    // Create a channel for progress updates
    let (progress_sender, mut progress_receiver) = mpsc::channel::<ProgressUpdate>(64);

    let progress_bar = ProgressBar::new(100);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}")?
            .progress_chars("##-"),
    );

    // Spawn a task to render progress updates
    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some(update) = progress_receiver.recv().await {
                progress_bar.set_position(update.percent.into());
                if update.current_url.is_empty() {
                    progress_bar.set_message(format!("{} {}", update.status, update.operation));
                } else {
                    progress_bar.set_message(format!(
                        "{} {} {}",
                        update.status, update.operation, update.current_url
                    ));
                }
            }
        }
    });

    let result = create_document(
        PageExtractor::new(HttpClient::new()),
        gateway,
        config,
        &urls,
        &output_dir,
        progress_sender,
    )
    .await;

    // Wait for progress task to complete (it ends when the sender is dropped)
    let _ = progress_handle.await;

    let summary = match result {
        Ok(summary) => {
            progress_bar.finish_with_message("Done");
            summary
        }
        Err(e) => {
            progress_bar.abandon_with_message("Failed");
            return Err(e.into());
        }
    };

    match summary.mode {
        DocumentMode::Translated => println!(
            "Translated {} pages ({} translations, {} from cache)",
            summary.pages_written, summary.translations_requested, summary.cache_hits
        ),
        DocumentMode::ContentOnly => println!(
            "Extracted {} pages ({} failed)",
            summary.pages_written, summary.pages_failed
        ),
    }
    println!("Saved {}", summary.path.display());
    Ok(())
}

fn set_key_command(args: SetKeyArgs) -> anyhow::Result<()> {
    let mut credentials = Credentials::new(None).allow_prompt(false);
    credentials.replace(&args.key)?;
    println!("DeepL API key saved");
    Ok(())
}
