//! Progress reporting for document assembly
//!
//! The assembler publishes [`ProgressUpdate`]s to a [`ProgressSink`]. The
//! CLI passes the sending half of a bounded channel and renders updates
//! from another task.

use std::fmt;
use std::future::Future;

use tokio::sync::mpsc;
use tracing::trace;

/// Step of an assembly run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStage {
    Init,
    WritingToc,
    /// Processing the URL at this 0-based position
    ProcessingUrl(usize),
    Finalizing,
    Done,
}

impl fmt::Display for AssemblyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyStage::Init => write!(f, "init"),
            AssemblyStage::WritingToc => write!(f, "writing table of contents"),
            AssemblyStage::ProcessingUrl(i) => write!(f, "processing url {}", i + 1),
            AssemblyStage::Finalizing => write!(f, "finalizing"),
            AssemblyStage::Done => write!(f, "done"),
        }
    }
}

/// One progress notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// 0 to 100, never decreasing within a run
    pub percent: u8,
    pub status: String,
    /// URL being processed, empty between pages
    pub current_url: String,
    pub operation: String,
    pub stage: AssemblyStage,
}

/// Receiver of progress updates
pub trait ProgressSink: Send {
    fn report(&mut self, update: ProgressUpdate) -> impl Future<Output = ()> + Send;
}

/// Discards all updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    async fn report(&mut self, _update: ProgressUpdate) {}
}

impl ProgressSink for mpsc::Sender<ProgressUpdate> {
    async fn report(&mut self, update: ProgressUpdate) {
        // A closed receiver only means nobody is watching.
        if self.send(update).await.is_err() {
            trace!("Progress receiver dropped");
        }
    }
}

impl ProgressSink for Vec<ProgressUpdate> {
    async fn report(&mut self, update: ProgressUpdate) {
        self.push(update);
    }
}

/// Sub-step of a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlStep {
    Fetch,
    Parse,
    Write,
}

impl UrlStep {
    fn operation(self) -> &'static str {
        match self {
            UrlStep::Fetch => "Fetching page...",
            UrlStep::Parse => "Parsing content...",
            UrlStep::Write => "Writing content to Excel...",
        }
    }

    fn index(self) -> u32 {
        match self {
            UrlStep::Fetch => 0,
            UrlStep::Parse => 1,
            UrlStep::Write => 2,
        }
    }
}

/// Percent for a step of URL `index` out of `total`
///
/// URLs share the 10 to 90 range evenly; each URL's slice is split in
/// three for fetch, parse and write.
pub fn url_percent(index: usize, total: usize, step: UrlStep) -> u8 {
    let total = total.max(1) as u32;
    let index = index as u32;
    let start = 10 + 80 * index / total;
    let end = 10 + 80 * (index + 1) / total;
    let percent = start + (end - start) * step.index() / 3;
    percent.min(90) as u8
}

/// Wraps a sink and keeps percentages monotonic
#[derive(Debug)]
pub struct ProgressReporter<S: ProgressSink> {
    sink: S,
    last_percent: u8,
}

impl<S: ProgressSink> ProgressReporter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            last_percent: 0,
        }
    }

    /// Send an update, raising `percent` to the last reported value if needed
    pub async fn report(
        &mut self,
        stage: AssemblyStage,
        percent: u8,
        status: impl Into<String>,
        current_url: impl Into<String>,
        operation: impl Into<String>,
    ) {
        let percent = percent.clamp(self.last_percent, 100);
        self.last_percent = percent;
        self.sink
            .report(ProgressUpdate {
                percent,
                status: status.into(),
                current_url: current_url.into(),
                operation: operation.into(),
                stage,
            })
            .await;
    }

    /// Report a step of one URL
    pub async fn url_step(&mut self, index: usize, total: usize, url: &str, step: UrlStep) {
        self.report(
            AssemblyStage::ProcessingUrl(index),
            url_percent(index, total, step),
            format!("Processing URLs ({} of {})", index + 1, total),
            url,
            step.operation(),
        )
        .await;
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_percent_schedule() {
        assert_eq!(url_percent(0, 1, UrlStep::Fetch), 10);
        assert_eq!(url_percent(0, 1, UrlStep::Parse), 36);
        assert_eq!(url_percent(0, 1, UrlStep::Write), 63);

        assert_eq!(url_percent(0, 4, UrlStep::Fetch), 10);
        assert_eq!(url_percent(1, 4, UrlStep::Fetch), 30);
        assert_eq!(url_percent(3, 4, UrlStep::Write), 83);
    }

    #[test]
    fn test_url_percent_never_exceeds_ninety() {
        for total in 1..50 {
            for index in 0..total {
                for step in [UrlStep::Fetch, UrlStep::Parse, UrlStep::Write] {
                    let percent = url_percent(index, total, step);
                    assert!((10..=90).contains(&percent));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_reporter_is_monotonic() {
        let mut reporter = ProgressReporter::new(Vec::new());
        reporter.report(AssemblyStage::WritingToc, 10, "toc", "", "").await;
        reporter.report(AssemblyStage::Init, 5, "late", "", "").await;
        reporter.report(AssemblyStage::Done, 100, "done", "", "").await;

        let updates = reporter.into_inner();
        let percents: Vec<u8> = updates.iter().map(|u| u.percent).collect();
        assert_eq!(percents, vec![10, 10, 100]);
    }

    #[tokio::test]
    async fn test_channel_sink_delivers_updates() {
        let (mut tx, mut rx) = mpsc::channel::<ProgressUpdate>(4);
        tx.report(ProgressUpdate {
            percent: 42,
            status: "s".to_string(),
            current_url: "https://ex.com/".to_string(),
            operation: "o".to_string(),
            stage: AssemblyStage::ProcessingUrl(0),
        })
        .await;
        drop(tx);

        let update = rx.recv().await.unwrap();
        assert_eq!(update.percent, 42);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_channel_sink_ignores_closed_receiver() {
        let (mut tx, rx) = mpsc::channel::<ProgressUpdate>(1);
        drop(rx);
        tx.report(ProgressUpdate {
            percent: 1,
            status: String::new(),
            current_url: String::new(),
            operation: String::new(),
            stage: AssemblyStage::Init,
        })
        .await;
    }
}
