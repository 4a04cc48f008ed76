//! Concurrent fan-out/fan-in over all configured sources.
//!
//! [`aggregate`] spawns one tokio task per [`FetchRequest`], all at once. Each task
//! runs its adapter call to completion and reports exactly one outcome into a
//! shared channel. The channel closes when the last task drops its sender, which
//! is the single "every task is terminal" signal the collector waits for.
//!
//! A failing task is logged where it fails and listed in
//! [`AggregationResult::failures`]; it never contributes a section and never
//! affects its siblings. Sections are collected in completion order, so the
//! order of the final digest varies from run to run.

use crate::error::FetchError;
use crate::models::{FetchRequest, Section};
use itertools::Itertools;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};

/// Something that can turn a [`FetchRequest`] into a [`Section`].
///
/// Implementations are shared across all tasks of a run and may be called
/// concurrently, including several times with different requests.
pub trait SourceAdapter: Send + Sync + 'static {
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<Section, FetchError>> + Send;
}

/// A source that produced no section, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// Everything one run collected.
#[derive(Debug, Default)]
pub struct AggregationResult {
    /// One entry per successful task, in completion order.
    pub sections: Vec<Section>,
    pub failures: Vec<SourceFailure>,
}

impl AggregationResult {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Comma-separated failed source labels, for the run summary.
    pub fn failed_sources(&self) -> String {
        self.failures.iter().map(|f| &f.source).join(", ")
    }
}

struct TaskOutcome {
    source: String,
    elapsed: Duration,
    result: Result<Section, FetchError>,
}

/// Run every request concurrently and wait until all of them are terminal.
///
/// Never fails as a whole: if every request fails, the result simply has no
/// sections.
#[instrument(level = "info", skip_all, fields(tasks = requests.len()))]
pub async fn aggregate<A>(adapter: Arc<A>, requests: Vec<FetchRequest>) -> AggregationResult
where
    A: SourceAdapter,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<TaskOutcome>();
    let mut handles = Vec::with_capacity(requests.len());

    for request in requests {
        let adapter = Arc::clone(&adapter);
        let tx = tx.clone();
        let source = request.source.to_string();
        let span = info_span!("fetch", source = %source, count = request.count);

        let handle = tokio::spawn(
            async move {
                let started = Instant::now();
                let result = adapter.fetch(&request).await;
                let elapsed = started.elapsed();

                match &result {
                    Ok(section) => info!(
                        section = %section.name,
                        items = section.items.len(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Source fetched"
                    ),
                    Err(e) => error!(
                        error = %e,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Source failed; leaving it out of the digest"
                    ),
                }

                // The collector outlives every sender, so this cannot fail
                let _ = tx.send(TaskOutcome {
                    source: request.source.to_string(),
                    elapsed,
                    result,
                });
            }
            .instrument(span),
        );
        handles.push((source, handle));
    }
    // Only the tasks hold senders now; the channel closes when the last one ends
    drop(tx);

    let mut result = AggregationResult::default();
    while let Some(outcome) = rx.recv().await {
        match outcome.result {
            Ok(section) => result.sections.push(section),
            Err(e) => result.failures.push(SourceFailure {
                source: outcome.source,
                error: e.to_string(),
            }),
        }
        debug!(
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            collected = result.sections.len() + result.failures.len(),
            "Collected task outcome"
        );
    }

    // A task that panicked dropped its sender without reporting
    for (source, handle) in handles {
        if let Err(join_error) = handle.await {
            let e = FetchError::Aborted(join_error.to_string());
            warn!(%source, error = %e, "Fetch task ended without an outcome");
            result.failures.push(SourceFailure {
                source,
                error: e.to_string(),
            });
        }
    }

    info!(
        sections = result.sections.len(),
        failed = result.failures.len(),
        "All sources finished"
    );
    result
}
