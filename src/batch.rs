//! Sequential batch generation.
//!
//! One request is in flight at a time, rows are handled in table order, and a
//! failing row never stops the batch: its error text becomes the row's result.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::banding::ScoreProfile;
use crate::error::Result;
use crate::generation::TextGenerator;
use crate::prompt::PromptTemplate;
use crate::table::{ScoreTable, RESULT_COLUMN};

pub const DEFAULT_PACING_DELAY: Duration = Duration::from_secs(2);

/// Prefix of every recorded failure.
pub const FAILURE_PREFIX: &str = "Error generating summary: ";

pub const SKIPPED_TEXT: &str = "Not generated: the batch was cancelled before this row";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Minimum wait between consecutive generation requests.
    pub pacing_delay: Duration,
    /// Header of the column appended to the output table.
    pub result_column: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pacing_delay: DEFAULT_PACING_DELAY,
            result_column: RESULT_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchEvent {
    Starting {
        total: usize,
    },
    Generating {
        position: usize,
        total: usize,
        name: String,
    },
    /// Sent as soon as a row has a result, so consumers can show it before
    /// the batch finishes.
    RowCompleted {
        position: usize,
        name: String,
        result: GenerationResult,
    },
    Cancelled {
        processed: usize,
    },
    Finished {
        total: usize,
        failures: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text")]
pub enum GenerationResult {
    Generated(String),
    Failed(String),
    Skipped,
}

impl GenerationResult {
    fn failed(reason: impl std::fmt::Display) -> Self {
        GenerationResult::Failed(format!("{}{}", FAILURE_PREFIX, reason))
    }

    /// Text written to the result column.
    pub fn text(&self) -> &str {
        match self {
            GenerationResult::Generated(text) | GenerationResult::Failed(text) => text,
            GenerationResult::Skipped => SKIPPED_TEXT,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationResult::Generated(_))
    }
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Input table with the result column appended.
    pub table: ScoreTable,
    /// One result per input row, in row order.
    pub results: Vec<GenerationResult>,
    pub cancelled: bool,
    /// Total inter-request delay that was waited out.
    pub pacing: Duration,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn generated(&self) -> usize {
        self.results.iter().filter(|r| r.is_generated()).count()
    }

    pub fn failures(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, GenerationResult::Failed(_)))
            .count()
    }
}

pub struct BatchRunner<G> {
    generator: G,
    template: PromptTemplate,
    config: BatchConfig,
    progress: Option<Sender<BatchEvent>>,
    cancel: Option<CancellationToken>,
}

impl<G: TextGenerator> BatchRunner<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            template: PromptTemplate::standard().clone(),
            config: BatchConfig::default(),
            progress: None,
            cancel: None,
        }
    }

    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Progress events are sent here. The batch waits on a full channel, so the
    /// receiver must keep draining it; a dropped receiver is ignored.
    pub fn with_progress(mut self, progress: Sender<BatchEvent>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Stops the batch before the next request once `token` is cancelled.
    /// Results already recorded are kept; remaining rows are marked skipped.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub async fn run(&self, table: ScoreTable) -> Result<BatchReport> {
        let started_at = Utc::now();
        let total = table.len();

        let missing = table.missing_columns();
        if !missing.is_empty() {
            warn!(
                "Input table is missing columns {:?}; affected rows will be recorded as errors",
                missing
            );
        }

        info!("Starting batch of {} candidates", total);
        self.send_event(BatchEvent::Starting { total }).await;

        let mut results = Vec::with_capacity(total);
        let mut pacing = Duration::ZERO;
        let mut cancelled = false;

        for position in 0..total {
            if self.is_cancelled() {
                cancelled = true;
                break;
            }

            if position > 0 && !self.config.pacing_delay.is_zero() {
                if !self.pace().await {
                    cancelled = true;
                    break;
                }
                pacing += self.config.pacing_delay;
            }

            let name = table.display_name(position);
            info!(
                "Generating summary for {} ({}/{})...",
                name,
                position + 1,
                total
            );
            self.send_event(BatchEvent::Generating {
                position: position + 1,
                total,
                name: name.clone(),
            })
            .await;

            let result = self.process_row(&table, position).await;

            self.send_event(BatchEvent::RowCompleted {
                position: position + 1,
                name,
                result: result.clone(),
            })
            .await;
            results.push(result);
        }

        if cancelled {
            let processed = results.len();
            warn!("Batch cancelled after {} of {} candidates", processed, total);
            self.send_event(BatchEvent::Cancelled { processed }).await;
            results.resize(total, GenerationResult::Skipped);
        }

        let texts = results.iter().map(|r| r.text().to_string()).collect();
        let table = table.with_column(&self.config.result_column, texts)?;

        let report = BatchReport {
            table,
            results,
            cancelled,
            pacing,
            started_at,
            finished_at: Utc::now(),
        };

        let failures = report.failures();
        info!(
            "Batch finished: {} generated, {} failed, {} skipped",
            report.generated(),
            failures,
            total - report.generated() - failures
        );
        self.send_event(BatchEvent::Finished { total, failures }).await;

        Ok(report)
    }

    async fn process_row(&self, table: &ScoreTable, position: usize) -> GenerationResult {
        let record = match table.record(position) {
            Ok(record) => record,
            Err(e) => {
                warn!("Row {} is not a valid candidate: {}", position + 1, e);
                return GenerationResult::failed(e);
            }
        };

        if let Ok(profile) = ScoreProfile::from_record(&record) {
            debug!(
                "{}: strength-only {:?}, development-only {:?}",
                record.name,
                profile.strengths(),
                profile.development_areas()
            );
        }

        let prompt = match self.template.compile(&record) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Could not compile prompt for {}: {}", record.name, e);
                return GenerationResult::failed(e);
            }
        };

        match self.generator.generate(prompt.as_str()).await {
            Ok(text) => GenerationResult::Generated(text),
            Err(e) => {
                warn!("Generation failed for {}: {}", record.name, e);
                GenerationResult::failed(e)
            }
        }
    }

    /// Waits out the pacing delay. Returns false if cancelled while waiting.
    async fn pace(&self) -> bool {
        let delay = sleep(self.config.pacing_delay);
        match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => false,
                _ = delay => true,
            },
            None => {
                delay.await;
                true
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(CancellationToken::is_cancelled)
            .unwrap_or(false)
    }

    async fn send_event(&self, event: BatchEvent) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event).await;
        }
    }
}
