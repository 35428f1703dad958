use anyhow::Result;
use chrono::Utc;
use event_bus::{EventBus, PulseEvent};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use store::DocumentStore;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::generator::ReportGenerator;
use crate::queue::job::{Job, JobInfo, JobStatus};

/// Timeout in seconds after which an idle worker shuts down. The dispatcher
/// recreates the worker on the next job for its topic.
const WORKER_TIMEOUT_SECS: u64 = 60;

/// How many times one job may run the generator before the report is failed.
pub const MAX_JOB_ATTEMPTS: u32 = 3;

/// Fixed pause between generation attempts.
const RETRY_BACKOFF_MS: u64 = 250;

/// Each TopicWorker drains a single topic queue sequentially, so jobs on the
/// same topic run one at a time in dispatch order while distinct topics
/// proceed in parallel.
pub struct TopicWorker {
    topic: String,
    receiver: mpsc::Receiver<JobInfo>,
    store: Arc<DocumentStore>,
    event_bus: Arc<EventBus>,
    generator: Arc<dyn ReportGenerator>,
    cancellation_token: CancellationToken,
    job_queue: VecDeque<JobInfo>,
}

impl TopicWorker {
    pub fn new(
        topic: String,
        receiver: mpsc::Receiver<JobInfo>,
        store: Arc<DocumentStore>,
        event_bus: Arc<EventBus>,
        generator: Arc<dyn ReportGenerator>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            topic,
            receiver,
            store,
            event_bus,
            generator,
            cancellation_token,
            job_queue: VecDeque::new(),
        }
    }

    /// Main worker loop that processes jobs sequentially until shutdown.
    ///
    /// The worker runs until one of these conditions is met:
    /// - The cancellation token is triggered (dispatcher shutdown)
    /// - The message channel is closed (dispatcher dropped the sender)
    /// - No messages arrive within the timeout period (idle cleanup)
    ///
    /// Jobs still queued when the worker stops are marked cancelled; their
    /// reports keep whatever status they already had.
    pub async fn run(mut self) {
        info!("Starting worker for topic: {}", self.topic);

        while !self.cancellation_token.is_cancelled() {
            // Drain queued jobs before waiting for new ones
            if let Some(mut job_info) = self.job_queue.pop_front() {
                info!("Processing job {} on topic {}", job_info.id, self.topic);
                job_info.started_at = Some(Utc::now());
                job_info.status = JobStatus::Running;

                match self.process_job(&job_info.job).await {
                    Ok(()) => {
                        job_info.completed_at = Some(Utc::now());
                        job_info.status = JobStatus::Completed;
                        info!("Completed job {} on topic {}", job_info.id, self.topic);
                    }
                    Err(e) => {
                        job_info.completed_at = Some(Utc::now());
                        job_info.status = JobStatus::Failed;
                        job_info.error = Some(e.to_string());
                        error!("Failed job {} on topic {}: {}", job_info.id, self.topic, e);
                    }
                }
                continue;
            }

            match timeout(
                Duration::from_secs(WORKER_TIMEOUT_SECS),
                self.receiver.recv(),
            )
            .await
            {
                Ok(Some(job_info)) => {
                    self.job_queue.push_back(job_info);
                }
                Ok(None) => {
                    debug!("Queue closed for topic {}", self.topic);
                    break;
                }
                Err(_) => {
                    info!("Worker for topic {} idle, shutting down", self.topic);
                    break;
                }
            }
        }

        for mut job_info in self.job_queue.drain(..) {
            job_info.status = JobStatus::Cancelled;
            debug!("Job {} cancelled by worker shutdown", job_info.id);
        }

        info!("Worker for topic {} shutting down", self.topic);
    }

    async fn process_job(&self, job: &Job) -> Result<()> {
        match job {
            Job::GenerateReport { report_id } => self.process_generate_report(report_id).await,
        }
    }

    /// Runs the generation pipeline for one report.
    ///
    /// 1. Mark the report in progress and broadcast the status change
    /// 2. Run the generator, retrying transient failures up to
    ///    [`MAX_JOB_ATTEMPTS`] times
    /// 3. Record exactly one terminal outcome (completed or failed) and
    ///    broadcast it
    ///
    /// A report that is already terminal, or was deleted while the job sat in
    /// the queue, is left untouched. Deletion between pickup and the terminal
    /// write skips the write rather than resurrecting the report.
    async fn process_generate_report(&self, report_id: &str) -> Result<()> {
        let Some(report) = self.store.get_report(report_id) else {
            anyhow::bail!("Report not found: {report_id}");
        };

        let report = match self.store.mark_report_in_progress(&report.id)? {
            Some(report) => report,
            None => {
                info!(
                    "Report {} already reached a terminal status, skipping generation",
                    report_id
                );
                return Ok(());
            }
        };
        self.event_bus.publish(PulseEvent::report_status(&report));

        let mut last_error = String::new();
        for attempt in 1..=MAX_JOB_ATTEMPTS {
            match self.generator.generate(&report).await {
                Ok(output) => {
                    match self.store.complete_report(report_id, output)? {
                        Some(completed) => {
                            self.event_bus.publish(PulseEvent::report_status(&completed));
                            info!(
                                "Report {} generated on attempt {}/{}",
                                report_id, attempt, MAX_JOB_ATTEMPTS
                            );
                        }
                        None => {
                            warn!(
                                "Report {} disappeared before completion could be recorded",
                                report_id
                            );
                        }
                    }
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "Generation attempt {}/{} failed for report {}: {}",
                        attempt, MAX_JOB_ATTEMPTS, report_id, e
                    );
                    last_error = e.to_string();
                    if attempt < MAX_JOB_ATTEMPTS {
                        tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS)).await;
                    }
                }
            }
        }

        match self.store.fail_report(report_id, &last_error)? {
            Some(failed) => {
                self.event_bus.publish(PulseEvent::report_status(&failed));
            }
            None => {
                warn!(
                    "Report {} disappeared before failure could be recorded",
                    report_id
                );
            }
        }
        anyhow::bail!("Report generation failed after {MAX_JOB_ATTEMPTS} attempts: {last_error}")
    }
}
