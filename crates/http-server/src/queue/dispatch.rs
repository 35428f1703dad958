//! Job dispatching and queue management.
//!
//! The JobDispatcher is the entry point of the queue system. It owns one
//! bounded queue per topic, creates workers lazily as jobs arrive, and tears
//! them down again when they idle out, so a quiet server holds no worker
//! tasks.

use anyhow::Result;
use chrono::Utc;
use dashmap::DashMap;
use event_bus::EventBus;
use std::sync::Arc;
use store::DocumentStore;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::generator::ReportGenerator;
use crate::queue::{
    job::{Job, JobInfo, JobStatus},
    worker::TopicWorker,
};

/// Maximum number of jobs that can be queued per topic before dispatch
/// applies backpressure.
const JOB_QUEUE_CAPACITY: usize = 1000;

pub struct JobDispatcher {
    pub topic_queues: Arc<DashMap<String, mpsc::Sender<JobInfo>>>,
    pub store: Arc<DocumentStore>,
    pub event_bus: Arc<EventBus>,
    pub generator: Arc<dyn ReportGenerator>,
    pub worker_cancellation_tokens: Arc<DashMap<String, CancellationToken>>,
}

impl JobDispatcher {
    /// The dispatcher starts with no active workers; they are created
    /// dynamically as jobs are submitted for each topic.
    pub fn new(
        store: Arc<DocumentStore>,
        event_bus: Arc<EventBus>,
        generator: Arc<dyn ReportGenerator>,
    ) -> Self {
        Self {
            topic_queues: Arc::new(DashMap::new()),
            store,
            event_bus,
            generator,
            worker_cancellation_tokens: Arc::new(DashMap::new()),
        }
    }

    /// Queues a job on its topic and returns the generated job id.
    ///
    /// Dispatch is fire-and-forget: the caller gets an id as soon as the job
    /// is accepted, and the outcome is observable through the store and the
    /// event bus. An error here means the job was never queued.
    pub async fn dispatch(&self, job: Job) -> Result<String> {
        let job_id = Uuid::new_v4().to_string();
        let topic = job.topic();

        info!(
            "Dispatching job {} ({}) on topic {}",
            job_id,
            job.job_type(),
            topic
        );

        let job_info = JobInfo {
            id: job_id.clone(),
            job,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            status: JobStatus::Pending,
            error: None,
        };

        let sender = self.get_or_create_topic_queue(topic);
        sender
            .send(job_info)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to queue job on topic {topic}: {e}"))?;

        Ok(job_id)
    }

    /// If a queue already exists for the topic, returns the existing sender.
    /// Otherwise creates a new channel, spawns a TopicWorker to drain it, and
    /// sets up automatic cleanup for when the worker shuts down.
    fn get_or_create_topic_queue(&self, topic: &str) -> mpsc::Sender<JobInfo> {
        if let Some(sender) = self.topic_queues.get(topic) {
            return sender.clone();
        }

        let (sender, receiver) = mpsc::channel::<JobInfo>(JOB_QUEUE_CAPACITY);
        let cancellation_token = CancellationToken::new();

        self.topic_queues.insert(topic.to_string(), sender.clone());
        self.worker_cancellation_tokens
            .insert(topic.to_string(), cancellation_token.clone());

        let worker = TopicWorker::new(
            topic.to_string(),
            receiver,
            Arc::clone(&self.store),
            Arc::clone(&self.event_bus),
            Arc::clone(&self.generator),
            cancellation_token,
        );

        let topic_for_cleanup = topic.to_string();
        let queues_for_cleanup = Arc::clone(&self.topic_queues);
        let tokens_for_cleanup = Arc::clone(&self.worker_cancellation_tokens);

        tokio::spawn(async move {
            worker.run().await;

            queues_for_cleanup.remove(&topic_for_cleanup);
            tokens_for_cleanup.remove(&topic_for_cleanup);
            info!("Cleaned up worker resources for topic {}", topic_for_cleanup);
        });

        info!("Created new worker for topic {}", topic);
        sender
    }
}

impl Drop for JobDispatcher {
    /// Cancels all active workers and clears internal state. Drop cannot be
    /// async, so the cancellation tokens signal workers to shut down in the
    /// background.
    fn drop(&mut self) {
        info!("JobDispatcher dropping, shutting down all workers");

        let worker_count = self.worker_cancellation_tokens.len();

        for entry in self.worker_cancellation_tokens.iter() {
            entry.value().cancel();
        }

        self.topic_queues.clear();
        self.worker_cancellation_tokens.clear();

        info!(
            "JobDispatcher drop complete - {} workers cancelled",
            worker_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::fakes::InstantGenerator;
    use crate::testing::{seed_store, Seed};
    use store::{NewReport, Report};
    use tempfile::TempDir;
    use tokio::time::{Duration, sleep};

    fn create_test_setup() -> (JobDispatcher, Arc<DocumentStore>, Seed, TempDir) {
        let (store, seed, temp_dir) = seed_store();
        let store = Arc::new(store);
        let dispatcher = JobDispatcher::new(
            Arc::clone(&store),
            Arc::new(EventBus::new()),
            Arc::new(InstantGenerator::default()),
        );
        (dispatcher, store, seed, temp_dir)
    }

    fn pending_report(store: &DocumentStore, seed: &Seed) -> Report {
        store
            .create_report(NewReport {
                title: "Quarterly Revenue".to_string(),
                kind: "financial".to_string(),
                team: seed.team.id.clone(),
                created_by: seed.leader.id.clone(),
                ..Default::default()
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_dispatcher_starts_with_no_workers() {
        let (dispatcher, _store, _seed, _temp_dir) = create_test_setup();

        assert_eq!(dispatcher.topic_queues.len(), 0);
        assert_eq!(dispatcher.worker_cancellation_tokens.len(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_creates_topic_worker() {
        let (dispatcher, store, seed, _temp_dir) = create_test_setup();
        let report = pending_report(&store, &seed);

        let result = dispatcher
            .dispatch(Job::GenerateReport {
                report_id: report.id.clone(),
            })
            .await;
        assert!(result.is_ok());

        sleep(Duration::from_millis(100)).await;

        assert_eq!(dispatcher.topic_queues.len(), 1);
        assert!(dispatcher.topic_queues.contains_key("report-generation"));
    }

    #[tokio::test]
    async fn test_jobs_share_one_topic_queue() {
        let (dispatcher, store, seed, _temp_dir) = create_test_setup();
        let report1 = pending_report(&store, &seed);
        let report2 = pending_report(&store, &seed);

        let _id1 = dispatcher
            .dispatch(Job::GenerateReport {
                report_id: report1.id,
            })
            .await;
        let _id2 = dispatcher
            .dispatch(Job::GenerateReport {
                report_id: report2.id,
            })
            .await;

        sleep(Duration::from_millis(100)).await;

        assert_eq!(dispatcher.topic_queues.len(), 1);
    }

    #[tokio::test]
    async fn test_job_ids_are_unique() {
        let (dispatcher, store, seed, _temp_dir) = create_test_setup();
        let report = pending_report(&store, &seed);

        let job = Job::GenerateReport {
            report_id: report.id,
        };
        let id1 = dispatcher.dispatch(job.clone()).await.unwrap();
        let id2 = dispatcher.dispatch(job).await.unwrap();

        assert_ne!(id1, id2);
    }

    #[tokio::test]
    async fn test_drop_cancels_workers_and_clears_state() {
        let (store, seed, _temp_dir) = seed_store();
        let store = Arc::new(store);

        let (queue_arc, token_arc, tokens) = {
            let dispatcher = JobDispatcher::new(
                Arc::clone(&store),
                Arc::new(EventBus::new()),
                Arc::new(InstantGenerator::default()),
            );

            let report = pending_report(&store, &seed);
            let _ = dispatcher
                .dispatch(Job::GenerateReport {
                    report_id: report.id,
                })
                .await;

            sleep(Duration::from_millis(100)).await;

            assert_eq!(dispatcher.topic_queues.len(), 1);
            assert_eq!(dispatcher.worker_cancellation_tokens.len(), 1);

            let queue_arc = Arc::clone(&dispatcher.topic_queues);
            let token_arc = Arc::clone(&dispatcher.worker_cancellation_tokens);

            let mut tokens = Vec::new();
            for entry in dispatcher.worker_cancellation_tokens.iter() {
                tokens.push(entry.value().clone());
            }
            for token in &tokens {
                assert!(!token.is_cancelled());
            }

            (queue_arc, token_arc, tokens)
        };

        sleep(Duration::from_millis(100)).await;

        assert_eq!(queue_arc.len(), 0);
        assert_eq!(token_arc.len(), 0);
        for token in &tokens {
            assert!(token.is_cancelled());
        }
    }
}
