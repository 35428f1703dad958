//! Job queue system for background report generation.
//!
//! This module provides the queue that decouples report creation from the
//! expensive generation work. Jobs for the same topic are processed
//! sequentially in dispatch order, while distinct topics run in parallel.
//!
//! ## Architecture Overview
//!
//! ```text
//! HTTP Endpoint
//!      │
//!      ▼
//! JobDispatcher
//!      │
//!      ▼
//! report-generation
//! Queue + Worker
//!      │
//!      ▼
//! ReportGenerator
//! ```
//!
//! ## Modules
//!
//! - **[`job`]**: Job types, topics, and metadata structures
//! - **[`dispatch`]**: Central dispatching and queue management logic
//! - **[`worker`]**: Per-topic job processing workers
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use crate::queue::{JobDispatcher, Job};
//!
//! let dispatcher = JobDispatcher::new(store, event_bus, generator);
//!
//! let job_id = dispatcher
//!     .dispatch(Job::GenerateReport { report_id })
//!     .await?;
//! ```
//!
//! A dispatched job is fire-and-forget from the caller's perspective: the
//! report's progress is observable through its stored status and the
//! `report:status` events the worker broadcasts.

pub mod dispatch;
pub mod job;
pub mod worker;

pub use dispatch::JobDispatcher;
pub use job::{Job, JobInfo, JobStatus};
pub use worker::TopicWorker;
