//! Report generation seam.
//!
//! The worker only knows the [`ReportGenerator`] trait; the shipped
//! implementation simulates the expensive part with a sleep. Tests swap in
//! fakes to drive the pipeline through success, failure and retry paths
//! without waiting on real work.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::time::Duration;
use store::Report;

#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Produce the generated content for a report. The returned map is merged
    /// into the report's `data` on completion; generator keys win on
    /// collision.
    async fn generate(&self, report: &Report) -> anyhow::Result<Map<String, Value>>;
}

/// Stand-in for a real rendering backend: waits out a configurable delay and
/// returns a generation stamp plus summary line.
pub struct SimulatedReportGenerator {
    delay: Duration,
}

impl SimulatedReportGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedReportGenerator {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl ReportGenerator for SimulatedReportGenerator {
    async fn generate(&self, _report: &Report) -> anyhow::Result<Map<String, Value>> {
        tokio::time::sleep(self.delay).await;

        let mut output = Map::new();
        output.insert(
            "generatedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        output.insert(
            "summary".to_string(),
            Value::String("Report generated successfully".to_string()),
        );
        Ok(output)
    }
}
