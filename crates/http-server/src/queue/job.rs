use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Job types that can be processed by the queue system.
///
/// Each variant routes to a fixed topic. Jobs sharing a topic are processed
/// sequentially by a single worker, in dispatch order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
#[serde(tag = "type", content = "data")]
pub enum Job {
    /// Runs the generation pipeline for one report: mark it in progress,
    /// produce its content, record the terminal outcome.
    GenerateReport { report_id: String },
}

impl Job {
    pub fn report_id(&self) -> &str {
        match self {
            Job::GenerateReport { report_id } => report_id,
        }
    }

    /// Queue topic the job is routed to. One worker per topic.
    pub fn topic(&self) -> &'static str {
        match self {
            Job::GenerateReport { .. } => "report-generation",
        }
    }

    pub fn job_type(&self) -> &'static str {
        match self {
            Job::GenerateReport { .. } => "GenerateReport",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub struct JobInfo {
    pub id: String,
    pub job: Job,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: JobStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../../packages/frontend/src/api.ts")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_routing() {
        let job = Job::GenerateReport {
            report_id: "report-7".to_string(),
        };

        assert_eq!(job.report_id(), "report-7");
        assert_eq!(job.topic(), "report-generation");
        assert_eq!(job.job_type(), "GenerateReport");
    }

    #[test]
    fn test_job_wire_format() {
        let job = Job::GenerateReport {
            report_id: "report-7".to_string(),
        };

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["type"], "GenerateReport");
        assert_eq!(json["data"]["report_id"], "report-7");
    }

    #[test]
    fn test_job_info_serialization() {
        let job_info = JobInfo {
            id: "test-job-id".to_string(),
            job: Job::GenerateReport {
                report_id: "report-7".to_string(),
            },
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            status: JobStatus::Pending,
            error: None,
        };

        let serialized = serde_json::to_string(&job_info).unwrap();
        let deserialized: JobInfo = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.id, "test-job-id");
        assert_eq!(deserialized.status, JobStatus::Pending);
        assert_eq!(deserialized.job.report_id(), "report-7");
    }

    #[test]
    fn test_job_status_equality() {
        assert_eq!(JobStatus::Pending, JobStatus::Pending);
        assert_ne!(JobStatus::Pending, JobStatus::Running);
        assert_ne!(JobStatus::Running, JobStatus::Completed);
    }
}
