use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ids::{BatchId, RecordId, TemplateId};
use super::template::QualityAssessmentConfig;
use super::test_type::TestType;

// ===== Batch Request =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub test_type: TestType,
    #[validate(length(min = 1))]
    pub record_ids: Vec<RecordId>,
    pub primary_template_id: TemplateId,
    pub secondary_template_id: Option<TemplateId>,
    pub retriever_id: Option<String>,
    pub quality_assessment: QualityAssessmentConfig,
    pub knowledge_grounding: KnowledgeGrounding,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeGrounding {
    pub primary: bool,
    pub secondary: bool,
}

// ===== Batch Result =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub test_type: TestType,
    pub batch_id: BatchId,
    #[serde(default)]
    pub test_records_created: u64,
    #[serde(default)]
    pub records_processed: u64,
    #[serde(default)]
    pub records_skipped: u64,
    #[serde(default)]
    pub total_customer_utterances: Option<u64>,
    #[serde(default)]
    pub data_source_type: Option<String>,
}

impl BatchResult {
    /// Multi-line confirmation reported to the operator.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("{} test batch created successfully!", self.test_type),
            format!("Batch ID: {}", self.batch_id),
            format!("Test Records Created: {}", self.test_records_created),
            format!("Records Processed: {}", self.records_processed),
        ];

        if let Some(utterances) = self.total_customer_utterances.filter(|n| *n > 0) {
            lines.push(format!("Customer Utterances Found: {}", utterances));
        }
        if self.records_skipped > 0 {
            lines.push(format!("Records Skipped: {}", self.records_skipped));
        }
        if let Some(ref source) = self.data_source_type {
            lines.push(format!("Data Source Type: {}", source));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> BatchResult {
        BatchResult {
            test_type: TestType::ServiceReplies,
            batch_id: "a0B000000000001".into(),
            test_records_created: 12,
            records_processed: 2,
            records_skipped: 0,
            total_customer_utterances: Some(12),
            data_source_type: None,
        }
    }

    #[test]
    fn summary_lists_counts() {
        assert_eq!(
            result().summary(),
            "Service Replies test batch created successfully!\n\
             Batch ID: a0B000000000001\n\
             Test Records Created: 12\n\
             Records Processed: 2\n\
             Customer Utterances Found: 12"
        );
    }

    #[test]
    fn summary_mentions_skips_and_source_only_when_present() {
        let mut result = result();
        result.total_customer_utterances = None;
        result.records_skipped = 1;
        result.data_source_type = Some("VoiceCall".to_string());

        let summary = result.summary();
        assert!(summary.contains("Records Skipped: 1"));
        assert!(summary.contains("Data Source Type: VoiceCall"));
        assert!(!summary.contains("Customer Utterances"));
    }

    #[test]
    fn result_parses_service_payload() {
        let json = r#"{
            "testType": "Work Summary",
            "batchId": "a0B1",
            "testRecordsCreated": 3,
            "recordsProcessed": 3,
            "recordsSkipped": 0,
            "dataSourceType": "MessagingSession"
        }"#;
        let parsed: BatchResult = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.test_type, TestType::WorkSummary);
        assert_eq!(parsed.total_customer_utterances, None);
    }
}
