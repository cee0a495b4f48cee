use pretty_assertions::assert_eq;
use prompt_batch_core::domain::*;
use prompt_batch_core::error::ValidationFailure;
use prompt_batch_core::traits::{RecordQuery, TemplateQuery};
use rstest::rstest;
use serde_json::json;
use validator::Validate;

fn quality_enabled(defaults: &QualityDefaults) -> QualityAssessmentConfig {
    let mut config = QualityAssessmentConfig::default();
    config.set_enabled(true, defaults);
    config
}

// ===== Test Type Tests =====

#[rstest]
#[case(TestType::ServiceReplies, "Contextual Template", Some("Grounded Template"), true)]
#[case(TestType::CaseSummary, "Summary Template", None, false)]
#[case(TestType::WorkSummary, "Summary Template", None, false)]
fn test_test_type_template_slots(
    #[case] test_type: TestType,
    #[case] primary: &str,
    #[case] secondary: Option<&str>,
    #[case] needs_retriever: bool,
) {
    assert_eq!(test_type.primary_template_label(), primary);
    assert_eq!(test_type.secondary_template_label(), secondary);
    assert_eq!(test_type.requires_retriever(), needs_retriever);
}

#[rstest]
#[case(TestType::ServiceReplies, WorkSummarySource::MessagingSession, "Step 3: Select Messaging Sessions")]
#[case(TestType::CaseSummary, WorkSummarySource::VoiceCall, "Step 3: Select Cases")]
#[case(TestType::WorkSummary, WorkSummarySource::VoiceCall, "Step 3: Select Voice Calls")]
fn test_record_step_titles(
    #[case] test_type: TestType,
    #[case] source: WorkSummarySource,
    #[case] title: &str,
) {
    assert_eq!(RecordKind::resolve(test_type, source).step_title(), title);
}

// ===== Quality Assessment Tests =====

#[test]
fn test_disabling_quality_assessment_always_clears_ids() {
    let defaults = QualityDefaults {
        faithfulness_template_id: Some("0hfA".into()),
        relevancy_template_id: Some("0hrA".into()),
        context_quality_template_id: Some("0hcA".into()),
    };
    let mut config = quality_enabled(&defaults);
    assert_eq!(config.configured_count(), 3);

    config.set_enabled(false, &defaults);
    for metric in QualityMetric::ALL {
        assert_eq!(config.template_id(metric), None);
    }
    assert_eq!(config.status().label, "Disabled");
}

#[test]
fn test_blank_metric_template_is_cleared() {
    let mut config = quality_enabled(&QualityDefaults::default());
    config.set_template_id(QualityMetric::Faithfulness, Some("0hf".into()));
    config.set_template_id(QualityMetric::Faithfulness, Some(" ".into()));
    assert_eq!(config.faithfulness_template_id, None);
}

// ===== Settings Tests =====

#[test]
fn test_settings_defaults() {
    let settings = WizardSettings::default();
    assert_eq!(settings.page_size_for(RecordKind::Case), 10);
    assert_eq!(settings.template_page_size, 20);
    assert_eq!(settings.transcript_preview_utterances, 6);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_reject_zero_page_size() {
    let settings = WizardSettings {
        voice_call_page_size: 0,
        ..Default::default()
    };
    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_partial_deserialize() {
    let settings: WizardSettings = serde_json::from_value(json!({
        "case_page_size": 25,
        "default_retriever_id": "ret-001",
        "default_relevancy_template_id": "  "
    }))
    .unwrap();

    assert_eq!(settings.case_page_size, 25);
    assert_eq!(settings.conversation_page_size, 10);
    assert_eq!(settings.default_retriever_id.as_deref(), Some("ret-001"));
    assert_eq!(settings.quality_defaults().relevancy_template_id, None);
}

// ===== Record Tests =====

#[test]
fn test_case_record_from_wire() {
    let record: CaseRecord = serde_json::from_value(json!({
        "Id": "500A",
        "CaseNumber": "00001027",
        "Subject": "Refund",
        "Status": "New",
        "CreatedDate": "2024-05-01T10:00:00Z"
    }))
    .unwrap();

    assert_eq!(record.id.as_str(), "500A");
    assert_eq!(record.priority, None);
    assert!(record.created_date.is_some());
}

#[test]
fn test_voice_call_quick_search_uses_name() {
    let record = DataRecord::VoiceCall(VoiceCallRecord {
        id: "0LQ1".into(),
        name: Some("VC-0001".to_string()),
        call_type: Some("Inbound".to_string()),
        call_start_date_time: None,
        call_duration_in_seconds: Some(120),
        from_phone_number: Some("+15550100".to_string()),
        to_phone_number: None,
    });

    assert!(record.matches_quick_search("vc-00"));
    assert!(!record.matches_quick_search("inbound"));
    assert!(record.matches_quick_search(""));
    assert_eq!(record.kind(), RecordKind::VoiceCall);
}

// ===== Query Tests =====

#[test]
fn test_queries_copy_filter_fields() {
    let mut filter = RecordFilter::default();
    filter.set_name_or_subject(Some(" refund ".to_string()));
    let query = RecordQuery::new(RecordKind::Case, 10, 2, &filter);
    assert_eq!(query.name_or_subject.as_deref(), Some("refund"));
    assert_eq!(query.page_number, 2);

    let mut filter = TemplateFilter::default();
    filter.set_template_type(Some("einstein_gpt__salesEmail".to_string()));
    let query = TemplateQuery::new(20, 1, &filter);
    assert_eq!(query.template_type.as_deref(), Some("einstein_gpt__salesEmail"));
    assert_eq!(query.name, None);
}

// ===== Batch Tests =====

#[test]
fn test_batch_request_requires_records() {
    let request = BatchRequest {
        test_type: TestType::CaseSummary,
        record_ids: vec![],
        primary_template_id: "0hs1".into(),
        secondary_template_id: None,
        retriever_id: None,
        quality_assessment: QualityAssessmentConfig::default(),
        knowledge_grounding: KnowledgeGrounding::default(),
    };
    assert!(request.validate().is_err());
}

#[test]
fn test_invalid_date_range_message() {
    assert_eq!(
        ValidationFailure::InvalidDateRange.to_string(),
        "Start date must be on or before end date."
    );
}
