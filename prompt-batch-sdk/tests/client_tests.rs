use pretty_assertions::assert_eq;
use prompt_batch_core::*;
use prompt_batch_sdk::{AuthConfig, PromptBatchClient, SdkConfig, SdkError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> PromptBatchClient {
    let config = SdkConfig::new(server.uri())
        .with_auth(AuthConfig::BearerToken("access-token".to_string()))
        .with_retry_backoff(Duration::from_millis(1), Duration::from_millis(5))
        .with_max_retries(2);
    PromptBatchClient::new(config).unwrap()
}

fn pagination(total_count: u64) -> serde_json::Value {
    json!({"totalPages": 1, "totalCount": total_count, "hasNext": false, "hasPrevious": false})
}

// ===== Listing Tests =====

#[tokio::test]
async fn test_list_templates_sends_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/templates"))
        .and(query_param("pageSize", "20"))
        .and(query_param("pageNumber", "2"))
        .and(query_param("templateName", "Reply"))
        .and(query_param("templateStatus", "Active"))
        .and(header("Authorization", "Bearer access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "templates": [{"Id": "0hfC", "Name": "Contextual Reply", "Status": "Active"}],
            "templateTypeOptions": [{"label": "Reply", "value": "reply"}],
            "pagination": pagination(21)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut filter = TemplateFilter::default();
    filter.set_name(Some("Reply".to_string()));
    filter.set_status(Some("Active".to_string()));

    let page = client(&server)
        .list_templates(&TemplateQuery::new(20, 2, &filter))
        .await
        .unwrap();

    assert_eq!(page.total_count, 21);
    assert_eq!(page.templates, vec![PromptTemplate::new("0hfC", "Contextual Reply").with_status("Active")]);
    assert_eq!(
        page.template_type_options,
        Some(vec![SelectOption::new("Reply", "reply")])
    );
}

#[tokio::test]
async fn test_list_cases_filters_by_subject() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records/cases"))
        .and(query_param("subject", "refund"))
        .and(query_param("startDate", "2024-05-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cases": [{"Id": "500A", "CaseNumber": "00001027", "Subject": "Refund not received"}],
            "pagination": pagination(1)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut filter = RecordFilter::default();
    filter.set_name_or_subject(Some("refund".to_string()));
    filter.set_date_range(chrono::NaiveDate::from_ymd_opt(2024, 5, 1), None);

    let page = client(&server)
        .list_records(&RecordQuery::new(RecordKind::Case, 10, 1, &filter))
        .await
        .unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.records[0].id().as_str(), "500A");
    assert_eq!(page.records[0].display_name(), "Refund not received");
}

#[tokio::test]
async fn test_session_transcripts_become_previews() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records/messaging-sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": [{
                "Id": "0Mw1",
                "Name": "Chat with Dana",
                "transcript": "Customer: my order is late Agent: let me check"
            }],
            "pagination": pagination(1)
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .list_records(&RecordQuery::new(
            RecordKind::ConversationSession,
            10,
            1,
            &RecordFilter::default(),
        ))
        .await
        .unwrap();

    match &page.records[0] {
        DataRecord::ConversationSession(session) => assert_eq!(
            session.transcript_preview,
            "Customer:my order is late\nAgent:let me check"
        ),
        other => panic!("unexpected record {:?}", other),
    }
}

#[tokio::test]
async fn test_status_options() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records/status-options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"label": "All Statuses", "value": ""},
            {"label": "New", "value": "New"}
        ])))
        .mount(&server)
        .await;

    let options = client(&server).list_status_options().await.unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[1], SelectOption::new("New", "New"));
}

// ===== Retry Tests =====

#[tokio::test]
async fn test_listing_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records/voice-calls"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/records/voice-calls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "voiceCalls": [{"Id": "0LQ1", "Name": "VC-0001"}],
            "pagination": pagination(1)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .list_records(&RecordQuery::new(
            RecordKind::VoiceCall,
            10,
            1,
            &RecordFilter::default(),
        ))
        .await
        .unwrap();

    assert_eq!(page.records.len(), 1);
}

#[tokio::test]
async fn test_listing_failure_keeps_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "Query timed out"})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server)
        .list_templates(&TemplateQuery::new(20, 1, &TemplateFilter::default()))
        .await
        .unwrap_err();

    assert_eq!(err.message.as_deref(), Some("Query timed out"));
}

#[tokio::test]
async fn test_listing_honours_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records/status-options"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/records/status-options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"label": "New", "value": "New"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let options = client(&server).list_status_options().await.unwrap();
    assert_eq!(options, vec![SelectOption::new("New", "New")]);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/templates"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Resource not found"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .list_templates(&TemplateQuery::new(20, 1, &TemplateFilter::default()))
        .await
        .unwrap_err();

    assert_eq!(err.message.as_deref(), Some("Resource not found"));
}

#[tokio::test]
async fn test_unauthorized_without_body_names_the_cause() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/records/status-options"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).list_status_options().await.unwrap_err();
    assert_eq!(
        err.message.as_deref(),
        Some(prompt_batch_sdk::error::UNAUTHENTICATED_MESSAGE)
    );
}

// ===== Submission Tests =====

fn case_summary_request() -> BatchRequest {
    BatchRequest {
        test_type: TestType::CaseSummary,
        record_ids: vec!["500A".into()],
        primary_template_id: "0hfS".into(),
        secondary_template_id: None,
        retriever_id: None,
        quality_assessment: QualityAssessmentConfig::default(),
        knowledge_grounding: KnowledgeGrounding::default(),
    }
}

#[tokio::test]
async fn test_submit_posts_flat_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/batches"))
        .and(body_json(json!({
            "testType": "Case Summary",
            "recordIds": ["500A"],
            "primaryTemplateId": "0hfS",
            "secondaryTemplateId": null,
            "retrieverId": null,
            "enableQualityAssessment": false,
            "faithfulnessTemplateId": null,
            "relevancyTemplateId": null,
            "contextQualityTemplateId": null,
            "primaryUsesKnowledgeGrounding": false,
            "secondaryUsesKnowledgeGrounding": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "testType": "Case Summary",
            "batchId": "a0B1",
            "testRecordsCreated": 1,
            "recordsProcessed": 1,
            "recordsSkipped": 0,
            "dataSourceType": "Case"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .submit_batch(&case_summary_request())
        .await
        .unwrap();

    assert_eq!(result.batch_id.as_str(), "a0B1");
    assert_eq!(result.data_source_type.as_deref(), Some("Case"));
}

#[tokio::test]
async fn test_submit_is_never_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/batches"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!([{"message": "Unable to lock row", "errorCode": "UNABLE_TO_LOCK_ROW"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .submit_batch(&case_summary_request())
        .await
        .unwrap_err();

    assert_eq!(err.message.as_deref(), Some("Unable to lock row"));
}

#[tokio::test]
async fn test_submit_rejects_empty_selection_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut request = case_summary_request();
    request.record_ids.clear();

    let err = client(&server).batches().create(&request).await.unwrap_err();
    assert!(matches!(err, SdkError::ValidationError(_)));
}

#[tokio::test]
async fn test_error_carries_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/batches"))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("X-Request-Id", "req-42")
                .set_body_json(json!({"message": "Invalid retriever", "errorCode": "INVALID_FIELD"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .batches()
        .create(&case_summary_request())
        .await
        .unwrap_err();

    assert_eq!(err.request_id(), Some("req-42"));
    assert_eq!(err.status_code(), Some(400));
}
