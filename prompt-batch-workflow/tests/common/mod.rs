#![allow(dead_code)]

use async_trait::async_trait;
use prompt_batch_core::*;
use prompt_batch_workflow::PromptTestWizard;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the remote data service that records every call.
#[derive(Default)]
pub struct FakeService {
    pub templates: Vec<PromptTemplate>,
    pub template_total: u64,
    pub template_type_options: Option<Vec<SelectOption>>,
    pub sessions: Vec<DataRecord>,
    pub cases: Vec<DataRecord>,
    pub voice_calls: Vec<DataRecord>,
    pub record_total: u64,
    pub fail_templates: AtomicBool,
    pub fail_records: AtomicBool,
    pub fail_status: AtomicBool,
    pub fail_submit: AtomicBool,
    pub template_queries: Mutex<Vec<TemplateQuery>>,
    pub record_queries: Mutex<Vec<RecordQuery>>,
    pub submissions: Mutex<Vec<BatchRequest>>,
}

impl FakeService {
    pub fn populated() -> Self {
        Self {
            templates: vec![
                PromptTemplate::new("0hfC", "Contextual Reply").with_status("Active"),
                PromptTemplate::new("0hfG", "Grounded Reply").with_status("Active"),
                PromptTemplate::new("0hfQ", "Faithfulness Judge").with_status("Active"),
            ],
            template_total: 45,
            template_type_options: Some(vec![SelectOption::new("Reply", "reply")]),
            sessions: vec![
                DataRecord::conversation("0Mw1", "Chat with Dana", Some("Customer: hi Agent: hello")),
                DataRecord::conversation("0Mw2", "Chat with Lee", None),
                DataRecord::conversation("0Mw3", "Escalation", Some("Help.\nNow.")),
            ],
            cases: vec![DataRecord::Case(CaseRecord {
                id: "500A".into(),
                case_number: Some("00001027".to_string()),
                subject: Some("Refund not received".to_string()),
                status: Some("New".to_string()),
                priority: Some("High".to_string()),
                created_date: None,
            })],
            voice_calls: vec![DataRecord::VoiceCall(VoiceCallRecord {
                id: "0LQ1".into(),
                name: Some("VC-0001".to_string()),
                call_type: Some("Inbound".to_string()),
                call_start_date_time: None,
                call_duration_in_seconds: Some(95),
                from_phone_number: None,
                to_phone_number: None,
            })],
            record_total: 23,
            ..Default::default()
        }
    }

    pub fn fail(flag: &AtomicBool, failing: bool) {
        flag.store(failing, Ordering::SeqCst);
    }

    pub fn template_queries(&self) -> Vec<TemplateQuery> {
        self.template_queries.lock().unwrap().clone()
    }

    pub fn record_queries(&self) -> Vec<RecordQuery> {
        self.record_queries.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<BatchRequest> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchService for FakeService {
    async fn list_templates(&self, query: &TemplateQuery) -> ServiceResult<TemplatePage> {
        self.template_queries.lock().unwrap().push(query.clone());
        if self.fail_templates.load(Ordering::SeqCst) {
            return Err(ServiceError::new("Template query timed out"));
        }
        Ok(TemplatePage {
            templates: self.templates.clone(),
            template_type_options: self.template_type_options.clone(),
            total_count: self.template_total,
        })
    }

    async fn list_records(&self, query: &RecordQuery) -> ServiceResult<RecordPage> {
        self.record_queries.lock().unwrap().push(query.clone());
        if self.fail_records.load(Ordering::SeqCst) {
            return Err(ServiceError::without_message());
        }
        let records = match query.kind {
            RecordKind::ConversationSession => self.sessions.clone(),
            RecordKind::Case => self.cases.clone(),
            RecordKind::VoiceCall => self.voice_calls.clone(),
        };
        Ok(RecordPage {
            records,
            total_count: self.record_total,
        })
    }

    async fn list_status_options(&self) -> ServiceResult<Vec<SelectOption>> {
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(ServiceError::new("Status picklist unavailable"));
        }
        Ok(vec![
            SelectOption::new("All Statuses", ""),
            SelectOption::new("Active", "Active"),
        ])
    }

    async fn submit_batch(&self, request: &BatchRequest) -> ServiceResult<BatchResult> {
        self.submissions.lock().unwrap().push(request.clone());
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(ServiceError::new("Retriever ret-001 not found"));
        }
        Ok(BatchResult {
            test_type: request.test_type,
            batch_id: format!("a0B{:03}", self.submissions.lock().unwrap().len()).into(),
            test_records_created: request.record_ids.len() as u64 * 3,
            records_processed: request.record_ids.len() as u64,
            records_skipped: 0,
            total_customer_utterances: None,
            data_source_type: None,
        })
    }
}

pub fn settings() -> WizardSettings {
    WizardSettings {
        default_retriever_id: Some("ret-001".to_string()),
        default_faithfulness_template_id: Some("0hfQ".to_string()),
        ..Default::default()
    }
}

pub fn wizard(service: &Arc<FakeService>) -> PromptTestWizard {
    PromptTestWizard::new(service.clone(), settings())
}

/// Walks a service replies wizard to record selection with both templates picked.
pub async fn at_records_step(service: &Arc<FakeService>) -> PromptTestWizard {
    let mut wizard = wizard(service);
    wizard.select_test_type(TestType::ServiceReplies);
    wizard.continue_to_templates().await.unwrap();
    wizard
        .apply_template_action(TemplateAction::SelectPrimary, &"0hfC".into())
        .unwrap();
    wizard
        .apply_template_action(TemplateAction::SelectSecondary, &"0hfG".into())
        .unwrap();
    wizard.continue_to_records().await.unwrap();
    wizard
}
