use thiserror::Error;

use crate::domain::{QualityMetric, TestType, WizardStep};

/// Fallback text when the remote service gives no usable message.
pub const GENERIC_SERVICE_ERROR: &str = "An unexpected error occurred";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    #[error("Failed to load {resource}: {message}")]
    Fetch { resource: String, message: String },

    #[error("Failed to create test batch: {0}")]
    Submission(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    pub fn fetch(resource: impl Into<String>, error: &ServiceError) -> Self {
        CoreError::Fetch {
            resource: resource.into(),
            message: error.message_or_generic().to_string(),
        }
    }

    pub fn submission(error: &ServiceError) -> Self {
        CoreError::Submission(error.message_or_generic().to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            CoreError::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

// ===== Validation Failures =====

/// Operator-correctable rejections. Raising one never changes wizard state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("Please select a test type first.")]
    NoTestType,

    #[error("Please select a {label} first.")]
    MissingPrimaryTemplate { label: &'static str },

    #[error("A grounded template is required for {0}.")]
    MissingSecondaryTemplate(TestType),

    #[error("A retriever ID is required for {0}.")]
    MissingRetriever(TestType),

    #[error("Please select at least one record.")]
    NoRecordsSelected,

    #[error("This action is not available for {test_type}: {action}")]
    ActionUnavailable {
        test_type: TestType,
        action: &'static str,
    },

    #[error("Template {0} is not in the current listing.")]
    UnknownTemplate(String),

    #[error("Record {0} is not in the current page.")]
    UnknownRecord(String),

    #[error("Enable quality assessment before choosing a {0} template.")]
    QualityAssessmentDisabled(QualityMetric),

    #[error("Start date must be on or before end date.")]
    InvalidDateRange,

    #[error("Another request is still in progress.")]
    OperationInProgress,

    #[error("Record source can only be chosen for Work Summary tests.")]
    SourceNotSelectable,

    #[error("This action is not available in the {0} step.")]
    WrongStep(WizardStep),
}

// ===== Collaborator Errors =====

/// Failure reported by the remote data service.
///
/// `message` holds the service's own description when it supplied one.
#[derive(Error, Debug, Clone, PartialEq, Eq, Default)]
#[error("{}", self.message_or_generic())]
pub struct ServiceError {
    pub message: Option<String>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: if message.trim().is_empty() {
                None
            } else {
                Some(message)
            },
        }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }

    pub fn message_or_generic(&self) -> &str {
        self.message.as_deref().unwrap_or(GENERIC_SERVICE_ERROR)
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
