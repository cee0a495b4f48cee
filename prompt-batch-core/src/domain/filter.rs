use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::template::non_blank;
use crate::error::ValidationFailure;

/// A label/value pair from a picklist vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

// ===== Template Filters =====

/// Staged filter fields for the template listing. Edits take effect on the next fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TemplateFilter {
    pub name: Option<String>,
    pub template_type: Option<String>,
    pub status: Option<String>,
}

impl TemplateFilter {
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = non_blank(name);
    }

    pub fn set_template_type(&mut self, template_type: Option<String>) {
        self.template_type = non_blank(template_type);
    }

    pub fn set_status(&mut self, status: Option<String>) {
        self.status = non_blank(status);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Fixed status vocabulary for templates.
    pub fn status_options() -> Vec<SelectOption> {
        vec![
            SelectOption::new("All Status", ""),
            SelectOption::new("Active", "Active"),
            SelectOption::new("Inactive", "Inactive"),
        ]
    }
}

// ===== Record Filters =====

/// Staged filter fields for the active record listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RecordFilter {
    /// Session/call name, or case subject for cases.
    pub name_or_subject: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn set_name_or_subject(&mut self, value: Option<String>) {
        self.name_or_subject = non_blank(value);
    }

    pub fn set_status(&mut self, status: Option<String>) {
        self.status = non_blank(status);
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start_date = start;
        self.end_date = end;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), ValidationFailure> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(ValidationFailure::InvalidDateRange),
            _ => Ok(()),
        }
    }
}
