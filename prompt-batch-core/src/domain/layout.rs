use serde::Serialize;

use super::record::RecordKind;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Url,
    Date,
    Number,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub field: &'static str,
    pub column_type: ColumnType,
}

const fn column(label: &'static str, field: &'static str, column_type: ColumnType) -> Column {
    Column {
        label,
        field,
        column_type,
    }
}

pub const TEMPLATE_COLUMNS: &[Column] = &[
    column("Name", "Name", ColumnType::Text),
    column("Template Type", "TemplateType", ColumnType::Text),
    column("Status", "Status", ColumnType::Text),
];

const SESSION_COLUMNS: &[Column] = &[
    column("Session Name", "name", ColumnType::Url),
    column("Transcript Preview", "transcript_preview", ColumnType::Text),
];

const CASE_COLUMNS: &[Column] = &[
    column("Case Number", "CaseNumber", ColumnType::Text),
    column("Subject", "Subject", ColumnType::Text),
    column("Status", "Status", ColumnType::Text),
    column("Priority", "Priority", ColumnType::Text),
    column("Created Date", "CreatedDate", ColumnType::Date),
];

const VOICE_CALL_COLUMNS: &[Column] = &[
    column("Name", "Name", ColumnType::Text),
    column("Call Type", "CallType", ColumnType::Text),
    column("Start Time", "CallStartDateTime", ColumnType::Date),
    column("Duration (sec)", "CallDurationInSeconds", ColumnType::Number),
    column("From", "FromPhoneNumber", ColumnType::Text),
    column("To", "ToPhoneNumber", ColumnType::Text),
];

/// Which filter inputs a record listing offers.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FilterSet {
    /// Label of the name/subject filter, absent when the listing has none.
    pub name_label: Option<&'static str>,
    pub name_placeholder: Option<&'static str>,
    pub status: bool,
    pub date_range: bool,
}

/// Columns and filters shown for the active record kind.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RecordLayout {
    pub kind: RecordKind,
    pub columns: &'static [Column],
    pub filters: FilterSet,
}

impl RecordLayout {
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::ConversationSession => Self {
                kind,
                columns: SESSION_COLUMNS,
                filters: FilterSet {
                    name_label: Some("Record Name"),
                    name_placeholder: Some("Search by name..."),
                    status: true,
                    date_range: true,
                },
            },
            RecordKind::Case => Self {
                kind,
                columns: CASE_COLUMNS,
                filters: FilterSet {
                    name_label: Some("Case Subject"),
                    name_placeholder: Some("Search by case subject..."),
                    status: true,
                    date_range: true,
                },
            },
            RecordKind::VoiceCall => Self {
                kind,
                columns: VOICE_CALL_COLUMNS,
                filters: FilterSet {
                    name_label: None,
                    name_placeholder: None,
                    status: true,
                    date_range: true,
                },
            },
        }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.label).collect()
    }
}
