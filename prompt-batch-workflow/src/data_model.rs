use prompt_batch_core::{
    CoreError, DataRecord, PaginationState, RecordFilter, RecordId, RecordKind, RecordLayout,
    RecordPage, RecordQuery, Result, ServiceResult, ValidationFailure, WorkSummarySource,
};
use serde::Serialize;

/// The paged record listing for the active record kind, plus the selected ids.
///
/// Quick search narrows what is visible on the loaded page only. Selection
/// survives quick search but not a successful refetch.
#[derive(Debug, Clone, Serialize)]
pub struct DataSelectionModel {
    kind: RecordKind,
    source: WorkSummarySource,
    layout: RecordLayout,
    records: Vec<DataRecord>,
    filter: RecordFilter,
    pagination: PaginationState,
    loading: bool,
    quick_search: String,
    selected: Vec<RecordId>,
}

impl DataSelectionModel {
    pub fn new(kind: RecordKind, page_size: u32) -> Self {
        Self {
            kind,
            source: WorkSummarySource::default(),
            layout: RecordLayout::for_kind(kind),
            records: Vec::new(),
            filter: RecordFilter::default(),
            pagination: PaginationState::new(page_size),
            loading: false,
            quick_search: String::new(),
            selected: Vec::new(),
        }
    }

    // ===== Accessors =====

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn source(&self) -> WorkSummarySource {
        self.source
    }

    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    pub fn records(&self) -> &[DataRecord] {
        &self.records
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut RecordFilter {
        &mut self.filter
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn quick_search(&self) -> &str {
        &self.quick_search
    }

    pub fn selected_ids(&self) -> &[RecordId] {
        &self.selected
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selected.contains(id)
    }

    /// Rows of the loaded page that pass the quick search.
    pub fn visible_records(&self) -> Vec<&DataRecord> {
        self.records
            .iter()
            .filter(|record| record.matches_quick_search(&self.quick_search))
            .collect()
    }

    // ===== Configuration =====

    /// Points the model at a new record kind and forgets everything loaded for the old one.
    pub fn configure(&mut self, kind: RecordKind, source: WorkSummarySource, page_size: u32) {
        self.kind = kind;
        self.source = source;
        self.layout = RecordLayout::for_kind(kind);
        self.filter.clear();
        self.pagination = PaginationState::new(page_size);
        self.clear_listing();
    }

    /// Drops the loaded rows together with the selection and quick search.
    pub fn clear_listing(&mut self) {
        self.records.clear();
        self.selected.clear();
        self.quick_search.clear();
    }

    // ===== Fetching =====

    pub fn begin_fetch(&mut self, page_number: u32) -> std::result::Result<RecordQuery, ValidationFailure> {
        if self.loading {
            return Err(ValidationFailure::OperationInProgress);
        }
        self.filter.validate()?;
        self.loading = true;
        Ok(RecordQuery::new(
            self.kind,
            self.pagination.page_size(),
            page_number.max(1),
            &self.filter,
        ))
    }

    /// Full replace on success; selection and quick search start over. A failure keeps everything.
    pub fn finish_fetch(&mut self, query: &RecordQuery, result: ServiceResult<RecordPage>) -> Result<()> {
        self.loading = false;
        let page = result.map_err(|err| {
            CoreError::fetch(self.kind.plural_label().to_lowercase(), &err)
        })?;

        self.records = page.records;
        self.pagination =
            PaginationState::from_counts(query.page_size, query.page_number, page.total_count);
        self.selected.clear();
        self.quick_search.clear();
        Ok(())
    }

    // ===== Quick Search & Selection =====

    pub fn set_quick_search(&mut self, query: impl Into<String>) {
        self.quick_search = query.into();
    }

    pub fn select(&mut self, id: &RecordId) -> std::result::Result<(), ValidationFailure> {
        if !self.records.iter().any(|record| record.id() == id) {
            return Err(ValidationFailure::UnknownRecord(id.to_string()));
        }
        if !self.selected.contains(id) {
            self.selected.push(id.clone());
        }
        Ok(())
    }

    pub fn deselect(&mut self, id: &RecordId) {
        self.selected.retain(|selected| selected != id);
    }

    /// Returns whether the record ends up selected.
    pub fn toggle(&mut self, id: &RecordId) -> std::result::Result<bool, ValidationFailure> {
        if self.is_selected(id) {
            self.deselect(id);
            Ok(false)
        } else {
            self.select(id)?;
            Ok(true)
        }
    }

    /// Adds every visible row; rows hidden by quick search keep their state.
    pub fn select_all_visible(&mut self) {
        let visible: Vec<RecordId> = self
            .visible_records()
            .into_iter()
            .map(|record| record.id().clone())
            .collect();
        for id in visible {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_batch_core::ServiceError;

    fn page(names: &[(&str, &str)], total: u64) -> RecordPage {
        RecordPage {
            records: names
                .iter()
                .map(|(id, name)| DataRecord::conversation(*id, *name, None))
                .collect(),
            total_count: total,
        }
    }

    fn loaded() -> DataSelectionModel {
        let mut model = DataSelectionModel::new(RecordKind::ConversationSession, 10);
        let query = model.begin_fetch(1).unwrap();
        model
            .finish_fetch(
                &query,
                Ok(page(&[("0Mw1", "Chat Alpha"), ("0Mw2", "Chat Beta"), ("0Mw3", "Call Gamma")], 23)),
            )
            .unwrap();
        model
    }

    #[test]
    fn quick_search_keeps_selection_and_pagination() {
        let mut model = loaded();
        model.select(&"0Mw1".into()).unwrap();
        model.set_quick_search("beta");

        assert_eq!(model.visible_records().len(), 1);
        model.select_all_visible();

        assert_eq!(
            model.selected_ids().to_vec(),
            vec![RecordId::from("0Mw1"), RecordId::from("0Mw2")]
        );
        assert_eq!(model.pagination().total_count(), 23);
    }

    #[test]
    fn successful_refetch_clears_selection() {
        let mut model = loaded();
        model.select(&"0Mw1".into()).unwrap();
        let query = model.begin_fetch(2).unwrap();
        model
            .finish_fetch(&query, Ok(page(&[("0Mw9", "Chat Nine")], 23)))
            .unwrap();

        assert!(model.selected_ids().is_empty());
        assert_eq!(model.pagination().current_page(), 2);
    }

    #[test]
    fn failed_refetch_keeps_selection() {
        let mut model = loaded();
        model.select(&"0Mw1".into()).unwrap();
        let query = model.begin_fetch(2).unwrap();
        let err = model
            .finish_fetch(&query, Err(ServiceError::without_message()))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to load messaging sessions: An unexpected error occurred"
        );
        assert_eq!(model.selected_ids().len(), 1);
        assert_eq!(model.records().len(), 3);
    }

    #[test]
    fn selecting_unknown_record_fails() {
        let mut model = loaded();
        assert_eq!(
            model.select(&"nope".into()),
            Err(ValidationFailure::UnknownRecord("nope".to_string()))
        );
    }

    #[test]
    fn toggle_flips_state() {
        let mut model = loaded();
        assert_eq!(model.toggle(&"0Mw3".into()), Ok(true));
        assert_eq!(model.toggle(&"0Mw3".into()), Ok(false));
        assert!(model.selected_ids().is_empty());
    }

    #[test]
    fn configure_switches_layout() {
        let mut model = loaded();
        model.configure(RecordKind::VoiceCall, WorkSummarySource::VoiceCall, 15);
        assert_eq!(model.layout().kind, RecordKind::VoiceCall);
        assert!(model.records().is_empty());
        assert_eq!(model.pagination().page_size(), 15);
    }
}
