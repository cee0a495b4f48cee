use prompt_batch_core::domain::PaginationState;
use proptest::prelude::*;
use rstest::rstest;

// ===== Range Label Tests =====

#[rstest]
#[case(10, 1, 0, "0 - 0 of 0")]
#[case(10, 1, 7, "1 - 7 of 7")]
#[case(20, 2, 57, "21 - 40 of 57")]
#[case(20, 3, 57, "41 - 57 of 57")]
#[case(10, 4, 40, "31 - 40 of 40")]
fn test_range_label(
    #[case] page_size: u32,
    #[case] page: u32,
    #[case] total: u64,
    #[case] expected: &str,
) {
    let state = PaginationState::from_counts(page_size, page, total);
    assert_eq!(state.range_label(), expected);
}

// ===== Navigation Tests =====

#[test]
fn test_navigation_targets() {
    let state = PaginationState::from_counts(10, 2, 35);
    assert_eq!(state.total_pages(), 4);
    assert_eq!(state.next_target(), Some(3));
    assert_eq!(state.previous_target(), Some(1));
    assert_eq!(state.first_target(), 1);
    assert_eq!(state.last_target(), 4);
    assert!(state.show_controls());
}

#[test]
fn test_navigation_at_edges() {
    let first = PaginationState::from_counts(10, 1, 35);
    assert_eq!(first.previous_target(), None);

    let last = PaginationState::from_counts(10, 4, 35);
    assert_eq!(last.next_target(), None);
}

#[test]
fn test_default_uses_record_page_size() {
    let state = PaginationState::default();
    assert_eq!(state.page_size(), 10);
    assert_eq!(state.current_page(), 1);
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn test_current_page_within_bounds(
        page_size in 0u32..200,
        page in 0u32..10_000,
        total in 0u64..1_000_000,
    ) {
        let state = PaginationState::from_counts(page_size, page, total);
        prop_assert!(state.total_pages() >= 1);
        prop_assert!(state.current_page() >= 1);
        prop_assert!(state.current_page() <= state.total_pages());
        prop_assert_eq!(state.has_next(), state.current_page() < state.total_pages());
        prop_assert_eq!(state.has_previous(), state.current_page() > 1);
    }

    #[test]
    fn test_next_target_lands_on_requested_page(
        page_size in 1u32..50,
        page in 1u32..100,
        total in 0u64..5_000,
    ) {
        let state = PaginationState::from_counts(page_size, page, total);
        if let Some(next) = state.next_target() {
            let moved = PaginationState::from_counts(page_size, next, total);
            prop_assert_eq!(moved.current_page(), next);
            prop_assert!(moved.has_previous());
        }
    }
}
