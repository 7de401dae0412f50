//! Tests for pagination module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn windows(start: u64, end: u64, page_size: u64) -> Vec<(u64, u64)> {
    plan(start, end, page_size)
        .unwrap()
        .map(|w| (w.from, w.to))
        .collect()
}

// ============================================================================
// PageWindow Tests
// ============================================================================

#[test]
fn test_page_window_len_and_query() {
    let window = PageWindow::new(1000, 1999);
    assert_eq!(window.len(), 1000);
    assert!(!window.is_empty());
    assert_eq!(window.query(), "from=1000&to=1999");
    assert_eq!(window.to_string(), "[1000..=1999]");
}

#[test]
fn test_page_window_from_tuple() {
    let window: PageWindow = (5, 7).into();
    assert_eq!(window, PageWindow::new(5, 7));
}

// ============================================================================
// Planner Tests
// ============================================================================

#[test]
fn test_plan_two_pages() {
    assert_eq!(windows(1, 1999, 1000), vec![(1, 999), (1000, 1999)]);
}

#[test]
fn test_plan_single_point() {
    assert_eq!(windows(5, 5, 10), vec![(5, 5)]);
}

#[test]
fn test_plan_range_smaller_than_page() {
    assert_eq!(windows(1, 500, 1000), vec![(1, 500)]);
}

#[test]
fn test_plan_range_exactly_one_page() {
    // end - start == page_size - 1 still fits in one window
    assert_eq!(windows(1, 1000, 1000), vec![(1, 1000)]);
}

#[test]
fn test_plan_short_last_window() {
    assert_eq!(windows(1, 11, 10), vec![(1, 9), (10, 11)]);
}

#[test]
fn test_plan_page_size_one() {
    assert_eq!(windows(1, 3, 1), vec![(1, 1), (2, 2), (3, 3)]);
}

#[test]
fn test_plan_is_restartable() {
    let planned = plan(1, 5000, 1000).unwrap();
    let first: Vec<_> = planned.clone().collect();
    let second: Vec<_> = planned.collect();
    assert_eq!(first, second);
}

#[test]
fn test_plan_is_fused() {
    let mut planned = plan(1, 1, 1).unwrap();
    assert!(planned.next().is_some());
    assert!(planned.next().is_none());
    assert!(planned.next().is_none());
}

#[test_case(0, 10, 5 ; "start at zero")]
#[test_case(10, 5, 5 ; "inverted range")]
#[test_case(1, 10, 0 ; "empty page")]
fn test_plan_rejects_invalid_input(start: u64, end: u64, page_size: u64) {
    let err = plan(start, end, page_size).unwrap_err();
    assert!(matches!(err, Error::InvalidPageRange { .. }));
}

#[test_case(1, 1, 1)]
#[test_case(1, 2, 1)]
#[test_case(1, 1999, 1000)]
#[test_case(1, 2000, 1000)]
#[test_case(1, 2001, 1000)]
#[test_case(3, 97, 7)]
#[test_case(1, 10_000, 1000)]
#[test_case(42, 43, 2)]
#[test_case(1, 100, 100)]
#[test_case(1, 101, 100)]
fn test_plan_covers_range_exactly(start: u64, end: u64, page_size: u64) {
    let planned = windows(start, end, page_size);

    assert!(!planned.is_empty());
    assert_eq!(planned.first().unwrap().0, start);
    assert_eq!(planned.last().unwrap().1, end);

    for (from, to) in &planned {
        assert!(from <= to, "inverted window ({from}, {to})");
        assert!(to - from < page_size.max(1), "window ({from}, {to}) too large");
    }

    // Consecutive windows touch without overlap or gap
    for pair in planned.windows(2) {
        assert_eq!(pair[0].1 + 1, pair[1].0);
    }

    let covered: u64 = planned.iter().map(|(from, to)| to - from + 1).sum();
    assert_eq!(covered, end - start + 1);
}
