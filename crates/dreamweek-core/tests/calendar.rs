use std::collections::BTreeMap;

use dreamweek_core::calendar::{
    compute_streak, is_milestone_complete, months_to_weeks, weeks_between, weeks_until, WeekId,
};
use dreamweek_core::models::dream::Milestone;
use jiff::civil::date;

fn week(s: &str) -> WeekId {
    s.parse().expect("valid week id")
}

#[test]
fn formats_and_parses_week_ids() {
    let w = WeekId::new(2025, 47).unwrap();
    assert_eq!(w.to_string(), "2025-W47");
    assert_eq!(week("2025-W47"), w);
    assert_eq!(week("2025-W03").week(), 3);
}

#[test]
fn rejects_malformed_week_ids() {
    for bad in ["2025-47", "2025-W7", "25-W07", "2025-W00", "2025-W53", "2025-Wxx", ""] {
        assert!(bad.parse::<WeekId>().is_err(), "{bad} should be rejected");
    }
}

#[test]
fn accepts_week_53_in_long_years() {
    let w = week("2020-W53");
    assert_eq!(w.monday(), date(2020, 12, 28));
}

#[test]
fn early_january_can_belong_to_previous_iso_year() {
    let w = WeekId::of(date(2021, 1, 3));
    assert_eq!(w.to_string(), "2020-W53");
}

#[test]
fn late_december_can_belong_to_next_iso_year() {
    let w = WeekId::of(date(2025, 12, 29));
    assert_eq!(w.to_string(), "2026-W01");
    assert_eq!(WeekId::of(date(2025, 12, 28)).to_string(), "2025-W52");
}

#[test]
fn week_starts_on_monday() {
    let sunday = WeekId::of(date(2025, 3, 9));
    let monday = WeekId::of(date(2025, 3, 10));
    assert_eq!(sunday.to_string(), "2025-W10");
    assert_eq!(monday.to_string(), "2025-W11");
}

#[test]
fn next_and_prev_cross_year_edges() {
    assert_eq!(week("2020-W53").next().unwrap().to_string(), "2021-W01");
    assert_eq!(week("2026-W01").prev().unwrap().to_string(), "2025-W52");
    assert_eq!(week("2025-W52").next().unwrap().to_string(), "2026-W01");
}

#[test]
fn weeks_between_is_signed() {
    assert_eq!(weeks_between(week("2025-W10"), week("2025-W13")), 3);
    assert_eq!(weeks_between(week("2025-W13"), week("2025-W10")), -3);
    assert_eq!(weeks_between(week("2020-W52"), week("2021-W02")), 3);
}

#[test]
fn weeks_until_counts_whole_iso_weeks() {
    let from = week("2025-W10");
    // Friday of the same week.
    assert_eq!(weeks_until(date(2025, 3, 7), from), 0);
    // Monday three weeks later.
    assert_eq!(weeks_until(date(2025, 3, 24), from), 3);
    // Sunday of the previous week.
    assert_eq!(weeks_until(date(2025, 3, 2), from), -1);
}

#[test]
fn weeks_until_across_new_year() {
    assert_eq!(weeks_until(date(2026, 1, 2), week("2025-W52")), 1);
    assert_eq!(weeks_until(date(2021, 1, 3), week("2020-W53")), 0);
}

#[test]
fn months_convert_to_rounded_weeks() {
    assert_eq!(months_to_weeks(0), 0);
    assert_eq!(months_to_weeks(1), 4);
    assert_eq!(months_to_weeks(3), 13);
    assert_eq!(months_to_weeks(6), 26);
}

#[test]
fn milestone_completion() {
    let mut m = Milestone {
        id: "m1".to_string(),
        title: "Halfway".to_string(),
        progress_threshold: Some(50),
        completed: false,
    };
    assert!(!is_milestone_complete(&m, 49));
    assert!(is_milestone_complete(&m, 50));

    m.progress_threshold = None;
    assert!(!is_milestone_complete(&m, 100));
    m.completed = true;
    assert!(is_milestone_complete(&m, 0));
}

#[test]
fn streak_skips_unfinished_current_week() {
    let mut log = BTreeMap::new();
    log.insert(week("2025-W08"), true);
    log.insert(week("2025-W09"), true);
    log.insert(week("2025-W10"), false);

    assert_eq!(compute_streak(&log, date(2025, 1, 1), week("2025-W10")), 2);

    log.insert(week("2025-W10"), true);
    assert_eq!(compute_streak(&log, date(2025, 1, 1), week("2025-W10")), 3);
}

#[test]
fn streak_breaks_on_missed_week() {
    let mut log = BTreeMap::new();
    log.insert(week("2025-W07"), true);
    log.insert(week("2025-W09"), true);

    assert_eq!(compute_streak(&log, date(2025, 1, 1), week("2025-W10")), 1);
}

#[test]
fn streak_ignores_weeks_before_start() {
    let mut log = BTreeMap::new();
    for w in ["2025-W07", "2025-W08", "2025-W09"] {
        log.insert(week(w), true);
    }

    assert_eq!(compute_streak(&log, date(2025, 2, 24), week("2025-W09")), 1);
}

#[test]
fn streak_spans_year_boundary() {
    let mut log = BTreeMap::new();
    for w in ["2020-W52", "2020-W53", "2021-W01"] {
        log.insert(week(w), true);
    }

    assert_eq!(compute_streak(&log, date(2020, 1, 1), week("2021-W01")), 3);
}
