mod common;

use std::collections::HashSet;

use common::*;
use dreamweek_core::models::goal::{COMPLETED_SENTINEL, GoalKind, Recurrence};
use dreamweek_core::models::instance::{InstanceKind, WeekInstance};
use dreamweek_scheduler::SchedulerConfig;
use dreamweek_scheduler::builder::build_instance;
use dreamweek_scheduler::countdown;
use dreamweek_scheduler::definition::{Definition, Origin, RecurrenceSource, collect_candidates};
use dreamweek_scheduler::eligibility::{self, Exclusion, WeekContext};

fn goal_def(id: &str) -> Definition {
    let d = dream("D1", vec![weekly_goal(id, None)]);
    RecurrenceSource::DreamGoal {
        dream: &d,
        goal: &d.goals[0],
    }
    .normalize()
}

fn dream_ids() -> HashSet<String> {
    HashSet::from(["D1".to_string()])
}

fn context<'a>(
    existing: &'a [WeekInstance],
    skipped: &'a HashSet<String>,
    dreams: &'a HashSet<String>,
) -> WeekContext<'a> {
    WeekContext {
        week_id: week("2025-W10"),
        existing,
        skipped_template_ids: skipped,
        dream_ids: dreams,
    }
}

#[test]
fn rules_apply_in_order() {
    let dreams = dream_ids();
    let mut skipped = HashSet::new();
    let existing: Vec<WeekInstance> = Vec::new();

    let mut def = goal_def("G1");
    def.active = false;
    def.completed = true;
    def.dream_id = Some("gone".to_string());

    let check = |def: &Definition, skipped: &HashSet<String>| {
        eligibility::exclusion(def, &context(&existing, skipped, &dreams))
    };

    assert_eq!(check(&def, &skipped), Some(Exclusion::OrphanedDream));
    def.dream_id = Some("D1".to_string());
    assert_eq!(check(&def, &skipped), Some(Exclusion::Inactive));
    def.active = true;
    assert_eq!(check(&def, &skipped), Some(Exclusion::Completed));
    def.completed = false;
    skipped.insert("G1".to_string());
    assert_eq!(check(&def, &skipped), Some(Exclusion::SkippedThisWeek));
    skipped.clear();
    def.weeks_remaining = Some(-2);
    assert_eq!(check(&def, &skipped), Some(Exclusion::Expired));
    def.weeks_remaining = None;
    assert_eq!(check(&def, &skipped), None);
}

#[test]
fn existing_instance_matches_by_id_template_or_pattern() {
    let w = week("2025-W10");
    let dreams = dream_ids();
    let skipped = HashSet::new();
    let def = goal_def("G1");
    let config = SchedulerConfig::default();

    let mut by_pattern = build_instance(&def, w, w, &config, now());
    by_pattern.template_id = "other".to_string();
    let mut by_template = build_instance(&def, w, w, &config, now());
    by_template.id = "fresh".to_string();
    let mut other_week = build_instance(&def, w, w, &config, now());
    other_week.week_id = week("2025-W09");

    for existing in [vec![by_pattern], vec![by_template]] {
        let ctx = WeekContext {
            week_id: w,
            existing: &existing,
            skipped_template_ids: &skipped,
            dream_ids: &dreams,
        };
        assert_eq!(eligibility::exclusion(&def, &ctx), Some(Exclusion::AlreadyInstantiated));
    }

    let existing = vec![other_week];
    let ctx = WeekContext {
        week_id: w,
        existing: &existing,
        skipped_template_ids: &skipped,
        dream_ids: &dreams,
    };
    assert_eq!(eligibility::exclusion(&def, &ctx), None);
}

#[test]
fn eligible_accepts_each_id_once() {
    let w = week("2025-W10");
    let dreams = dream_ids();
    let skipped = HashSet::new();
    let existing: Vec<WeekInstance> = Vec::new();
    let ctx = WeekContext {
        week_id: w,
        existing: &existing,
        skipped_template_ids: &skipped,
        dream_ids: &dreams,
    };
    let defs = [goal_def("G1"), goal_def("G1"), goal_def("G2")];

    let accepted: Vec<&str> = eligibility::eligible(defs.iter(), &ctx)
        .into_iter()
        .map(|d| d.id.as_str())
        .collect();

    assert_eq!(accepted, vec!["G1", "G2"]);
}

#[test]
fn freestanding_definitions_have_no_owning_dream_to_lose() {
    let w = week("2025-W10");
    let empty = HashSet::new();
    let existing: Vec<WeekInstance> = Vec::new();
    let ctx = WeekContext {
        week_id: w,
        existing: &existing,
        skipped_template_ids: &empty,
        dream_ids: &empty,
    };
    assert_eq!(eligibility::exclusion(&Definition::freestanding("F1", "Call mum"), &ctx), None);
}

#[test]
fn templates_normalize_with_their_dream_title() {
    let doc = documents(
        vec![dream("D1", vec![weekly_goal("G1", None)])],
        vec![template("T1", Some("D1"), Some(2))],
    );

    let candidates = collect_candidates(&doc);

    assert_eq!(candidates.len(), 2);
    let t = &candidates.templates[0];
    assert_eq!(t.origin, Origin::Template);
    assert_eq!(t.dream_title.as_deref(), Some("Dream D1"));
    assert_eq!(candidates.iter().next().map(|d| d.id.as_str()), Some("G1"));
}

#[test]
fn countdown_prefers_cache_unless_sentinel() {
    let w = week("2025-W10");
    let mut def = goal_def("G1");
    def.kind = GoalKind::Deadline;
    def.target_date = Some(date("2025-03-24"));

    def.weeks_remaining = Some(5);
    assert_eq!(countdown::weeks_remaining(&def, w), Some(5));
    assert_eq!(countdown::weeks_remaining_at(&def, week("2025-W12"), w), Some(3));

    def.weeks_remaining = Some(COMPLETED_SENTINEL);
    assert_eq!(countdown::weeks_remaining(&def, w), Some(3));

    // A passed target date wins over a hopeful cache.
    def.weeks_remaining = Some(5);
    assert!(countdown::is_expired(&def, week("2025-W14")));
}

#[test]
fn consistency_countdown_runs_from_start_week() {
    let mut def = goal_def("G1");
    def.target_weeks = Some(4);
    def.start_week = Some(week("2025-W10"));

    assert_eq!(countdown::weeks_remaining(&def, week("2025-W10")), Some(3));
    assert_eq!(countdown::weeks_remaining(&def, week("2025-W13")), Some(0));
    assert!(countdown::is_expired(&def, week("2025-W14")));

    def.target_weeks = None;
    assert_eq!(countdown::weeks_remaining(&def, week("2030-W01")), None);
}

#[test]
fn builder_fills_defaults_per_recurrence() {
    let w = week("2025-W10");
    let config = SchedulerConfig::default();

    let weekly = build_instance(&goal_def("G1"), w, w, &config, now());
    assert_eq!(weekly.id, "G1_2025-W10");
    assert_eq!(weekly.frequency, Some(1));
    assert_eq!(weekly.kind, InstanceKind::WeeklyGoal);
    assert_eq!(weekly.created_at, now());

    let mut monthly = goal_def("G2");
    monthly.recurrence = Some(Recurrence::Monthly);
    let monthly = build_instance(&monthly, w, w, &config, now());
    assert_eq!(monthly.frequency, Some(2));

    let free = build_instance(&Definition::freestanding("F1", "Call mum"), w, w, &config, now());
    assert_eq!(free.id, "F1");
    assert_eq!(free.template_id, "F1");
    assert_eq!(free.frequency, None);
}

#[test]
fn deadline_instances_read_through_parent_completion() {
    let w = week("2025-W10");
    let mut def = goal_def("G2");
    def.kind = GoalKind::Deadline;
    def.target_date = Some(date("2025-03-24"));
    def.completed = true;
    def.completed_at = Some(now());

    let instance = build_instance(&def, w, w, &SchedulerConfig::default(), now());

    assert_eq!(instance.kind, InstanceKind::Deadline);
    assert!(instance.completed);
    assert_eq!(instance.completed_at, Some(now()));
    assert_eq!(instance.target_weeks, Some(3));
    assert_eq!(instance.frequency, None);

    let mut recurring = goal_def("G1");
    recurring.completed = true;
    assert!(!build_instance(&recurring, w, w, &SchedulerConfig::default(), now()).completed);
}

#[test]
fn folded_template_ids_count_as_the_goal() {
    let w = week("2025-W10");
    let mut legacy = template("T9", Some("D1"), None);
    legacy.goal_id = Some("G9".to_string());
    let doc = documents(vec![dream("D1", vec![weekly_goal("G9", None)])], vec![legacy.clone()]);

    let candidates = collect_candidates(&doc);
    assert!(candidates.templates.is_empty());
    let def = &candidates.dream_goals[0];
    assert_eq!(def.id, "G9");
    assert_eq!(def.aliases, vec!["T9".to_string()]);

    // Created from the template before it was folded.
    let old = build_instance(
        &RecurrenceSource::Template(&legacy).normalize(),
        w,
        w,
        &SchedulerConfig::default(),
        now(),
    );
    assert_eq!(old.id, "T9_2025-W10");
    let dreams = dream_ids();
    let none = HashSet::new();
    let existing = vec![old];
    assert_eq!(
        eligibility::exclusion(def, &context(&existing, &none, &dreams)),
        Some(Exclusion::AlreadyInstantiated)
    );

    let skipped = HashSet::from(["T9".to_string()]);
    assert_eq!(
        eligibility::exclusion(def, &context(&[], &skipped, &dreams)),
        Some(Exclusion::SkippedThisWeek)
    );
}
