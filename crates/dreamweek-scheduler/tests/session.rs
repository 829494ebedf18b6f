mod common;

use std::time::Duration;

use common::*;
use dreamweek_core::models::instance::WeekInstance;
use dreamweek_scheduler::{Topic, WeekSession};
use dreamweek_storage::GoalStore;

async fn wait_for<F>(session: &WeekSession, mut ready: F) -> Vec<WeekInstance>
where
    F: FnMut(&[WeekInstance]) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let shown = session.instances().await;
            if ready(&shown) {
                return shown;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn load_renders_the_visible_set() {
    let h = Harness::with_dreams(documents(
        vec![dream("D1", vec![weekly_goal("G1", Some(2)), weekly_goal("G2", None)])],
        vec![],
    ))
    .await;
    let session = WeekSession::new(h.scheduler.clone(), USER, week("2025-W10"));

    let loaded = session.load().await;

    assert_eq!(loaded.created.len(), 2);
    assert_eq!(session.instances().await.len(), 2);

    session.increment("G1_2025-W10").await.unwrap();
    session.skip("G2_2025-W10", |_| true).await.unwrap();

    let shown = session.instances().await;
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].completion_count, 1);
}

#[tokio::test]
async fn watch_picks_up_goals_added_elsewhere() {
    let h = Harness::with_dreams(documents(vec![dream("D1", vec![])], vec![])).await;
    let w = week("2025-W10");
    let session = WeekSession::new(h.scheduler.clone(), USER, w);
    session.load().await;
    let _watch = session.watch();

    h.scheduler
        .add_freestanding_goal(USER, w, "Call mum", None, now())
        .await
        .unwrap();

    let shown = wait_for(&session, |list| !list.is_empty()).await;
    assert_eq!(shown[0].title, "Call mum");
}

#[tokio::test]
async fn watch_stops_once_the_session_is_gone() {
    let h = Harness::with_dreams(documents(vec![dream("D1", vec![])], vec![])).await;
    let session = WeekSession::new(h.scheduler.clone(), USER, week("2025-W10"));
    let watch = session.watch();
    drop(session);

    h.scheduler.bus().publish(Topic::GoalsUpdated);

    tokio::time::timeout(Duration::from_secs(2), watch)
        .await
        .unwrap()
        .unwrap();
    assert!(h.store.list_weeks(USER).await.unwrap().is_empty());
}
