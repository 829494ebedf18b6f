use dreamweek_scheduler::local::{LocalHandle, LocalState};
use dreamweek_scheduler::optimistic::OptimisticUpdate;
use dreamweek_scheduler::{EventBus, Topic};

#[tokio::test]
async fn apply_shows_the_new_value_and_commit_keeps_it() {
    let state = LocalState::new(vec![1, 2]);
    let handle = state.handle();
    let update = OptimisticUpdate::new(vec![1, 2], vec![1, 2, 3]);

    assert!(update.apply(&handle).await);
    assert_eq!(state.get().await, vec![1, 2, 3]);

    let saved: Result<&str, String> = update.commit(&handle, async { Ok("saved") }).await;
    assert_eq!(saved, Ok("saved"));
    assert_eq!(state.get().await, vec![1, 2, 3]);
}

#[tokio::test]
async fn failed_commit_restores_the_snapshot() {
    let state = LocalState::new(vec![1, 2]);
    let handle = state.handle();
    let update = OptimisticUpdate::new(vec![1, 2], vec![2]);

    let result: Result<(), String> = update
        .run(&handle, async { Err("offline".to_string()) })
        .await;

    assert_eq!(result, Err("offline".to_string()));
    assert_eq!(state.get().await, vec![1, 2]);
}

#[tokio::test]
async fn writes_after_the_owner_is_dropped_are_ignored() {
    let state = LocalState::new(0u32);
    let handle = state.handle();
    assert!(handle.is_attached());
    drop(state);

    assert!(!handle.is_attached());
    assert!(!handle.replace(5).await);
    assert!(!handle.update(|v| *v += 1).await);
    assert_eq!(handle.snapshot().await, None);

    let update = OptimisticUpdate::new(0u32, 1);
    let result: Result<(), ()> = update.run(&handle, async { Err(()) }).await;
    assert!(result.is_err());

    let never: LocalHandle<u32> = LocalHandle::detached();
    assert!(!never.replace(1).await);
}

#[tokio::test]
async fn bus_delivers_to_every_subscriber() {
    let bus = EventBus::new(8);
    assert_eq!(bus.publish(Topic::GoalsUpdated), 0);

    let mut a = bus.subscribe();
    let mut b = bus.clone().subscribe();
    assert_eq!(bus.publish(Topic::DreamsUpdated), 2);

    assert_eq!(a.recv().await.unwrap(), Topic::DreamsUpdated);
    assert_eq!(b.recv().await.unwrap(), Topic::DreamsUpdated);
    assert_eq!(Topic::GoalsUpdated.name(), "goals-updated");
    assert_eq!(Topic::DreamsUpdated.name(), "dreams-updated");
}
