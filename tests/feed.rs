//! Combine-latest feed over the task and preference streams.

use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel;

use taskprefs::core::{SortOrder, Task};
use taskprefs::repo::PrefsRepository;
use taskprefs::store::PrefStore;
use taskprefs::view::UiFeed;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn task(id: u64, completed: bool, deadline_ms: u64, priority: u8) -> Task {
    Task {
        id,
        title: format!("task {id}"),
        completed,
        deadline_ms,
        priority,
    }
}

fn ids(tasks: &[Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.id).collect()
}

fn open_repo(dir: &tempfile::TempDir) -> (Arc<PrefStore>, PrefsRepository) {
    let store = Arc::new(PrefStore::open(dir.path().join("prefs.toml"), None).expect("open"));
    let repo = PrefsRepository::new(Arc::clone(&store));
    (store, repo)
}

#[test]
fn first_model_appears_once_both_sources_have_emitted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (store, _repo) = open_repo(&dir);

    let (tasks_tx, tasks_rx) = channel::bounded::<Vec<Task>>(16);
    let feed = UiFeed::spawn(tasks_rx, store.subscribe().expect("subscribe"));
    let sub = feed.subscribe().expect("subscribe to feed");

    // The preference seed alone is not enough; the task list is missing.
    assert!(sub.recv_timeout(Duration::from_millis(200)).is_err());

    tasks_tx
        .send(vec![task(1, false, 10, 2), task(2, true, 20, 1)])
        .expect("send tasks");

    let model = sub.recv_timeout(RECV_TIMEOUT).expect("first model");
    // Defaults: completed tasks hidden, no ordering.
    assert_eq!(ids(&model.tasks), vec![1]);
    assert_eq!(model.sort_order, SortOrder::Unspecified);
}

#[test]
fn preference_commit_reprojects_the_latest_task_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (store, repo) = open_repo(&dir);

    let (tasks_tx, tasks_rx) = channel::bounded::<Vec<Task>>(16);
    let feed = UiFeed::spawn(tasks_rx, store.subscribe().expect("subscribe"));
    let sub = feed.subscribe().expect("subscribe to feed");

    tasks_tx
        .send(vec![task(1, false, 10, 2), task(2, true, 20, 1)])
        .expect("send tasks");
    let first = sub.recv_timeout(RECV_TIMEOUT).expect("first model");
    assert_eq!(ids(&first.tasks), vec![1]);

    repo.set_show_completed(true).expect("show completed");
    let second = sub.recv_timeout(RECV_TIMEOUT).expect("second model");
    assert_eq!(ids(&second.tasks), vec![1, 2]);
    assert!(second.show_completed);
}

#[test]
fn task_emission_pairs_with_the_latest_preferences() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (store, repo) = open_repo(&dir);

    repo.enable_sort_by_deadline(true).expect("sort by deadline");

    let (tasks_tx, tasks_rx) = channel::bounded::<Vec<Task>>(16);
    let feed = UiFeed::spawn(tasks_rx, store.subscribe().expect("subscribe"));
    let sub = feed.subscribe().expect("subscribe to feed");

    tasks_tx
        .send(vec![task(1, false, 10, 1), task(2, false, 30, 1)])
        .expect("send tasks");

    let model = sub.recv_timeout(RECV_TIMEOUT).expect("model");
    assert_eq!(model.sort_order, SortOrder::ByDeadline);
    assert_eq!(ids(&model.tasks), vec![2, 1]);
}

#[test]
fn end_to_end_derivation_matches_the_documented_example() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (store, repo) = open_repo(&dir);

    repo.enable_sort_by_deadline(true).expect("deadline on");
    repo.enable_sort_by_priority(true).expect("priority on");

    let (tasks_tx, tasks_rx) = channel::bounded::<Vec<Task>>(16);
    let feed = UiFeed::spawn(tasks_rx, store.subscribe().expect("subscribe"));
    let sub = feed.subscribe().expect("subscribe to feed");

    tasks_tx
        .send(vec![
            task(1, false, 10, 2),
            task(2, true, 20, 1),
            task(3, false, 20, 1),
        ])
        .expect("send tasks");

    let model = sub.recv_timeout(RECV_TIMEOUT).expect("model");
    assert_eq!(model.sort_order, SortOrder::ByDeadlineAndPriority);
    assert_eq!(ids(&model.tasks), vec![3, 1]);
}

#[test]
fn feed_ends_after_both_sources_disconnect() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (store, repo) = open_repo(&dir);

    let (tasks_tx, tasks_rx) = channel::bounded::<Vec<Task>>(16);
    let feed = UiFeed::spawn(tasks_rx, store.subscribe().expect("subscribe"));
    let sub = feed.subscribe().expect("subscribe to feed");

    tasks_tx.send(vec![task(1, false, 10, 1)]).expect("send tasks");
    sub.recv_timeout(RECV_TIMEOUT).expect("first model");

    drop(tasks_tx);
    drop(repo);
    drop(store);

    feed.join();
    assert!(sub.try_recv().is_err());
}
