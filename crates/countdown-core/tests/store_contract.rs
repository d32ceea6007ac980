//! Every CountdownStore backend must satisfy the same contract.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use countdown_core::domain::{
    BackgroundImage, CountType, CountdownId, CountdownPatch, Customization, NewCountdown,
    WorkingHours,
};
use countdown_core::impls::{InMemoryCountdownStore, JsonFileCountdownStore};
use countdown_core::ports::{Clock, CountdownStore, FixedClock};
use rstest::rstest;
use tempfile::TempDir;

#[derive(Debug, Clone, Copy)]
enum Backend {
    Memory,
    File,
}

struct Harness {
    store: Arc<dyn CountdownStore>,
    clock: FixedClock,
    _dir: Option<TempDir>,
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap()
}

fn harness(backend: Backend) -> Harness {
    let clock = FixedClock::new(start());
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    match backend {
        Backend::Memory => Harness {
            store: Arc::new(InMemoryCountdownStore::with_clock(shared)),
            clock,
            _dir: None,
        },
        Backend::File => {
            let dir = TempDir::new().unwrap();
            let store = JsonFileCountdownStore::with_clock(dir.path().join("countdowns.json"), shared);
            Harness {
                store: Arc::new(store),
                clock,
                _dir: Some(dir),
            }
        }
    }
}

fn full_input() -> NewCountdown {
    NewCountdown {
        title: "Quarter close".to_string(),
        target_date: start() + Duration::days(30),
        timezone: "America/Chicago".to_string(),
        location: Some("HQ".to_string()),
        count_type: CountType::Working,
        working_hours: Some(WorkingHours::new(
            NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            true,
        )),
        customization: Customization {
            background_color: "#101010".to_string(),
            font_size: "24px".to_string(),
            ..Customization::default()
        },
        background_images: vec![BackgroundImage {
            id: "bg-1".to_string(),
            data: "data:image/png;base64,AAAA".to_string(),
            name: "sky.png".to_string(),
        }],
        image_interval: Some(8),
    }
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::file(Backend::File)]
#[tokio::test]
async fn create_then_get_round_trips(#[case] backend: Backend) {
    let h = harness(backend);
    let input = full_input();

    let id = h.store.create(input.clone()).await.unwrap();
    let record = h.store.get(&id).await.unwrap().expect("record exists");

    assert_eq!(record.id, id);
    assert_eq!(record.created_at, start());
    assert_eq!(record.created_at, record.updated_at);
    assert_eq!(record, input.into_countdown(id, start()));
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::file(Backend::File)]
#[tokio::test]
async fn get_unknown_id_is_none(#[case] backend: Backend) {
    let h = harness(backend);
    h.store.create(full_input()).await.unwrap();

    let unknown = CountdownId::from_ulid(ulid::Ulid::new());
    assert!(h.store.get(&unknown).await.unwrap().is_none());
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::file(Backend::File)]
#[tokio::test]
async fn update_changes_only_given_fields(#[case] backend: Backend) {
    let h = harness(backend);
    let id = h.store.create(full_input()).await.unwrap();
    let before = h.store.get(&id).await.unwrap().unwrap();

    h.clock.advance(Duration::seconds(10));
    h.store
        .update(
            &id,
            CountdownPatch {
                title: Some("Quarter close (moved)".to_string()),
                target_date: Some(start() + Duration::days(31)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let after = h.store.get(&id).await.unwrap().unwrap();

    assert_eq!(after.title, "Quarter close (moved)");
    assert_eq!(after.target_date, start() + Duration::days(31));
    assert_eq!(after.timezone, before.timezone);
    assert_eq!(after.working_hours, before.working_hours);
    assert_eq!(after.customization, before.customization);
    assert_eq!(after.background_images, before.background_images);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::file(Backend::File)]
#[tokio::test]
async fn update_advances_updated_at_even_without_clock_movement(#[case] backend: Backend) {
    let h = harness(backend);
    let id = h.store.create(full_input()).await.unwrap();

    let mut previous = h.store.get(&id).await.unwrap().unwrap().updated_at;
    for _ in 0..3 {
        h.store.update(&id, CountdownPatch::default()).await.unwrap();
        let current = h.store.get(&id).await.unwrap().unwrap().updated_at;
        assert!(current > previous);
        previous = current;
    }
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::file(Backend::File)]
#[tokio::test]
async fn update_of_missing_id_is_not_found_and_creates_nothing(#[case] backend: Backend) {
    let h = harness(backend);
    let missing = CountdownId::from_ulid(ulid::Ulid::new());

    let err = h
        .store
        .update(
            &missing,
            CountdownPatch {
                title: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(h.store.get(&missing).await.unwrap().is_none());
    assert!(h.store.list_all().await.unwrap().is_empty());
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::file(Backend::File)]
#[tokio::test]
async fn delete_is_idempotent(#[case] backend: Backend) {
    let h = harness(backend);
    let id = h.store.create(full_input()).await.unwrap();

    h.store.delete(&id).await.unwrap();
    assert!(h.store.get(&id).await.unwrap().is_none());
    assert!(h
        .store
        .update(&id, CountdownPatch::default())
        .await
        .unwrap_err()
        .is_not_found());

    h.store.delete(&id).await.unwrap();
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::file(Backend::File)]
#[tokio::test]
async fn list_all_is_newest_first(#[case] backend: Backend) {
    let h = harness(backend);
    assert!(h.store.list_all().await.unwrap().is_empty());

    for title in ["first", "second", "third"] {
        let input = NewCountdown {
            title: title.to_string(),
            ..full_input()
        };
        h.store.create(input).await.unwrap();
        h.clock.advance(Duration::minutes(1));
    }

    let listed: Vec<_> = h
        .store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(listed, vec!["third", "second", "first"]);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::file(Backend::File)]
#[tokio::test]
async fn ids_are_unique(#[case] backend: Backend) {
    let h = harness(backend);
    let mut ids = std::collections::HashSet::new();
    for _ in 0..20 {
        assert!(ids.insert(h.store.create(full_input()).await.unwrap()));
    }
}
