//! Integration tests for durable persistence: seeding, restart round-trips,
//! and corrupt-storage recovery.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use futsal_log::model::activity::{
    ActivityDraft, ActivityPatch, Kpt, MatchResult, MatchScore, PersonalStats, VideoCommentDraft,
};
use futsal_log::model::activity_type::{ActivityTypeDraft, IconName, RecordType};
use futsal_log::storage::activity_store::{ActivityStore, ACTIVITIES_KEY};
use futsal_log::storage::kv::KvStore;
use futsal_log::storage::type_registry::{ActivityTypeRegistry, CUSTOM_TYPES_KEY};

fn open_kv(path: &PathBuf) -> Arc<Mutex<KvStore>> {
    Arc::new(Mutex::new(KvStore::open(path).expect("open kv store")))
}

fn training_draft(title: &str, date: &str) -> ActivityDraft {
    ActivityDraft {
        title: title.to_string(),
        date: date.to_string(),
        activity_type: "training".to_string(),
        effort_score: Some(3),
        ..Default::default()
    }
}

#[test]
fn test_restart_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("futsal-log.db");

    let before = {
        let kv = open_kv(&db_path);
        let store = ActivityStore::new(Arc::clone(&kv));

        let mut training = training_draft("Tuesday session", "2026-01-06");
        training.kpt = Some(Kpt {
            keep: "press after loss".to_string(),
            problem: "slow restarts".to_string(),
            try_next: "one-touch wall passes".to_string(),
        });
        let training = store.create(training).unwrap();
        store
            .add_comment(
                &training.id,
                VideoCommentDraft {
                    timestamp: 95.0,
                    content: "good angle here".to_string(),
                    author_id: "me".to_string(),
                    author_name: "Me".to_string(),
                    mentions: Vec::new(),
                },
            )
            .unwrap();

        let match_draft = ActivityDraft {
            title: "Friday league".to_string(),
            date: "2026-01-09".to_string(),
            activity_type: "match".to_string(),
            result: Some(MatchResult::Win),
            score: Some(MatchScore { team: 5, opponent: 3 }),
            personal_stats: Some(PersonalStats { goals: 2, assists: 1 }),
            ..Default::default()
        };
        store.create(match_draft).unwrap();

        store.list()
        // store and kv dropped here: simulated process exit
    };

    let kv = open_kv(&db_path);
    let reopened = ActivityStore::new(kv);
    assert_eq!(reopened.list(), before);
}

#[test]
fn test_first_run_seeds_and_second_open_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("futsal-log.db");

    {
        let kv = open_kv(&db_path);
        let store = ActivityStore::new(Arc::clone(&kv));
        let registry = ActivityTypeRegistry::new(Arc::clone(&kv));

        assert!(store.list().is_empty());
        assert_eq!(registry.list().len(), 6);

        // Both seeds were persisted immediately
        let backend = kv.lock().unwrap();
        assert!(backend.get(ACTIVITIES_KEY).unwrap().is_some());
        assert!(backend.get(CUSTOM_TYPES_KEY).unwrap().is_some());
    }

    let kv = open_kv(&db_path);
    let store = ActivityStore::new(Arc::clone(&kv));
    let registry = ActivityTypeRegistry::new(Arc::clone(&kv));
    assert!(store.list().is_empty());

    let ids: Vec<String> = registry.list().into_iter().map(|t| t.id).collect();
    assert_eq!(
        ids,
        ["training", "match", "plab", "other", "teamkakao", "lesson"]
    );
}

#[test]
fn test_corrupt_activities_document_recovers_to_seed() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("futsal-log.db");

    {
        let kv = open_kv(&db_path);
        let store = ActivityStore::new(Arc::clone(&kv));
        store.create(training_draft("Doomed", "2026-01-06")).unwrap();
        kv.lock()
            .unwrap()
            .set(ACTIVITIES_KEY, "{{{ definitely not json")
            .unwrap();
    }

    let kv = open_kv(&db_path);
    let store = ActivityStore::new(Arc::clone(&kv));
    assert!(store.list().is_empty());

    // The recovered seed was written back over the corrupt document
    let json = kv.lock().unwrap().get(ACTIVITIES_KEY).unwrap().unwrap();
    assert_eq!(json, "[]");

    // The store stays fully usable afterwards
    let created = store.create(training_draft("Fresh start", "2026-01-13")).unwrap();
    assert_eq!(store.list(), vec![created]);
}

#[test]
fn test_mutations_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("futsal-log.db");

    let (kept_id, updated_title) = {
        let kv = open_kv(&db_path);
        let store = ActivityStore::new(kv);

        let kept = store.create(training_draft("Keep me", "2026-01-06")).unwrap();
        let doomed = store.create(training_draft("Delete me", "2026-01-07")).unwrap();

        let updated = store
            .update(
                &kept.id,
                ActivityPatch {
                    title: Some("Keep me (renamed)".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        store.delete(&doomed.id).unwrap();

        (kept.id, updated.title)
    };

    let kv = open_kv(&db_path);
    let store = ActivityStore::new(kv);
    let list = store.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, kept_id);
    assert_eq!(list[0].title, updated_title);
}

#[test]
fn test_registry_changes_survive_restart_independently_of_activities() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("futsal-log.db");

    let custom_id = {
        let kv = open_kv(&db_path);
        let store = ActivityStore::new(Arc::clone(&kv));
        let registry = ActivityTypeRegistry::new(Arc::clone(&kv));

        let custom = registry
            .create(ActivityTypeDraft {
                label: "Beach Futsal".to_string(),
                icon_name: IconName::Ball,
                border_color: "#A7F3D0".to_string(),
                bg_color: "#F0FDF4".to_string(),
                enabled: true,
                record_type: RecordType::Match,
            })
            .unwrap();

        // An activity referencing the new type, stored under its own key
        let mut draft = training_draft("Beach session", "2026-01-10");
        draft.activity_type = custom.id.clone();
        store.create(draft).unwrap();

        custom.id
    };

    let kv = open_kv(&db_path);
    let store = ActivityStore::new(Arc::clone(&kv));
    let registry = ActivityTypeRegistry::new(Arc::clone(&kv));

    assert!(registry.get_by_id(&custom_id).is_some());
    assert_eq!(store.list().len(), 1);

    // Deleting the type does not cascade to the activity referencing it
    registry.delete(&custom_id).unwrap();
    assert_eq!(store.list().len(), 1);
    assert_eq!(store.list()[0].activity_type, custom_id);
}
