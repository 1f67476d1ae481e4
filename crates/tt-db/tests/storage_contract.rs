//! Behavioral contract both backends must satisfy. Every case runs against
//! the file backend and the SQLite backend through the same code path.

use chrono::{DateTime, NaiveDate, Utc};
use tt_core::{Direction, Error, Field, Filter, OrderBy, Timer, VacationDay};
use tt_db::{FileStorage, SqliteStorage, Storage, vacation_map};
use uuid::Uuid;

fn with_backends(test: impl Fn(&mut dyn Storage)) {
    let dir = tempfile::tempdir().unwrap();
    let mut file = FileStorage::open(dir.path().join("storage.json")).unwrap();
    test(&mut file);

    let mut sqlite = SqliteStorage::open_in_memory().unwrap();
    test(&mut sqlite);
}

fn timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .unwrap()
        .with_timezone(&Utc)
}

fn date(raw: &str) -> NaiveDate {
    raw.parse().unwrap()
}

fn timer(project: &str, start: &str, stop: &str) -> Timer {
    Timer {
        id: Uuid::new_v4(),
        start: timestamp(start),
        stop: Some(timestamp(stop)),
        project: project.to_string(),
        task: None,
        tags: Vec::new(),
    }
}

fn running_timer(project: &str, start: &str) -> Timer {
    Timer {
        stop: None,
        ..timer(project, start, start)
    }
}

#[test]
fn saved_timers_round_trip_by_id() {
    with_backends(|storage| {
        let mut saved = timer("writing", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
        saved.task = Some("draft".to_string());
        saved.tags = vec!["deep".to_string()];
        storage.save_timer(&saved).unwrap();
        assert_eq!(storage.get_timer_by_id(saved.id).unwrap(), saved);
    });
}

#[test]
fn missing_records_are_not_found() {
    with_backends(|storage| {
        let id = Uuid::new_v4();
        assert!(matches!(storage.get_timer_by_id(id), Err(Error::NotFound)));
        assert!(matches!(storage.remove_timer(id), Err(Error::NotFound)));
        assert!(matches!(
            storage.get_timer(&Filter::default(), OrderBy::default()),
            Err(Error::NotFound)
        ));
        assert!(matches!(
            storage.vacation_day_on(date("2024-07-01")),
            Err(Error::NotFound)
        ));
        assert!(matches!(
            storage.remove_vacation_day(id),
            Err(Error::NotFound)
        ));

        let unknown = timer("w", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
        assert!(matches!(
            storage.update_timer(&unknown),
            Err(Error::NotFound)
        ));

        // the unknown id wins over any ledger conflict its interval would cause
        storage
            .save_timer(&timer("w", "2024-03-01T09:00:00Z", "2024-03-01T10:00:00Z"))
            .unwrap();
        let overlapping_unknown = timer("w", "2024-03-01T09:30:00Z", "2024-03-01T11:00:00Z");
        assert!(matches!(
            storage.update_timer(&overlapping_unknown),
            Err(Error::NotFound)
        ));
    });
}

#[test]
fn get_timers_with_empty_filter_returns_empty_list() {
    with_backends(|storage| {
        let timers = storage
            .get_timers(&Filter::default(), OrderBy::default())
            .unwrap();
        assert!(timers.is_empty());
    });
}

#[test]
fn start_stop_flow_via_latest_start_lookup() {
    with_backends(|storage| {
        storage
            .save_timer(&timer("earlier", "2024-01-14T09:00:00Z", "2024-01-14T10:00:00Z"))
            .unwrap();
        let running = running_timer("writing", "2024-01-15T09:00:00Z");
        storage.save_timer(&running).unwrap();

        let mut found = storage
            .get_timer(&Filter::default(), OrderBy::latest_start())
            .unwrap();
        assert_eq!(found.id, running.id);
        assert!(found.is_running());

        found.stop = Some(timestamp("2024-01-15T10:30:00Z"));
        storage.update_timer(&found).unwrap();
        assert!(!storage.get_timer_by_id(running.id).unwrap().is_running());
    });
}

#[test]
fn overlapping_save_is_a_conflict() {
    with_backends(|storage| {
        storage
            .save_timer(&timer("w", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .unwrap();

        let overlapping = timer("other", "2024-01-15T09:30:00Z", "2024-01-15T11:00:00Z");
        assert!(matches!(
            storage.save_timer(&overlapping),
            Err(Error::Conflict(_))
        ));

        // back-to-back intervals share only the boundary instant
        let adjacent = timer("other", "2024-01-15T10:00:00Z", "2024-01-15T11:00:00Z");
        storage.save_timer(&adjacent).unwrap();
    });
}

#[test]
fn overlapping_update_is_a_conflict() {
    with_backends(|storage| {
        storage
            .save_timer(&timer("w", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .unwrap();
        let mut second = timer("w", "2024-01-15T11:00:00Z", "2024-01-15T12:00:00Z");
        storage.save_timer(&second).unwrap();

        second.start = timestamp("2024-01-15T09:30:00Z");
        assert!(matches!(
            storage.update_timer(&second),
            Err(Error::Conflict(_))
        ));
    });
}

#[test]
fn second_running_timer_is_a_conflict() {
    with_backends(|storage| {
        storage
            .save_timer(&running_timer("w", "2024-01-15T09:00:00Z"))
            .unwrap();
        assert!(matches!(
            storage.save_timer(&running_timer("other", "2024-01-16T09:00:00Z")),
            Err(Error::Conflict(_))
        ));
    });
}

#[test]
fn updating_a_timer_against_its_own_interval_succeeds() {
    with_backends(|storage| {
        let mut saved = timer("w", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
        storage.save_timer(&saved).unwrap();

        saved.stop = Some(timestamp("2024-01-15T09:45:00Z"));
        saved.project = "renamed".to_string();
        storage.update_timer(&saved).unwrap();
        assert_eq!(storage.get_timer_by_id(saved.id).unwrap(), saved);
    });
}

#[test]
fn structurally_invalid_timers_are_rejected() {
    with_backends(|storage| {
        let inverted = timer("w", "2024-01-15T10:00:00Z", "2024-01-15T09:00:00Z");
        assert!(matches!(
            storage.save_timer(&inverted),
            Err(Error::InvalidTimer(_))
        ));

        let mut unnamed = timer("w", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
        unnamed.project = String::new();
        assert!(matches!(
            storage.save_timer(&unnamed),
            Err(Error::InvalidTimer(_))
        ));
    });
}

#[test]
fn invalid_update_leaves_the_stored_record_unchanged() {
    with_backends(|storage| {
        let saved = timer("writing", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
        storage.save_timer(&saved).unwrap();

        let mut unnamed = saved.clone();
        unnamed.project = String::new();
        assert!(matches!(
            storage.update_timer(&unnamed),
            Err(Error::InvalidTimer(_))
        ));
        assert_eq!(storage.get_timer_by_id(saved.id).unwrap(), saved);
    });
}

#[test]
fn filtered_queries_agree_with_the_in_memory_predicate() {
    with_backends(|storage| {
        let mut tagged = timer("writing", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
        tagged.tags = vec!["deep".to_string()];
        let mut tasked = timer("coding", "2024-01-16T09:00:00Z", "2024-01-16T10:00:00Z");
        tasked.task = Some("review".to_string());
        let outside = timer("coding", "2024-02-05T09:00:00Z", "2024-02-05T10:00:00Z");
        for saved in [&tagged, &tasked, &outside] {
            storage.save_timer(saved).unwrap();
        }

        let by_project: Filter = "project=writing,coding;since=2024-01-01;until=2024-01-31"
            .parse()
            .unwrap();
        let timers = storage.get_timers(&by_project, OrderBy::default()).unwrap();
        assert_eq!(timers, vec![tagged.clone(), tasked.clone()]);

        let by_tag: Filter = "tags=deep".parse().unwrap();
        let timers = storage.get_timers(&by_tag, OrderBy::default()).unwrap();
        assert_eq!(timers, vec![tagged.clone()]);

        let no_task: Filter = "task=".parse().unwrap();
        let timers = storage.get_timers(&no_task, OrderBy::default()).unwrap();
        assert_eq!(timers, vec![tagged, outside]);
    });
}

#[test]
fn results_honor_the_requested_order() {
    with_backends(|storage| {
        let beta = timer("beta", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
        let alpha = timer("alpha", "2024-01-16T09:00:00Z", "2024-01-16T10:00:00Z");
        storage.save_timer(&beta).unwrap();
        storage.save_timer(&alpha).unwrap();

        let by_start = storage
            .get_timers(&Filter::default(), OrderBy::latest_start())
            .unwrap();
        assert_eq!(by_start, vec![alpha.clone(), beta.clone()]);

        let by_project = storage
            .get_timers(
                &Filter::default(),
                OrderBy::new(Field::Project, Direction::Ascending),
            )
            .unwrap();
        assert_eq!(by_project, vec![alpha, beta]);
    });
}

#[test]
fn vacation_days_round_trip_and_sort() {
    with_backends(|storage| {
        let summer = VacationDay::new(date("2024-07-01"), false);
        let spring = VacationDay::new(date("2024-04-01"), true);
        storage.save_vacation_day(&summer).unwrap();
        storage.save_vacation_day(&spring).unwrap();

        let ascending = storage.get_vacation_days(Direction::Ascending).unwrap();
        assert_eq!(ascending, vec![spring.clone(), summer.clone()]);
        let descending = storage.get_vacation_days(Direction::Descending).unwrap();
        assert_eq!(descending, vec![summer.clone(), spring.clone()]);

        let found = storage.vacation_day_on(date("2024-04-01")).unwrap();
        assert_eq!(found, spring);

        storage.remove_vacation_day(summer.id).unwrap();
        assert!(matches!(
            storage.vacation_day_on(date("2024-07-01")),
            Err(Error::NotFound)
        ));
    });
}

#[test]
fn duplicate_vacation_date_is_a_conflict() {
    with_backends(|storage| {
        let first = VacationDay::new(date("2024-07-01"), false);
        storage.save_vacation_day(&first).unwrap();

        let duplicate = VacationDay::new(date("2024-07-01"), true);
        assert!(matches!(
            storage.save_vacation_day(&duplicate),
            Err(Error::Conflict(_))
        ));
        assert_eq!(
            storage.get_vacation_days(Direction::Ascending).unwrap(),
            vec![first]
        );
    });
}

#[test]
fn vacation_map_is_keyed_by_day() {
    with_backends(|storage| {
        let summer = VacationDay::new(date("2024-07-01"), false);
        storage.save_vacation_day(&summer).unwrap();

        let map = vacation_map(storage).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&date("2024-07-01")], summer);
    });
}

#[test]
fn removed_timers_stop_matching() {
    with_backends(|storage| {
        let saved = timer("w", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z");
        storage.save_timer(&saved).unwrap();
        storage.remove_timer(saved.id).unwrap();

        assert!(matches!(
            storage.get_timer_by_id(saved.id),
            Err(Error::NotFound)
        ));
        // the slot is free again
        storage
            .save_timer(&timer("w", "2024-01-15T09:00:00Z", "2024-01-15T10:00:00Z"))
            .unwrap();
    });
}
