//! Roster calendar integration tests over the SQLite store.

use anyhow::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

use clinic_core::calendar::{weeks_in_month, RosterCalendar, RosterError};
use clinic_core::models::{AssignmentDraft, NewAssignment, Role, ShiftType, ValidationError};
use clinic_core::store::Database;

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Database with two physicians; returns their ids.
fn setup_db() -> (Database, i64, i64) {
    let db = Database::open_in_memory().unwrap();
    let anne = db
        .create_user("amoreau", "Anne", "Moreau", Role::Physician, "pw")
        .unwrap();
    let jean = db
        .create_user("jpetit", "Jean", "Petit", Role::Physician, "pw")
        .unwrap();
    (db, anne.id, jean.id)
}

fn make_shift(
    db: &Database,
    physician_id: i64,
    starts: NaiveDateTime,
    ends: NaiveDateTime,
    shift_type: ShiftType,
) -> i64 {
    db.insert_assignment(&NewAssignment {
        starts_at: starts,
        ends_at: ends,
        physician_id,
        shift_type,
    })
    .unwrap()
    .id
}

#[test]
fn test_open_shows_the_week_containing_today() {
    let (db, anne, _) = setup_db();
    make_shift(&db, anne, dt(2024, 3, 5, 8), dt(2024, 3, 5, 18), ShiftType::Day);

    let roster = RosterCalendar::open(&db, day(2024, 3, 5)).unwrap();
    assert_eq!(roster.cursor().year(), 2024);
    assert_eq!(roster.cursor().month(), 3);
    assert_eq!(roster.cursor().week(), 2);

    let buckets = roster.day_buckets();
    assert!(buckets[0].date <= day(2024, 3, 5));
    assert!(buckets[6].date >= day(2024, 3, 5));

    let tuesday = &buckets[1];
    assert_eq!(tuesday.date, day(2024, 3, 5));
    assert_eq!(tuesday.assignments.len(), 1);
}

#[test]
fn test_weeks_at_the_month_edge_show_neighbouring_days() {
    let (db, _, _) = setup_db();
    let roster = RosterCalendar::open(&db, day(2024, 3, 1)).unwrap();

    // Week 1 of March 2024 starts in February
    let buckets = roster.day_buckets();
    assert_eq!(buckets[0].date, day(2024, 2, 26));
    assert!(!buckets[0].in_month);
    assert!(buckets[4].in_month); // March 1st, a Friday
}

#[test]
fn test_navigating_across_months_loads_the_right_rows() {
    let (db, anne, jean) = setup_db();
    make_shift(&db, anne, dt(2024, 3, 5, 8), dt(2024, 3, 5, 18), ShiftType::Day);
    make_shift(&db, jean, dt(2024, 2, 27, 20), dt(2024, 2, 28, 8), ShiftType::Night);

    let mut roster = RosterCalendar::open(&db, day(2024, 3, 5)).unwrap();
    assert_eq!(roster.assignments().len(), 1);
    assert_eq!(roster.assignments()[0].physician_id, anne);

    // Two steps back from week 2 of March lands in February
    roster.previous_week(&db).unwrap();
    roster.previous_week(&db).unwrap();
    assert_eq!(roster.cursor().month(), 2);
    assert_eq!(roster.assignments().len(), 1);
    assert_eq!(roster.assignments()[0].physician_id, jean);

    // And forward again
    roster.next_week(&db).unwrap();
    roster.next_week(&db).unwrap();
    assert_eq!(roster.cursor().month(), 3);
    assert_eq!(roster.assignments()[0].physician_id, anne);
}

#[test]
fn test_year_rollover_both_directions() {
    let (db, anne, _) = setup_db();
    make_shift(&db, anne, dt(2023, 12, 28, 8), dt(2023, 12, 28, 18), ShiftType::Day);

    let mut roster = RosterCalendar::open(&db, day(2024, 1, 1)).unwrap();
    assert!(roster.assignments().is_empty());

    roster.previous_week(&db).unwrap();
    assert_eq!(roster.cursor().year(), 2023);
    assert_eq!(roster.cursor().month(), 12);
    assert_eq!(roster.cursor().week(), weeks_in_month(2023, 12));
    assert_eq!(roster.assignments().len(), 1);

    roster.next_week(&db).unwrap();
    assert_eq!(roster.cursor().year(), 2024);
    assert_eq!(roster.cursor().week(), 1);
    assert!(roster.assignments().is_empty());
}

#[test]
fn test_jump_to_today_from_far_away() {
    let (db, anne, _) = setup_db();
    make_shift(&db, anne, dt(2024, 3, 5, 8), dt(2024, 3, 5, 18), ShiftType::Day);

    let mut roster = RosterCalendar::open(&db, day(2020, 6, 15)).unwrap();
    assert!(roster.assignments().is_empty());

    roster.jump_to_today(&db, day(2024, 3, 5)).unwrap();
    assert_eq!(roster.cursor().month(), 3);
    assert_eq!(roster.assignments().len(), 1);
}

#[test]
fn test_set_month_and_year_reset_the_week() {
    let (db, _, _) = setup_db();
    let mut roster = RosterCalendar::open(&db, day(2024, 3, 20)).unwrap();
    assert_eq!(roster.cursor().week(), 4);

    roster.set_month(&db, 6).unwrap();
    assert_eq!(roster.cursor().month(), 6);
    assert_eq!(roster.cursor().week(), 1);

    roster.set_year(&db, 2025).unwrap();
    assert_eq!(roster.cursor().year(), 2025);
    assert_eq!(roster.cursor().week(), 1);
}

#[test]
fn test_create_update_delete_through_the_engine() -> Result<()> {
    let (db, anne, jean) = setup_db();
    let mut roster = RosterCalendar::open(&db, day(2024, 3, 5))?;

    let stored = roster.create_assignment(
        &db,
        &AssignmentDraft {
            starts_at: Some(dt(2024, 3, 5, 8)),
            ends_at: Some(dt(2024, 3, 5, 18)),
            physician_id: Some(anne),
            shift_type: Some(ShiftType::Day),
        },
    )?;
    assert_eq!(roster.assignments().len(), 1);
    assert!(db.get_assignment(stored.id)?.is_some());

    // Reassign to the other physician, keeping the interval
    let updated = roster.update_assignment(
        &db,
        stored.id,
        &AssignmentDraft {
            physician_id: Some(jean),
            shift_type: Some(ShiftType::Night),
            ..Default::default()
        },
    )?;
    assert_eq!(updated.physician_id, jean);
    assert_eq!(updated.starts_at, dt(2024, 3, 5, 8));

    let persisted = db.get_assignment(stored.id)?.unwrap();
    assert_eq!(persisted.shift_type, ShiftType::Night);

    roster.delete_assignment(&db, stored.id)?;
    assert!(roster.assignments().is_empty());
    assert!(db.get_assignment(stored.id)?.is_none());
    Ok(())
}

#[test]
fn test_invalid_draft_never_reaches_the_store() {
    let (db, anne, _) = setup_db();
    let mut roster = RosterCalendar::open(&db, day(2024, 3, 5)).unwrap();

    let err = roster
        .create_assignment(
            &db,
            &AssignmentDraft {
                starts_at: Some(dt(2024, 3, 5, 18)),
                ends_at: Some(dt(2024, 3, 5, 8)),
                physician_id: Some(anne),
                shift_type: Some(ShiftType::Day),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RosterError::Validation(ValidationError::EndNotAfterStart)
    ));
    assert!(db.list_assignments_in_month(2024, 3).unwrap().is_empty());
}

#[test]
fn test_update_moving_a_shift_out_of_the_month_drops_it_from_the_cache() {
    let (db, anne, _) = setup_db();
    let mut roster = RosterCalendar::open(&db, day(2024, 3, 5)).unwrap();

    let stored = roster
        .create_assignment(
            &db,
            &AssignmentDraft {
                starts_at: Some(dt(2024, 3, 5, 8)),
                ends_at: Some(dt(2024, 3, 5, 18)),
                physician_id: Some(anne),
                shift_type: Some(ShiftType::Day),
            },
        )
        .unwrap();

    roster
        .update_assignment(
            &db,
            stored.id,
            &AssignmentDraft {
                starts_at: Some(dt(2024, 4, 2, 8)),
                ends_at: Some(dt(2024, 4, 2, 18)),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(roster.assignments().is_empty());

    // It reappears when the calendar shows April
    roster.set_month(&db, 4).unwrap();
    assert_eq!(roster.assignments().len(), 1);
}

#[test]
fn test_midnight_spanning_night_shift_buckets_under_its_start() {
    let (db, anne, _) = setup_db();
    make_shift(&db, anne, dt(2024, 3, 5, 20), dt(2024, 3, 6, 8), ShiftType::Night);

    let roster = RosterCalendar::open(&db, day(2024, 3, 5)).unwrap();
    let buckets = roster.day_buckets();

    let total: usize = buckets.iter().map(|b| b.assignments.len()).sum();
    assert_eq!(total, 1);
    assert_eq!(buckets[1].date, day(2024, 3, 5));
    assert_eq!(buckets[1].assignments.len(), 1);
    assert!(buckets[2].assignments.is_empty());
}

#[test]
fn test_month_listing_is_filtered_server_side() {
    let (db, anne, _) = setup_db();
    make_shift(&db, anne, dt(2024, 2, 29, 8), dt(2024, 2, 29, 18), ShiftType::Day);
    make_shift(&db, anne, dt(2024, 3, 1, 8), dt(2024, 3, 1, 18), ShiftType::Day);
    make_shift(&db, anne, dt(2024, 3, 31, 20), dt(2024, 4, 1, 8), ShiftType::Night);
    make_shift(&db, anne, dt(2024, 4, 1, 8), dt(2024, 4, 1, 18), ShiftType::Day);

    let march = db.list_assignments_in_month(2024, 3).unwrap();
    assert_eq!(march.len(), 2);
    assert!(march.iter().all(|a| a.starts_at.date().month() == 3));

    // December bounds roll into the next year
    make_shift(&db, anne, dt(2024, 12, 31, 20), dt(2025, 1, 1, 8), ShiftType::Night);
    let december = db.list_assignments_in_month(2024, 12).unwrap();
    assert_eq!(december.len(), 1);
}
