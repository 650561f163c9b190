use chrono::NaiveDateTime;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::models::{Booking, BookingStatus, SlotStatus, User};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("time slot not found")]
    SlotNotFound,

    #[error("slot does not start later today")]
    SlotNotFutureToday,

    #[error("user already has a booking for today")]
    DuplicateDailyBooking,

    #[error("slot is no longer free")]
    SlotNotFree,

    #[error("booking not found")]
    NotFound,

    #[error("booking is not pending")]
    NotPending,

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// Submits a booking request for a slot later today.
///
/// The slot claim and the booking insert happen in one transaction, so two
/// racing requests for the same slot cannot both succeed: the conditional
/// `free -> pending` update decides the winner.
pub fn create(
    conn: &mut Connection,
    user: &User,
    room_id: &str,
    slot_id: &str,
    objective: &str,
    now: NaiveDateTime,
) -> Result<Booking, BookingError> {
    let tx = conn.transaction().map_err(anyhow::Error::from)?;

    let slot = queries::get_time_slot(&tx, slot_id)?.ok_or(BookingError::SlotNotFound)?;

    // Same-day model: a slot is bookable only while its start time is still
    // ahead of the clock. "HH:MM" strings compare correctly.
    let time_of_day = now.format("%H:%M").to_string();
    if slot.start_time <= time_of_day {
        return Err(BookingError::SlotNotFutureToday);
    }

    let today = now.date();
    if queries::count_bookings_for_date(&tx, &user.id, today)? > 0 {
        return Err(BookingError::DuplicateDailyBooking);
    }

    if !queries::claim_free_slot(&tx, slot_id)? {
        return Err(BookingError::SlotNotFree);
    }

    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        room_id: room_id.to_string(),
        slot_id: slot_id.to_string(),
        objective: objective.to_string(),
        status: BookingStatus::Pending,
        action_by: user.id.clone(),
        date: today,
    };
    queries::create_booking(&tx, &booking)?;

    tx.commit().map_err(anyhow::Error::from)?;
    Ok(booking)
}

pub fn approve(
    conn: &mut Connection,
    approver_id: &str,
    booking_id: &str,
) -> Result<Booking, BookingError> {
    decide(
        conn,
        approver_id,
        booking_id,
        BookingStatus::Approved,
        SlotStatus::Reserved,
    )
}

pub fn reject(
    conn: &mut Connection,
    approver_id: &str,
    booking_id: &str,
) -> Result<Booking, BookingError> {
    decide(
        conn,
        approver_id,
        booking_id,
        BookingStatus::Rejected,
        SlotStatus::Free,
    )
}

/// Only pending bookings may be decided; the booking row and its slot move
/// together or not at all.
fn decide(
    conn: &mut Connection,
    approver_id: &str,
    booking_id: &str,
    status: BookingStatus,
    slot_status: SlotStatus,
) -> Result<Booking, BookingError> {
    let tx = conn.transaction().map_err(anyhow::Error::from)?;

    let booking = queries::get_booking(&tx, booking_id)?.ok_or(BookingError::NotFound)?;
    if booking.status != BookingStatus::Pending {
        return Err(BookingError::NotPending);
    }

    queries::update_booking_decision(&tx, booking_id, &status, approver_id)?;
    queries::set_slot_status(&tx, &booking.slot_id, &slot_status)?;

    tx.commit().map_err(anyhow::Error::from)?;

    Ok(Booking {
        status,
        action_by: approver_id.to_string(),
        ..booking
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::Role;
    use rusqlite::params;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn seed_user(conn: &Connection, id: &str, role: Role) -> User {
        let user = User {
            id: id.to_string(),
            username: format!("user-{id}"),
            email: format!("{id}@example.edu"),
            password_hash: "x".to_string(),
            role,
        };
        queries::create_user(conn, &user).unwrap();
        user
    }

    fn seed_room(conn: &Connection, id: &str) {
        conn.execute(
            "INSERT INTO rooms (id, name, image_path) VALUES (?1, ?2, ?3)",
            params![id, format!("Room {id}"), "rooms/default.jpg"],
        )
        .unwrap();
    }

    fn seed_slot(conn: &Connection, id: &str, room_id: &str, start: &str, end: &str) {
        conn.execute(
            "INSERT INTO time_slots (id, room_id, start_time, end_time, status)
             VALUES (?1, ?2, ?3, ?4, 'free')",
            params![id, room_id, start, end],
        )
        .unwrap();
    }

    fn slot_status(conn: &Connection, id: &str) -> SlotStatus {
        queries::get_time_slot(conn, id).unwrap().unwrap().status
    }

    #[test]
    fn test_create_marks_slot_pending() {
        let mut conn = setup_db();
        let user = seed_user(&conn, "u1", Role::Student);
        seed_room(&conn, "r1");
        seed_slot(&conn, "s1", "r1", "14:00", "16:00");

        let booking = create(
            &mut conn,
            &user,
            "r1",
            "s1",
            "project meeting",
            dt("2025-06-16 10:00"),
        )
        .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.action_by, "u1");
        assert_eq!(slot_status(&conn, "s1"), SlotStatus::Pending);
    }

    #[test]
    fn test_create_rejects_slot_already_started() {
        let mut conn = setup_db();
        let user = seed_user(&conn, "u1", Role::Student);
        seed_room(&conn, "r1");
        seed_slot(&conn, "s1", "r1", "09:00", "11:00");

        let result = create(
            &mut conn,
            &user,
            "r1",
            "s1",
            "late meeting",
            dt("2025-06-16 10:00"),
        );

        assert!(matches!(result, Err(BookingError::SlotNotFutureToday)));
        assert_eq!(slot_status(&conn, "s1"), SlotStatus::Free);
    }

    #[test]
    fn test_create_rejects_start_equal_to_now() {
        let mut conn = setup_db();
        let user = seed_user(&conn, "u1", Role::Student);
        seed_room(&conn, "r1");
        seed_slot(&conn, "s1", "r1", "10:00", "12:00");

        let result = create(
            &mut conn,
            &user,
            "r1",
            "s1",
            "meeting",
            dt("2025-06-16 10:00"),
        );

        assert!(matches!(result, Err(BookingError::SlotNotFutureToday)));
    }

    #[test]
    fn test_create_missing_slot() {
        let mut conn = setup_db();
        let user = seed_user(&conn, "u1", Role::Student);

        let result = create(
            &mut conn,
            &user,
            "r1",
            "nope",
            "meeting",
            dt("2025-06-16 10:00"),
        );

        assert!(matches!(result, Err(BookingError::SlotNotFound)));
    }

    #[test]
    fn test_one_booking_per_day() {
        let mut conn = setup_db();
        let user = seed_user(&conn, "u1", Role::Student);
        seed_room(&conn, "r1");
        seed_slot(&conn, "s1", "r1", "14:00", "16:00");
        seed_slot(&conn, "s2", "r1", "16:00", "18:00");

        create(&mut conn, &user, "r1", "s1", "first", dt("2025-06-16 10:00")).unwrap();
        let second = create(&mut conn, &user, "r1", "s2", "second", dt("2025-06-16 10:30"));

        assert!(matches!(second, Err(BookingError::DuplicateDailyBooking)));
        assert_eq!(queries::pending_for_user(&conn, "u1").unwrap().len(), 1);
        // The losing request must not have touched the other slot.
        assert_eq!(slot_status(&conn, "s2"), SlotStatus::Free);
    }

    #[test]
    fn test_rejected_booking_still_blocks_same_day() {
        let mut conn = setup_db();
        let user = seed_user(&conn, "u1", Role::Student);
        let approver = seed_user(&conn, "a1", Role::Lecturer);
        seed_room(&conn, "r1");
        seed_slot(&conn, "s1", "r1", "14:00", "16:00");
        seed_slot(&conn, "s2", "r1", "16:00", "18:00");

        let booking =
            create(&mut conn, &user, "r1", "s1", "first", dt("2025-06-16 10:00")).unwrap();
        reject(&mut conn, &approver.id, &booking.id).unwrap();

        let retry = create(&mut conn, &user, "r1", "s2", "retry", dt("2025-06-16 11:00"));
        assert!(matches!(retry, Err(BookingError::DuplicateDailyBooking)));
    }

    #[test]
    fn test_two_users_racing_for_one_slot() {
        let mut conn = setup_db();
        let alice = seed_user(&conn, "u1", Role::Student);
        let bob = seed_user(&conn, "u2", Role::Student);
        seed_room(&conn, "r1");
        seed_slot(&conn, "s1", "r1", "14:00", "16:00");

        create(&mut conn, &alice, "r1", "s1", "standup", dt("2025-06-16 10:00")).unwrap();
        let loser = create(&mut conn, &bob, "r1", "s1", "standup", dt("2025-06-16 10:00"));

        assert!(matches!(loser, Err(BookingError::SlotNotFree)));
        assert_eq!(queries::pending_all(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_approve_reserves_slot() {
        let mut conn = setup_db();
        let user = seed_user(&conn, "u1", Role::Student);
        let approver = seed_user(&conn, "a1", Role::Lecturer);
        seed_room(&conn, "r1");
        seed_slot(&conn, "s1", "r1", "14:00", "16:00");

        let booking =
            create(&mut conn, &user, "r1", "s1", "seminar", dt("2025-06-16 10:00")).unwrap();
        let approved = approve(&mut conn, &approver.id, &booking.id).unwrap();

        assert_eq!(approved.status, BookingStatus::Approved);
        assert_eq!(approved.action_by, "a1");
        assert_eq!(slot_status(&conn, "s1"), SlotStatus::Reserved);
        assert!(queries::pending_all(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_reject_frees_slot() {
        let mut conn = setup_db();
        let user = seed_user(&conn, "u1", Role::Student);
        let approver = seed_user(&conn, "a1", Role::Lecturer);
        seed_room(&conn, "r1");
        seed_slot(&conn, "s1", "r1", "14:00", "16:00");

        let booking =
            create(&mut conn, &user, "r1", "s1", "seminar", dt("2025-06-16 10:00")).unwrap();
        let rejected = reject(&mut conn, &approver.id, &booking.id).unwrap();

        assert_eq!(rejected.status, BookingStatus::Rejected);
        assert_eq!(slot_status(&conn, "s1"), SlotStatus::Free);
    }

    #[test]
    fn test_decide_requires_pending() {
        let mut conn = setup_db();
        let user = seed_user(&conn, "u1", Role::Student);
        let approver = seed_user(&conn, "a1", Role::Lecturer);
        seed_room(&conn, "r1");
        seed_slot(&conn, "s1", "r1", "14:00", "16:00");

        let booking =
            create(&mut conn, &user, "r1", "s1", "seminar", dt("2025-06-16 10:00")).unwrap();
        approve(&mut conn, &approver.id, &booking.id).unwrap();

        let again = approve(&mut conn, &approver.id, &booking.id);
        assert!(matches!(again, Err(BookingError::NotPending)));

        let flip = reject(&mut conn, &approver.id, &booking.id);
        assert!(matches!(flip, Err(BookingError::NotPending)));
        // The slot keeps the approved state.
        assert_eq!(slot_status(&conn, "s1"), SlotStatus::Reserved);
    }

    #[test]
    fn test_decide_missing_booking() {
        let mut conn = setup_db();
        seed_user(&conn, "a1", Role::Lecturer);

        let result = approve(&mut conn, "a1", "no-such-booking");
        assert!(matches!(result, Err(BookingError::NotFound)));
    }

    #[test]
    fn test_create_then_listing_shows_one_entry() {
        let mut conn = setup_db();
        let user = seed_user(&conn, "u1", Role::Student);
        seed_room(&conn, "r1");
        seed_slot(&conn, "s1", "r1", "14:00", "16:00");

        create(&mut conn, &user, "r1", "s1", "meeting", dt("2025-06-16 10:00")).unwrap();

        let own = queries::pending_for_user(&conn, "u1").unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].room_id, "r1");
        assert_eq!(own[0].slot_id, "s1");
        assert_eq!(own[0].status, BookingStatus::Pending);
        assert_eq!(own[0].room_name, "Room r1");
    }
}
