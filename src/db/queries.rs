use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Booking, BookingRequest, BookingStatus, Role, Room, Session, SlotStatus, TimeSlot, User,
};

// ── Users ──

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, username, email, password_hash, role)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.id,
            user.username,
            user.email,
            user.password_hash,
            user.role.as_str(),
        ],
    )?;
    Ok(())
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, username, email, password_hash, role FROM users WHERE id = ?1",
        params![id],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Exact, case-sensitive match on the stored email.
pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, username, email, password_hash, role FROM users WHERE email = ?1",
        params![email],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_user_row(row: &rusqlite::Row) -> anyhow::Result<User> {
    let id: String = row.get(0)?;
    let username: String = row.get(1)?;
    let email: String = row.get(2)?;
    let password_hash: String = row.get(3)?;
    let role_str: String = row.get(4)?;

    let role = Role::parse(&role_str)
        .ok_or_else(|| anyhow::anyhow!("unknown user role in storage: {role_str}"))?;

    Ok(User {
        id,
        username,
        email,
        password_hash,
        role,
    })
}

// ── Sessions ──

pub fn create_session(conn: &Connection, session: &Session) -> anyhow::Result<()> {
    let created_at = session.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let expires_at = session.expires_at.format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
        params![session.id, session.user_id, created_at, expires_at],
    )?;
    Ok(())
}

/// Returns the session only while it is unexpired; expired rows are invisible
/// to lookups and removed later by [`expire_old_sessions`].
pub fn get_session(conn: &Connection, id: &str) -> anyhow::Result<Option<Session>> {
    let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();

    let result = conn.query_row(
        "SELECT id, user_id, created_at, expires_at FROM sessions
         WHERE id = ?1 AND expires_at > ?2",
        params![id, now],
        |row| {
            let id: String = row.get(0)?;
            let user_id: String = row.get(1)?;
            let created_at_str: String = row.get(2)?;
            let expires_at_str: String = row.get(3)?;
            Ok((id, user_id, created_at_str, expires_at_str))
        },
    );

    match result {
        Ok((id, user_id, created_at_str, expires_at_str)) => {
            let created_at =
                NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
                    .unwrap_or_else(|_| Utc::now().naive_utc());
            let expires_at =
                NaiveDateTime::parse_from_str(&expires_at_str, "%Y-%m-%d %H:%M:%S")
                    .unwrap_or_else(|_| Utc::now().naive_utc());

            Ok(Some(Session {
                id,
                user_id,
                created_at,
                expires_at,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_session(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn expire_old_sessions(conn: &Connection) -> anyhow::Result<usize> {
    let now = Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string();
    let count = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;
    Ok(count)
}

// ── Rooms & Time Slots ──

pub fn list_rooms(conn: &Connection) -> anyhow::Result<Vec<Room>> {
    let mut stmt = conn.prepare("SELECT id, name, image_path FROM rooms ORDER BY name ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Room {
            id: row.get(0)?,
            name: row.get(1)?,
            image_path: row.get(2)?,
        })
    })?;

    let mut rooms = vec![];
    for row in rows {
        rooms.push(row?);
    }
    Ok(rooms)
}

pub fn get_room(conn: &Connection, id: &str) -> anyhow::Result<Option<Room>> {
    let result = conn.query_row(
        "SELECT id, name, image_path FROM rooms WHERE id = ?1",
        params![id],
        |row| {
            Ok(Room {
                id: row.get(0)?,
                name: row.get(1)?,
                image_path: row.get(2)?,
            })
        },
    );

    match result {
        Ok(room) => Ok(Some(room)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_time_slots(conn: &Connection) -> anyhow::Result<Vec<TimeSlot>> {
    let mut stmt = conn.prepare(
        "SELECT id, room_id, start_time, end_time, status FROM time_slots
         ORDER BY start_time ASC",
    )?;
    let rows = stmt.query_map([], |row| parse_slot_row(row))?;

    let mut slots = vec![];
    for row in rows {
        slots.push(row?);
    }
    Ok(slots)
}

pub fn get_time_slot(conn: &Connection, id: &str) -> anyhow::Result<Option<TimeSlot>> {
    let result = conn.query_row(
        "SELECT id, room_id, start_time, end_time, status FROM time_slots WHERE id = ?1",
        params![id],
        |row| parse_slot_row(row),
    );

    match result {
        Ok(slot) => Ok(Some(slot)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Atomic claim of a free slot. Returns false when the slot was already
/// pending or reserved, which is how racing bookings lose.
pub fn claim_free_slot(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE time_slots SET status = 'pending' WHERE id = ?1 AND status = 'free'",
        params![id],
    )?;
    Ok(count > 0)
}

pub fn set_slot_status(conn: &Connection, id: &str, status: &SlotStatus) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE time_slots SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

fn parse_slot_row(row: &rusqlite::Row) -> rusqlite::Result<TimeSlot> {
    let status_str: String = row.get(4)?;
    Ok(TimeSlot {
        id: row.get(0)?,
        room_id: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        status: SlotStatus::from_str(&status_str),
    })
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let date = booking.date.format("%Y-%m-%d").to_string();

    conn.execute(
        "INSERT INTO bookings (id, user_id, room_id, slot_id, objective, status, action_by, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            booking.id,
            booking.user_id,
            booking.room_id,
            booking.slot_id,
            booking.objective,
            booking.status.as_str(),
            booking.action_by,
            date,
        ],
    )?;
    Ok(())
}

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, user_id, room_id, slot_id, objective, status, action_by, date
         FROM bookings WHERE id = ?1",
        params![id],
        |row| parse_booking_row(row),
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Bookings a user holds for a given date, in any status. A rejected booking
/// still counts against the one-per-day rule.
pub fn count_bookings_for_date(
    conn: &Connection,
    user_id: &str,
    date: NaiveDate,
) -> anyhow::Result<i64> {
    let date = date.format("%Y-%m-%d").to_string();
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE user_id = ?1 AND date = ?2",
        params![user_id, date],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn update_booking_decision(
    conn: &Connection,
    id: &str,
    status: &BookingStatus,
    action_by: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, action_by = ?2 WHERE id = ?3",
        params![status.as_str(), action_by, id],
    )?;
    Ok(count > 0)
}

pub fn pending_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<BookingRequest>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.user_id, b.room_id, r.name, r.image_path,
                b.slot_id, s.start_time, s.end_time, b.objective, b.status, b.date
         FROM bookings b
         JOIN rooms r ON b.room_id = r.id
         JOIN time_slots s ON b.slot_id = s.id
         WHERE b.status = 'pending' AND b.user_id = ?1
         ORDER BY b.date ASC, s.start_time ASC",
    )?;
    let rows = stmt.query_map(params![user_id], |row| parse_request_row(row))?;

    let mut requests = vec![];
    for row in rows {
        requests.push(row?);
    }
    Ok(requests)
}

/// All pending bookings system-wide. Any approver may act on any of them;
/// there is no per-room ownership scoping.
pub fn pending_all(conn: &Connection) -> anyhow::Result<Vec<BookingRequest>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.user_id, b.room_id, r.name, r.image_path,
                b.slot_id, s.start_time, s.end_time, b.objective, b.status, b.date
         FROM bookings b
         JOIN rooms r ON b.room_id = r.id
         JOIN time_slots s ON b.slot_id = s.id
         WHERE b.status = 'pending'
         ORDER BY b.date ASC, s.start_time ASC",
    )?;
    let rows = stmt.query_map([], |row| parse_request_row(row))?;

    let mut requests = vec![];
    for row in rows {
        requests.push(row?);
    }
    Ok(requests)
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let status_str: String = row.get(5)?;
    let date_str: String = row.get(7)?;

    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        room_id: row.get(2)?,
        slot_id: row.get(3)?,
        objective: row.get(4)?,
        status: BookingStatus::from_str(&status_str),
        action_by: row.get(6)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive()),
    })
}

fn parse_request_row(row: &rusqlite::Row) -> rusqlite::Result<BookingRequest> {
    let status_str: String = row.get(9)?;
    let date_str: String = row.get(10)?;

    Ok(BookingRequest {
        id: row.get(0)?,
        user_id: row.get(1)?,
        room_id: row.get(2)?,
        room_name: row.get(3)?,
        image_path: row.get(4)?,
        slot_id: row.get(5)?,
        start_time: row.get(6)?,
        end_time: row.get(7)?,
        objective: row.get(8)?,
        status: BookingStatus::from_str(&status_str),
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive()),
    })
}
