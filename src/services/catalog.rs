use std::collections::HashMap;

use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Room, TimeSlot};

#[derive(Debug, Clone)]
pub struct RoomWithSlots {
    pub room: Room,
    pub slots: Vec<TimeSlot>,
}

/// Rooms with their slots attached, grouped in memory from two plain reads.
pub fn rooms_with_slots(conn: &Connection) -> anyhow::Result<Vec<RoomWithSlots>> {
    let rooms = queries::list_rooms(conn)?;
    let slots = queries::list_time_slots(conn)?;

    let mut by_room: HashMap<String, Vec<TimeSlot>> = HashMap::new();
    for slot in slots {
        by_room.entry(slot.room_id.clone()).or_default().push(slot);
    }

    Ok(rooms
        .into_iter()
        .map(|room| {
            let slots = by_room.remove(&room.id).unwrap_or_default();
            RoomWithSlots { room, slots }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use rusqlite::params;

    fn seed_room(conn: &Connection, id: &str, name: &str) {
        conn.execute(
            "INSERT INTO rooms (id, name, image_path) VALUES (?1, ?2, 'rooms/x.jpg')",
            params![id, name],
        )
        .unwrap();
    }

    fn seed_slot(conn: &Connection, id: &str, room_id: &str, start: &str) {
        conn.execute(
            "INSERT INTO time_slots (id, room_id, start_time, end_time, status)
             VALUES (?1, ?2, ?3, '23:59', 'free')",
            params![id, room_id, start],
        )
        .unwrap();
    }

    #[test]
    fn test_slots_grouped_under_their_room() {
        let conn = db::init_db(":memory:").unwrap();
        seed_room(&conn, "x1", "AA Lab");
        seed_room(&conn, "x2", "AB Lab");
        seed_slot(&conn, "x1-a", "x1", "08:00");
        seed_slot(&conn, "x1-b", "x1", "10:00");
        seed_slot(&conn, "x2-a", "x2", "08:00");

        let listing = rooms_with_slots(&conn).unwrap();

        let aa = listing.iter().find(|r| r.room.id == "x1").unwrap();
        assert_eq!(aa.slots.len(), 2);
        assert!(aa.slots.iter().all(|s| s.room_id == "x1"));

        let ab = listing.iter().find(|r| r.room.id == "x2").unwrap();
        assert_eq!(ab.slots.len(), 1);
    }

    #[test]
    fn test_room_without_slots_is_listed_empty() {
        let conn = db::init_db(":memory:").unwrap();
        seed_room(&conn, "x3", "AC Lab");

        let listing = rooms_with_slots(&conn).unwrap();
        let ac = listing.iter().find(|r| r.room.id == "x3").unwrap();
        assert!(ac.slots.is_empty());
    }
}
