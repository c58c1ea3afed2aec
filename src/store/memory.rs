//! In-memory stores for dev mode and tests
//!
//! Ids are real ObjectId hex strings so malformed ids are rejected exactly
//! as the MongoDB backend rejects them.

use async_trait::async_trait;
use bson::oid::ObjectId;
use dashmap::DashMap;
use std::cmp::Ordering;

use super::{BookingStore, RoomStore};
use crate::db::parse_object_id;
use crate::types::{
    Booking, BookingPatch, DeleteAck, InnspotError, InsertAck, Result, Room, RoomStatus,
    SortDirection, UpdateAck,
};

/// Rooms held in a concurrent map keyed by id
#[derive(Default)]
pub struct MemoryRoomStore {
    rooms: DashMap<String, Room>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the given rooms
    pub fn with_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        let store = Self::new();
        for room in rooms {
            store.rooms.insert(room.id.clone(), room);
        }
        store
    }

    /// Load rooms from a JSON array, assigning ids to entries without `_id`
    pub fn from_seed_json(json: &str) -> Result<Self> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;

        let rooms = entries
            .into_iter()
            .map(|mut entry| {
                if let Some(obj) = entry.as_object_mut() {
                    obj.entry("_id")
                        .or_insert_with(|| ObjectId::new().to_hex().into());
                }
                serde_json::from_value::<Room>(entry)
                    .map_err(|e| InnspotError::Config(format!("Invalid seed room: {}", e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::with_rooms(rooms))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    fn set_status(&self, id: Option<String>, status: RoomStatus) -> UpdateAck {
        let Some(id) = id else {
            return UpdateAck::unmatched();
        };

        match self.rooms.get_mut(&id) {
            Some(mut room) => {
                if room.status == status {
                    return UpdateAck::new(1, 0);
                }
                room.status = status;
                UpdateAck::new(1, 1)
            }
            None => UpdateAck::unmatched(),
        }
    }
}

fn by_price(a: &Room, b: &Room, sort: SortDirection) -> Ordering {
    let ord = a
        .price_per_night
        .partial_cmp(&b.price_per_night)
        .unwrap_or(Ordering::Equal);
    match sort {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
    .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn list_by_status(&self, status: RoomStatus, sort: SortDirection) -> Result<Vec<Room>> {
        let mut rooms: Vec<Room> = self
            .rooms
            .iter()
            .filter(|entry| entry.status == status)
            .map(|entry| entry.value().clone())
            .collect();

        rooms.sort_by(|a, b| by_price(a, b, sort));
        Ok(rooms)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Room>> {
        let oid = parse_object_id(id)?;
        Ok(self.rooms.get(&oid.to_hex()).map(|r| r.value().clone()))
    }

    async fn set_status_by_id(&self, id: &str, status: RoomStatus) -> Result<UpdateAck> {
        let oid = parse_object_id(id)?;
        Ok(self.set_status(Some(oid.to_hex()), status))
    }

    async fn set_status_by_number(
        &self,
        room_number: i64,
        status: RoomStatus,
    ) -> Result<UpdateAck> {
        // Collect first: holding an iterator guard while calling get_mut would deadlock
        let id = self
            .rooms
            .iter()
            .filter(|entry| entry.room_number == room_number)
            .map(|entry| entry.key().clone())
            .min();

        Ok(self.set_status(id, status))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Bookings held in a concurrent map keyed by id
#[derive(Default)]
pub struct MemoryBookingStore {
    bookings: DashMap<String, Booking>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn insert(&self, mut booking: Booking) -> Result<InsertAck> {
        let id = ObjectId::new().to_hex();
        booking.id = Some(id.clone());
        self.bookings.insert(id.clone(), booking);
        Ok(InsertAck::new(id))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        let oid = parse_object_id(id)?;
        Ok(self.bookings.get(&oid.to_hex()).map(|b| b.value().clone()))
    }

    async fn list_by_owner(&self, email: &str) -> Result<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|entry| entry.user_email == email)
            .map(|entry| entry.value().clone())
            .collect();

        // Insertion order, as a natural-order scan would return
        bookings.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(bookings)
    }

    async fn delete_by_id(&self, id: &str) -> Result<DeleteAck> {
        let oid = parse_object_id(id)?;
        let removed = self.bookings.remove(&oid.to_hex()).is_some();
        Ok(DeleteAck::new(u64::from(removed)))
    }

    async fn update_by_id(&self, id: &str, patch: &BookingPatch) -> Result<UpdateAck> {
        if patch.is_empty() {
            return Err(InnspotError::BadRequest("empty booking update".into()));
        }

        let oid = parse_object_id(id)?;
        let Some(mut booking) = self.bookings.get_mut(&oid.to_hex()) else {
            return Ok(UpdateAck::unmatched());
        };

        let before = booking.clone();
        booking.apply(patch);
        let modified = *booking != before;
        Ok(UpdateAck::new(1, u64::from(modified)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(number: i64, status: RoomStatus, price: f64) -> Room {
        Room {
            id: ObjectId::new().to_hex(),
            room_number: number,
            status,
            price_per_night: price,
            extra: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let store = MemoryRoomStore::with_rooms([
            room(101, RoomStatus::Available, 150.0),
            room(102, RoomStatus::Booked, 50.0),
            room(103, RoomStatus::Available, 80.0),
            room(104, RoomStatus::Available, 120.0),
        ]);

        let asc = store
            .list_by_status(RoomStatus::Available, SortDirection::Ascending)
            .await
            .unwrap();
        let prices: Vec<f64> = asc.iter().map(|r| r.price_per_night).collect();
        assert_eq!(prices, vec![80.0, 120.0, 150.0]);

        let desc = store
            .list_by_status(RoomStatus::Available, SortDirection::Descending)
            .await
            .unwrap();
        let numbers: Vec<i64> = desc.iter().map(|r| r.room_number).collect();
        assert_eq!(numbers, vec![101, 104, 103]);
    }

    #[tokio::test]
    async fn test_set_status_counts() {
        let target = room(201, RoomStatus::Available, 90.0);
        let id = target.id.clone();
        let store = MemoryRoomStore::with_rooms([target]);

        let first = store.set_status_by_id(&id, RoomStatus::Booked).await.unwrap();
        assert_eq!((first.matched_count, first.modified_count), (1, 1));

        let second = store.set_status_by_id(&id, RoomStatus::Booked).await.unwrap();
        assert_eq!((second.matched_count, second.modified_count), (1, 0));

        let by_number = store
            .set_status_by_number(201, RoomStatus::Available)
            .await
            .unwrap();
        assert_eq!(by_number.modified_count, 1);

        let missing = store
            .set_status_by_number(999, RoomStatus::Available)
            .await
            .unwrap();
        assert_eq!(missing, UpdateAck::unmatched());
    }

    #[tokio::test]
    async fn test_malformed_id_rejected() {
        let store = MemoryRoomStore::new();
        assert!(matches!(
            store.find_by_id("101").await,
            Err(InnspotError::BadRequest(_))
        ));
        assert!(store
            .find_by_id(&ObjectId::new().to_hex())
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_seed_json() {
        let store = MemoryRoomStore::from_seed_json(
            r#"[
                {"roomNumber": 1, "status": "Available", "pricePerNight": 60, "roomSize": "small"},
                {"_id": "65a1f0c2e4b0a1b2c3d4e5f6", "roomNumber": 2, "status": "Booked", "pricePerNight": 90.5}
            ]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.rooms.contains_key("65a1f0c2e4b0a1b2c3d4e5f6"));

        let bad = MemoryRoomStore::from_seed_json(
            r#"[{"roomNumber": 3, "status": "Cleaning", "pricePerNight": 10}]"#,
        );
        assert!(matches!(bad, Err(InnspotError::Config(_))));
    }

    #[tokio::test]
    async fn test_booking_update_counts() {
        let store = MemoryBookingStore::new();
        let booking: Booking =
            serde_json::from_value(serde_json::json!({ "userEmail": "a@x.com", "totalDays": 2 }))
                .unwrap();
        let ack = store.insert(booking).await.unwrap();

        let patch = BookingPatch {
            total_days: Some(serde_json::json!(3)),
            ..Default::default()
        };
        let first = store.update_by_id(&ack.inserted_id, &patch).await.unwrap();
        assert_eq!((first.matched_count, first.modified_count), (1, 1));
        let second = store.update_by_id(&ack.inserted_id, &patch).await.unwrap();
        assert_eq!((second.matched_count, second.modified_count), (1, 0));

        let deleted = store.delete_by_id(&ack.inserted_id).await.unwrap();
        assert_eq!(deleted.deleted_count, 1);
        let again = store.delete_by_id(&ack.inserted_id).await.unwrap();
        assert_eq!(again.deleted_count, 0);
        assert!(store.is_empty());
    }
}
