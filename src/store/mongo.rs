//! MongoDB-backed stores

use async_trait::async_trait;
use bson::doc;

use super::{BookingStore, RoomStore};
use crate::db::schemas::{booking_patch_update, BookingDoc, RoomDoc};
use crate::db::{parse_object_id, MongoClient, MongoCollection, BOOKING_COLLECTION, ROOM_COLLECTION};
use crate::types::{
    Booking, BookingPatch, DeleteAck, InnspotError, InsertAck, Result, Room, RoomStatus,
    SortDirection, UpdateAck,
};

/// Rooms stored in the `rooms` collection
#[derive(Clone)]
pub struct MongoRoomStore {
    rooms: MongoCollection<RoomDoc>,
}

impl MongoRoomStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        Ok(Self {
            rooms: mongo.collection(ROOM_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl RoomStore for MongoRoomStore {
    async fn list_by_status(&self, status: RoomStatus, sort: SortDirection) -> Result<Vec<Room>> {
        let docs = self
            .rooms
            .find_many(
                doc! { "status": status.as_str() },
                Some(doc! { "pricePerNight": sort.as_mongo() }),
            )
            .await?;

        docs.into_iter().map(Room::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Room>> {
        let oid = parse_object_id(id)?;
        self.rooms
            .find_one(doc! { "_id": oid })
            .await?
            .map(Room::try_from)
            .transpose()
    }

    async fn set_status_by_id(&self, id: &str, status: RoomStatus) -> Result<UpdateAck> {
        let oid = parse_object_id(id)?;
        let result = self
            .rooms
            .update_one(doc! { "_id": oid }, doc! { "$set": { "status": status.as_str() } })
            .await?;
        Ok(result.into())
    }

    async fn set_status_by_number(
        &self,
        room_number: i64,
        status: RoomStatus,
    ) -> Result<UpdateAck> {
        let result = self
            .rooms
            .update_one(
                doc! { "roomNumber": room_number },
                doc! { "$set": { "status": status.as_str() } },
            )
            .await?;
        Ok(result.into())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}

/// Bookings stored in the `bookings` collection
#[derive(Clone)]
pub struct MongoBookingStore {
    bookings: MongoCollection<BookingDoc>,
}

impl MongoBookingStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        Ok(Self {
            bookings: mongo.collection(BOOKING_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl BookingStore for MongoBookingStore {
    async fn insert(&self, booking: Booking) -> Result<InsertAck> {
        let doc = BookingDoc::try_from(booking)?;
        let oid = self.bookings.insert_one(doc).await?;
        Ok(InsertAck::new(oid.to_hex()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        let oid = parse_object_id(id)?;
        Ok(self
            .bookings
            .find_one(doc! { "_id": oid })
            .await?
            .map(Booking::from))
    }

    async fn list_by_owner(&self, email: &str) -> Result<Vec<Booking>> {
        let docs = self
            .bookings
            .find_many(doc! { "userEmail": email }, None)
            .await?;
        Ok(docs.into_iter().map(Booking::from).collect())
    }

    async fn delete_by_id(&self, id: &str) -> Result<DeleteAck> {
        let oid = parse_object_id(id)?;
        let result = self.bookings.delete_one(doc! { "_id": oid }).await?;
        Ok(result.into())
    }

    async fn update_by_id(&self, id: &str, patch: &BookingPatch) -> Result<UpdateAck> {
        if patch.is_empty() {
            return Err(InnspotError::BadRequest("empty booking update".into()));
        }

        let oid = parse_object_id(id)?;
        let result = self
            .bookings
            .update_one(doc! { "_id": oid }, booking_patch_update(patch)?)
            .await?;
        Ok(result.into())
    }
}
