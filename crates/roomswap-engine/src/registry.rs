//! Room registry: who currently lives in which room.

use std::collections::BTreeMap;

use roomswap_protocol::{OccupantId, RoomEntry, RoomId};

use crate::StoreError;

/// Storage for room occupancy, as seen by the executor.
///
/// [`RoomRegistry`] is the in-memory implementation. The trait exists so
/// an integrator can put a fallible store (a write-through cache, a
/// transactional backend) underneath the engine: `assign` may fail, and
/// the executor rolls back around it.
pub trait OccupancyStore {
    /// The current occupant of `room`, if the room is registered.
    fn occupant(&self, room: &RoomId) -> Option<&OccupantId>;

    /// Replaces the occupant of an already registered room.
    ///
    /// # Errors
    /// [`StoreError::UnknownRoom`] if `room` is not registered, or
    /// [`StoreError::WriteFailed`] if the backing store refuses the write.
    fn assign(&mut self, room: &RoomId, occupant: OccupantId) -> Result<(), StoreError>;

    /// Every registered room, ordered by room ID.
    fn entries(&self) -> Vec<RoomEntry>;

    /// Returns `true` if `room` is registered.
    fn contains(&self, room: &RoomId) -> bool {
        self.occupant(room).is_some()
    }
}

/// In-memory room → occupant table.
///
/// At most one entry per room; `BTreeMap` keeps listings sorted by room ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomId, OccupantId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a room, returning the previous occupant if the room was
    /// already registered.
    pub fn insert(&mut self, entry: RoomEntry) -> Option<OccupantId> {
        self.rooms.insert(entry.room_id, entry.occupant)
    }

    /// Unregisters a room, returning its occupant.
    pub fn remove(&mut self, room: &RoomId) -> Option<OccupantId> {
        self.rooms.remove(room)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl OccupancyStore for RoomRegistry {
    fn occupant(&self, room: &RoomId) -> Option<&OccupantId> {
        self.rooms.get(room)
    }

    fn assign(&mut self, room: &RoomId, occupant: OccupantId) -> Result<(), StoreError> {
        match self.rooms.get_mut(room) {
            Some(slot) => {
                *slot = occupant;
                Ok(())
            }
            None => Err(StoreError::UnknownRoom(room.clone())),
        }
    }

    fn entries(&self) -> Vec<RoomEntry> {
        self.rooms
            .iter()
            .map(|(room_id, occupant)| RoomEntry {
                room_id: room_id.clone(),
                occupant: occupant.clone(),
            })
            .collect()
    }
}
