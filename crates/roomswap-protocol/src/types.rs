//! Data types exchanged between the swap engine and its collaborator.
//!
//! The collaborator (the administrative system that owns users, hostels
//! and persistence) hands the engine a [`SwapSnapshot`] and receives a
//! [`PassReport`] back. Everything here is plain data: no type in this
//! module knows how cycles are found or executed.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a room, e.g. `"R101"`.
///
/// Newtype over `String` so a room can never be passed where an occupant
/// is expected. `#[serde(transparent)]` keeps the JSON form a plain
/// string: `RoomId("R101")` serializes as `"R101"`.
///
/// `Ord` is derived so rooms can key a `BTreeMap`, which gives every
/// listing and every pass a deterministic order.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Creates a room ID from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The person currently assigned to a room.
///
/// Opaque to the engine: it is only ever copied from one room to another.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OccupantId(pub String);

impl OccupantId {
    /// Creates an occupant ID from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OccupantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OccupantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Input: rooms and requests
// ---------------------------------------------------------------------------

/// One room and the person living in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEntry {
    pub room_id: RoomId,
    pub occupant: OccupantId,
}

impl RoomEntry {
    pub fn new(room_id: impl Into<RoomId>, occupant: impl Into<OccupantId>) -> Self {
        Self {
            room_id: room_id.into(),
            occupant: occupant.into(),
        }
    }
}

/// "The current occupant of `from` wants to move into `to`."
///
/// Admitted by the collaborator after its own eligibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEdge {
    pub from: RoomId,
    pub to: RoomId,
}

impl SwapEdge {
    pub fn new(from: impl Into<RoomId>, to: impl Into<RoomId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Everything the engine needs to run: current occupancy and the pending
/// requests.
///
/// `#[serde(default)]` lets a snapshot omit either list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapSnapshot {
    pub rooms: Vec<RoomEntry>,
    pub requests: Vec<SwapEdge>,
}

impl SwapSnapshot {
    /// Rejects blank identifiers.
    ///
    /// Everything else (duplicate rooms, dangling requests) is left to
    /// the engine, which has the policy to decide.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidSnapshot`] naming the first offending
    /// entry.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if let Some(entry) = self.rooms.iter().find(|e| e.room_id.as_str().is_empty()) {
            return Err(ProtocolError::InvalidSnapshot(format!(
                "room with occupant {} has an empty room id",
                entry.occupant
            )));
        }
        if let Some(entry) = self.rooms.iter().find(|e| e.occupant.as_str().is_empty()) {
            return Err(ProtocolError::InvalidSnapshot(format!(
                "room {} has an empty occupant",
                entry.room_id
            )));
        }
        if self
            .requests
            .iter()
            .any(|e| e.from.as_str().is_empty() || e.to.as_str().is_empty())
        {
            return Err(ProtocolError::InvalidSnapshot(
                "swap request with an empty room id".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output: what a pass did
// ---------------------------------------------------------------------------

/// One occupant moving out of `from` and into `to`.
///
/// The collaborator turns these into user-facing notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub occupant: OccupantId,
    pub from: RoomId,
    pub to: RoomId,
}

impl fmt::Display for Relocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.occupant, self.from, self.to)
    }
}

/// A cycle that was executed during a pass.
///
/// `rooms` is in walk order, starting at the room where the loop closes.
/// For a self-loop `relocations` is empty: nobody moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub rooms: Vec<RoomId>,
    pub relocations: Vec<Relocation>,
}

impl CycleRecord {
    /// Number of rooms taking part in the cycle.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl fmt::Display for CycleRecord {
    /// Renders the loop closed back on its first room:
    /// `R105 -> R106 -> R107 -> R105`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for room in &self.rooms {
            write!(f, "{room} -> ")?;
        }
        match self.rooms.first() {
            Some(first) => write!(f, "{first}"),
            None => Ok(()),
        }
    }
}

/// The result of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    /// Cycles executed, in the order they were discovered.
    pub cycles: Vec<CycleRecord>,
    /// Every room classified during the pass, as cycle or chain member.
    pub processed: Vec<RoomId>,
}

impl PassReport {
    /// Returns `true` if the pass moved nobody and removed no request.
    pub fn is_noop(&self) -> bool {
        self.cycles.is_empty()
    }

    /// All relocations across all executed cycles.
    pub fn relocations(&self) -> impl Iterator<Item = &Relocation> {
        self.cycles.iter().flat_map(|c| c.relocations.iter())
    }
}

// ---------------------------------------------------------------------------
// StateReport: the room table
// ---------------------------------------------------------------------------

/// One line of the room table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRow {
    pub room_id: RoomId,
    pub occupant: OccupantId,
    /// The room this occupant has asked to move into, if any.
    pub wants: Option<RoomId>,
}

/// A sorted view of every room, its occupant and its pending request.
///
/// The `Display` impl renders the fixed-width table operators read
/// before and after a pass:
///
/// ```text
/// Room ID | Occupant Name | Has Pending Request?
/// ----------------------------------------------
/// R101    | Student_A     | WANTS R102
/// R103    | Student_C     | No
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateReport {
    pub rows: Vec<StateRow>,
}

impl StateReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rooms that still have a pending request.
    pub fn pending(&self) -> usize {
        self.rows.iter().filter(|r| r.wants.is_some()).count()
    }
}

impl fmt::Display for StateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "----------------------------------------------";
        writeln!(f, "Room ID | Occupant Name | Has Pending Request?")?;
        writeln!(f, "{RULE}")?;
        for row in &self.rows {
            let status = match &row.wants {
                Some(target) => format!("WANTS {target}"),
                None => "No".to_string(),
            };
            writeln!(
                f,
                "{:<7} | {:<13} | {}",
                row.room_id.as_str(),
                row.occupant.as_str(),
                status
            )?;
        }
        write!(f, "{RULE}")
    }
}

// =========================================================================
// Tests
// =========================================================================
