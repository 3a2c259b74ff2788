//! Cycle execution: rotate occupants around a cycle as one unit.
//!
//! Execution is split in two so that no store is touched until every
//! new value is known:
//!
//! 1. [`stage`] reads the occupant of every cycle room and computes all
//!    writes from that untouched snapshot.
//! 2. [`StagedRotation::commit`] applies the writes. If one fails, the
//!    writes already made are reverted from the snapshot.
//!
//! Several staged rotations can be merged and committed together, which
//! is how a pass makes all of its cycles land at once.

use roomswap_protocol::{CycleRecord, OccupantId, Relocation, RoomId};

use crate::{CommitError, OccupancyStore, RotationDirection, StoreError, SwapGraph};

/// One pending write: `room` goes from `before` to `after`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StagedWrite {
    room: RoomId,
    before: OccupantId,
    after: OccupantId,
}

/// Every write needed by one or more cycle rotations, not yet applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedRotation {
    writes: Vec<StagedWrite>,
    relocations: Vec<Relocation>,
}

impl StagedRotation {
    /// Number of room writes the commit will perform.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Who moves where once this rotation is committed.
    pub fn relocations(&self) -> &[Relocation] {
        &self.relocations
    }

    /// Folds `other` into this rotation. The two must cover disjoint rooms,
    /// which holds for cycles found in the same pass.
    pub fn merge(&mut self, other: StagedRotation) {
        self.writes.extend(other.writes);
        self.relocations.extend(other.relocations);
    }

    /// Applies every staged write to `store`, all or nothing.
    ///
    /// # Errors
    /// - [`CommitError::RolledBack`]: a write failed; `store` is back to
    ///   its state before the commit.
    /// - [`CommitError::Partial`]: a write failed and so did reverting
    ///   at least one earlier write.
    pub fn commit<S: OccupancyStore>(&self, store: &mut S) -> Result<(), CommitError> {
        for (applied, write) in self.writes.iter().enumerate() {
            if let Err(source) = store.assign(&write.room, write.after.clone()) {
                tracing::error!(
                    room = %write.room,
                    error = %source,
                    applied,
                    "rotation write failed, rolling back"
                );
                return Err(self.rollback(store, applied, source));
            }
        }
        Ok(())
    }

    /// Reverts the first `applied` writes, newest first.
    fn rollback<S: OccupancyStore>(
        &self,
        store: &mut S,
        applied: usize,
        source: StoreError,
    ) -> CommitError {
        let mut stranded = Vec::new();
        for write in self.writes.iter().take(applied).rev() {
            if let Err(e) = store.assign(&write.room, write.before.clone()) {
                tracing::error!(room = %write.room, error = %e, "rollback write failed");
                stranded.push(write.room.clone());
            }
        }

        if stranded.is_empty() {
            CommitError::RolledBack { source }
        } else {
            CommitError::Partial { stranded, source }
        }
    }
}

/// Computes the rotation of `path` without writing anything.
///
/// `path` must be a closed cycle as returned by the detector. A one-room
/// cycle stages no writes: the occupant stays put.
///
/// # Errors
/// [`CommitError::UnknownRoom`] if a room in `path` has no occupant.
pub fn stage<S: OccupancyStore>(
    path: &[RoomId],
    store: &S,
    direction: RotationDirection,
) -> Result<StagedRotation, CommitError> {
    let snapshot = path
        .iter()
        .map(|room| {
            store
                .occupant(room)
                .cloned()
                .ok_or_else(|| CommitError::UnknownRoom(room.clone()))
        })
        .collect::<Result<Vec<OccupantId>, CommitError>>()?;

    let n = path.len();
    if n < 2 {
        return Ok(StagedRotation::default());
    }

    let mut staged = StagedRotation::default();
    for (i, (room, occupant)) in path.iter().zip(&snapshot).enumerate() {
        let dest = direction.destination(i, n);
        staged.writes.push(StagedWrite {
            room: path[dest].clone(),
            before: snapshot[dest].clone(),
            after: occupant.clone(),
        });
        staged.relocations.push(Relocation {
            occupant: occupant.clone(),
            from: room.clone(),
            to: path[dest].clone(),
        });
    }
    Ok(staged)
}

/// Stages, commits and retires a single cycle.
///
/// The cycle's requests are removed from `graph` only after the commit
/// succeeds; on error both `store` and `graph` are unchanged (unless the
/// error is [`CommitError::Partial`]).
pub fn execute<S: OccupancyStore>(
    path: &[RoomId],
    store: &mut S,
    graph: &mut SwapGraph,
    direction: RotationDirection,
) -> Result<CycleRecord, CommitError> {
    let staged = stage(path, store, direction)?;
    staged.commit(store)?;
    for room in path {
        graph.remove(room);
    }

    Ok(CycleRecord {
        rooms: path.to_vec(),
        relocations: staged.relocations,
    })
}

#[cfg(test)]
mod tests {
    use roomswap_protocol::RoomEntry;

    use super::*;
    use crate::RoomRegistry;

    fn room(id: &str) -> RoomId {
        RoomId::new(id)
    }

    fn registry(entries: &[(&str, &str)]) -> RoomRegistry {
        let mut reg = RoomRegistry::new();
        for (r, o) in entries {
            reg.insert(RoomEntry::new(*r, *o));
        }
        reg
    }

    fn occupant<'a>(reg: &'a RoomRegistry, id: &str) -> &'a str {
        reg.occupant(&room(id)).map(|o| o.as_str()).unwrap_or("")
    }

    #[test]
    fn test_stage_does_not_write() {
        let reg = registry(&[("R101", "A"), ("R102", "B")]);
        let staged = stage(
            &[room("R101"), room("R102")],
            &reg,
            RotationDirection::Predecessor,
        )
        .unwrap();

        assert_eq!(staged.len(), 2);
        assert_eq!(occupant(&reg, "R101"), "A");
        assert_eq!(occupant(&reg, "R102"), "B");
    }

    #[test]
    fn test_three_cycle_predecessor_rotation() {
        let mut reg = registry(&[("R105", "X"), ("R106", "Y"), ("R107", "Z")]);
        let mut graph = SwapGraph::new();
        graph.set(room("R105"), room("R106"));
        graph.set(room("R106"), room("R107"));
        graph.set(room("R107"), room("R105"));

        let record = execute(
            &[room("R105"), room("R106"), room("R107")],
            &mut reg,
            &mut graph,
            RotationDirection::Predecessor,
        )
        .unwrap();

        // Occupant of path[i] lands in path[i - 1].
        assert_eq!(occupant(&reg, "R105"), "Y");
        assert_eq!(occupant(&reg, "R106"), "Z");
        assert_eq!(occupant(&reg, "R107"), "X");
        assert!(graph.is_empty());
        assert_eq!(
            record.relocations[0],
            Relocation {
                occupant: OccupantId::new("X"),
                from: room("R105"),
                to: room("R107"),
            }
        );
    }

    #[test]
    fn test_three_cycle_successor_rotation() {
        let mut reg = registry(&[("R105", "X"), ("R106", "Y"), ("R107", "Z")]);
        let mut graph = SwapGraph::new();

        execute(
            &[room("R105"), room("R106"), room("R107")],
            &mut reg,
            &mut graph,
            RotationDirection::Successor,
        )
        .unwrap();

        assert_eq!(occupant(&reg, "R105"), "Z");
        assert_eq!(occupant(&reg, "R106"), "X");
        assert_eq!(occupant(&reg, "R107"), "Y");
    }

    #[test]
    fn test_self_loop_keeps_occupant_and_drops_edge() {
        let mut reg = registry(&[("R120", "T")]);
        let mut graph = SwapGraph::new();
        graph.set(room("R120"), room("R120"));

        let record = execute(
            &[room("R120")],
            &mut reg,
            &mut graph,
            RotationDirection::Predecessor,
        )
        .unwrap();

        assert_eq!(occupant(&reg, "R120"), "T");
        assert!(record.relocations.is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_stage_unknown_room_fails_before_writing() {
        let reg = registry(&[("R101", "A")]);
        let result = stage(
            &[room("R101"), room("R199")],
            &reg,
            RotationDirection::Predecessor,
        );
        assert!(matches!(result, Err(CommitError::UnknownRoom(r)) if r == room("R199")));
    }

    #[test]
    fn test_commit_failure_rolls_back_applied_writes() {
        // Staged against a registry that has R102, committed against one
        // that lost it: the third write fails after two have landed.
        let full = registry(&[("R101", "A"), ("R102", "B"), ("R103", "C")]);
        let staged = stage(
            &[room("R101"), room("R102"), room("R103")],
            &full,
            RotationDirection::Predecessor,
        )
        .unwrap();

        let mut shrunk = full.clone();
        shrunk.remove(&room("R102"));
        let before = shrunk.clone();

        let result = staged.commit(&mut shrunk);

        assert!(matches!(result, Err(CommitError::RolledBack { .. })));
        assert_eq!(shrunk, before);
    }

    #[test]
    fn test_merge_combines_disjoint_rotations() {
        let reg = registry(&[("R101", "A"), ("R102", "B"), ("R105", "X"), ("R106", "Y")]);
        let mut staged = stage(
            &[room("R101"), room("R102")],
            &reg,
            RotationDirection::Predecessor,
        )
        .unwrap();
        staged.merge(
            stage(
                &[room("R105"), room("R106")],
                &reg,
                RotationDirection::Predecessor,
            )
            .unwrap(),
        );

        assert_eq!(staged.len(), 4);
        assert_eq!(staged.relocations().len(), 4);
    }
}
