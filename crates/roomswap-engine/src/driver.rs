//! The resolution driver: one pass over a set of start rooms.

use roomswap_protocol::{CycleRecord, PassReport, RoomId};

use crate::{
    CycleDetector, EngineError, OccupancyStore, PassConfig, ProcessedSet,
    StagedRotation, SwapGraph, WalkResult, stage,
};

/// Runs one resolution pass.
///
/// Every candidate not yet classified is walked once; rooms on the
/// returned path, cycle or chain, are never walked again in this pass.
///
/// The pass works in three phases:
///
/// 1. **Detect**: all walks run on the untouched graph. A room of a
///    cycle found earlier is already processed, so a later walk reaching
///    it stops there exactly as it would once the cycle's edges were gone.
/// 2. **Stage**: every cycle's writes are computed and merged.
/// 3. **Commit**: the merged writes are applied in one step, then the
///    cycles' requests are removed.
///
/// An error in phase 1 or 2 leaves `graph` and `rooms` untouched.
///
/// # Errors
/// - [`EngineError::Graph`]: a walk exceeded `max_walk_len` or the
///   graph size.
/// - [`EngineError::Commit`]: staging or committing failed. Unless the
///   inner error is `Partial`, nothing was changed.
pub fn run_pass<S: OccupancyStore>(
    graph: &mut SwapGraph,
    rooms: &mut S,
    candidates: &[RoomId],
    config: &PassConfig,
) -> Result<PassReport, EngineError> {
    tracing::info!(
        candidates = candidates.len(),
        requests = graph.len(),
        "swap pass started"
    );

    let mut processed = ProcessedSet::new();
    let mut cycles: Vec<Vec<RoomId>> = Vec::new();

    {
        let limit = config.walk_limit(graph.len());
        let detector = CycleDetector::new(&*graph, &*rooms, limit);

        for start in candidates {
            if processed.contains(start) {
                continue;
            }
            match detector.walk(start, &processed)? {
                WalkResult::Cycle(path) => {
                    tracing::debug!(%start, rooms = path.len(), "cycle detected");
                    processed.extend(path.iter().cloned());
                    cycles.push(path);
                }
                WalkResult::Chain(path) => {
                    tracing::debug!(%start, rooms = path.len(), "chain, no swap");
                    processed.extend(path);
                }
            }
        }
    }

    let mut staged = StagedRotation::default();
    let mut records = Vec::with_capacity(cycles.len());
    for path in cycles {
        let rotation = stage(&path, &*rooms, config.rotation)?;
        records.push(CycleRecord {
            rooms: path,
            relocations: rotation.relocations().to_vec(),
        });
        staged.merge(rotation);
    }

    staged.commit(rooms)?;

    for record in &records {
        for room in &record.rooms {
            graph.remove(room);
        }
        tracing::info!(cycle = %record, moved = record.relocations.len(), "swap executed");
    }

    tracing::info!(
        cycles = records.len(),
        processed = processed.len(),
        remaining = graph.len(),
        "swap pass finished"
    );

    Ok(PassReport {
        cycles: records,
        processed: processed.into_iter().collect(),
    })
}
