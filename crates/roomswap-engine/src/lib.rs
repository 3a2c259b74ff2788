//! Swap-cycle resolution for roomswap.
//!
//! Rooms form a functional graph: each room may point at the one room its
//! occupant wants to move into. When following those pointers returns to
//! where it started, the rooms on the loop can swap occupants all at once.
//!
//! # Key types
//!
//! - [`SwapEngine`]: owns the rooms and requests, runs passes
//! - [`RoomRegistry`] / [`OccupancyStore`]: who lives where
//! - [`SwapGraph`]: one pending request per room
//! - [`CycleDetector`]: classifies a walk as [`WalkResult::Cycle`] or
//!   [`WalkResult::Chain`]
//! - [`StagedRotation`]: all writes of a rotation, committed as a unit
//! - [`PassConfig`]: walk bound, duplicate-request policy, rotation direction
//!
//! # Pass lifecycle
//!
//! ```text
//! candidates ──→ walk (detector) ──→ stage (executor) ──→ commit ──→ drop edges
//!                    │ chain                                 │ failure
//!                    ▼                                       ▼
//!               processed set                        rollback / Partial
//! ```

mod config;
mod detector;
mod driver;
mod engine;
mod error;
mod executor;
mod graph;
mod registry;

pub use config::{EdgePolicy, PassConfig, RotationDirection};
pub use detector::{CycleDetector, ProcessedSet, WalkResult};
pub use driver::run_pass;
pub use engine::SwapEngine;
pub use error::{CommitError, EngineError, GraphError, StoreError};
pub use executor::{StagedRotation, execute, stage};
pub use graph::SwapGraph;
pub use registry::{OccupancyStore, RoomRegistry};
