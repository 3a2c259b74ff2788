//! # roomswap
//!
//! Resolves one-directional room exchange requests into multi-party
//! swaps. Each room's occupant may ask for exactly one other room; when
//! those asks close a loop, everyone on the loop moves at once.
//!
//! The engine ([`SwapEngine`]) is synchronous and owned. The service
//! ([`SwapService`]) puts one engine behind a Tokio task so any number of
//! callers can submit requests and trigger passes without ever seeing a
//! half-rotated cycle.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomswap::prelude::*;
//!
//! # async fn run() -> Result<(), RoomSwapError> {
//! let service = SwapService::builder()
//!     .room(RoomEntry::new("R101", "Student_A"))
//!     .room(RoomEntry::new("R102", "Student_B"))
//!     .spawn()?;
//!
//! service.submit_request(SwapEdge::new("R101", "R102")).await?;
//! service.submit_request(SwapEdge::new("R102", "R101")).await?;
//!
//! let report = service.run_pass_all().await?;
//! for moved in report.relocations() {
//!     println!("{moved}");
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod service;

pub use error::{RoomSwapError, ServiceError};
pub use service::{SwapService, SwapServiceBuilder};

pub mod prelude {
    //! Everything a collaborator normally needs.

    pub use crate::{RoomSwapError, ServiceError, SwapService, SwapServiceBuilder};
    pub use roomswap_engine::{
        CommitError, EdgePolicy, EngineError, GraphError, OccupancyStore, PassConfig,
        RoomRegistry, RotationDirection, StoreError, SwapEngine,
    };
    pub use roomswap_protocol::{
        Codec, CycleRecord, JsonCodec, OccupantId, PassReport, ProtocolError,
        Relocation, RoomEntry, RoomId, StateReport, SwapEdge, SwapSnapshot,
    };
}
