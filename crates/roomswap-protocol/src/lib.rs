//! Shared data types for roomswap.
//!
//! - **Types** ([`RoomId`], [`OccupantId`], [`SwapSnapshot`],
//!   [`PassReport`], ...): what the collaborator hands the engine and
//!   what it gets back.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those values are
//!   turned into bytes and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Collaborator (bytes) → Protocol (SwapSnapshot) → Engine (cycles)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    CycleRecord, OccupantId, PassReport, Relocation, RoomEntry, RoomId,
    StateReport, StateRow, SwapEdge, SwapSnapshot,
};
