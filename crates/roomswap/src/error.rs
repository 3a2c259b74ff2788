//! Unified error type for roomswap.

use roomswap_engine::EngineError;
use roomswap_protocol::ProtocolError;

/// Errors from talking to the [`SwapService`](crate::SwapService) actor.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service task has stopped; its channel is closed.
    #[error("swap service is unavailable")]
    Unavailable,

    /// An earlier pass left rooms half-rotated. The service refuses every
    /// further mutation until an operator repairs the state.
    #[error("swap service halted after a partial commit")]
    Poisoned,
}

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` convert sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum RoomSwapError {
    /// Encoding or decoding a snapshot or report.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Loading, request admission, detection or commit.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The service actor.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl RoomSwapError {
    /// Returns `true` if room state can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Engine(e) => e.is_fatal(),
            Self::Service(ServiceError::Poisoned) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use roomswap_engine::{CommitError, GraphError, StoreError};
    use roomswap_protocol::RoomId;

    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidSnapshot("bad".into());
        let swap_err: RoomSwapError = err.into();
        assert!(matches!(swap_err, RoomSwapError::Protocol(_)));
        assert!(swap_err.to_string().contains("bad"));
    }

    #[test]
    fn test_from_engine_error() {
        let err = EngineError::Graph(GraphError::Inconsistent {
            start: RoomId::new("R101"),
            limit: 3,
        });
        let swap_err: RoomSwapError = err.into();
        assert!(matches!(swap_err, RoomSwapError::Engine(_)));
        assert!(!swap_err.is_fatal());
        assert!(swap_err.to_string().contains("R101"));
    }

    #[test]
    fn test_partial_commit_is_fatal() {
        let err = EngineError::Commit(CommitError::Partial {
            stranded: vec![RoomId::new("R105")],
            source: StoreError::UnknownRoom(RoomId::new("R106")),
        });
        let swap_err: RoomSwapError = err.into();
        assert!(swap_err.is_fatal());
    }

    #[test]
    fn test_from_service_error() {
        let swap_err: RoomSwapError = ServiceError::Unavailable.into();
        assert!(matches!(swap_err, RoomSwapError::Service(_)));
        assert!(!swap_err.is_fatal());
        assert!(RoomSwapError::from(ServiceError::Poisoned).is_fatal());
    }
}
