use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// ErrConnectionClosed indicates an operation executed after connection
    /// has already been closed.
    #[error("connection closed")]
    ErrConnectionClosed,

    #[error("{0}")]
    SdpCreation(#[from] SdpCreationError),
    #[error("{0}")]
    SdpSet(#[from] SdpSetError),
    #[error("{0}")]
    Ice(#[from] IceError),
    #[error("{0}")]
    FatalProtocol(#[from] FatalProtocolError),

    #[error("mutex poison: {0}")]
    PoisonError(String),
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Reports whether this error is the closed-connection failure of any
    /// operation kind.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            Error::ErrConnectionClosed
                | Error::SdpCreation(SdpCreationError::Closed)
                | Error::SdpSet(SdpSetError::Closed)
                | Error::Ice(IceError::Closed)
        )
    }

    /// Reports whether this error was caused by another negotiation
    /// operation still being in flight.
    pub fn is_operation_in_progress(&self) -> bool {
        matches!(
            self,
            Error::SdpCreation(SdpCreationError::OperationInProgress)
                | Error::SdpSet(SdpSetError::OperationInProgress)
        )
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        Error::PoisonError(e.to_string())
    }
}

/// Failures of `create_offer` / `create_answer`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SdpCreationError {
    #[error("create description: connection closed")]
    Closed,
    #[error("create description: another negotiation operation is in progress")]
    OperationInProgress,
    #[error("create description: not allowed in signaling state {0}")]
    IncorrectSignalingState(String),
    #[error("create description: no such media: {0}")]
    NoSuchMedia(String),
    #[error("create description: engine produced an invalid description: {0}")]
    InvalidDescription(String),
    #[error("create description: rejected by engine: {0}")]
    Rejected(String),
}

/// Failures of `set_local_description` / `set_remote_description`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SdpSetError {
    #[error("set description: connection closed")]
    Closed,
    #[error("set description: another negotiation operation is in progress")]
    OperationInProgress,
    #[error("set description: failed to parse sdp: {0}")]
    Parse(String),
    #[error("set description: invalid proposed signaling state transition: {0}")]
    StateMismatch(String),
    #[error("set description: can not rollback from stable state")]
    CannotRollback,
    #[error("set description: description type is unspecified")]
    InvalidType,
    #[error("set description: rejected by engine: {0}")]
    Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IceError {
    #[error("ice: connection closed")]
    Closed,
    #[error("ice: remote description is not set")]
    NoRemoteDescription,
    #[error("ice: invalid candidate: {0}")]
    InvalidCandidate(String),
    #[error("ice: candidate buffer is full ({0} candidates)")]
    CandidateBufferFull(usize),
}

/// Unrecoverable disagreement with the media engine. Forces the connection
/// closed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FatalProtocolError {
    #[error("fatal: unrecognized {kind} value {value} reported by engine")]
    UnrecognizedState { kind: &'static str, value: u8 },
}
