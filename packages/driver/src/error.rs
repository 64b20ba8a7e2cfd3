use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("The controller is not ready")]
    NotReady,
    #[error("The gateway refused the command after all retries")]
    NackResponse,
    #[error("The gateway's queue for the target node is full")]
    QueueFull,
    #[error("The gateway rejected an option of the command")]
    OptionError,
    #[error("Operation timed out")]
    Timeout,
    #[error("A network management operation is already running")]
    NetworkBusy,
    #[error("The transport to the gateway is closed")]
    TransportClosed,
    #[error("The command was cancelled")]
    Cancelled,
    #[error("Failed to decode a frame: {0}")]
    Decode(#[from] zip_core::parse::ParseError),
    #[error("Internal error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, Error>;
