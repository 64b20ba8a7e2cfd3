use thiserror::Error;
use zip_core::parse::ParseError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse a frame: {0}")]
    Parser(#[from] ParseError),
    #[error("The socket is closed")]
    SocketClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
