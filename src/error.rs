use std::{io, process::ExitStatus};
use thiserror::Error;

/// Errors produced by the host while framing, paging or editing a message.
///
/// Every variant is fatal to the current exchange: after a framing error the
/// position in the input stream is unknown, so nothing is retried.
#[derive(Debug, Error)]
pub enum NmError {
    /// The test pattern matched neither big- nor little-endian layout.
    #[error("could not determine native byte order (pattern bytes {0:02x?})")]
    UnknownByteOrder([u8; 2]),

    /// Stdin closed before a full 4-byte length header arrived.
    #[error("truncated length header: got {received} of 4 bytes")]
    TruncatedHeader { received: usize },

    /// The body ended before the declared length was reached.
    #[error("declared length mismatch: header says {declared} bytes, body has {received}")]
    LengthMismatch { declared: usize, received: usize },

    #[error("incoming message too large: {len} bytes (max {max})")]
    IncomingTooLarge { len: usize, max: usize },

    #[error("outgoing frame too large: {len} bytes (max {max})")]
    OutgoingTooLarge { len: usize, max: usize },

    #[error("frame body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// Paging produced zero pages.
    #[error("empty payload: nothing to page")]
    EmptyPayload,

    #[error("invalid control header: {0}")]
    InvalidHeader(String),

    /// The first message of an exchange was not a `Command` header.
    #[error("first message is not an editor command header")]
    MissingCommand,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failures of the external editor collaborator.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("editor command is empty")]
    EmptyCommand,

    /// Unbalanced quotes or a dangling escape in the command line.
    #[error("editor command cannot be tokenized: {0:?}")]
    Unparsable(String),

    #[error("failed to spawn editor `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("editor exited unsuccessfully ({0})")]
    Failed(ExitStatus),

    #[error("temp file I/O failed: {0}")]
    TempFile(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, NmError>;
