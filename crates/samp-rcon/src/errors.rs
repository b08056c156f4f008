use thiserror::Error;

#[derive(Debug, Error)]
pub enum RconError {
    #[error("invalid server address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("failed to open socket: {0}")]
    Connect(std::io::Error),

    #[error("failed to send request: {0}")]
    Send(std::io::Error),

    #[error("failed to receive response: {0}")]
    Receive(std::io::Error),

    #[error("response datagram exceeds the {capacity} byte receive buffer")]
    OversizeResponse { capacity: usize },

    #[error("malformed response: {0}")]
    Decode(String),

    /// Password or command does not fit the 16-bit length prefix.
    #[error("{field} is {len} bytes long, the protocol allows at most {max}")]
    FieldTooLong { field: &'static str, len: usize, max: usize },

    #[error("operation timed out")]
    Timeout,

    #[error("response exceeded limit: {0}")]
    ResponseLimit(String),
}
