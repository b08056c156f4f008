use std::fmt;
use std::time::Duration;

#[derive(Clone)]
pub struct RconClientConfig {
    /// `host:port` of the server, e.g. `127.0.0.1:7777`.
    pub address: String,
    pub password: String,
    pub io_timeout: Duration,
    pub max_datagrams: usize,
    pub max_response_bytes: usize,
}

const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MAX_DATAGRAMS: usize = 64;
const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024;

impl RconClientConfig {
    pub fn new(address: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            password: password.into(),
            io_timeout: DEFAULT_IO_TIMEOUT,
            max_datagrams: DEFAULT_MAX_DATAGRAMS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    /// How long a single send, or a single receive while collecting the
    /// response, may take before the command fails with `RconError::Timeout`.
    pub fn io_timeout(mut self, t: Duration) -> Self { self.io_timeout = t; self }

    /// The most reply datagrams read for one command, terminator included.
    /// A server that never sends the empty terminator datagram is cut off here.
    pub fn max_datagrams(mut self, v: usize) -> Self { self.max_datagrams = v; self }

    /// The most payload bytes accumulated for one command.
    pub fn max_response_bytes(mut self, v: usize) -> Self { self.max_response_bytes = v; self }
}

impl Default for RconClientConfig {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

impl fmt::Debug for RconClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RconClientConfig")
            .field("address", &self.address)
            .field("password", &"<redacted>")
            .field("io_timeout", &self.io_timeout)
            .field("max_datagrams", &self.max_datagrams)
            .field("max_response_bytes", &self.max_response_bytes)
            .finish()
    }
}
