//! Client for the SA-MP remote console (RCON) protocol over UDP.
//!
//! A command is sent as one `'x'` datagram carrying the RCON password and
//! the command text. The server answers with one datagram per line of output
//! and ends the response with an empty datagram.

mod common;
pub mod packet;
pub mod client;
pub mod errors;
pub mod connect;
pub mod execute;
pub mod client_config;
pub mod client_io;

#[cfg(test)]
mod test_socket;

pub use client_config::RconClientConfig;
pub use client::RconClient;
pub use client_io::DatagramSocket;
pub use common::{MAX_DATAGRAM_SIZE, MAX_FIELD_LEN};
pub use execute::{send, send_with_config};
