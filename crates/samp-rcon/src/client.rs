use std::net::SocketAddrV4;

use crate::RconClientConfig;

/// A UDP association with one SA-MP server.
///
/// `S` is the datagram transport, normally a connected `tokio::net::UdpSocket`.
/// The socket is owned exclusively by the client and closed when it is dropped.
#[derive(Debug)]
pub struct RconClient<S> {
    pub(crate) socket: S,
    pub(crate) endpoint: SocketAddrV4,
    pub(crate) client_config: RconClientConfig,
}

impl<S> RconClient<S> {
    pub fn new(socket: S, endpoint: SocketAddrV4) -> Self {
        RconClient {
            socket,
            endpoint,
            client_config: RconClientConfig::default(),
        }
    }

    pub fn with_client_config(mut self, config: RconClientConfig) -> Self {
        self.client_config = config;
        self
    }

    pub fn endpoint(&self) -> SocketAddrV4 {
        self.endpoint
    }

    pub fn client_config(&self) -> &RconClientConfig {
        &self.client_config
    }
}
