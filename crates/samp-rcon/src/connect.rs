use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::net::{UdpSocket, lookup_host};
use tokio::time::timeout;

use crate::client_config::RconClientConfig;
use crate::{client::RconClient, errors::RconError};

impl RconClient<UdpSocket> {
    /// Resolves `client_config.address` and opens a UDP socket connected to it.
    pub async fn connect(client_config: RconClientConfig) -> Result<Self, RconError> {
        let endpoint = resolve(&client_config.address, client_config.io_timeout).await?;
        let socket = open_socket(endpoint).await?;

        Ok(RconClient::new(socket, endpoint).with_client_config(client_config))
    }
}

/// Resolves `host:port` to the first IPv4 endpoint it names.
///
/// The request header carries a 4-byte address, so IPv6 results are skipped.
pub async fn resolve(address: &str, limit: Duration) -> Result<SocketAddrV4, RconError> {
    let address_error = |reason: String| RconError::Address {
        address: address.to_string(),
        reason,
    };

    let addrs = timeout(limit, lookup_host(address))
        .await
        .map_err(|_| address_error("lookup timed out".to_string()))?
        .map_err(|e| address_error(e.to_string()))?;

    let endpoint = addrs
        .filter_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(v4),
            SocketAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| address_error("no IPv4 address found".to_string()))?;

    log::debug!("Resolved {} to {}", address, endpoint);
    Ok(endpoint)
}

pub(crate) async fn open_socket(endpoint: SocketAddrV4) -> Result<UdpSocket, RconError> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .await
        .map_err(RconError::Connect)?;
    socket.connect(endpoint).await.map_err(RconError::Connect)?;

    log::debug!("Opened {:?} for {}", socket.local_addr(), endpoint);
    Ok(socket)
}
