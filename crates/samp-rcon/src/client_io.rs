use std::future::Future;
use std::io;

use tokio::{net::UdpSocket, time::timeout};

use crate::common::MAX_DATAGRAM_SIZE;
use crate::packet::{RconReply, RconRequest};
use crate::{client::RconClient, errors::RconError};

/// A connected datagram transport: every send goes to, and every receive
/// comes from, the one peer the socket was connected to.
pub trait DatagramSocket {
    fn send_datagram(&mut self, buf: &[u8]) -> impl Future<Output = io::Result<usize>> + Send;

    /// Receives one datagram. Bytes that do not fit in `buf` are discarded.
    fn recv_datagram(&mut self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;
}

impl DatagramSocket for UdpSocket {
    async fn send_datagram(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.send(buf).await
    }

    async fn recv_datagram(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.recv(buf).await
    }
}

impl<S: DatagramSocket> RconClient<S> {
    /// Sends the encoded request as a single datagram.
    /// The send is waited on for at most `io_timeout`, after which `RconError::Timeout` is returned.
    pub(crate) async fn write_request(&mut self, request: &RconRequest) -> Result<(), RconError> {
        let buf = request.encode();
        let sent = timeout(self.client_config.io_timeout, self.socket.send_datagram(&buf))
            .await
            .map_err(|_| RconError::Timeout)?
            .map_err(RconError::Send)?;

        if sent != buf.len() {
            return Err(RconError::Send(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {} of {} bytes", sent, buf.len()),
            )));
        }

        log::debug!("Sent {:?} ({} bytes)", request, sent);
        Ok(())
    }

    /// Receives and decodes one reply datagram.
    ///
    /// The buffer is one byte larger than `MAX_DATAGRAM_SIZE` so that a
    /// datagram the OS had to truncate is detected instead of decoded.
    pub(crate) async fn read_reply(&mut self) -> Result<RconReply, RconError> {
        log::debug!("Waiting for datagram...");
        let mut buf = [0u8; MAX_DATAGRAM_SIZE + 1];
        let len = timeout(self.client_config.io_timeout, self.socket.recv_datagram(&mut buf))
            .await
            .map_err(|_| RconError::Timeout)?
            .map_err(RconError::Receive)?;

        if len > MAX_DATAGRAM_SIZE {
            return Err(RconError::OversizeResponse { capacity: MAX_DATAGRAM_SIZE });
        }

        let reply = RconReply::decode(&buf[..len]);
        log::debug!("Received datagram: {:?}", reply);
        reply
    }
}
