use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use crate::client_io::DatagramSocket;

/// Replays a fixed list of inbound datagrams and records outbound ones.
/// Once the script runs out, `recv_datagram` never completes, like a silent server.
/// Scripted `outbound` results replace the normal full-length send, one per call.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSocket {
    pub sent: Arc<Mutex<Vec<Vec<u8>>>>,
    pub inbound: VecDeque<io::Result<Vec<u8>>>,
    pub outbound: VecDeque<io::Result<usize>>,
    pub alive: Arc<()>,
}

impl ScriptedSocket {
    pub fn replying(inbound: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            inbound: inbound.into_iter().map(Ok).collect(),
            ..Default::default()
        }
    }
}

impl DatagramSocket for ScriptedSocket {
    async fn send_datagram(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.outbound.pop_front() {
            Some(Err(e)) => Err(e),
            Some(Ok(len)) => {
                self.sent.lock().unwrap().push(buf[..len.min(buf.len())].to_vec());
                Ok(len)
            }
            None => {
                self.sent.lock().unwrap().push(buf.to_vec());
                Ok(buf.len())
            }
        }
    }

    async fn recv_datagram(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inbound.pop_front() {
            Some(Ok(datagram)) => {
                // datagram sockets drop whatever does not fit
                let len = datagram.len().min(buf.len());
                buf[..len].copy_from_slice(&datagram[..len]);
                Ok(len)
            }
            Some(Err(e)) => Err(e),
            None => std::future::pending().await,
        }
    }
}
