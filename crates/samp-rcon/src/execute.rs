use crate::client_config::RconClientConfig;
use crate::client_io::DatagramSocket;
use crate::connect::{open_socket, resolve};
use crate::packet::{RconRequest, check_fields, command_name};
use crate::{client::RconClient, errors::RconError};

/// Runs one RCON command against `host` (`ip:port` or `name:port`) with the
/// default configuration and returns the server's reply text.
///
/// ```no_run
/// # async fn run() -> Result<(), samp_rcon::errors::RconError> {
/// let reply = samp_rcon::send("127.0.0.1:7777", "changeme", "players").await?;
/// println!("{reply}");
/// # Ok(())
/// # }
/// ```
pub async fn send(host: &str, password: &str, command: &str) -> Result<String, RconError> {
    send_with_config(RconClientConfig::new(host, password), command).await
}

/// Like [`send`], with explicit timeouts and response limits.
///
/// Field lengths are checked before the host is resolved, so an oversize
/// password or command causes no DNS lookup and no socket. The socket lives only for
/// this call and is closed on every return path, including cancellation.
pub async fn send_with_config(client_config: RconClientConfig, command: &str) -> Result<String, RconError> {
    check_fields(&client_config.password, command)?;
    let endpoint = resolve(&client_config.address, client_config.io_timeout).await?;
    let request = RconRequest::new(endpoint, &client_config.password, command)?;
    let socket = open_socket(endpoint).await?;

    let mut client = RconClient::new(socket, endpoint).with_client_config(client_config);
    client.execute_request(&request).await
}

impl<S: DatagramSocket> RconClient<S> {
    pub async fn execute(&mut self, command: &str) -> Result<String, RconError> {
        let request = RconRequest::new(self.endpoint, &self.client_config.password, command)?;
        self.execute_request(&request).await
    }

    /// Executes a single command and closes the socket.
    pub async fn execute_once(mut self, command: &str) -> Result<String, RconError> {
        self.execute(command).await
    }

    /// Sends the request and collects the reply.
    ///
    /// Every datagram with a payload contributes one line to the result; the
    /// first datagram with an empty payload ends the response. Any error
    /// discards what was collected so far.
    pub(crate) async fn execute_request(&mut self, request: &RconRequest) -> Result<String, RconError> {
        log::debug!("Executing command: {:?}", command_name(&String::from_utf8_lossy(request.command())));
        self.write_request(request).await?;

        let max_datagrams = self.client_config.max_datagrams;
        let max_bytes = self.client_config.max_response_bytes;
        let mut out: Vec<u8> = Vec::new();
        let mut received = 0;

        loop {
            if received >= max_datagrams {
                return Err(RconError::ResponseLimit(format!(
                    "no terminating datagram within {max_datagrams} datagrams"
                )));
            }

            let reply = self.read_reply().await?;
            received += 1;

            if reply.endpoint != self.endpoint {
                log::debug!("Reply header names {} instead of {}", reply.endpoint, self.endpoint);
            }

            if reply.is_terminator() {
                log::debug!("Received terminator after {} datagrams", received - 1);
                break;
            }

            let separator = usize::from(!out.is_empty());
            if out.len() + separator + reply.payload.len() > max_bytes {
                return Err(RconError::ResponseLimit(format!(
                    "response larger than {max_bytes} bytes"
                )));
            }

            if separator == 1 {
                out.push(b'\n');
            }
            out.extend_from_slice(&reply.payload);
        }

        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
