use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

use crate::common::{HEADER_SIZE, LENGTH_PREFIX_SIZE, MAX_FIELD_LEN, Opcode, SIGNATURE};
use crate::errors::RconError;

/// An RCON command addressed to one server.
///
/// Layout on the wire, all integers little-endian:
///
/// | Offset | Size | Field |
/// |--------|------|-------|
/// | 0      | 4    | `"SAMP"` |
/// | 4      | 4    | server IPv4 octets |
/// | 8      | 2    | server port |
/// | 10     | 1    | opcode `'x'` |
/// | 11     | 2    | password length N |
/// | 13     | N    | password |
/// | 13+N   | 2    | command length M |
/// | 15+N   | M    | command |
#[derive(Clone, PartialEq, Eq)]
pub struct RconRequest {
    endpoint: SocketAddrV4,
    password: Vec<u8>,
    command: Vec<u8>,
}

impl RconRequest {
    /// Fails with `RconError::FieldTooLong` if either field exceeds 65535 bytes.
    pub fn new(endpoint: SocketAddrV4, password: &str, command: &str) -> Result<Self, RconError> {
        check_fields(password, command)?;

        Ok(Self {
            endpoint,
            password: password.as_bytes().to_vec(),
            command: command.as_bytes().to_vec(),
        })
    }

    pub fn endpoint(&self) -> SocketAddrV4 {
        self.endpoint
    }

    pub fn password(&self) -> &[u8] {
        &self.password
    }

    pub fn command(&self) -> &[u8] {
        &self.command
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + LENGTH_PREFIX_SIZE + self.password.len() + LENGTH_PREFIX_SIZE + self.command.len()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.encoded_len());

        put_header(&mut buffer, self.endpoint);
        // lengths were checked in `new`
        buffer.extend_from_slice(&(self.password.len() as u16).to_le_bytes());
        buffer.extend_from_slice(&self.password);
        buffer.extend_from_slice(&(self.command.len() as u16).to_le_bytes());
        buffer.extend_from_slice(&self.command);

        buffer
    }

    /// Parses a request datagram, as a server would.
    pub fn decode(datagram: &[u8]) -> Result<Self, RconError> {
        let mut cursor = datagram;
        let endpoint = take_header(&mut cursor)?;
        let password = take_prefixed(&mut cursor, "password")?.to_vec();
        let command = take_prefixed(&mut cursor, "command")?.to_vec();

        if !cursor.is_empty() {
            return Err(RconError::Decode(format!("{} unexpected trailing bytes", cursor.len())));
        }

        Ok(Self { endpoint, password, command })
    }
}

impl fmt::Debug for RconRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RconRequest")
            .field("endpoint", &self.endpoint)
            .field("password", &"<redacted>")
            .field("command", &command_name(&String::from_utf8_lossy(&self.command)))
            .finish()
    }
}

/// One reply datagram: the request header echoed back, a 2-byte
/// little-endian length, then that many payload bytes.
///
/// An empty payload marks the end of a multi-datagram response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RconReply {
    pub endpoint: SocketAddrV4,
    pub payload: Vec<u8>,
}

impl RconReply {
    pub fn new(endpoint: SocketAddrV4, payload: impl Into<Vec<u8>>) -> Self {
        Self { endpoint, payload: payload.into() }
    }

    pub fn terminator(endpoint: SocketAddrV4) -> Self {
        Self::new(endpoint, Vec::new())
    }

    pub fn is_terminator(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn decode(datagram: &[u8]) -> Result<Self, RconError> {
        if datagram.len() < HEADER_SIZE + LENGTH_PREFIX_SIZE {
            return Err(RconError::Decode(format!(
                "datagram of {} bytes is shorter than the {} byte header",
                datagram.len(),
                HEADER_SIZE + LENGTH_PREFIX_SIZE
            )));
        }

        let mut cursor = datagram;
        let endpoint = take_header(&mut cursor)?;
        let payload = take_prefixed(&mut cursor, "payload")?.to_vec();

        if !cursor.is_empty() {
            log::warn!("Ignoring {} bytes after the declared reply payload", cursor.len());
        }

        Ok(Self { endpoint, payload })
    }

    pub fn encode(&self) -> Result<Vec<u8>, RconError> {
        check_field_len("payload", self.payload.len())?;

        let mut buffer = Vec::with_capacity(HEADER_SIZE + LENGTH_PREFIX_SIZE + self.payload.len());
        put_header(&mut buffer, self.endpoint);
        buffer.extend_from_slice(&(self.payload.len() as u16).to_le_bytes());
        buffer.extend_from_slice(&self.payload);

        Ok(buffer)
    }
}

/// The first word of a command, which is all that may be logged:
/// arguments such as the new password in `rcon_password <new>` are secret.
pub fn command_name(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or("")
}

/// Checks both fields against the 16-bit length prefix without building a request.
pub(crate) fn check_fields(password: &str, command: &str) -> Result<(), RconError> {
    check_field_len("password", password.len())?;
    check_field_len("command", command.len())
}

fn check_field_len(field: &'static str, len: usize) -> Result<(), RconError> {
    if len > MAX_FIELD_LEN {
        return Err(RconError::FieldTooLong { field, len, max: MAX_FIELD_LEN });
    }
    Ok(())
}

fn put_header(buffer: &mut Vec<u8>, endpoint: SocketAddrV4) {
    buffer.extend_from_slice(SIGNATURE);
    buffer.extend_from_slice(&endpoint.ip().octets());
    buffer.extend_from_slice(&endpoint.port().to_le_bytes());
    buffer.push(Opcode::ExecuteCommand.into());
}

fn take<'a>(cursor: &mut &'a [u8], len: usize, what: &str) -> Result<&'a [u8], RconError> {
    if cursor.len() < len {
        return Err(RconError::Decode(format!(
            "{what} needs {len} bytes but only {} remain",
            cursor.len()
        )));
    }
    let (head, tail) = cursor.split_at(len);
    *cursor = tail;
    Ok(head)
}

fn take_u16_le(cursor: &mut &[u8], what: &str) -> Result<u16, RconError> {
    let bytes = take(cursor, LENGTH_PREFIX_SIZE, what)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn take_header(cursor: &mut &[u8]) -> Result<SocketAddrV4, RconError> {
    let signature = take(cursor, SIGNATURE.len(), "signature")?;
    if signature != SIGNATURE {
        return Err(RconError::Decode(format!("bad signature {signature:02x?}")));
    }

    let octets = take(cursor, 4, "address")?;
    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = take_u16_le(cursor, "port")?;
    let opcode = take(cursor, 1, "opcode")?[0];
    Opcode::try_from(opcode)?;

    Ok(SocketAddrV4::new(ip, port))
}

fn take_prefixed<'a>(cursor: &mut &'a [u8], what: &str) -> Result<&'a [u8], RconError> {
    let len = take_u16_le(cursor, what)? as usize;
    take(cursor, len, what)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn endpoint() -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 7777)
    }

    #[test]
    fn encodes_hostname_request_byte_for_byte() {
        let request = RconRequest::new(endpoint(), "secret", "hostname").unwrap();
        let bytes = request.encode();

        assert_eq!(bytes.len(), 29);
        assert_eq!(&bytes[0..4], b"SAMP");
        assert_eq!(&bytes[4..8], &[127, 0, 0, 1]);
        assert_eq!(&bytes[8..10], &7777u16.to_le_bytes());
        assert_eq!(bytes[10], 0x78);
        assert_eq!(&bytes[11..13], &[6, 0]);
        assert_eq!(&bytes[13..19], b"secret");
        assert_eq!(&bytes[19..21], &[8, 0]);
        assert_eq!(&bytes[21..29], b"hostname");
    }

    #[test]
    fn port_is_little_endian() {
        let request = RconRequest::new(SocketAddrV4::new(Ipv4Addr::new(10, 1, 2, 3), 0x1E61), "", "").unwrap();
        let bytes = request.encode();

        assert_eq!(&bytes[8..10], &[0x61, 0x1E]);
        assert_eq!(&bytes[4..8], &[10, 1, 2, 3]);
    }

    #[test]
    fn empty_fields_still_carry_length_prefixes() {
        let bytes = RconRequest::new(endpoint(), "", "").unwrap().encode();
        assert_eq!(bytes.len(), 15);
        assert_eq!(&bytes[11..15], &[0, 0, 0, 0]);
    }

    #[test]
    fn oversize_password_is_rejected() {
        let password = "p".repeat(MAX_FIELD_LEN + 1);
        let err = RconRequest::new(endpoint(), &password, "hostname").unwrap_err();

        assert!(matches!(err, RconError::FieldTooLong { field: "password", len, .. } if len == MAX_FIELD_LEN + 1));
    }

    #[test]
    fn oversize_command_is_rejected() {
        let command = "c".repeat(MAX_FIELD_LEN + 1);
        let err = RconRequest::new(endpoint(), "secret", &command).unwrap_err();

        assert!(matches!(err, RconError::FieldTooLong { field: "command", .. }));
    }

    #[test]
    fn max_length_fields_are_accepted() {
        let field = "a".repeat(MAX_FIELD_LEN);
        let request = RconRequest::new(endpoint(), &field, &field).unwrap();
        assert_eq!(request.encode().len(), HEADER_SIZE + 4 + 2 * MAX_FIELD_LEN);
    }

    #[test]
    fn debug_output_hides_password() {
        let request = RconRequest::new(endpoint(), "hunter2", "players").unwrap();
        let debug = format!("{request:?}");

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("players"));
    }

    #[test]
    fn debug_output_hides_command_arguments() {
        let request = RconRequest::new(endpoint(), "old", "rcon_password NewSecret123").unwrap();
        let debug = format!("{request:?}");

        assert!(!debug.contains("NewSecret123"));
        assert!(debug.contains("rcon_password"));
    }

    #[test]
    fn command_name_is_first_word() {
        assert_eq!(command_name("password  s3cret"), "password");
        assert_eq!(command_name(" players"), "players");
        assert_eq!(command_name(""), "");
    }

    #[test]
    fn decodes_reply_payload() {
        let mut datagram = Vec::new();
        datagram.extend_from_slice(b"SAMP");
        datagram.extend_from_slice(&[127, 0, 0, 1]);
        datagram.extend_from_slice(&7777u16.to_le_bytes());
        datagram.push(b'x');
        datagram.extend_from_slice(&5u16.to_le_bytes());
        datagram.extend_from_slice(b"hello");

        let reply = RconReply::decode(&datagram).unwrap();
        assert_eq!(reply.endpoint, endpoint());
        assert_eq!(reply.payload, b"hello");
        assert!(!reply.is_terminator());
    }

    #[test]
    fn reply_with_surplus_bytes_keeps_declared_payload() {
        let mut datagram = RconReply::new(endpoint(), "abc").encode().unwrap();
        datagram.extend_from_slice(&[0, 0, 0]);

        let reply = RconReply::decode(&datagram).unwrap();
        assert_eq!(reply.payload, b"abc");
    }

    #[test]
    fn short_reply_is_a_decode_error() {
        let err = RconReply::decode(b"SAMP\x7f\0\0\x01").unwrap_err();
        assert!(matches!(err, RconError::Decode(_)));
    }

    #[test]
    fn reply_length_past_end_is_a_decode_error() {
        let mut datagram = RconReply::new(endpoint(), "abc").encode().unwrap();
        datagram[11] = 10;

        assert!(matches!(RconReply::decode(&datagram), Err(RconError::Decode(_))));
    }

    #[test]
    fn reply_with_wrong_signature_is_a_decode_error() {
        let mut datagram = RconReply::new(endpoint(), "abc").encode().unwrap();
        datagram[0] = b'X';

        assert!(matches!(RconReply::decode(&datagram), Err(RconError::Decode(_))));
    }

    #[test]
    fn reply_with_wrong_opcode_is_a_decode_error() {
        let mut datagram = RconReply::new(endpoint(), "abc").encode().unwrap();
        datagram[10] = b'i';

        assert!(matches!(RconReply::decode(&datagram), Err(RconError::Decode(_))));
    }

    #[test]
    fn empty_reply_is_terminator() {
        let datagram = RconReply::terminator(endpoint()).encode().unwrap();
        assert_eq!(datagram.len(), HEADER_SIZE + LENGTH_PREFIX_SIZE);
        assert!(RconReply::decode(&datagram).unwrap().is_terminator());
    }

    #[test]
    fn request_decode_rejects_trailing_bytes() {
        let mut bytes = RconRequest::new(endpoint(), "pw", "cmd").unwrap().encode();
        bytes.push(0);

        assert!(matches!(RconRequest::decode(&bytes), Err(RconError::Decode(_))));
    }

    proptest! {
        #[test]
        fn encoded_length_and_prefixes_match_fields(
            octets in any::<[u8; 4]>(),
            port in any::<u16>(),
            password in ".{0,64}",
            command in ".{0,256}",
        ) {
            let endpoint = SocketAddrV4::new(Ipv4Addr::from(octets), port);
            let request = RconRequest::new(endpoint, &password, &command).unwrap();
            let bytes = request.encode();

            prop_assert_eq!(bytes.len(), 13 + password.len() + 2 + command.len());
            prop_assert_eq!(bytes.len(), request.encoded_len());
            prop_assert_eq!(&bytes[0..4], b"SAMP");
            prop_assert_eq!(bytes[10], b'x');

            let decoded = RconRequest::decode(&bytes).unwrap();
            prop_assert_eq!(decoded.endpoint(), endpoint);
            prop_assert_eq!(decoded.password().len(), password.len());
            prop_assert_eq!(decoded.command(), command.as_bytes());
        }
    }
}
