use crate::errors::RconError;

/// Every SA-MP datagram, in either direction, starts with this marker.
pub const SIGNATURE: &[u8; 4] = b"SAMP";

/// Signature, IPv4 address, port and opcode.
pub const HEADER_SIZE: usize = 4 + 4 + 2 + 1;

/// Size of the little-endian length prefix in front of variable fields.
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Longest password or command the length prefix can describe.
pub const MAX_FIELD_LEN: usize = u16::MAX as usize;

/// Per-datagram receive capacity.
pub const MAX_DATAGRAM_SIZE: usize = 2048;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Opcode {
    ExecuteCommand,
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        match opcode {
            Opcode::ExecuteCommand => b'x',
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = RconError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            b'x' => Ok(Opcode::ExecuteCommand),
            other => Err(RconError::Decode(format!("unexpected opcode 0x{other:02x}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_command_is_lowercase_x() {
        let byte: u8 = Opcode::ExecuteCommand.into();
        assert_eq!(byte, 0x78);
        assert_eq!(Opcode::try_from(0x78).unwrap(), Opcode::ExecuteCommand);
    }

    #[test]
    fn unknown_opcode_is_a_decode_error() {
        assert!(matches!(Opcode::try_from(b'i'), Err(RconError::Decode(_))));
    }
}
