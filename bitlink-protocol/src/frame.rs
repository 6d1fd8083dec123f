//! Frame encoding and decoding for the bitlink protocol.
//!
//! Frame format:
//! - CMD (1 byte): 4-bit command shifted left 2
//! - LEN (1 byte): 6-bit payload length shifted left 1
//! - PAYLOAD (0-63 bytes): command-specific data, usually ASCII text
//! - FCS (2 bytes): set-bit count over CMD, LEN and PAYLOAD, big-endian

use heapless::Vec;

/// Maximum payload size in bytes.
///
/// 63 is the largest value the 6-bit LEN field can carry (2^6 - 1).
pub const MAX_PAYLOAD_SIZE: usize = 63;

/// Packed CMD and LEN bytes
pub const HEADER_SIZE: usize = 2;

/// The FCS can exceed 255 on a large frame (63 bytes of 0xFF weigh 504),
/// so it needs two bytes on the wire.
pub const CHECKSUM_SIZE: usize = 2;

/// Bytes in a wire frame besides the payload (CMD + LEN + FCS)
pub const OVERHEAD_BYTES: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Maximum complete wire frame size
pub const MAX_WIRE_SIZE: usize = MAX_PAYLOAD_SIZE + OVERHEAD_BYTES;

const COMMAND_MASK: u8 = 0x0F;
const COMMAND_SHIFT: u8 = 2;
const LENGTH_MASK: u8 = 0x3F;
const LENGTH_SHIFT: u8 = 1;

/// Errors that can occur during frame encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// LEN field names more payload bytes than the protocol allows
    LengthOutOfRange,
    /// Wire buffer is shorter than the LEN field claims
    Truncated,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Count the set bits across a byte slice.
///
/// This IS the checksum. Sender and receiver must agree on it exactly,
/// so both sides call this one function. Note what it cannot see: moving
/// a set bit from one byte to another leaves the weight unchanged, so
/// weight-preserving corruption passes undetected. The frame-wide parity
/// bit at the physical layer closes part of that gap (it catches any odd
/// number of flipped bits).
pub fn bit_weight(bytes: &[u8]) -> u16 {
    let mut weight: u16 = 0;
    for &byte in bytes {
        weight += byte.count_ones() as u16;
    }
    weight
}

/// Extract the command from packed wire byte 0
pub fn unpack_command(byte0: u8) -> u8 {
    (byte0 >> COMMAND_SHIFT) & COMMAND_MASK
}

/// Extract the payload length from packed wire byte 1
pub fn unpack_length(byte1: u8) -> u8 {
    (byte1 >> LENGTH_SHIFT) & LENGTH_MASK
}

/// A logical frame: one command plus its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw command value (0-15 on the wire; 0-7 are assigned)
    pub command: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given command and payload
    pub fn new(command: u8, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            command,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(command: u8) -> Self {
        Self {
            command,
            payload: Vec::new(),
        }
    }

    /// Total wire length of this frame (payload + overhead)
    pub fn wire_len(&self) -> usize {
        self.payload.len() + OVERHEAD_BYTES
    }

    /// View the payload as text.
    ///
    /// Payloads are length-delimited on the wire, so there is no
    /// terminator to strip; non-UTF-8 payloads render empty.
    pub fn payload_str(&self) -> &str {
        core::str::from_utf8(&self.payload).unwrap_or("")
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let wire_len = self.wire_len();
        if buffer.len() < wire_len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len();
        buffer[0] = (self.command & COMMAND_MASK) << COMMAND_SHIFT;
        buffer[1] = (length as u8 & LENGTH_MASK) << LENGTH_SHIFT;
        buffer[HEADER_SIZE..HEADER_SIZE + length].copy_from_slice(&self.payload);

        let fcs = bit_weight(&buffer[..HEADER_SIZE + length]);
        buffer[HEADER_SIZE + length] = (fcs >> 8) as u8;
        buffer[HEADER_SIZE + length + 1] = (fcs & 0xFF) as u8;

        Ok(wire_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_WIRE_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_WIRE_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Decode a wire frame back into a [`Frame`].
///
/// Returns the frame together with the checksum verdict. A frame with a
/// failed checksum is still returned (`false`) so the caller can report
/// the command it claimed to carry, but its payload must be treated as
/// untrusted. Structural problems (short buffer, impossible LEN) are
/// errors instead: there is no frame to salvage.
pub fn decode(wire: &[u8]) -> Result<(Frame, bool), FrameError> {
    if wire.len() < OVERHEAD_BYTES {
        return Err(FrameError::Truncated);
    }

    let length = unpack_length(wire[1]) as usize;
    if length > MAX_PAYLOAD_SIZE {
        return Err(FrameError::LengthOutOfRange);
    }
    if wire.len() < length + OVERHEAD_BYTES {
        return Err(FrameError::Truncated);
    }

    let command = unpack_command(wire[0]);
    let mut payload = Vec::new();
    payload
        .extend_from_slice(&wire[HEADER_SIZE..HEADER_SIZE + length])
        .map_err(|_| FrameError::LengthOutOfRange)?;

    let stored = ((wire[HEADER_SIZE + length] as u16) << 8) | wire[HEADER_SIZE + length + 1] as u16;
    let computed = bit_weight(&wire[..HEADER_SIZE + length]);

    Ok((Frame { command, payload }, stored == computed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty_payload() {
        let frame = Frame::empty(0); // Ping
        let mut buffer = [0u8; 8];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 4);
        assert_eq!(buffer[0], 0); // cmd 0 packed
        assert_eq!(buffer[1], 0); // length 0 packed
        assert_eq!(buffer[2], 0); // FCS high
        assert_eq!(buffer[3], 0); // FCS low (no set bits anywhere)
    }

    #[test]
    fn test_encode_temperature_frame() {
        // cmd 3 packs to 0b0011 << 2 = 0x0C, length 4 to 4 << 1 = 0x08.
        // Weight of [0x0C, 0x08, '2', '3', '.', '5'] is 2+1+3+4+4+4 = 18.
        let frame = Frame::new(3, b"23.5").unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        assert_eq!(&encoded[..], &[0x0C, 0x08, b'2', b'3', b'.', b'5', 0, 18]);
    }

    #[test]
    fn test_roundtrip() {
        let original = Frame::new(2, b"hello link").unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let (decoded, valid) = decode(&encoded).unwrap();
        assert!(valid);
        assert_eq!(decoded, original);
        assert_eq!(decoded.payload_str(), "hello link");
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        let result = Frame::new(2, &large_payload);
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_max_payload_accepted() {
        let payload = [0xFF; MAX_PAYLOAD_SIZE];
        let frame = Frame::new(7, &payload).unwrap();
        let encoded = frame.encode_to_vec().unwrap();
        assert_eq!(encoded.len(), MAX_WIRE_SIZE);

        // 63 bytes of 0xFF weigh 504, which needs both FCS bytes
        let (decoded, valid) = decode(&encoded).unwrap();
        assert!(valid);
        assert_eq!(decoded.payload.len(), MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn test_weight_changing_corruption_detected() {
        let frame = Frame::new(2, b"abc").unwrap();
        let mut encoded = frame.encode_to_vec().unwrap();
        encoded[2] |= 0x80; // set a clear bit: weight changes

        let (decoded, valid) = decode(&encoded).unwrap();
        assert!(!valid);
        // Command identity survives for diagnostics
        assert_eq!(decoded.command, 2);
    }

    #[test]
    fn test_weight_preserving_corruption_not_detected() {
        // Known weakness: moving a set bit between bytes keeps the total
        // weight, so the checksum cannot see it.
        let frame = Frame::new(2, &[0b0000_0001, 0b0000_0000]).unwrap();
        let mut encoded = frame.encode_to_vec().unwrap();
        encoded[2] = 0b0000_0000;
        encoded[3] = 0b0000_0001;

        let (_, valid) = decode(&encoded).unwrap();
        assert!(valid);
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(decode(&[0x0C, 0x08]), Err(FrameError::Truncated));
        // LEN claims 4 payload bytes but only 2 are present
        assert_eq!(
            decode(&[0x0C, 0x08, b'2', b'3', 0, 0]),
            Err(FrameError::Truncated)
        );
    }

    #[test]
    fn test_unpack_helpers() {
        assert_eq!(unpack_command(0x0C), 3);
        assert_eq!(unpack_length(0x08), 4);
        assert_eq!(unpack_command(0xFF), 0x0F);
        assert_eq!(unpack_length(0xFF), 0x3F);
    }

    #[test]
    fn test_bit_weight() {
        assert_eq!(bit_weight(&[]), 0);
        assert_eq!(bit_weight(&[0xFF]), 8);
        assert_eq!(bit_weight(&[0x0F, 0xF0]), 8);
        assert_eq!(bit_weight(&[0xFF; 63]), 504);
    }
}
