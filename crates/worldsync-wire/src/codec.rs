//! Snapshot codec for the worldsync wire format

use bytes::{Buf, BufMut};

use worldsync_core::{Message, SyncError, SyncResult};

/// Encoded snapshot size in bytes
pub const PACKET_SIZE: usize = 4;

/// Serialize a snapshot into its fixed 4-byte representation
pub fn encode(message: &Message) -> [u8; PACKET_SIZE] {
    let mut buf = [0u8; PACKET_SIZE];
    let mut cursor = &mut buf[..];

    cursor.put_u16(message.time);
    cursor.put_u8(u8::from(message.paused));
    cursor.put_u8(u8::from(message.raining));

    buf
}

/// Parse a snapshot from a datagram payload.
///
/// The first [`PACKET_SIZE`] bytes govern; trailing bytes are ignored.
/// Boolean fields treat any nonzero byte as true.
pub fn decode(buf: &[u8]) -> SyncResult<Message> {
    if buf.len() < PACKET_SIZE {
        return Err(SyncError::BufferTooShort {
            expected: PACKET_SIZE,
            actual: buf.len(),
        });
    }

    let mut cursor = buf;
    let time = cursor.get_u16();
    let paused = cursor.get_u8() != 0;
    let raining = cursor.get_u8() != 0;

    Ok(Message {
        time,
        paused,
        raining,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_encode_is_fixed_width() {
        let bytes = encode(&Message::new(u16::MAX, true, true));
        assert_eq!(bytes.len(), PACKET_SIZE);
    }

    #[test]
    fn test_encoding_vectors() {
        assert_eq!(
            encode(&Message::new(0, false, false)),
            [0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            encode(&Message::new(23999, false, true)),
            [0x5D, 0xBF, 0x00, 0x01]
        );
    }

    #[test]
    fn test_decode_too_short() {
        for len in 0..PACKET_SIZE {
            let buf = vec![0u8; len];
            let result = decode(&buf);
            assert!(matches!(
                result,
                Err(SyncError::BufferTooShort { expected: 4, actual }) if actual == len
            ));
        }
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let message = decode(&[0x17, 0x70, 0x00, 0x01, 0xFF, 0xFF]).unwrap();
        assert_eq!(message.time, 6000);
        assert!(!message.paused);
        assert!(message.raining);
    }

    #[test]
    fn test_decode_nonzero_booleans() {
        let message = decode(&[0x00, 0x00, 0x02, 0x7F]).unwrap();
        assert!(message.paused);
        assert!(message.raining);
    }

    proptest! {
        #[test]
        fn prop_roundtrip(time in 0u16..=u16::MAX, paused: bool, raining: bool) {
            let message = Message::new(time, paused, raining);
            let bytes = encode(&message);
            let decoded = decode(&bytes).unwrap();

            prop_assert_eq!(decoded, message);
            // paused is excluded from equality but must survive the wire
            prop_assert_eq!(decoded.paused, paused);
            prop_assert_eq!(bytes[2], u8::from(paused));
        }
    }
}
