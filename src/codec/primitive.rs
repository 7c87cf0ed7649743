//! Flat wire primitives: little-endian binary integers and fixed-width
//! uppercase zero-padded ASCII hex, the two encodings every other codec
//! module builds on.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::Error;

/// Write `value` as `width` little-endian bytes, appending to `out`.
pub fn write_u16_le(out: &mut Vec<u8>, value: u16) {
    let mut buf = [0u8; 2];
    LittleEndian::write_u16(&mut buf, value);
    out.extend_from_slice(&buf);
}

pub fn write_u32_le(out: &mut Vec<u8>, value: u32) {
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Read a little-endian u16 from `bytes`, which must be exactly 2 bytes.
pub fn read_u16_le(bytes: &[u8]) -> Result<u16, Error> {
    if bytes.len() != 2 {
        return Err(Error::ProtocolError(format!(
            "expected 2 bytes for u16, got {}",
            bytes.len()
        )));
    }
    Ok(LittleEndian::read_u16(bytes))
}

pub fn read_u32_le(bytes: &[u8]) -> Result<u32, Error> {
    if bytes.len() != 4 {
        return Err(Error::ProtocolError(format!(
            "expected 4 bytes for u32, got {}",
            bytes.len()
        )));
    }
    Ok(LittleEndian::read_u32(bytes))
}

/// Render `value` as `width` uppercase hex digits, zero-padded.
pub fn hex_upper(value: u32, width: usize) -> String {
    format!("{:0>width$X}", value, width = width)
}

/// Render `value` as `width` zero-padded decimal digits.
pub fn decimal(value: u32, width: usize) -> String {
    format!("{:0>width$}", value, width = width)
}

/// Parse exactly `width` ASCII hex digits into an integer.
pub fn parse_hex(digits: &str, width: usize) -> Result<u32, Error> {
    if digits.len() != width || !digits.is_ascii() {
        return Err(Error::ProtocolError(format!(
            "expected {} hex digits, got {:?}",
            width, digits
        )));
    }
    u32::from_str_radix(digits, 16)
        .map_err(|e| Error::ProtocolError(format!("invalid hex digits {:?}: {}", digits, e)))
}

/// Parse exactly `width` ASCII decimal digits into an integer.
pub fn parse_decimal(digits: &str, width: usize) -> Result<u32, Error> {
    if digits.len() != width || !digits.is_ascii() {
        return Err(Error::ProtocolError(format!(
            "expected {} decimal digits, got {:?}",
            width, digits
        )));
    }
    digits
        .parse::<u32>()
        .map_err(|e| Error::ProtocolError(format!("invalid decimal digits {:?}: {}", digits, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_round_trip() {
        let mut buf = Vec::new();
        write_u16_le(&mut buf, 0x1234);
        assert_eq!(buf, vec![0x34, 0x12]);
        assert_eq!(read_u16_le(&buf).unwrap(), 0x1234);
    }

    #[test]
    fn u32_round_trip() {
        let mut buf = Vec::new();
        write_u32_le(&mut buf, 0x0001_2AF0);
        assert_eq!(read_u32_le(&buf).unwrap(), 0x0001_2AF0);
    }

    #[test]
    fn hex_and_decimal_formatting() {
        assert_eq!(hex_upper(0x1A, 4), "001A");
        assert_eq!(decimal(3, 4), "0003");
    }

    #[test]
    fn parse_hex_rejects_wrong_width() {
        assert!(parse_hex("1A", 4).is_err());
        assert_eq!(parse_hex("001A", 4).unwrap(), 0x1A);
    }

    #[test]
    fn parse_decimal_rejects_wrong_width() {
        assert!(parse_decimal("3", 4).is_err());
        assert_eq!(parse_decimal("0003", 4).unwrap(), 3);
    }
}
