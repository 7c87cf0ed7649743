//! Device-address encoding: `(DeviceCode, address)` pairs in both wire
//! encodings, per the rules in §4.3 — hex vs decimal ASCII address, and
//! the 3-byte binary address form shared by every 2-byte-addressed command.

use byteorder::{ByteOrder, LittleEndian};

use crate::constant::DeviceCode;
use crate::error::Error;

/// Appends the 3-byte LE address followed by the device code byte, the
/// layout shared by every binary device-address reference in this codec.
pub fn write_binary(out: &mut Vec<u8>, device: DeviceCode, address: u32) -> Result<(), Error> {
    device.require_narrow()?;
    if address > 0x00FF_FFFF {
        return Err(Error::InvalidArgument(format!(
            "address {:#x} does not fit the 3-byte binary address form",
            address
        )));
    }
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, address);
    out.extend_from_slice(&buf[..3]);
    out.push(device as u8);
    Ok(())
}

/// Appends the device name (2-char, `*`-padded) followed by a 6-character
/// address field, hex or decimal depending on the device code.
pub fn write_ascii(out: &mut String, device: DeviceCode, address: u32) -> Result<(), Error> {
    device.require_narrow()?;
    let name = device.name();
    if name.len() == 1 {
        out.push_str(name);
        out.push('*');
    } else {
        out.push_str(name);
    }
    if device.is_hex_addressed() {
        out.push_str(&crate::codec::primitive::hex_upper(address, 6));
    } else {
        out.push_str(&crate::codec::primitive::decimal(address, 6));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_address_layout() {
        let mut out = Vec::new();
        write_binary(&mut out, DeviceCode::M, 0x64).unwrap();
        assert_eq!(out, vec![0x64, 0x00, 0x00, DeviceCode::M as u8]);
    }

    #[test]
    fn binary_rejects_wide_only_device() {
        let mut out = Vec::new();
        assert!(write_binary(&mut out, DeviceCode::RD, 0).is_err());
    }

    #[test]
    fn ascii_hex_addressed_device() {
        let mut out = String::new();
        write_ascii(&mut out, DeviceCode::X, 0x1A).unwrap();
        assert_eq!(out, "X*00001A");
    }

    #[test]
    fn ascii_decimal_addressed_device() {
        let mut out = String::new();
        write_ascii(&mut out, DeviceCode::TN, 100).unwrap();
        assert_eq!(out, "TN000100");
    }
}
