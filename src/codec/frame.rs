//! Frame builder: assembles a complete wire frame for one of the four
//! variants (3E/4E × binary/ASCII) from a command, target, and payload.

use crate::codec::primitive::{hex_upper, write_u16_le};
use crate::constant::Target;
use crate::error::Error;

/// Wire encoding selected for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Binary,
    Ascii,
}

/// Frame variant: whether a sequence number is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    E3,
    E4,
}

/// Builds one complete frame ready for a single transport write.
///
/// `payload` for binary encoding is raw bytes; for ASCII encoding it must
/// already be ASCII hex digits, matching `§4.1`'s contract that callers
/// emit their payload in the profile's native form.
pub fn build(
    kind: FrameKind,
    encoding: Encoding,
    seq: u8,
    target: Target,
    monitor_timer: u16,
    command: u16,
    subcommand: u16,
    payload: &[u8],
) -> Result<Vec<u8>, Error> {
    match encoding {
        Encoding::Binary => build_binary(kind, seq, target, monitor_timer, command, subcommand, payload),
        Encoding::Ascii => build_ascii(kind, seq, target, monitor_timer, command, subcommand, payload),
    }
}

fn build_binary(
    kind: FrameKind,
    seq: u8,
    target: Target,
    monitor_timer: u16,
    command: u16,
    subcommand: u16,
    payload: &[u8],
) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(16 + payload.len());
    match kind {
        FrameKind::E3 => {
            out.extend_from_slice(&[0x50, 0x00]);
        }
        FrameKind::E4 => {
            out.extend_from_slice(&[0x54, 0x00]);
            out.push(seq);
            out.push(0);
            out.extend_from_slice(&[0x00, 0x00]);
        }
    }
    out.push(target.network);
    out.push(target.pc);
    write_u16_le(&mut out, target.io);
    out.push(target.multidrop);

    let length = payload.len() + 6;
    write_u16_le(&mut out, length as u16);
    write_u16_le(&mut out, monitor_timer);
    write_u16_le(&mut out, command);
    write_u16_le(&mut out, subcommand);
    out.extend_from_slice(payload);

    if out.len() >= 8194 {
        return Err(Error::InvalidArgument(format!(
            "frame of {} bytes exceeds the 8194 byte limit",
            out.len()
        )));
    }
    Ok(out)
}

fn build_ascii(
    kind: FrameKind,
    seq: u8,
    target: Target,
    monitor_timer: u16,
    command: u16,
    subcommand: u16,
    payload: &[u8],
) -> Result<Vec<u8>, Error> {
    let payload = std::str::from_utf8(payload)
        .map_err(|_| Error::InvalidArgument("ASCII payload must be valid UTF-8 hex".into()))?;

    let mut out = String::with_capacity(32 + payload.len());
    match kind {
        FrameKind::E3 => out.push_str("5000"),
        FrameKind::E4 => {
            out.push_str("5400");
            out.push_str(&hex_upper(seq as u32, 4));
            out.push_str("0000");
        }
    }
    out.push_str(&hex_upper(target.network as u32, 2));
    out.push_str(&hex_upper(target.pc as u32, 2));
    out.push_str(&hex_upper(target.io as u32, 4));
    out.push_str(&hex_upper(target.multidrop as u32, 2));

    let length = payload.len() + 12;
    out.push_str(&hex_upper(length as u32, 4));
    out.push_str(&hex_upper(monitor_timer as u32, 4));
    out.push_str(&hex_upper(command as u32, 4));
    out.push_str(&hex_upper(subcommand as u32, 4));
    out.push_str(payload);

    if out.len() >= 8194 {
        return Err(Error::InvalidArgument(format!(
            "frame of {} characters exceeds the 8194 byte limit",
            out.len()
        )));
    }
    Ok(out.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::Target;

    #[test]
    fn binary_4e_read_bit_scenario() {
        let target = Target::new(1, 1, 1, 1);
        let mut payload = Vec::new();
        crate::codec::address::write_binary(&mut payload, crate::constant::DeviceCode::M, 100)
            .unwrap();
        write_u16_le(&mut payload, 8);
        let frame = build(
            FrameKind::E4,
            Encoding::Binary,
            0,
            target,
            6,
            0x0401,
            0x0001,
            &payload,
        )
        .unwrap();
        let expected: Vec<u8> = vec![
            0x54, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x01, 0x00, 0x01, 0x0C, 0x00, 0x06,
            0x00, 0x01, 0x04, 0x01, 0x00, 0x64, 0x00, 0x00, 0x90, 0x08, 0x00,
        ];
        assert_eq!(frame, expected);
    }

    #[test]
    fn ascii_3e_read_word_scenario() {
        let target = Target::new(0, 0, 0, 0);
        let mut payload = String::new();
        crate::codec::address::write_ascii(&mut payload, crate::constant::DeviceCode::TN, 100)
            .unwrap();
        payload.push_str("0003");
        let frame = build(
            FrameKind::E3,
            Encoding::Ascii,
            0,
            target,
            6,
            0x0401,
            0x0000,
            payload.as_bytes(),
        )
        .unwrap();
        let text = String::from_utf8(frame).unwrap();
        assert_eq!(&text[22..], "04010000TN0001000003");
    }

    #[test]
    fn oversized_frame_rejected() {
        let target = Target::default();
        let payload = vec![0u8; 8200];
        let result = build(FrameKind::E3, Encoding::Binary, 0, target, 0, 0, 0, &payload);
        assert!(result.is_err());
    }
}
