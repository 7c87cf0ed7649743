//! Frame parser: accumulates bytes from the transport in a carry buffer and
//! emits fully-formed `ResponseRecord`s in wire order.

use crate::codec::frame::Encoding;
use crate::codec::primitive::{parse_hex, read_u16_le};
use crate::constant::{EndCode, Target};
use crate::error::Error;

/// Carry buffer is capped at twice the 8194-byte frame limit.
const MAX_CARRY: usize = 16 * 1024;

/// A fully parsed response, still carrying its body in wire form.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub encoding: Encoding,
    pub seq: u16,
    pub target: Target,
    pub end_code: EndCode,
    pub body: Vec<u8>,
}

impl ResponseRecord {
    /// True when the body's leading command echo is `OnDemand` (0x2101),
    /// per the design note preferring a parsed-field check over a raw
    /// byte-prefix comparison.
    pub fn is_on_demand(&self) -> bool {
        match self.encoding {
            Encoding::Binary => self.body.len() >= 4 && self.body[..4] == [0x01, 0x21, 0x00, 0x00],
            Encoding::Ascii => self.body.len() >= 8 && &self.body[..8] == b"21010000",
        }
    }
}

/// Accumulates bytes across calls and produces records as soon as a full
/// frame is available. The carry buffer preserves any leftover bytes.
#[derive(Debug, Default)]
pub struct FrameParser {
    carry: Vec<u8>,
}

impl FrameParser {
    pub fn new() -> FrameParser {
        FrameParser { carry: Vec::new() }
    }

    /// Feed freshly read bytes and drain every record that can currently
    /// be completed from the carry buffer.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<ResponseRecord>, Error> {
        self.carry.extend_from_slice(bytes);
        let mut records = Vec::new();
        while let Some(record) = self.try_parse_one()? {
            records.push(record);
        }
        if self.carry.len() > MAX_CARRY {
            return Err(Error::ProtocolError(format!(
                "carry buffer grew past {} bytes without completing a frame",
                MAX_CARRY
            )));
        }
        Ok(records)
    }

    fn try_parse_one(&mut self) -> Result<Option<ResponseRecord>, Error> {
        if self.carry.is_empty() {
            return Ok(None);
        }
        match self.carry[0] {
            b'D' => self.try_parse_ascii(),
            0xD0 | 0xD4 => self.try_parse_binary(),
            other => Err(Error::ProtocolError(format!(
                "unrecognized leading byte {:#x}",
                other
            ))),
        }
    }

    fn try_parse_binary(&mut self) -> Result<Option<ResponseRecord>, Error> {
        if self.carry.len() < 2 {
            return Ok(None);
        }
        let is_4e = self.carry[0] == 0xD4;
        let header_len = if is_4e { 6 } else { 2 };
        if self.carry.len() < header_len {
            return Ok(None);
        }
        if self.carry[1] != 0x00 {
            return Err(Error::ProtocolError("malformed binary subheader".into()));
        }
        let seq = if is_4e {
            if self.carry[4] != 0x00 || self.carry[5] != 0x00 {
                return Err(Error::ProtocolError("malformed 4E reserved field".into()));
            }
            read_u16_le(&self.carry[2..4])?
        } else {
            0
        };

        if self.carry.len() < header_len + 9 {
            return Ok(None);
        }
        let body_start = header_len + 9;
        let network = self.carry[header_len];
        let pc = self.carry[header_len + 1];
        let io = read_u16_le(&self.carry[header_len + 2..header_len + 4])?;
        let multidrop = self.carry[header_len + 4];
        let length = read_u16_le(&self.carry[header_len + 5..header_len + 7])? as usize;
        let end_code = read_u16_le(&self.carry[header_len + 7..header_len + 9])?;

        if length < 2 {
            return Err(Error::ProtocolError("frame length shorter than end-code field".into()));
        }
        let body_len = length - 2;
        let total = body_start + body_len;
        if self.carry.len() < total {
            return Ok(None);
        }

        let body = self.carry[body_start..total].to_vec();
        self.carry.drain(..total);

        Ok(Some(ResponseRecord {
            encoding: Encoding::Binary,
            seq,
            target: Target::new(network, pc, io, multidrop),
            end_code: EndCode::from_u16(end_code),
            body,
        }))
    }

    fn try_parse_ascii(&mut self) -> Result<Option<ResponseRecord>, Error> {
        if self.carry.len() < 22 {
            return Ok(None);
        }
        let is_4e = match self.carry[1] {
            b'0' => false,
            b'4' => true,
            _ => return Err(Error::ProtocolError("malformed ASCII subheader".into())),
        };
        let header_len = if is_4e { 12 } else { 4 };
        let text = std::str::from_utf8(&self.carry)
            .map_err(|_| Error::ProtocolError("ASCII frame is not valid UTF-8".into()))?;

        let seq = if is_4e {
            parse_hex(&text[4..8], 4)? as u16
        } else {
            0
        };

        if text.len() < header_len + 18 {
            return Ok(None);
        }
        let mut cursor = header_len;
        let network = parse_hex(&text[cursor..cursor + 2], 2)? as u8;
        cursor += 2;
        let pc = parse_hex(&text[cursor..cursor + 2], 2)? as u8;
        cursor += 2;
        let io = parse_hex(&text[cursor..cursor + 4], 4)? as u16;
        cursor += 4;
        let multidrop = parse_hex(&text[cursor..cursor + 2], 2)? as u8;
        cursor += 2;
        let length = parse_hex(&text[cursor..cursor + 4], 4)? as usize;
        cursor += 4;
        let end_code = parse_hex(&text[cursor..cursor + 4], 4)? as u16;
        cursor += 4;

        if length < 4 {
            return Err(Error::ProtocolError("ASCII frame length shorter than end-code field".into()));
        }
        let body_len = length - 4;
        let total = cursor + body_len;
        if self.carry.len() < total {
            return Ok(None);
        }

        let body = text[cursor..total].as_bytes().to_vec();
        self.carry.drain(..total);

        Ok(Some(ResponseRecord {
            encoding: Encoding::Ascii,
            seq,
            target: Target::new(network, pc, io, multidrop),
            end_code: EndCode::from_u16(end_code),
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_binary_4e_scenario_1_response() {
        let mut parser = FrameParser::new();
        let mut bytes = vec![0xD4, 0x00, 0x00, 0x00, 0x00, 0x00];
        bytes.extend_from_slice(&[0x01, 0x01, 0x01, 0x00, 0x01]);
        bytes.extend_from_slice(&[0x06, 0x00]);
        bytes.extend_from_slice(&[0x00, 0x00]);
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x11]);
        let records = parser.feed(&bytes).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.target, Target::new(1, 1, 1, 1));
        assert!(record.end_code.is_success());
        assert_eq!(record.body, vec![0x00, 0x01, 0x00, 0x11]);
    }

    #[test]
    fn holds_partial_frame_in_carry() {
        let mut parser = FrameParser::new();
        let bytes = vec![0xD4, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01];
        let records = parser.feed(&bytes).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn rejects_unknown_leading_byte() {
        let mut parser = FrameParser::new();
        assert!(parser.feed(&[0xAA, 0x00]).is_err());
    }

    #[test]
    fn overflow_carry_is_protocol_error() {
        let mut parser = FrameParser::new();
        let junk = vec![0xD4, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut oversized = junk;
        oversized.extend(std::iter::repeat(0u8).take(MAX_CARRY + 1));
        let result = parser.feed(&oversized);
        assert!(result.is_err());
    }
}
