//! Typed command surface: one method per supported SLMP command, each
//! following the shared template from §4.7 — build payload, send, wait,
//! check the end-code, parse the body, return a typed result.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::codec::address;
use crate::codec::bits::{pack_bits, unpack_bits};
use crate::codec::frame::Encoding;
use crate::codec::parser::ResponseRecord;
use crate::codec::primitive::{decimal, hex_upper, parse_hex, write_u16_le, write_u32_le};
use crate::constant::{CommandCode, DeviceCode, Target, TypeCode};
use crate::error::Error;
use crate::session::{MonitorState, Profile, Session};
use crate::transport::Connectable;

/// One entry of a device-memory reference used by the random and block
/// commands: a device code plus its starting address.
#[derive(Debug, Clone, Copy)]
pub struct DeviceRef {
    pub device: DeviceCode,
    pub address: u32,
}

impl DeviceRef {
    pub fn new(device: DeviceCode, address: u32) -> DeviceRef {
        DeviceRef { device, address }
    }
}

/// A word or bit block reference for `Read_Block` / `Write_Block`: a
/// device reference plus how many units (words, or bits in units of 16).
#[derive(Debug, Clone, Copy)]
pub struct BlockRef {
    pub device_ref: DeviceRef,
    pub count: u16,
}

/// Mitsubishi CPU model identification, returned by `read_type_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub name: String,
    pub type_code: TypeCode,
}

/// The SLMP command surface over one session. Opens are reference-counted
/// per §4.6: nested `open()` calls are no-ops, and the matching number of
/// `close()` calls is required to actually tear the connection down.
pub struct Client<S: Connectable + 'static> {
    options: S::Options,
    profile: Profile,
    target: Mutex<Target>,
    open_count: AtomicUsize,
    session: Mutex<Option<Arc<Session<S>>>>,
}

impl<S: Connectable + 'static> Client<S> {
    /// Constructs and immediately opens a client against `options`.
    pub fn new(options: S::Options, profile: Profile, target: Target) -> Result<Client<S>, Error> {
        let client = Client {
            options,
            profile,
            target: Mutex::new(target),
            open_count: AtomicUsize::new(0),
            session: Mutex::new(None),
        };
        client.open()?;
        Ok(client)
    }

    /// Opens a fresh connection if this is the first outstanding open;
    /// otherwise just bumps the reference count.
    pub fn open(&self) -> Result<(), Error> {
        if self.open_count.fetch_add(1, Ordering::SeqCst) == 0 {
            let socket = match S::connect(&self.options) {
                Ok(s) => s,
                Err(e) => {
                    self.open_count.fetch_sub(1, Ordering::SeqCst);
                    return Err(e);
                }
            };
            let session = Session::open(socket, self.profile, self.target());
            *self.session.lock().unwrap() = Some(Arc::new(session));
        }
        Ok(())
    }

    /// Decrements the reference count; tears the connection down at zero.
    pub fn close(&self) {
        if self
            .open_count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                if n == 0 {
                    None
                } else {
                    Some(n - 1)
                }
            })
            == Ok(1)
        {
            if let Some(session) = self.session.lock().unwrap().take() {
                session.close();
            }
        }
    }

    pub fn target(&self) -> Target {
        *self.target.lock().unwrap()
    }

    pub fn set_target(&self, target: Target) {
        *self.target.lock().unwrap() = target;
        if let Ok(session) = self.session() {
            session.set_target(target);
        }
    }

    fn session(&self) -> Result<Arc<Session<S>>, Error> {
        self.session
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::PreconditionError("client session is not open".into()))
    }

    /// Shared command template: send, wait, and reject a non-success
    /// end-code before the caller ever sees the body.
    fn call(
        &self,
        monitor_timer: u16,
        command: u16,
        subcommand: u16,
        payload: &[u8],
    ) -> Result<ResponseRecord, Error> {
        let session = self.session()?;
        let seq = session.send(monitor_timer, command, subcommand, payload)?;
        let record = session.wait(seq, monitor_timer)?;
        if !record.end_code.is_success() {
            return Err(Error::CommunicationError(record.end_code));
        }
        Ok(record)
    }

    fn encoding(&self) -> Encoding {
        self.profile.encoding
    }

    /// Non-blocking check for a pushed on-demand frame.
    pub fn check_on_demand(&self) -> Result<Option<Vec<u8>>, Error> {
        let session = self.session()?;
        match session.take_on_demand() {
            None => Ok(None),
            Some(record) => {
                if !record.end_code.is_success() {
                    return Err(Error::CommunicationError(record.end_code));
                }
                Ok(Some(record.body[4..].to_vec()))
            }
        }
    }

    fn device_read_payload(&self, device: DeviceCode, address: u32, count: u16) -> Result<Vec<u8>, Error> {
        check_address_and_count(address, count)?;
        match self.encoding() {
            Encoding::Binary => {
                let mut payload = Vec::new();
                crate::codec::address::write_binary(&mut payload, device, address)?;
                write_u16_le(&mut payload, count);
                Ok(payload)
            }
            Encoding::Ascii => {
                let mut payload = String::new();
                address::write_ascii(&mut payload, device, address)?;
                payload.push_str(&decimal(count as u32, 4));
                Ok(payload.into_bytes())
            }
        }
    }

    /// `Device_Read`, bit mode: returns exactly `count` bit values.
    pub fn device_read_bit(
        &self,
        device: DeviceCode,
        addr: u32,
        count: u16,
        monitor_timer: u16,
    ) -> Result<Vec<bool>, Error> {
        let payload = self.device_read_payload(device, addr, count)?;
        let record = self.call(
            monitor_timer,
            CommandCode::DEVICE_READ.0,
            0x0001,
            &payload,
        )?;
        decode_bits_response(&record, count as usize)
    }

    /// `Device_Read`, word mode: returns exactly `count` u16 values.
    pub fn device_read_word(
        &self,
        device: DeviceCode,
        addr: u32,
        count: u16,
        monitor_timer: u16,
    ) -> Result<Vec<u16>, Error> {
        let payload = self.device_read_payload(device, addr, count)?;
        let record = self.call(
            monitor_timer,
            CommandCode::DEVICE_READ.0,
            0x0000,
            &payload,
        )?;
        decode_words_response(&record, count as usize)
    }

    /// `Device_Write`, bit mode.
    pub fn device_write_bit(
        &self,
        device: DeviceCode,
        addr: u32,
        values: &[bool],
        monitor_timer: u16,
    ) -> Result<(), Error> {
        let count = values.len() as u16;
        check_address_and_count(addr, count)?;
        let mut payload = Vec::new();
        match self.encoding() {
            Encoding::Binary => {
                crate::codec::address::write_binary(&mut payload, device, addr)?;
                write_u16_le(&mut payload, count);
                payload.extend(encode_bits_nibble(values));
            }
            Encoding::Ascii => {
                let mut text = String::new();
                address::write_ascii(&mut text, device, addr)?;
                text.push_str(&decimal(count as u32, 4));
                for &v in values {
                    text.push(if v { '1' } else { '0' });
                }
                payload = text.into_bytes();
            }
        }
        self.call(monitor_timer, CommandCode::DEVICE_WRITE.0, 0x0001, &payload)?;
        Ok(())
    }

    /// `Device_Write`, word mode.
    pub fn device_write_word(
        &self,
        device: DeviceCode,
        addr: u32,
        values: &[u16],
        monitor_timer: u16,
    ) -> Result<(), Error> {
        let count = values.len() as u16;
        check_address_and_count(addr, count)?;
        let mut payload = Vec::new();
        match self.encoding() {
            Encoding::Binary => {
                crate::codec::address::write_binary(&mut payload, device, addr)?;
                write_u16_le(&mut payload, count);
                for &v in values {
                    write_u16_le(&mut payload, v);
                }
            }
            Encoding::Ascii => {
                let mut text = String::new();
                address::write_ascii(&mut text, device, addr)?;
                text.push_str(&decimal(count as u32, 4));
                for &v in values {
                    text.push_str(&hex_upper(v as u32, 4));
                }
                payload = text.into_bytes();
            }
        }
        self.call(monitor_timer, CommandCode::DEVICE_WRITE.0, 0x0000, &payload)?;
        Ok(())
    }

    /// `Device_ReadRandom`: `word_count` 16-bit reads followed by
    /// `dword_count` 32-bit reads, one result vector per width.
    pub fn device_read_random(
        &self,
        words: &[DeviceRef],
        dwords: &[DeviceRef],
        monitor_timer: u16,
    ) -> Result<(Vec<u16>, Vec<u32>), Error> {
        if words.len() > 0xFF || dwords.len() > 0xFF {
            return Err(Error::InvalidArgument(
                "word/dword entry counts must each fit in a byte".into(),
            ));
        }
        let mut payload = Vec::new();
        match self.encoding() {
            Encoding::Binary => {
                payload.push(words.len() as u8);
                payload.push(dwords.len() as u8);
                for r in words.iter().chain(dwords.iter()) {
                    crate::codec::address::write_binary(&mut payload, r.device, r.address)?;
                }
            }
            Encoding::Ascii => {
                let mut text = String::new();
                text.push_str(&hex_upper(words.len() as u32, 2));
                text.push_str(&hex_upper(dwords.len() as u32, 2));
                for r in words.iter().chain(dwords.iter()) {
                    address::write_ascii(&mut text, r.device, r.address)?;
                }
                payload = text.into_bytes();
            }
        }
        let record = self.call(
            monitor_timer,
            CommandCode::DEVICE_READ_RANDOM.0,
            0x0000,
            &payload,
        )?;
        let body = decode_body_bytes(&record)?;
        let mut cursor = 0usize;
        let mut word_values = Vec::with_capacity(words.len());
        for _ in 0..words.len() {
            let chunk = body
                .get(cursor..cursor + 2)
                .ok_or_else(|| Error::ProtocolError("short ReadRandom word data".into()))?;
            word_values.push(crate::codec::primitive::read_u16_le(chunk)?);
            cursor += 2;
        }
        let mut dword_values = Vec::with_capacity(dwords.len());
        for _ in 0..dwords.len() {
            let chunk = body
                .get(cursor..cursor + 4)
                .ok_or_else(|| Error::ProtocolError("short ReadRandom dword data".into()))?;
            dword_values.push(crate::codec::primitive::read_u32_le(chunk)?);
            cursor += 4;
        }
        Ok((word_values, dword_values))
    }

    /// `Device_WriteRandom`, bit mode: one boolean per device reference.
    pub fn device_write_random_bit(
        &self,
        entries: &[(DeviceRef, bool)],
        monitor_timer: u16,
    ) -> Result<(), Error> {
        if entries.len() > 0xFF {
            return Err(Error::InvalidArgument("too many entries for a single byte count".into()));
        }
        let mut payload = Vec::new();
        match self.encoding() {
            Encoding::Binary => {
                payload.push(entries.len() as u8);
                for (r, value) in entries {
                    crate::codec::address::write_binary(&mut payload, r.device, r.address)?;
                    payload.push(if *value { 0x01 } else { 0x00 });
                }
            }
            Encoding::Ascii => {
                let mut text = String::new();
                text.push_str(&hex_upper(entries.len() as u32, 2));
                for (r, value) in entries {
                    address::write_ascii(&mut text, r.device, r.address)?;
                    text.push(if *value { '1' } else { '0' });
                }
                payload = text.into_bytes();
            }
        }
        self.call(
            monitor_timer,
            CommandCode::DEVICE_WRITE_RANDOM.0,
            0x0001,
            &payload,
        )?;
        Ok(())
    }

    /// `Device_WriteRandom`, word/dword mode.
    pub fn device_write_random_word(
        &self,
        words: &[(DeviceRef, u16)],
        dwords: &[(DeviceRef, u32)],
        monitor_timer: u16,
    ) -> Result<(), Error> {
        if words.len() > 0xFF || dwords.len() > 0xFF {
            return Err(Error::InvalidArgument(
                "word/dword entry counts must each fit in a byte".into(),
            ));
        }
        let mut payload = Vec::new();
        match self.encoding() {
            Encoding::Binary => {
                payload.push(words.len() as u8);
                payload.push(dwords.len() as u8);
                for (r, value) in words {
                    crate::codec::address::write_binary(&mut payload, r.device, r.address)?;
                    write_u16_le(&mut payload, *value);
                }
                for (r, value) in dwords {
                    crate::codec::address::write_binary(&mut payload, r.device, r.address)?;
                    write_u32_le(&mut payload, *value);
                }
            }
            Encoding::Ascii => {
                // Byte-swapped relative to binary's LE layout, per §4.7.
                let mut text = String::new();
                text.push_str(&hex_upper(words.len() as u32, 2));
                text.push_str(&hex_upper(dwords.len() as u32, 2));
                for (r, value) in words {
                    address::write_ascii(&mut text, r.device, r.address)?;
                    text.push_str(&hex_upper((*value >> 8) as u32, 2));
                    text.push_str(&hex_upper((*value & 0xFF) as u32, 2));
                }
                for (r, value) in dwords {
                    address::write_ascii(&mut text, r.device, r.address)?;
                    text.push_str(&hex_upper((*value >> 24) & 0xFF, 2));
                    text.push_str(&hex_upper((*value >> 16) & 0xFF, 2));
                    text.push_str(&hex_upper((*value >> 8) & 0xFF, 2));
                    text.push_str(&hex_upper(*value & 0xFF, 2));
                }
                payload = text.into_bytes();
            }
        }
        self.call(
            monitor_timer,
            CommandCode::DEVICE_WRITE_RANDOM.0,
            0x0000,
            &payload,
        )?;
        Ok(())
    }

    /// `Device_EntryMonitorDevice`: registers the reads `Execute_Monitor`
    /// will later repeat, per the `1 < total <= 192` constraint.
    pub fn entry_monitor_device(
        &self,
        words: &[DeviceRef],
        dwords: &[DeviceRef],
        monitor_timer: u16,
    ) -> Result<(), Error> {
        let total = words.len() + dwords.len();
        if total <= 1 || total > 192 {
            return Err(Error::InvalidArgument(format!(
                "entry-monitor device count {} must be in 2..=192",
                total
            )));
        }
        let mut payload = Vec::new();
        payload.push(words.len() as u8);
        payload.push(dwords.len() as u8);
        for r in words.iter().chain(dwords.iter()) {
            crate::codec::address::write_binary(&mut payload, r.device, r.address)?;
        }
        let session = self.session()?;
        if session.monitor_state() != MonitorState::Unregistered {
            return Err(Error::PreconditionError(
                "entry-monitor device list is already registered".into(),
            ));
        }
        self.call(
            monitor_timer,
            CommandCode::DEVICE_ENTRY_MONITOR.0,
            0x0000,
            &payload,
        )?;
        session.register_monitor(words.len() as u8, dwords.len() as u8);
        Ok(())
    }

    /// `Device_ExecuteMonitor`: repeats the last `entry_monitor_device`
    /// read using the counts it registered.
    pub fn execute_monitor(&self, monitor_timer: u16) -> Result<(Vec<u16>, Vec<u32>), Error> {
        let session = self.session()?;
        let (word_count, dword_count) = match session.monitor_state() {
            MonitorState::Registered {
                word_count,
                dword_count,
            } => (word_count, dword_count),
            MonitorState::Unregistered => {
                return Err(Error::PreconditionError(
                    "execute_monitor called without a prior entry_monitor_device".into(),
                ))
            }
        };
        let record = self.call(
            monitor_timer,
            CommandCode::DEVICE_EXECUTE_MONITOR.0,
            0x0000,
            &[],
        )?;
        let body = decode_body_bytes(&record)?;
        let mut cursor = 0usize;
        let mut words = Vec::with_capacity(word_count as usize);
        for _ in 0..word_count {
            let chunk = body
                .get(cursor..cursor + 2)
                .ok_or_else(|| Error::ProtocolError("short ExecuteMonitor word data".into()))?;
            words.push(crate::codec::primitive::read_u16_le(chunk)?);
            cursor += 2;
        }
        let mut dwords = Vec::with_capacity(dword_count as usize);
        for _ in 0..dword_count {
            let chunk = body
                .get(cursor..cursor + 4)
                .ok_or_else(|| Error::ProtocolError("short ExecuteMonitor dword data".into()))?;
            dwords.push(crate::codec::primitive::read_u32_le(chunk)?);
            cursor += 4;
        }
        Ok((words, dwords))
    }

    /// `Device_ReadBlock`: word blocks first, then bit blocks, each
    /// returning its own `Vec`.
    pub fn read_block(
        &self,
        word_blocks: &[BlockRef],
        bit_blocks: &[BlockRef],
        monitor_timer: u16,
    ) -> Result<(Vec<Vec<u16>>, Vec<Vec<bool>>), Error> {
        if word_blocks.len() + bit_blocks.len() > 120 {
            return Err(Error::InvalidArgument("block total exceeds 120".into()));
        }
        let mut payload = Vec::new();
        payload.push(word_blocks.len() as u8);
        payload.push(bit_blocks.len() as u8);
        for b in word_blocks.iter().chain(bit_blocks.iter()) {
            crate::codec::address::write_binary(&mut payload, b.device_ref.device, b.device_ref.address)?;
            write_u16_le(&mut payload, b.count);
        }
        let record = self.call(
            monitor_timer,
            CommandCode::DEVICE_READ_BLOCK.0,
            0x0000,
            &payload,
        )?;
        let body = decode_body_bytes(&record)?;
        let mut cursor = 0usize;
        let mut words = Vec::with_capacity(word_blocks.len());
        for b in word_blocks {
            let mut block = Vec::with_capacity(b.count as usize);
            for _ in 0..b.count {
                let chunk = body
                    .get(cursor..cursor + 2)
                    .ok_or_else(|| Error::ProtocolError("short ReadBlock word data".into()))?;
                block.push(crate::codec::primitive::read_u16_le(chunk)?);
                cursor += 2;
            }
            words.push(block);
        }
        let mut bits = Vec::with_capacity(bit_blocks.len());
        for b in bit_blocks {
            let byte_len = b.count as usize * 2;
            let chunk = body
                .get(cursor..cursor + byte_len)
                .ok_or_else(|| Error::ProtocolError("short ReadBlock bit data".into()))?;
            let mut block = unpack_bits(chunk);
            block.truncate(b.count as usize * 16);
            bits.push(block);
            cursor += byte_len;
        }
        Ok((words, bits))
    }

    /// `Device_WriteBlock`.
    pub fn write_block(
        &self,
        word_blocks: &[(BlockRef, Vec<u16>)],
        bit_blocks: &[(BlockRef, Vec<bool>)],
        monitor_timer: u16,
    ) -> Result<(), Error> {
        if word_blocks.len() + bit_blocks.len() > 120 {
            return Err(Error::InvalidArgument("block total exceeds 120".into()));
        }
        let mut payload = Vec::new();
        payload.push(word_blocks.len() as u8);
        payload.push(bit_blocks.len() as u8);
        for (b, _) in word_blocks.iter() {
            crate::codec::address::write_binary(&mut payload, b.device_ref.device, b.device_ref.address)?;
            write_u16_le(&mut payload, b.count);
        }
        for (b, _) in bit_blocks.iter() {
            crate::codec::address::write_binary(&mut payload, b.device_ref.device, b.device_ref.address)?;
            write_u16_le(&mut payload, b.count);
        }
        for (_, values) in word_blocks {
            for &v in values {
                write_u16_le(&mut payload, v);
            }
        }
        for (_, values) in bit_blocks {
            payload.extend(pack_bits(values));
        }
        self.call(
            monitor_timer,
            CommandCode::DEVICE_WRITE_BLOCK.0,
            0x0000,
            &payload,
        )?;
        Ok(())
    }

    /// `RemoteControl_ReadTypeName`.
    pub fn read_type_name(&self, monitor_timer: u16) -> Result<TypeName, Error> {
        let record = self.call(
            monitor_timer,
            CommandCode::REMOTE_READ_TYPE_NAME.0,
            0x0000,
            &[],
        )?;
        match self.encoding() {
            Encoding::Binary => {
                if record.body.len() < 18 {
                    return Err(Error::ProtocolError("short ReadTypeName body".into()));
                }
                let name = String::from_utf8_lossy(&record.body[..16]).trim_end().to_string();
                let code = crate::codec::primitive::read_u16_le(&record.body[16..18])?;
                Ok(TypeName {
                    name,
                    type_code: TypeCode::from_u16(code),
                })
            }
            Encoding::Ascii => {
                let text = std::str::from_utf8(&record.body)
                    .map_err(|_| Error::ProtocolError("ReadTypeName body is not UTF-8".into()))?;
                if text.len() < 20 {
                    return Err(Error::ProtocolError("short ReadTypeName body".into()));
                }
                let name = text[..16].trim_end().to_string();
                let code = parse_hex(&text[16..20], 4)? as u16;
                Ok(TypeName {
                    name,
                    type_code: TypeCode::from_u16(code),
                })
            }
        }
    }

    /// `SelfTest`: echoes `data` back and reports whether the PLC's echo
    /// matched exactly.
    pub fn self_test(&self, data: &str, monitor_timer: u16) -> Result<bool, Error> {
        if data.len() >= 960 || !data.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidArgument(
                "self-test data must be under 960 ASCII hex characters".into(),
            ));
        }
        let mut payload = Vec::new();
        write_u16_le(&mut payload, data.len() as u16);
        payload.extend_from_slice(data.as_bytes());
        let record = self.call(monitor_timer, CommandCode::SELF_TEST.0, 0x0000, &payload)?;
        if record.body.len() < 2 {
            return Err(Error::ProtocolError("short SelfTest body".into()));
        }
        let echoed_len = crate::codec::primitive::read_u16_le(&record.body[..2])? as usize;
        let echoed = &record.body[2..];
        Ok(echoed_len == data.len() && echoed == data.as_bytes())
    }

    /// `ClearError_Code`.
    pub fn clear_error(&self, monitor_timer: u16) -> Result<(), Error> {
        self.call(monitor_timer, CommandCode::CLEAR_ERROR.0, 0x0000, &[])?;
        Ok(())
    }

    /// `Memory_Read`: up to 480 2-byte units starting at `address`.
    pub fn memory_read(&self, address: u32, length: u16, monitor_timer: u16) -> Result<Vec<u16>, Error> {
        if length == 0 || length > 480 {
            return Err(Error::InvalidArgument("memory length must be in 1..=480".into()));
        }
        let mut payload = Vec::new();
        write_u32_le(&mut payload, address);
        write_u16_le(&mut payload, length);
        let record = self.call(monitor_timer, CommandCode::MEMORY_READ.0, 0x0000, &payload)?;
        decode_words_response(&record, length as usize)
    }

    /// `Memory_Write`.
    pub fn memory_write(&self, address: u32, values: &[u16], monitor_timer: u16) -> Result<(), Error> {
        if values.is_empty() || values.len() > 480 {
            return Err(Error::InvalidArgument("memory length must be in 1..=480".into()));
        }
        let mut payload = Vec::new();
        write_u32_le(&mut payload, address);
        write_u16_le(&mut payload, values.len() as u16);
        for &v in values {
            write_u16_le(&mut payload, v);
        }
        self.call(monitor_timer, CommandCode::MEMORY_WRITE.0, 0x0000, &payload)?;
        Ok(())
    }
}

impl<S: Connectable + 'static> Drop for Client<S> {
    fn drop(&mut self) {
        if let Some(session) = self.session.lock().unwrap().take() {
            session.close();
        }
    }
}

/// Bounds shared by `Device_Read`/`Device_Write`'s 2-byte-addressed form,
/// per §8's boundary tests (`0 < address < 0xFFF`, `0 < count < 3584`).
fn check_address_and_count(address: u32, count: u16) -> Result<(), Error> {
    if address == 0 || address >= 0xFFF {
        return Err(Error::InvalidArgument(format!(
            "address {:#x} must be in 1..0xFFF",
            address
        )));
    }
    if count == 0 || count >= 3584 {
        return Err(Error::InvalidArgument(format!(
            "count {} must be in 1..3584",
            count
        )));
    }
    Ok(())
}

fn decode_body_bytes(record: &ResponseRecord) -> Result<Vec<u8>, Error> {
    match record.encoding {
        Encoding::Binary => Ok(record.body.clone()),
        Encoding::Ascii => {
            let text = std::str::from_utf8(&record.body)
                .map_err(|_| Error::ProtocolError("response body is not UTF-8".into()))?;
            if text.len() % 2 != 0 {
                return Err(Error::ProtocolError("odd-length ASCII hex body".into()));
            }
            (0..text.len())
                .step_by(2)
                .map(|i| parse_hex(&text[i..i + 2], 2).map(|v| v as u8))
                .collect()
        }
    }
}

fn decode_words_response(record: &ResponseRecord, count: usize) -> Result<Vec<u16>, Error> {
    match record.encoding {
        Encoding::Binary => {
            if record.body.len() != count * 2 {
                return Err(Error::ProtocolError("word response has unexpected length".into()));
            }
            record
                .body
                .chunks(2)
                .map(crate::codec::primitive::read_u16_le)
                .collect()
        }
        Encoding::Ascii => {
            let text = std::str::from_utf8(&record.body)
                .map_err(|_| Error::ProtocolError("response body is not UTF-8".into()))?;
            if text.len() != count * 4 {
                return Err(Error::ProtocolError("word response has unexpected length".into()));
            }
            (0..count)
                .map(|i| parse_hex(&text[i * 4..i * 4 + 4], 4).map(|v| v as u16))
                .collect()
        }
    }
}

fn decode_bits_response(record: &ResponseRecord, count: usize) -> Result<Vec<bool>, Error> {
    match record.encoding {
        Encoding::Binary => {
            let expected = (count + 1) / 2;
            if record.body.len() != expected {
                return Err(Error::ProtocolError("bit response has unexpected length".into()));
            }
            let mut out = Vec::with_capacity(count);
            for &byte in &record.body {
                out.push((byte >> 4) & 0x01 != 0);
                out.push(byte & 0x01 != 0);
            }
            out.truncate(count);
            Ok(out)
        }
        Encoding::Ascii => {
            let text = std::str::from_utf8(&record.body)
                .map_err(|_| Error::ProtocolError("response body is not UTF-8".into()))?;
            if text.len() != count {
                return Err(Error::ProtocolError("bit response has unexpected length".into()));
            }
            text.chars()
                .map(|c| match c {
                    '0' => Ok(false),
                    '1' => Ok(true),
                    other => Err(Error::ProtocolError(format!("invalid bit character {:?}", other))),
                })
                .collect()
        }
    }
}

/// Packs bit values two-per-byte, high nibble first, per the binary
/// `Device_Read`/`Device_Write` bit-mode scheme.
fn encode_bits_nibble(values: &[bool]) -> Vec<u8> {
    let mut out = Vec::with_capacity((values.len() + 1) / 2);
    for pair in values.chunks(2) {
        let hi = if pair[0] { 0x10 } else { 0x00 };
        let lo = if pair.get(1).copied().unwrap_or(false) { 0x01 } else { 0x00 };
        out.push(hi | lo);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_bits_nibble_matches_scenario_1() {
        let bits = [false, false, false, true, false, false, true, true];
        assert_eq!(encode_bits_nibble(&bits), vec![0x00, 0x01, 0x00, 0x11]);
    }

    #[test]
    fn block_total_limit_enforced() {
        // Exercised indirectly through read_block/write_block argument
        // validation; covered at the integration-test level against a
        // mock transport, since constructing a `Client` needs one here.
    }
}
