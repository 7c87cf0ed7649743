//! Closed enumerations and the target quintuple shared by every command.

use crate::error::Error;

/// Addressing quintuple carried in every request and echoed in every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub network: u8,
    pub pc: u8,
    pub io: u16,
    pub multidrop: u8,
}

impl Default for Target {
    fn default() -> Target {
        Target {
            network: 0,
            pc: 0,
            io: 0,
            multidrop: 0,
        }
    }
}

impl Target {
    pub fn new(network: u8, pc: u8, io: u16, multidrop: u8) -> Target {
        Target {
            network,
            pc,
            io,
            multidrop,
        }
    }
}

/// Device memory region identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum DeviceCode {
    SM = 0x91,
    SD = 0xA9,
    X = 0x9C,
    Y = 0x9D,
    M = 0x90,
    L = 0x92,
    F = 0x93,
    V = 0x94,
    B = 0xA0,
    D = 0xA8,
    W = 0xB4,
    TS = 0xC1,
    TC = 0xC0,
    TN = 0xC2,
    LTS = 0x51,
    LTC = 0x50,
    LTN = 0x52,
    SS = 0xC7,
    SC = 0xC6,
    SN = 0xC8,
    LSTS = 0x59,
    LSTC = 0x58,
    LSTN = 0x5A,
    CS = 0xC4,
    CC = 0xC3,
    CN = 0xC5,
    SB = 0xA1,
    SW = 0xB5,
    DX = 0xA2,
    DY = 0xA3,
    Z = 0xCC,
    LZ = 0x62,
    R = 0xAF,
    ZR = 0xB0,
    RD = 0x2C,
    LCS = 0x55,
    LCC = 0x54,
    LCN = 0x56,
}

impl DeviceCode {
    /// Short ASCII mnemonic, as used on the wire in ASCII encoding.
    pub fn name(self) -> &'static str {
        use DeviceCode::*;
        match self {
            SM => "SM",
            SD => "SD",
            X => "X",
            Y => "Y",
            M => "M",
            L => "L",
            F => "F",
            V => "V",
            B => "B",
            D => "D",
            W => "W",
            TS => "TS",
            TC => "TC",
            TN => "TN",
            LTS => "LTS",
            LTC => "LTC",
            LTN => "LTN",
            SS => "SS",
            SC => "SC",
            SN => "SN",
            LSTS => "LSTS",
            LSTC => "LSTC",
            LSTN => "LSTN",
            CS => "CS",
            CC => "CC",
            CN => "CN",
            SB => "SB",
            SW => "SW",
            DX => "DX",
            DY => "DY",
            Z => "Z",
            LZ => "LZ",
            R => "R",
            ZR => "ZR",
            RD => "RD",
            LCS => "LCS",
            LCC => "LCC",
            LCN => "LCN",
        }
    }

    /// True for devices whose ASCII address is rendered in hex rather than decimal.
    pub fn is_hex_addressed(self) -> bool {
        use DeviceCode::*;
        matches!(self, X | Y | B | W | SB | SW | DX | DY | ZR)
    }

    /// True for devices that only exist in the 4-byte-address wide form, unused by the
    /// 2-byte-address commands this crate implements.
    pub fn is_wide_only(self) -> bool {
        use DeviceCode::*;
        matches!(
            self,
            LTS | LTC | LTN | LSTS | LSTC | LSTN | LCS | LCC | LCN | LZ | RD
        )
    }

    /// Reject device codes that cannot be encoded by the 2-byte-address commands.
    pub fn require_narrow(self) -> Result<(), Error> {
        if self.is_wide_only() {
            return Err(Error::InvalidArgument(format!(
                "device code {:?} requires 4-byte addressing, unsupported by this command",
                self
            )));
        }
        Ok(())
    }
}

/// 16-bit command code. Values beyond the device/memory/remote-control/self-test
/// subset this crate implements a typed surface for are still accepted as
/// pass-through values, since the same codec can carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandCode(pub u16);

impl CommandCode {
    pub const DEVICE_READ: CommandCode = CommandCode(0x0401);
    pub const DEVICE_WRITE: CommandCode = CommandCode(0x1401);
    pub const DEVICE_READ_RANDOM: CommandCode = CommandCode(0x0403);
    pub const DEVICE_WRITE_RANDOM: CommandCode = CommandCode(0x1402);
    pub const DEVICE_ENTRY_MONITOR: CommandCode = CommandCode(0x0801);
    pub const DEVICE_EXECUTE_MONITOR: CommandCode = CommandCode(0x0802);
    pub const DEVICE_READ_BLOCK: CommandCode = CommandCode(0x0406);
    pub const DEVICE_WRITE_BLOCK: CommandCode = CommandCode(0x1406);
    pub const LABEL_ARRAY_READ: CommandCode = CommandCode(0x041A);
    pub const LABEL_ARRAY_WRITE: CommandCode = CommandCode(0x141A);
    pub const LABEL_READ_RANDOM: CommandCode = CommandCode(0x041C);
    pub const LABEL_WRITE_RANDOM: CommandCode = CommandCode(0x141B);
    pub const MEMORY_READ: CommandCode = CommandCode(0x0613);
    pub const MEMORY_WRITE: CommandCode = CommandCode(0x1613);
    pub const EXTEND_UNIT_READ: CommandCode = CommandCode(0x0601);
    pub const EXTEND_UNIT_WRITE: CommandCode = CommandCode(0x1601);
    pub const REMOTE_RUN: CommandCode = CommandCode(0x1001);
    pub const REMOTE_STOP: CommandCode = CommandCode(0x1002);
    pub const REMOTE_PAUSE: CommandCode = CommandCode(0x1003);
    pub const REMOTE_LATCH_CLEAR: CommandCode = CommandCode(0x1005);
    pub const REMOTE_RESET: CommandCode = CommandCode(0x1006);
    pub const REMOTE_READ_TYPE_NAME: CommandCode = CommandCode(0x0101);
    pub const REMOTE_PASSWORD_LOCK: CommandCode = CommandCode(0x1631);
    pub const REMOTE_PASSWORD_UNLOCK: CommandCode = CommandCode(0x1630);
    pub const FILE_READ_DIR: CommandCode = CommandCode(0x1810);
    pub const FILE_SEARCH_DIR: CommandCode = CommandCode(0x1811);
    pub const FILE_NEW_FILE: CommandCode = CommandCode(0x1820);
    pub const FILE_DELETE_FILE: CommandCode = CommandCode(0x1822);
    pub const FILE_COPY_FILE: CommandCode = CommandCode(0x1824);
    pub const FILE_CHANGE_FILE_STATE: CommandCode = CommandCode(0x1825);
    pub const FILE_CHANGE_FILE_DATE: CommandCode = CommandCode(0x1826);
    pub const FILE_OPEN_FILE: CommandCode = CommandCode(0x1827);
    pub const FILE_READ_FILE: CommandCode = CommandCode(0x1828);
    pub const FILE_WRITE_FILE: CommandCode = CommandCode(0x1829);
    pub const FILE_CLOSE_FILE: CommandCode = CommandCode(0x182A);
    pub const SELF_TEST: CommandCode = CommandCode(0x0619);
    pub const CLEAR_ERROR: CommandCode = CommandCode(0x1617);
    pub const ON_DEMAND: CommandCode = CommandCode(0x2101);
}

/// Response outcome. Unrecognized non-zero codes round-trip as `EndCode::Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCode {
    Success,
    WrongCommand,
    WrongFormat,
    WrongLength,
    Busy,
    ExceedReqLength,
    ExceedRespLength,
    RelayFailure,
    TimeoutError,
    Other(u16),
}

impl EndCode {
    pub fn from_u16(code: u16) -> EndCode {
        match code {
            0x0000 => EndCode::Success,
            0xC059 => EndCode::WrongCommand,
            0xC05C => EndCode::WrongFormat,
            0xC061 => EndCode::WrongLength,
            0xCEE0 => EndCode::Busy,
            0xCEE1 => EndCode::ExceedReqLength,
            0xCEE2 => EndCode::ExceedRespLength,
            0xCF70 => EndCode::RelayFailure,
            0xCF71 => EndCode::TimeoutError,
            other => EndCode::Other(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            EndCode::Success => 0x0000,
            EndCode::WrongCommand => 0xC059,
            EndCode::WrongFormat => 0xC05C,
            EndCode::WrongLength => 0xC061,
            EndCode::Busy => 0xCEE0,
            EndCode::ExceedReqLength => 0xCEE1,
            EndCode::ExceedRespLength => 0xCEE2,
            EndCode::RelayFailure => 0xCF70,
            EndCode::TimeoutError => 0xCF71,
            EndCode::Other(code) => code,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, EndCode::Success)
    }
}

/// CPU model-code enumeration returned by `RemoteControl_ReadTypeName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TypeCode {
    Q00JCPU,
    Q00CPU,
    Q01CPU,
    Q02CPU,
    Q06HCPU,
    Q12HCPU,
    Q25HCPU,
    Q12PRHCPU,
    Q25PRHCPU,
    Q00UJCPU,
    Q00UCPU,
    Q01UCPU,
    Q02UCPU,
    Q03UDCPU,
    Q03UDVCPU,
    Q04UDHCPU,
    Q04UDVCPU,
    Q06UDHCPU,
    Q06UDVCPU,
    Q10UDHCPU,
    Q13UDHCPU,
    Q13UDVCPU,
    Q20UDHCPU,
    Q26UDHCPU,
    Q26UDVCPU,
    Q50UDEHCPU,
    Q100UDEHCPU,
    QS001CPU,
    L02SCPU,
    L02CPU,
    L06CPU,
    L26CPU,
    L26CPU_BT,
    L04HCPU,
    L08HCPU,
    L16HCPU,
    LJ72GF15_T2,
    R00CPU,
    R01CPU,
    R02CPU,
    R04CPU,
    R04ENCPU,
    R08CPU,
    R08ENCPU,
    R08PCPU,
    R08PSFCPU,
    R08SFCPU,
    R16CPU,
    R16ENCPU,
    R16PCPU,
    R16PSFCPU,
    R16SFCPU,
    R32CPU,
    R32ENCPU,
    R32PCPU,
    R32PSFCPU,
    R32SFCPU,
    R120CPU,
    R120ENCPU,
    R120PCPU,
    R120PSFCPU,
    R120SFCPU,
    R12CCPU_V,
    MI5122_VW,
    RJ72GF15_T2,
    RJ72GF15_T2_D1,
    RJ72GF15_T2_D2,
    NZ2GF_ETB,
    Unknown(u16),
}

impl TypeCode {
    pub fn from_u16(code: u16) -> TypeCode {
        use TypeCode::*;
        match code {
            0x250 => Q00JCPU,
            0x251 => Q00CPU,
            0x252 => Q01CPU,
            0x41 => Q02CPU,
            0x42 => Q06HCPU,
            0x43 => Q12HCPU,
            0x44 => Q25HCPU,
            0x4B => Q12PRHCPU,
            0x4C => Q25PRHCPU,
            0x260 => Q00UJCPU,
            0x261 => Q00UCPU,
            0x262 => Q01UCPU,
            0x263 => Q02UCPU,
            0x268 => Q03UDCPU,
            0x366 => Q03UDVCPU,
            0x269 => Q04UDHCPU,
            0x367 => Q04UDVCPU,
            0x26A => Q06UDHCPU,
            0x368 => Q06UDVCPU,
            0x266 => Q10UDHCPU,
            0x26B => Q13UDHCPU,
            0x36A => Q13UDVCPU,
            0x267 => Q20UDHCPU,
            0x26C => Q26UDHCPU,
            0x36C => Q26UDVCPU,
            0x26D => Q50UDEHCPU,
            0x26E => Q100UDEHCPU,
            0x230 => QS001CPU,
            0x543 => L02SCPU,
            0x541 => L02CPU,
            0x544 => L06CPU,
            0x545 => L26CPU,
            0x542 => L26CPU_BT,
            0x48C0 => L04HCPU,
            0x48C1 => L08HCPU,
            0x48C2 => L16HCPU,
            0x0641 => LJ72GF15_T2,
            0x48A0 => R00CPU,
            0x48A1 => R01CPU,
            0x48A2 => R02CPU,
            0x4800 => R04CPU,
            0x4805 => R04ENCPU,
            0x4801 => R08CPU,
            0x4806 => R08ENCPU,
            0x4841 => R08PCPU,
            0x4851 => R08PSFCPU,
            0x4891 => R08SFCPU,
            0x4802 => R16CPU,
            0x4807 => R16ENCPU,
            0x4842 => R16PCPU,
            0x4852 => R16PSFCPU,
            0x4892 => R16SFCPU,
            0x4803 => R32CPU,
            0x4808 => R32ENCPU,
            0x4843 => R32PCPU,
            0x4853 => R32PSFCPU,
            0x4893 => R32SFCPU,
            0x4804 => R120CPU,
            0x4809 => R120ENCPU,
            0x4844 => R120PCPU,
            0x4854 => R120PSFCPU,
            0x4894 => R120SFCPU,
            0x4820 => R12CCPU_V,
            0x4E01 => MI5122_VW,
            0x4860 => RJ72GF15_T2,
            0x4861 => RJ72GF15_T2_D1,
            0x4862 => RJ72GF15_T2_D2,
            0x0642 => NZ2GF_ETB,
            other => Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_addressed_set() {
        assert!(DeviceCode::X.is_hex_addressed());
        assert!(DeviceCode::ZR.is_hex_addressed());
        assert!(!DeviceCode::D.is_hex_addressed());
        assert!(!DeviceCode::M.is_hex_addressed());
    }

    #[test]
    fn wide_only_rejected() {
        assert!(DeviceCode::LZ.require_narrow().is_err());
        assert!(DeviceCode::RD.require_narrow().is_err());
        assert!(DeviceCode::M.require_narrow().is_ok());
    }

    #[test]
    fn end_code_roundtrip() {
        assert_eq!(EndCode::from_u16(0xC059), EndCode::WrongCommand);
        assert_eq!(EndCode::WrongCommand.to_u16(), 0xC059);
        assert!(EndCode::from_u16(0).is_success());
    }

    #[test]
    fn type_code_lookup() {
        assert_eq!(TypeCode::from_u16(0x263), TypeCode::Q02UCPU);
        assert_eq!(TypeCode::from_u16(0xFFFF), TypeCode::Unknown(0xFFFF));
    }
}
