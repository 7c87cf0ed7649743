use std::error;
use std::fmt;
use std::io::{Error as IOError, ErrorKind};

use crate::constant::EndCode;

/// Failure modes surfaced by this crate. Every variant is produced locally;
/// none of them wrap a foreign error type beyond `std::io::Error`.
#[derive(Debug)]
pub enum Error {
    /// A caller-supplied argument violates a documented precondition
    /// (address range, device/command compatibility, count limits).
    InvalidArgument(String),
    /// An operation was attempted while the session was in the wrong state
    /// for it (closed, already monitoring, 3E command already in flight).
    PreconditionError(String),
    /// No response arrived for a request within its wait budget.
    Timeout,
    /// The PLC returned a non-success end code.
    CommunicationError(EndCode),
    /// A frame could not be parsed, or violated a wire-level invariant
    /// (oversized buffer, malformed subheader, checksum/length mismatch).
    ProtocolError(String),
    /// The underlying socket failed.
    TransportError(ErrorKind),
    /// The session was closed while a request was still waiting.
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::PreconditionError(msg) => write!(f, "precondition failed: {}", msg),
            Error::Timeout => write!(f, "timed out waiting for a response"),
            Error::CommunicationError(code) => write!(f, "PLC returned end code: {:?}", code),
            Error::ProtocolError(msg) => write!(f, "protocol error: {}", msg),
            Error::TransportError(kind) => write!(f, "transport error: {:?}", kind),
            Error::Cancelled => write!(f, "request cancelled: session closed"),
        }
    }
}

impl From<IOError> for Error {
    fn from(e: IOError) -> Self {
        Error::TransportError(e.kind())
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_communication_error_names_end_code() {
        let e = Error::CommunicationError(EndCode::Busy);
        assert_eq!(e.to_string(), "PLC returned end code: Busy");
    }

    #[test]
    fn io_error_becomes_transport_error() {
        let io = IOError::new(ErrorKind::ConnectionReset, "reset");
        let e: Error = io.into();
        matches!(e, Error::TransportError(ErrorKind::ConnectionReset));
    }
}
