//! Socket abstraction: the session drives a `Socket` the same way
//! regardless of whether it is backed by TCP or UDP.

pub mod tcp;
pub mod udp;

use std::io;
use std::time::Duration;

use crate::error::Error;

/// Minimal socket surface the session needs: a single writer, a
/// non-blocking-ish reader polled on a short timeout, and a way to tear
/// the connection down so a blocked receiver thread observes closure.
pub trait Socket: Send + Sync {
    /// Write the entire frame in one call.
    fn write_all(&self, buf: &[u8]) -> Result<(), Error>;

    /// Read whatever is available into `buf`, within `poll_timeout`.
    /// Returns `Ok(0)` on a timed-out poll, which is not an error.
    fn try_read(&self, buf: &mut [u8], poll_timeout: Duration) -> Result<usize, Error>;

    /// Shut the connection down in both directions so a blocked reader
    /// wakes up with an error rather than hanging.
    fn shutdown(&self) -> Result<(), Error>;
}

pub(crate) fn would_block(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

/// A `Socket` that knows how to (re)connect itself from a config value.
/// Lets `Session`'s ref-counted open/close recreate the same kind of
/// socket on every fresh open without the session caring which kind it is.
pub trait Connectable: Socket + Sized {
    type Options: Clone;

    fn connect(options: &Self::Options) -> Result<Self, Error>;
}

impl Connectable for tcp::TcpSocket {
    type Options = tcp::Options;

    fn connect(options: &tcp::Options) -> Result<Self, Error> {
        tcp::TcpSocket::connect(options)
    }
}

impl Connectable for udp::UdpSocket {
    type Options = udp::Options;

    fn connect(options: &udp::Options) -> Result<Self, Error> {
        udp::UdpSocket::connect(options)
    }
}
