//! TCP transport: one stream per session, written to under the session
//! mutex and polled for reads on a short timeout by the receiver thread.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::Error;
use crate::transport::{would_block, Socket};

/// Default per-syscall poll timeout, matching the teacher's transport
/// defaulting read/write timeouts rather than blocking forever.
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(200);

/// Connection configuration, mirroring the teacher's `tcp::Options`: plain
/// fields, a `new()` constructor, `Duration` timeouts.
#[derive(Debug, Clone)]
pub struct Options {
    pub address: SocketAddr,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Options {
    pub fn new(address: SocketAddr) -> Options {
        Options {
            address,
            connect_timeout: None,
            read_timeout: DEFAULT_POLL_TIMEOUT,
            write_timeout: Duration::from_secs(10),
        }
    }
}

pub struct TcpSocket {
    stream: Mutex<TcpStream>,
}

impl TcpSocket {
    pub fn connect(options: &Options) -> Result<TcpSocket, Error> {
        let stream = match options.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&options.address, timeout)?,
            None => TcpStream::connect(options.address)?,
        };
        stream.set_read_timeout(Some(options.read_timeout))?;
        stream.set_write_timeout(Some(options.write_timeout))?;
        stream.set_nodelay(true)?;
        Ok(TcpSocket {
            stream: Mutex::new(stream),
        })
    }
}

impl Socket for TcpSocket {
    fn write_all(&self, buf: &[u8]) -> Result<(), Error> {
        let mut stream = self.stream.lock().unwrap();
        stream.write_all(buf)?;
        Ok(())
    }

    fn try_read(&self, buf: &mut [u8], poll_timeout: Duration) -> Result<usize, Error> {
        let stream = self.stream.lock().unwrap();
        stream.set_read_timeout(Some(poll_timeout))?;
        let mut reader = stream.try_clone()?;
        match reader.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if would_block(&e) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn shutdown(&self) -> Result<(), Error> {
        let stream = self.stream.lock().unwrap();
        stream.shutdown(std::net::Shutdown::Both)?;
        Ok(())
    }
}
