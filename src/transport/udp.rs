//! UDP transport. Each `recv` yields one datagram, which is exactly one
//! frame's worth of bytes from a compliant PLC; the parser's carry-buffer
//! discipline is reused unchanged regardless.

use std::net::{SocketAddr, UdpSocket as StdUdpSocket};
use std::time::Duration;

use crate::error::Error;
use crate::transport::{would_block, Socket};

const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct Options {
    pub address: SocketAddr,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Options {
    pub fn new(address: SocketAddr) -> Options {
        Options {
            address,
            read_timeout: DEFAULT_POLL_TIMEOUT,
            write_timeout: Duration::from_secs(10),
        }
    }
}

pub struct UdpSocket {
    socket: StdUdpSocket,
}

impl UdpSocket {
    pub fn connect(options: &Options) -> Result<UdpSocket, Error> {
        let local: SocketAddr = if options.address.is_ipv4() {
            "0.0.0.0:0".parse().unwrap()
        } else {
            "[::]:0".parse().unwrap()
        };
        let socket = StdUdpSocket::bind(local)?;
        socket.connect(options.address)?;
        socket.set_read_timeout(Some(options.read_timeout))?;
        socket.set_write_timeout(Some(options.write_timeout))?;
        Ok(UdpSocket { socket })
    }
}

impl Socket for UdpSocket {
    fn write_all(&self, buf: &[u8]) -> Result<(), Error> {
        self.socket.send(buf)?;
        Ok(())
    }

    fn try_read(&self, buf: &mut [u8], poll_timeout: Duration) -> Result<usize, Error> {
        self.socket.set_read_timeout(Some(poll_timeout))?;
        match self.socket.recv(buf) {
            Ok(n) => Ok(n),
            Err(e) if would_block(&e) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn shutdown(&self) -> Result<(), Error> {
        // A connected UDP socket has nothing to shut down; dropping it is
        // sufficient, but a zero-length send unblocks a peer-less recv.
        Ok(())
    }
}
