//! Transport session: owns one socket and one background receiver thread,
//! assigns sequence numbers, and enforces the single mutex discipline that
//! guards frame construction, the socket write path, and the carry buffer.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::codec::frame::{self, Encoding, FrameKind};
use crate::codec::parser::{FrameParser, ResponseRecord};
use crate::constant::Target;
use crate::correlator::Correlator;
use crate::error::Error;
use crate::transport::Socket;

const RECV_CHUNK: usize = 1024;
const POLL_TIMEOUT: Duration = Duration::from_millis(200);

/// Per-session immutable wire profile.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub encoding: Encoding,
    pub frame: FrameKind,
}

/// Monitor registration state machine: `Execute_Monitor` is only legal
/// once an `Entry_Monitor_Device` call has registered its counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Unregistered,
    Registered { word_count: u8, dword_count: u8 },
}

struct SendGuard {
    next_seq: AtomicU8,
    /// 3E carries no sequence number, so the wire protocol supports only
    /// one outstanding request; this flag turns the silent-reordering
    /// hazard noted in the design notes into an explicit rejection.
    e3_in_flight: AtomicBool,
}

/// Owns the socket, the receiver thread, and the correlator for one open
/// connection. Reference-counted opens are tracked by `Client` (the public
/// command surface), not here; a `Session` is always exactly one live
/// connection.
pub struct Session<S: Socket + 'static> {
    socket: Arc<S>,
    profile: Profile,
    target: Mutex<Target>,
    correlator: Arc<Correlator>,
    send_guard: SendGuard,
    monitor: Mutex<MonitorState>,
    running: Arc<AtomicBool>,
    receiver: Mutex<Option<JoinHandle<()>>>,
}

impl<S: Socket + 'static> Session<S> {
    pub fn open(socket: S, profile: Profile, target: Target) -> Session<S> {
        let socket = Arc::new(socket);
        let correlator = Arc::new(Correlator::new());
        let running = Arc::new(AtomicBool::new(true));

        let receiver = {
            let socket = Arc::clone(&socket);
            let correlator = Arc::clone(&correlator);
            let running = Arc::clone(&running);
            thread::spawn(move || receiver_loop(socket, correlator, running))
        };

        Session {
            socket,
            profile,
            target: Mutex::new(target),
            correlator,
            send_guard: SendGuard {
                next_seq: AtomicU8::new(0),
                e3_in_flight: AtomicBool::new(false),
            },
            monitor: Mutex::new(MonitorState::Unregistered),
            running,
            receiver: Mutex::new(Some(receiver)),
        }
    }

    pub fn target(&self) -> Target {
        *self.target.lock().unwrap()
    }

    pub fn set_target(&self, target: Target) {
        *self.target.lock().unwrap() = target;
    }

    pub fn monitor_state(&self) -> MonitorState {
        *self.monitor.lock().unwrap()
    }

    pub fn register_monitor(&self, word_count: u8, dword_count: u8) {
        *self.monitor.lock().unwrap() = MonitorState::Registered {
            word_count,
            dword_count,
        };
    }

    /// Builds and writes one frame, returning the matching sequence (0 in
    /// 3E). The session mutex equivalent here is the combination of
    /// `e3_in_flight` (3E serialization) and the socket's own internal
    /// mutex (guarding the write itself) — sequence allocation and frame
    /// construction happen without any lock since they only touch atomics
    /// and the caller's own payload.
    pub fn send(
        &self,
        monitor_timer: u16,
        command: u16,
        subcommand: u16,
        payload: &[u8],
    ) -> Result<u16, Error> {
        let seq = match self.profile.frame {
            FrameKind::E3 => {
                if self
                    .send_guard
                    .e3_in_flight
                    .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                    .is_err()
                {
                    return Err(Error::PreconditionError(
                        "a 3E request is already outstanding on this session".into(),
                    ));
                }
                0u8
            }
            FrameKind::E4 => self.send_guard.next_seq.fetch_add(1, Ordering::SeqCst),
        };

        let frame = frame::build(
            self.profile.frame,
            self.profile.encoding,
            seq,
            self.target(),
            monitor_timer,
            command,
            subcommand,
            payload,
        );
        let frame = match frame {
            Ok(f) => f,
            Err(e) => {
                self.release_3e_slot();
                return Err(e);
            }
        };

        if let Err(e) = self.socket.write_all(&frame) {
            self.release_3e_slot();
            return Err(e);
        }
        Ok(seq as u16)
    }

    fn release_3e_slot(&self) {
        if self.profile.frame == FrameKind::E3 {
            self.send_guard.e3_in_flight.store(false, Ordering::SeqCst);
        }
    }

    /// Waits for the response to `seq`, releasing the 3E slot in every
    /// outcome so the next caller is never left permanently locked out.
    pub fn wait(&self, seq: u16, monitor_timer: u16) -> Result<ResponseRecord, Error> {
        let result = self.correlator.wait(seq, monitor_timer);
        self.release_3e_slot();
        result
    }

    pub fn take_on_demand(&self) -> Option<ResponseRecord> {
        self.correlator.take_on_demand()
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Shuts the socket down, stops the receiver thread, and cancels every
    /// blocked waiter. Idempotent: a second close is a no-op.
    pub fn close(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.correlator.cancel_all();
        if let Err(e) = self.socket.shutdown() {
            warn!("error shutting down socket during close: {}", e);
        }
        if let Some(handle) = self.receiver.lock().unwrap().take() {
            let _ = handle.join();
        }
    }
}

impl<S: Socket + 'static> Drop for Session<S> {
    fn drop(&mut self) {
        self.close();
    }
}

fn receiver_loop(socket: Arc<impl Socket>, correlator: Arc<Correlator>, running: Arc<AtomicBool>) {
    let mut parser = FrameParser::new();
    let mut buf = vec![0u8; RECV_CHUNK];

    while running.load(Ordering::SeqCst) {
        let n = match socket.try_read(&mut buf, POLL_TIMEOUT) {
            Ok(n) => n,
            Err(e) => {
                warn!("receiver thread stopping after transport error: {}", e);
                break;
            }
        };
        if n == 0 {
            continue;
        }
        match parser.feed(&buf[..n]) {
            Ok(records) => {
                for record in records {
                    debug!("delivering response for seq {}", record.seq);
                    correlator.deliver(record);
                }
            }
            Err(e) => {
                warn!("discarding unparsable bytes: {}", e);
            }
        }
    }
}
