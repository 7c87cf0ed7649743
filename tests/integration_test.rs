//! Drives `Client` against an in-process mock transport instead of a live
//! PLC, so this suite is deterministic and runs without hardware.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use slmp::client::Client;
use slmp::codec::frame::{Encoding, FrameKind};
use slmp::constant::{DeviceCode, Target};
use slmp::error::Error;
use slmp::session::Profile;
use slmp::transport::{Connectable, Socket};

#[derive(Default)]
struct MockState {
    written: Vec<Vec<u8>>,
    responses: Vec<Vec<u8>>,
}

#[derive(Clone)]
struct MockOptions {
    state: Arc<Mutex<MockState>>,
}

impl MockOptions {
    fn with_response(response: Vec<u8>) -> MockOptions {
        let state = MockState {
            written: Vec::new(),
            responses: vec![response],
        };
        MockOptions {
            state: Arc::new(Mutex::new(state)),
        }
    }
}

struct MockSocket {
    state: Arc<Mutex<MockState>>,
}

impl Socket for MockSocket {
    fn write_all(&self, buf: &[u8]) -> Result<(), Error> {
        self.state.lock().unwrap().written.push(buf.to_vec());
        Ok(())
    }

    fn try_read(&self, buf: &mut [u8], poll_timeout: Duration) -> Result<usize, Error> {
        let mut state = self.state.lock().unwrap();
        if let Some(response) = state.responses.pop() {
            let n = response.len();
            buf[..n].copy_from_slice(&response);
            return Ok(n);
        }
        drop(state);
        std::thread::sleep(poll_timeout.min(Duration::from_millis(5)));
        Ok(0)
    }

    fn shutdown(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl Connectable for MockSocket {
    type Options = MockOptions;

    fn connect(options: &MockOptions) -> Result<MockSocket, Error> {
        Ok(MockSocket {
            state: Arc::clone(&options.state),
        })
    }
}

#[test]
fn device_read_word_round_trip_binary_4e() {
    // Scenario 2's values, re-encoded in binary 4E framing: response body
    // is 3 little-endian u16s.
    let mut response = vec![0xD4, 0x00, 0x00, 0x00, 0x00, 0x00];
    response.extend_from_slice(&[0x01, 0x01, 0x01, 0x00, 0x01]);
    response.extend_from_slice(&[0x08, 0x00]);
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&[0x34, 0x12, 0x02, 0x00, 0xEF, 0x1D]);

    let options = MockOptions::with_response(response);
    let profile = Profile {
        encoding: Encoding::Binary,
        frame: FrameKind::E4,
    };
    let client = Client::<MockSocket>::new(options, profile, Target::new(1, 1, 1, 1)).unwrap();

    let values = client
        .device_read_word(DeviceCode::TN, 100, 3, 6)
        .unwrap();
    assert_eq!(values, vec![0x1234, 0x0002, 0x1DEF]);
}

#[test]
fn communication_error_propagates_end_code() {
    let mut response = vec![0xD4, 0x00, 0x00, 0x00, 0x00, 0x00];
    response.extend_from_slice(&[0x01, 0x01, 0x01, 0x00, 0x01]);
    response.extend_from_slice(&[0x02, 0x00]);
    response.extend_from_slice(&[0x59, 0xC0]);

    let options = MockOptions::with_response(response);
    let profile = Profile {
        encoding: Encoding::Binary,
        frame: FrameKind::E4,
    };
    let client = Client::<MockSocket>::new(options, profile, Target::default()).unwrap();

    let result = client.device_read_word(DeviceCode::D, 100, 1, 6);
    assert!(matches!(result, Err(Error::CommunicationError(_))));
}

#[test]
fn device_read_word_rejects_address_zero() {
    let options = MockOptions::with_response(vec![]);
    let profile = Profile {
        encoding: Encoding::Binary,
        frame: FrameKind::E4,
    };
    let client = Client::<MockSocket>::new(options, profile, Target::default()).unwrap();

    let result = client.device_read_word(DeviceCode::D, 0, 1, 6);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn nested_open_requires_matching_close() {
    let options = MockOptions::with_response(vec![]);
    let profile = Profile {
        encoding: Encoding::Binary,
        frame: FrameKind::E4,
    };
    let client = Client::<MockSocket>::new(options, profile, Target::default()).unwrap();
    client.open().unwrap();
    client.close();
    // Still open after one close (two opens were recorded: new() + open()).
    client.close();
}
