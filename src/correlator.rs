//! Response correlator: a background receiver delivers parsed records by
//! sequence number, and waiting callers block on a condition variable for
//! their matching slot without holding the session mutex.

use std::collections::HashMap;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::codec::parser::ResponseRecord;
use crate::error::Error;

/// Monitor timer of 0 is documented as "wait indefinitely", implemented as
/// this minimum effective deadline rather than an unbounded block.
const ZERO_TIMER_MINIMUM: Duration = Duration::from_secs(100);

#[derive(Default)]
struct Inner {
    delivered: HashMap<u16, ResponseRecord>,
    closed: bool,
}

/// Shared between the receiver thread and waiting callers.
pub struct Correlator {
    inner: Mutex<Inner>,
    condvar: Condvar,
}

impl Correlator {
    pub fn new() -> Correlator {
        Correlator {
            inner: Mutex::new(Inner::default()),
            condvar: Condvar::new(),
        }
    }

    /// Called by the receiver thread once a record has been fully parsed.
    pub fn deliver(&self, record: ResponseRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.delivered.insert(record.seq, record);
        self.condvar.notify_all();
    }

    /// Blocks until `seq`'s record arrives or `monitor_timer` (in 250 ms
    /// units) elapses. A timer of 0 is given a 100 s effective deadline.
    pub fn wait(&self, seq: u16, monitor_timer: u16) -> Result<ResponseRecord, Error> {
        let budget = if monitor_timer == 0 {
            ZERO_TIMER_MINIMUM
        } else {
            Duration::from_millis(u64::from(monitor_timer) * 250)
        };
        let deadline = Instant::now() + budget;

        let mut inner = self.inner.lock().unwrap();
        loop {
            if let Some(record) = inner.delivered.remove(&seq) {
                return Ok(record);
            }
            if inner.closed {
                return Err(Error::Cancelled);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(Error::Timeout);
            }
            let (guard, result) = self
                .condvar
                .wait_timeout(inner, deadline - now)
                .unwrap();
            inner = guard;
            if result.timed_out() && !inner.delivered.contains_key(&seq) && !inner.closed {
                return Err(Error::Timeout);
            }
        }
    }

    /// Non-blocking scan for an unsolicited on-demand message.
    pub fn take_on_demand(&self) -> Option<ResponseRecord> {
        let mut inner = self.inner.lock().unwrap();
        let seq = inner
            .delivered
            .iter()
            .find(|(_, record)| record.is_on_demand())
            .map(|(seq, _)| *seq)?;
        inner.delivered.remove(&seq)
    }

    /// Wakes every blocked waiter with `Cancelled`, called on session close.
    pub fn cancel_all(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
        self.condvar.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::frame::Encoding;
    use crate::constant::{EndCode, Target};
    use std::sync::Arc;
    use std::thread;

    fn record(seq: u16) -> ResponseRecord {
        ResponseRecord {
            encoding: Encoding::Binary,
            seq,
            target: Target::default(),
            end_code: EndCode::Success,
            body: vec![],
        }
    }

    #[test]
    fn wait_returns_delivered_record() {
        let correlator = Correlator::new();
        correlator.deliver(record(3));
        let got = correlator.wait(3, 4).unwrap();
        assert_eq!(got.seq, 3);
    }

    #[test]
    fn wait_times_out_without_delivery() {
        let correlator = Correlator::new();
        let err = correlator.wait(1, 1).unwrap_err();
        matches!(err, Error::Timeout);
    }

    #[test]
    fn cancel_all_wakes_blocked_waiter() {
        let correlator = Arc::new(Correlator::new());
        let waiter = {
            let correlator = Arc::clone(&correlator);
            thread::spawn(move || correlator.wait(7, 0))
        };
        thread::sleep(Duration::from_millis(20));
        correlator.cancel_all();
        let result = waiter.join().unwrap();
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn take_on_demand_ignores_ordinary_records() {
        let correlator = Correlator::new();
        correlator.deliver(record(5));
        assert!(correlator.take_on_demand().is_none());

        let mut on_demand = record(9);
        on_demand.body = vec![0x01, 0x21, 0x00, 0x00, 0xAB];
        correlator.deliver(on_demand);
        let got = correlator.take_on_demand().unwrap();
        assert_eq!(got.seq, 9);
    }
}
