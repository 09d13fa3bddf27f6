//! Transport abstraction is the byte-oriented serial channel between the
//! two controllers.
//!
//! Concrete implementations:
//! - UART on real hardware (one per controller)
//! - [`LoopbackPair`] for host simulation and tests
//! - [`NullTransport`] when nothing is attached
//!
//! Reads are strictly non-blocking: callers check [`Transport::available`]
//! and drain what is there, never wait for more.

use std::cell::RefCell;
use std::rc::Rc;

use heapless::Deque;

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;
}

/// A null transport that discards all writes and never reads.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}

// ── In-memory serial pair ─────────────────────────────────────

/// Receive FIFO depth per direction, like a UART RX buffer.
pub const LOOPBACK_FIFO: usize = 1024;

type Fifo = Rc<RefCell<Deque<u8, LOOPBACK_FIFO>>>;

/// One end of an in-memory serial line. Bytes written here appear on the
/// peer's read side. A full FIFO drops the excess, as a UART overrun would.
pub struct LoopbackEnd {
    rx: Fifo,
    tx: Fifo,
}

/// Two cross-connected [`LoopbackEnd`]s.
pub struct LoopbackPair;

impl LoopbackPair {
    /// Returns `(a, b)`: whatever `a` writes, `b` reads, and vice versa.
    pub fn new() -> (LoopbackEnd, LoopbackEnd) {
        let a_to_b: Fifo = Rc::new(RefCell::new(Deque::new()));
        let b_to_a: Fifo = Rc::new(RefCell::new(Deque::new()));
        (
            LoopbackEnd {
                rx: Rc::clone(&b_to_a),
                tx: Rc::clone(&a_to_b),
            },
            LoopbackEnd {
                rx: a_to_b,
                tx: b_to_a,
            },
        )
    }
}

impl LoopbackEnd {
    /// Bytes waiting on this end's read side.
    pub fn pending(&self) -> usize {
        self.rx.borrow().len()
    }
}

impl Transport for LoopbackEnd {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut rx = self.rx.borrow_mut();
        let mut n = 0;
        while n < buf.len() {
            match rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let mut tx = self.tx.borrow_mut();
        let mut n = 0;
        for &b in data {
            if tx.push_back(b).is_err() {
                break;
            }
            n += 1;
        }
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn available(&self) -> bool {
        !self.rx.borrow().is_empty()
    }
}
