//! Wire codec for the SAC↔BC serial link.
//!
//! Wire format:
//! ```text
//!   BC → SAC   one command byte, optional line terminator
//!              'S' request status   'O' open   'C' close
//!
//!   SAC → BC   one JSON object per line
//!              {"ldr":612,"rain":1010,"status":"TERBUKA","weather":"CERAH","rotation":0}\n
//! ```
//!
//! Both decoders are fed byte by byte from a non-blocking drain, so a
//! single read may hold part of a line, exactly one, or several.

use heapless::Vec;

use crate::app::commands::ManualCommand;
use crate::error::LinkError;

use super::record::StatusRecord;

/// Maximum status line length (without terminator).
pub const MAX_LINE: usize = 256;

// ── Commands (BC → SAC) ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RequestStatus,
    Open,
    Close,
}

impl Command {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'S' => Some(Self::RequestStatus),
            b'O' => Some(Self::Open),
            b'C' => Some(Self::Close),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::RequestStatus => b'S',
            Self::Open => b'O',
            Self::Close => b'C',
        }
    }

    /// The manual command this relays, if it is one.
    pub fn manual(self) -> Option<ManualCommand> {
        match self {
            Self::RequestStatus => None,
            Self::Open => Some(ManualCommand::Open),
            Self::Close => Some(ManualCommand::Close),
        }
    }
}

impl From<ManualCommand> for Command {
    fn from(cmd: ManualCommand) -> Self {
        match cmd {
            ManualCommand::Open => Self::Open,
            ManualCommand::Close => Self::Close,
        }
    }
}

/// SAC-side command decoder.
///
/// Every command is exactly one byte and is acted on as soon as it
/// arrives, so no terminator is required. Anything else (terminators,
/// whitespace, line noise) is skipped byte by byte and never affects the
/// bytes around it.
pub struct CommandDecoder {
    ignored: u32,
}

impl CommandDecoder {
    pub fn new() -> Self {
        Self { ignored: 0 }
    }

    /// Feed one byte. Returns a command when `b` is a command byte.
    pub fn push(&mut self, b: u8) -> Option<Command> {
        let cmd = Command::from_byte(b);
        if cmd.is_none() && !b.is_ascii_whitespace() {
            self.ignored = self.ignored.saturating_add(1);
        }
        cmd
    }

    /// Non-whitespace bytes skipped so far.
    pub fn ignored(&self) -> u32 {
        self.ignored
    }
}

impl Default for CommandDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// BC-side line framer.
///
/// Accumulates bytes until `\n`; a preceding `\r` is stripped. An over-long
/// line is dropped whole and reported once its terminator arrives, after
/// which framing resynchronises on the next line.
pub struct LineFramer {
    buf: Vec<u8, MAX_LINE>,
    overflowed: bool,
}

impl LineFramer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte. Returns `Some` when a line completes: the line
    /// contents, or [`LinkError::Overflow`] if it did not fit.
    /// Blank lines are skipped.
    pub fn push(&mut self, b: u8) -> Option<Result<Vec<u8, MAX_LINE>, LinkError>> {
        if b == b'\n' {
            if core::mem::take(&mut self.overflowed) {
                self.buf.clear();
                return Some(Err(LinkError::Overflow));
            }
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
            if self.buf.is_empty() {
                return None;
            }
            let line = self.buf.clone();
            self.buf.clear();
            return Some(Ok(line));
        }

        if self.overflowed {
            return None;
        }
        if self.buf.push(b).is_err() {
            self.overflowed = true;
            self.buf.clear();
        }
        None
    }

    /// Bytes of the current partial line.
    pub fn partial_len(&self) -> usize {
        self.buf.len()
    }

    /// Drop any partial line (e.g. after a transport reset).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tagged link message ───────────────────────────────────────

/// Everything that crosses the link, in either direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkMessage {
    Command(Command),
    Status(StatusRecord),
}

impl LinkMessage {
    /// Wire bytes including the line terminator.
    pub fn encode(&self) -> Result<alloc::vec::Vec<u8>, LinkError> {
        match self {
            Self::Command(cmd) => Ok(alloc::vec![cmd.as_byte(), b'\n']),
            Self::Status(record) => {
                let mut out = serde_json::to_vec(record).map_err(|_| LinkError::Malformed)?;
                out.push(b'\n');
                Ok(out)
            }
        }
    }
}
