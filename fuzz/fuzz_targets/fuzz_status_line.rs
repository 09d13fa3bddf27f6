//! Fuzz target: BC receive path (`LineFramer` + `StatusRecord::parse_line`)
//!
//! Arbitrary bytes from the serial line must never panic the framer or the
//! parser, and anything accepted must re-encode to a line the parser
//! accepts again.
//!
//! cargo fuzz run fuzz_status_line

#![no_main]

use clothesline::link::codec::{LineFramer, LinkMessage, MAX_LINE};
use clothesline::link::record::StatusRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut framer = LineFramer::new();

    for &b in data {
        let Some(Ok(line)) = framer.push(b) else {
            continue;
        };
        assert!(line.len() <= MAX_LINE, "line exceeds framer capacity");

        if let Ok(record) = StatusRecord::parse_line(&line) {
            let wire = LinkMessage::Status(record).encode().expect("encode accepted record");
            let reparsed = StatusRecord::parse_line(&wire[..wire.len() - 1]);
            assert_eq!(reparsed, Ok(record));
        }
    }

    // A reset framer must accept the same input cleanly again.
    framer.reset();
    for &b in data {
        let _ = framer.push(b);
    }
});
