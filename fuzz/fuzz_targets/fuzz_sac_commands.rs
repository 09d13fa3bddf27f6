//! Fuzz target: SAC receive path (`CommandDecoder`)
//!
//! Each of the three command bytes yields its command wherever it sits in
//! the stream; every other byte yields nothing.
//!
//! cargo fuzz run fuzz_sac_commands

#![no_main]

use clothesline::link::codec::{Command, CommandDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = CommandDecoder::new();

    for &b in data {
        assert_eq!(decoder.push(b), Command::from_byte(b));
    }
});
