//! Fuzz target: `parse_message`
//!
//! Splits the input at the first NUL into topic and payload and checks
//! that only the exact command literals on the command topic are turned
//! into commands.
//!
//! cargo fuzz run fuzz_inbound_message

#![no_main]

use garagedoor::app::commands::{InboundMessage, parse_message};
use garagedoor::config::TopicConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let (topic, payload) = match data.iter().position(|&b| b == 0) {
        Some(i) => (&data[..i], &data[i + 1..]),
        None => (data, &[][..]),
    };
    let Ok(topic) = core::str::from_utf8(topic) else {
        return;
    };

    let topics = TopicConfig::default();
    if let InboundMessage::Command(cmd) = parse_message(&topics, topic, payload) {
        assert_eq!(topic, topics.command.as_str());
        assert_eq!(payload, cmd.as_str().as_bytes());
    }
});
