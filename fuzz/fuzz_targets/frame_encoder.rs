//! Fuzz target for frame encoding
//!
//! Arbitrary message bodies must never produce a line containing CR or LF,
//! nor an empty `PRIVMSG` payload.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_notify::encode::{Frame, Identity, IrcEncode};
use slirc_notify::RenderedMessage;
use std::str;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = str::from_utf8(data) else {
        return;
    };

    let identity = Identity {
        nick: "bot".to_string(),
        password: None,
    };
    let Ok(frame) = Frame::build(&identity, "#ops", &RenderedMessage::from(body.to_string())) else {
        return;
    };

    let wire = frame.to_bytes();
    for line in wire.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        assert!(!line.contains(&b'\r'));
        assert_ne!(line, b"PRIVMSG #ops :");
    }
});
