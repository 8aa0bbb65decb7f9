//! Fuzz target for connection descriptor parsing
//!
//! Any string that parses must yield a target whose registration fields
//! cannot break a protocol line.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        if let Ok(target) = slirc_notify::ConnectionTarget::parse(input) {
            assert!(!target.user.is_empty());
            assert!(!target.recipient_name.is_empty());
            for field in [target.user.as_str(), target.recipient().as_str()] {
                assert!(!field.contains(['\r', '\n', ' ', '\0']));
            }
            let _ = target.to_string();
        }
    }
});
