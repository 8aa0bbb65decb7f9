//! Wire encoding for the notification frame.
//!
//! This module provides the [`IrcEncode`] trait for writing IRC commands
//! directly to any [`Write`] implementor, and the [`Frame`] that orders the
//! registration, message and quit commands of one notification.
//!
//! # Example
//!
//! ```
//! use slirc_notify::encode::{Frame, Identity, IrcEncode};
//! use slirc_notify::RenderedMessage;
//!
//! let identity = Identity { nick: "bot".into(), password: None };
//! let body = RenderedMessage::from("disk full\n\nsee graphs".to_string());
//! let frame = Frame::build(&identity, "#ops", &body).unwrap();
//!
//! assert_eq!(
//!     frame.to_bytes(),
//!     b"NICK bot\r\n\
//!       USER bot 0.0.0.0 0.0.0.0 bot\r\n\
//!       PRIVMSG #ops :disk full\r\n\
//!       PRIVMSG #ops :.\r\n\
//!       PRIVMSG #ops :see graphs\r\n\
//!       QUIT\r\n"
//! );
//! ```

use std::io::{self, Write};

mod command;
mod frame;

pub use self::frame::{body_lines, Frame, Identity, EMPTY_LINE_PLACEHOLDER};

/// A trait for encoding IRC protocol elements directly to a byte stream.
///
/// # Implementors
///
/// - [`Command`](crate::command::Command) - one protocol line, without CRLF
/// - [`Frame`] - every line of a notification, CRLF-terminated
pub trait IrcEncode {
    /// Encode this value to the given writer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the write fails.
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<usize>;

    /// Encode this value to a new `Vec<u8>`.
    #[must_use]
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(512); // IRC max line length
        let _ = self.encode(&mut buf);
        buf
    }
}

/// Check if a string needs colon-prefixing as a trailing IRC argument.
#[inline]
pub(crate) fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

#[inline]
fn put<W: Write>(w: &mut W, bytes: &[u8]) -> io::Result<usize> {
    w.write_all(bytes)?;
    Ok(bytes.len())
}

/// Write a command with arguments. The last argument gets a `:` prefix if needed.
pub(crate) fn write_cmd<W: Write>(w: &mut W, cmd: &[u8], args: &[&str]) -> io::Result<usize> {
    let mut written = put(w, cmd)?;

    let Some((trailing, middle)) = args.split_last() else {
        return Ok(written);
    };

    for param in middle {
        written += put(w, b" ")?;
        written += put(w, param.as_bytes())?;
    }

    written += put(w, b" ")?;

    if needs_colon_prefix(trailing) {
        written += put(w, b":")?;
    }

    written += put(w, trailing.as_bytes())?;
    Ok(written)
}

/// Write a command with a freeform (always colon-prefixed) trailing argument.
pub(crate) fn write_cmd_freeform<W: Write>(
    w: &mut W,
    cmd: &[u8],
    args: &[&str],
) -> io::Result<usize> {
    let mut written = put(w, cmd)?;

    let Some((last, middle)) = args.split_last() else {
        return Ok(written);
    };

    for arg in middle {
        written += put(w, b" ")?;
        written += put(w, arg.as_bytes())?;
    }

    written += put(w, b" :")?;
    written += put(w, last.as_bytes())?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_cmd_trailing_rules() {
        let mut buf = Vec::new();
        write_cmd(&mut buf, b"PASS", &["plain"]).unwrap();
        assert_eq!(&buf, b"PASS plain");

        let mut buf = Vec::new();
        write_cmd(&mut buf, b"PASS", &["two words"]).unwrap();
        assert_eq!(&buf, b"PASS :two words");

        let mut buf = Vec::new();
        write_cmd(&mut buf, b"PASS", &[":colon"]).unwrap();
        assert_eq!(&buf, b"PASS ::colon");
    }

    #[test]
    fn test_write_cmd_freeform_always_prefixes() {
        let mut buf = Vec::new();
        let written = write_cmd_freeform(&mut buf, b"PRIVMSG", &["#ops", "word"]).unwrap();
        assert_eq!(&buf, b"PRIVMSG #ops :word");
        assert_eq!(written, buf.len());
    }

    #[test]
    fn test_write_cmd_without_args() {
        let mut buf = Vec::new();
        assert_eq!(write_cmd(&mut buf, b"QUIT", &[]).unwrap(), 4);
        assert_eq!(&buf, b"QUIT");
    }
}
