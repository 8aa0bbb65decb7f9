//! Command encoding implementation.

use std::io::{self, Write};

use crate::command::Command;

use super::{write_cmd, write_cmd_freeform, IrcEncode};

impl IrcEncode for Command {
    fn encode<W: Write>(&self, w: &mut W) -> io::Result<usize> {
        match self {
            Command::PASS(p) => write_cmd(w, b"PASS", &[p.as_str()]),
            Command::NICK(n) => write_cmd(w, b"NICK", &[n.as_str()]),
            Command::USER(u, h, s, r) => write_cmd(
                w,
                b"USER",
                &[u.as_str(), h.as_str(), s.as_str(), r.as_str()],
            ),
            Command::PRIVMSG(t, m) => write_cmd_freeform(w, b"PRIVMSG", &[t.as_str(), m.as_str()]),
            Command::QUIT(Some(m)) => write_cmd_freeform(w, b"QUIT", &[m.as_str()]),
            Command::QUIT(None) => write_cmd(w, b"QUIT", &[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_registration() {
        assert_eq!(Command::PASS("secret".into()).to_bytes(), b"PASS secret");
        assert_eq!(Command::NICK("bot".into()).to_bytes(), b"NICK bot");
        assert_eq!(
            Command::USER("bot".into(), "0.0.0.0".into(), "0.0.0.0".into(), "bot".into())
                .to_bytes(),
            b"USER bot 0.0.0.0 0.0.0.0 bot"
        );
    }

    #[test]
    fn test_encode_privmsg_single_word() {
        let bytes = Command::PRIVMSG("alice".into(), ".".into()).to_bytes();
        assert_eq!(&bytes, b"PRIVMSG alice :.");
    }

    #[test]
    fn test_encode_quit() {
        assert_eq!(Command::QUIT(None).to_bytes(), b"QUIT");
        assert_eq!(Command::QUIT(Some("bye".into())).to_bytes(), b"QUIT :bye");
    }

    #[test]
    fn test_encode_returns_byte_count() {
        let cmd = Command::PRIVMSG("#ops".into(), "Hello world!".into());
        let mut buf = Vec::new();
        let written = cmd.encode(&mut buf).unwrap();
        assert_eq!(written, buf.len());
    }
}
