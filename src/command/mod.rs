//! IRC commands sent by the notifier.
//!
//! Only the client commands needed to register, deliver a notification and
//! leave are modelled:
//!
//! - RFC 2812 Section 3.1: `PASS`, `NICK`, `USER`, `QUIT`
//! - RFC 2812 Section 3.3: `PRIVMSG`

use std::fmt;

use crate::encode::IrcEncode;

/// IRC command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `PASS password`
    PASS(String),
    /// `NICK nickname`
    NICK(String),
    /// `USER username hostname servername realname`
    USER(String, String, String, String),
    /// `PRIVMSG target :text`
    PRIVMSG(String, String),
    /// `QUIT [message]`
    QUIT(Option<String>),
}

impl Command {
    /// The command verb.
    pub fn name(&self) -> &'static str {
        match self {
            Command::PASS(_) => "PASS",
            Command::NICK(_) => "NICK",
            Command::USER(..) => "USER",
            Command::PRIVMSG(..) => "PRIVMSG",
            Command::QUIT(_) => "QUIT",
        }
    }
}

/// Serializes without the CRLF terminator.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}
