//! The ordered command sequence of one notification.

use std::fmt;
use std::io::{self, Write};

use crate::command::Command;
use crate::compose::RenderedMessage;
use crate::error::ConfigError;
use crate::validation::{strip_carriage_returns, validate_param, validate_token};

use super::IrcEncode;

/// Payload sent for a body line that is empty after splitting.
///
/// Some servers read `PRIVMSG target :` with an empty trailing argument as a
/// different command, so blank lines are never sent as-is.
pub const EMPTY_LINE_PLACEHOLDER: &str = ".";

/// Host and server fields of `USER`; servers ignore them from clients.
const USER_HOST_PLACEHOLDER: &str = "0.0.0.0";

/// Registration credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Used as both nickname and user name.
    pub nick: String,
    /// Server password; `None` or empty skips `PASS`.
    pub password: Option<String>,
}

/// Split a body into the lines that become `PRIVMSG` payloads.
///
/// The body is trimmed as a whole, carriage returns are dropped and the rest
/// is split on line feeds. Empty lines are replaced by
/// [`EMPTY_LINE_PLACEHOLDER`]. No returned line contains CR or LF.
pub fn body_lines(body: &str) -> Vec<String> {
    strip_carriage_returns(body.trim())
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                EMPTY_LINE_PLACEHOLDER.to_string()
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Every command sent on one connection, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    commands: Vec<Command>,
}

impl Frame {
    /// Build the frame: optional `PASS`, `NICK`, `USER`, one `PRIVMSG` per
    /// body line, `QUIT`.
    ///
    /// The nick and recipient are re-checked so that no caller can smuggle a
    /// line break into the registration or target fields.
    pub fn build(
        identity: &Identity,
        recipient: &str,
        message: &RenderedMessage,
    ) -> Result<Self, ConfigError> {
        validate_token("user", &identity.nick)?;
        validate_token("recipient", recipient)?;
        if identity.nick.is_empty() {
            return Err(ConfigError::MissingUser);
        }

        let lines = body_lines(message.body());
        let mut commands = Vec::with_capacity(lines.len() + 4);

        if let Some(password) = identity.password.as_deref().filter(|p| !p.is_empty()) {
            validate_param("password", password)?;
            commands.push(Command::PASS(password.to_string()));
        }

        let nick = &identity.nick;
        commands.push(Command::NICK(nick.clone()));
        commands.push(Command::USER(
            nick.clone(),
            USER_HOST_PLACEHOLDER.to_string(),
            USER_HOST_PLACEHOLDER.to_string(),
            nick.clone(),
        ));

        commands.extend(
            lines
                .into_iter()
                .map(|line| Command::PRIVMSG(recipient.to_string(), line)),
        );

        commands.push(Command::QUIT(None));

        Ok(Self { commands })
    }

    /// The commands in send order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of `PRIVMSG` lines.
    pub fn message_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::PRIVMSG(..)))
            .count()
    }
}

impl IrcEncode for Frame {
    fn encode<W: Write>(&self, w: &mut W) -> io::Result<usize> {
        let mut written = 0;
        for command in &self.commands {
            written += command.encode(w)?;
            w.write_all(b"\r\n")?;
            written += 2;
        }
        Ok(written)
    }
}

/// One command per line with the password redacted, for logs.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            match command {
                Command::PASS(_) => writeln!(f, "PASS ***")?,
                other => writeln!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}
