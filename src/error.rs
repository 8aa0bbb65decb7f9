//! Error types for the notifier.
//!
//! This module defines the configuration errors raised while validating the
//! connection descriptor and alert fields, and the top-level [`NotifyError`]
//! that also covers transport failures. Every variant maps to a process exit
//! code through [`NotifyError::exit_code`].

use std::time::Duration;

use thiserror::Error;

/// The descriptor shape quoted in configuration error messages.
pub const DESCRIPTOR_FORMAT: &str =
    "irc[s]://USER[:PASS]@HOST[:PORT]/direct|channel/RECIPIENT[?insecure=1]";

/// Exit code for a fully successful run.
pub const EXIT_OK: u8 = 0;

/// Exit code for connection, TLS and I/O failures.
pub const EXIT_IO: u8 = 1;

/// Exit code for configuration and validation failures.
pub const EXIT_CONFIG: u8 = 2;

/// Exit code for a delivered notification whose local hostname lookup failed.
pub const EXIT_DEGRADED: u8 = 3;

/// Convenience type alias for Results using [`NotifyError`].
pub type Result<T, E = NotifyError> = std::result::Result<T, E>;

/// Top-level notifier errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotifyError {
    /// Invalid descriptor or alert fields.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The TCP connection could not be established.
    #[error("cannot connect to {addr}: {source}")]
    Connect {
        /// The `host:port` that was dialed.
        addr: String,
        /// The underlying dial error.
        #[source]
        source: std::io::Error,
    },

    /// The TLS handshake failed.
    #[error("TLS handshake with {host} failed: {source}")]
    Tls {
        /// The server name used for the handshake.
        host: String,
        /// The underlying handshake error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the frame or reading the server response failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The delivery deadline expired.
    #[error("delivery timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
}

impl NotifyError {
    /// The process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            NotifyError::Config(_) => EXIT_CONFIG,
            NotifyError::Connect { .. }
            | NotifyError::Tls { .. }
            | NotifyError::Io(_)
            | NotifyError::TimedOut(_) => EXIT_IO,
        }
    }
}

/// Errors raised while validating the descriptor and the alert fields.
///
/// All of these are detected before any network I/O happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// No descriptor was supplied.
    #[error("$IRC_URL missing ({fmt})", fmt = DESCRIPTOR_FORMAT)]
    MissingDescriptor,

    /// The descriptor is not a URL.
    #[error("bad IRC URL ({fmt}): {0}", fmt = DESCRIPTOR_FORMAT)]
    InvalidUrl(String),

    /// The scheme is neither `irc` nor `ircs`.
    #[error("bad protocol {0:?} in IRC URL ({fmt})", fmt = DESCRIPTOR_FORMAT)]
    UnsupportedScheme(String),

    /// The userinfo section has no user name.
    #[error("missing user in IRC URL ({fmt})", fmt = DESCRIPTOR_FORMAT)]
    MissingUser,

    /// The authority section has no host.
    #[error("missing host in IRC URL ({fmt})", fmt = DESCRIPTOR_FORMAT)]
    MissingHost,

    /// The path is not `/direct/<name>` or `/channel/<name>`.
    #[error("bad path {0:?} in IRC URL ({fmt})", fmt = DESCRIPTOR_FORMAT)]
    InvalidPath(String),

    /// A percent-encoded component did not decode to UTF-8.
    #[error("bad encoding of {field} in IRC URL: {reason}")]
    InvalidEncoding {
        /// The descriptor component.
        field: &'static str,
        /// The decoder's message.
        reason: String,
    },

    /// A descriptor component contains a character the protocol cannot carry.
    #[error("invalid character {ch:?} at position {position} in {field}")]
    InvalidChar {
        /// The descriptor component.
        field: &'static str,
        /// The offending character.
        ch: char,
        /// Character position within the component.
        position: usize,
    },

    /// Service fields were given without all required ones.
    #[error("-service.* is given, missing some of: -host.name, -service.name, -service.state")]
    IncompleteServiceAlert,

    /// Host fields were given without all required ones.
    #[error("-host.* is given, missing some of: -host.name, -host.state")]
    IncompleteHostAlert,

    /// Neither host nor service fields were given.
    #[error("missing either -host.name and -host.state or -host.name, -service.name and -service.state")]
    MissingAlert,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingUser;
        assert_eq!(
            err.to_string(),
            format!("missing user in IRC URL ({})", DESCRIPTOR_FORMAT)
        );

        let err = ConfigError::InvalidChar {
            field: "user",
            ch: '\r',
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid character '\\r' at position 3 in user"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: NotifyError = ConfigError::MissingAlert.into();
        assert_eq!(err.to_string(), ConfigError::MissingAlert.to_string());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(NotifyError::from(ConfigError::MissingHost).exit_code(), EXIT_CONFIG);

        let io_err =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let connect = NotifyError::Connect {
            addr: "irc.example:6667".to_string(),
            source: io_err,
        };
        assert_eq!(connect.exit_code(), EXIT_IO);

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        assert_eq!(NotifyError::from(io_err).exit_code(), EXIT_IO);
        assert_eq!(NotifyError::TimedOut(Duration::from_secs(5)).exit_code(), EXIT_IO);
    }

    #[test]
    fn test_connect_error_source_chaining() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "dial timeout");
        let err = NotifyError::Tls {
            host: "irc.example".to_string(),
            source: io_err,
        };

        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), "dial timeout");
    }
}
