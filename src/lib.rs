//! # slirc-notify
//!
//! Turns one monitoring alert (a host or service check result) into one IRC
//! notification: connect, register, send a multi-line `PRIVMSG`, quit.
//!
//! ## Pipeline
//!
//! - [`target`] parses the connection descriptor into a [`ConnectionTarget`]
//! - [`alert`] validates the alert fields into an [`AlertContext`]
//! - [`compose`] renders the alert into a [`RenderedMessage`]
//! - [`encode`] frames registration, message lines and `QUIT` for the wire
//! - [`transport`] delivers the frame over TCP or TLS
//!
//! Everything before [`transport`] is pure and performs no I/O.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use slirc_notify::encode::{Frame, IrcEncode};
//! use slirc_notify::{compose, AlertContext, AlertFields, ConnectionTarget};
//!
//! let target: ConnectionTarget = "irc://bot@irc.example/channel/alerts".parse().unwrap();
//! let alert = AlertContext::normalize(
//!     AlertFields {
//!         host_name: "h1".into(),
//!         host_state: "DOWN".into(),
//!         host_output: "ping failed".into(),
//!         ..Default::default()
//!     },
//!     1_700_000_000,
//! )
//! .unwrap();
//!
//! let message = compose(&alert, "icinga1", &Utc);
//! let frame = Frame::build(&target.identity(), &target.recipient(), &message).unwrap();
//! let bytes = frame.to_bytes();
//!
//! assert!(bytes.starts_with(b"NICK bot\r\n"));
//! assert!(bytes.ends_with(b"QUIT\r\n"));
//! ```

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod alert;
pub mod command;
pub mod compose;
pub mod encode;
pub mod error;
pub mod target;
pub mod validation;

#[cfg(feature = "tokio")]
pub mod transport;

pub use self::alert::{AlertContext, AlertFields, Scope};
pub use self::command::Command;
pub use self::compose::{compose, local_name_or_unknown, RenderedMessage, UNKNOWN_LOCAL_NAME};
pub use self::encode::{Frame, Identity, IrcEncode};
pub use self::error::{ConfigError, NotifyError, Result};
pub use self::target::{ConnectionTarget, Delivery};

#[cfg(feature = "tokio")]
pub use self::transport::{deliver, Connection};
