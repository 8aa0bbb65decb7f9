//! Notification text rendering.
//!
//! Renders a validated [`AlertContext`] into the human-readable body that
//! the frame encoder later splits into `PRIVMSG` lines. Nothing is escaped
//! or truncated here; check output is carried verbatim.

use std::fmt::{self, Display, Write as _};
use std::io;

use chrono::TimeZone;

use crate::alert::AlertContext;
use crate::error::{EXIT_DEGRADED, EXIT_OK};

/// Local display name used when the hostname lookup fails.
pub const UNKNOWN_LOCAL_NAME: &str = "(unknown)";

/// Pick the local display name from a hostname lookup.
///
/// Returns the name and the exit code of a successful delivery: a failed or
/// blank lookup yields [`UNKNOWN_LOCAL_NAME`] and [`EXIT_DEGRADED`].
pub fn local_name_or_unknown(lookup: &io::Result<String>) -> (String, u8) {
    match lookup {
        Ok(name) if !name.trim().is_empty() => (name.trim().to_string(), EXIT_OK),
        _ => (UNKNOWN_LOCAL_NAME.to_string(), EXIT_DEGRADED),
    }
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// The composed notification body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedMessage(String);

impl RenderedMessage {
    /// The full body, lines separated by `\n`.
    pub fn body(&self) -> &str {
        &self.0
    }

    /// Iterate the body line by line, without sanitization.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.split('\n')
    }
}

impl From<String> for RenderedMessage {
    fn from(body: String) -> Self {
        Self(body)
    }
}

impl Display for RenderedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render an alert.
///
/// `local_name` identifies the machine running the monitoring system and
/// `tz` the zone timestamps are shown in.
pub fn compose<Tz>(alert: &AlertContext, local_name: &str, tz: &Tz) -> RenderedMessage
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let punct = if alert.is_recovery() { '.' } else { '!' };
    let when = format_timestamp(alert.timestamp, tz);
    let host = &alert.host;

    // Writing to a String cannot fail.
    let mut body = String::with_capacity(256 + alert.output.len());
    let _ = write!(body, "***** {} monitoring on {} *****\n\n", alert.scope(), local_name);

    match &alert.service {
        Some(service) => {
            let _ = write!(
                body,
                "{} on {} is {}{}\n\n",
                service.display_name, host.display_name, alert.state, punct
            );
            let _ = writeln!(body, "When: {}", when);
            let _ = writeln!(body, "{}", detail_line("Host", &host.name, &host.action_url));
            let _ = writeln!(
                body,
                "{}",
                detail_line("Service", &service.name, &service.action_url)
            );
        }
        None => {
            let _ = write!(body, "{} is {}{}\n\n", host.display_name, alert.state, punct);
            let _ = writeln!(body, "When: {}", when);
            let _ = writeln!(body, "{}", detail_line("Host", &host.name, &host.action_url));
        }
    }

    body.push_str("\nInfo:\n\n");
    body.push_str(&alert.output);

    RenderedMessage(body)
}

/// Render unix seconds in `tz`, falling back to the raw number when the
/// value is out of chrono's range.
pub fn format_timestamp<Tz>(unix_secs: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_opt(unix_secs, 0).earliest() {
        Some(datetime) => datetime.format(TIMESTAMP_FORMAT).to_string(),
        None => format!("{} (unix)", unix_secs),
    }
}

fn detail_line(label: &str, name: &str, action_url: &str) -> String {
    if action_url.trim().is_empty() {
        format!("{}: {}", label, name)
    } else {
        format!("{}: {} {}", label, name, action_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertFields;
    use chrono::{FixedOffset, Utc};

    fn host_alert(state: &str, output: &str) -> AlertContext {
        AlertContext::normalize(
            AlertFields {
                timestamp: Some(1_700_000_000),
                host_name: "h1".into(),
                host_state: state.into(),
                host_output: output.into(),
                ..Default::default()
            },
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_host_message_layout() {
        let msg = compose(&host_alert("DOWN", "ping failed"), "icinga1", &Utc);

        assert_eq!(
            msg.body(),
            "***** Host monitoring on icinga1 *****\n\
             \n\
             h1 is DOWN!\n\
             \n\
             When: 2023-11-14 22:13:20 +0000\n\
             Host: h1\n\
             \n\
             Info:\n\
             \n\
             ping failed"
        );
    }

    #[test]
    fn test_service_message_layout() {
        let alert = AlertContext::normalize(
            AlertFields {
                timestamp: Some(1_700_000_000),
                host_name: "h1".into(),
                host_display_name: "Web Host".into(),
                host_action_url: "https://mon.example/h1".into(),
                service_name: "http".into(),
                service_action_url: "https://mon.example/h1/http".into(),
                service_state: "OK".into(),
                service_output: "HTTP OK: 200".into(),
                ..Default::default()
            },
            0,
        )
        .unwrap();

        let msg = compose(&alert, "icinga1", &Utc);
        let lines: Vec<&str> = msg.lines().collect();
        assert_eq!(
            lines,
            vec![
                "***** Service monitoring on icinga1 *****",
                "",
                "http on Web Host is OK.",
                "",
                "When: 2023-11-14 22:13:20 +0000",
                "Host: h1 https://mon.example/h1",
                "Service: http https://mon.example/h1/http",
                "",
                "Info:",
                "",
                "HTTP OK: 200",
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        for (state, expected) in [
            ("UP", "h1 is UP."),
            ("OK", "h1 is OK."),
            ("CRITICAL", "h1 is CRITICAL!"),
            ("up", "h1 is up!"),
            ("Ok", "h1 is Ok!"),
        ] {
            let msg = compose(&host_alert(state, ""), "n", &Utc);
            assert_eq!(msg.lines().nth(2), Some(expected));
        }
    }

    #[test]
    fn test_output_is_verbatim() {
        let output = "line one\r\n\n  indented\tline\r\n";
        let msg = compose(&host_alert("DOWN", output), "n", &Utc);
        assert!(msg.body().ends_with(output));
    }

    #[test]
    fn test_failed_hostname_lookup_degrades() {
        let lookup = Err(io::Error::new(io::ErrorKind::NotFound, "no hostname"));
        let (name, code) = local_name_or_unknown(&lookup);
        assert_eq!(code, EXIT_DEGRADED);

        let msg = compose(&host_alert("DOWN", "ping failed"), &name, &Utc);
        assert_eq!(msg.lines().next(), Some("***** Host monitoring on (unknown) *****"));

        let (name, code) = local_name_or_unknown(&Ok("  ".to_string()));
        assert_eq!((name.as_str(), code), (UNKNOWN_LOCAL_NAME, EXIT_DEGRADED));
    }

    #[test]
    fn test_hostname_lookup_success() {
        let (name, code) = local_name_or_unknown(&Ok("icinga1".to_string()));
        assert_eq!(name, "icinga1");
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn test_timestamp_uses_given_zone() {
        let cest = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_timestamp(0, &cest), "1970-01-01 02:00:00 +0200");
        assert_eq!(format_timestamp(i64::MAX, &Utc), format!("{} (unix)", i64::MAX));
    }
}
