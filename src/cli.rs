//! Command-line interface definitions.

use std::ffi::OsString;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use slirc_notify::AlertFields;

/// Send a monitoring alert to an IRC channel or nick.
///
/// The connection descriptor is read from `$IRC_URL`:
/// irc[s]://USER[:PASS]@HOST[:PORT]/direct|channel/RECIPIENT[?insecure=1]
#[derive(Parser, Debug)]
#[command(name = "slirc-notify", version)]
pub struct CliArgs {
    /// Connection descriptor
    #[arg(long = "irc-url", env = "IRC_URL", hide_env_values = true, value_name = "URL")]
    pub irc_url: Option<String>,

    /// $icinga.timet$
    #[arg(long = "icinga.timet", value_name = "UNIX", default_value_t = 0)]
    pub timet: i64,

    /// $host.name$
    #[arg(long = "host.name", value_name = "NAME", default_value = "")]
    pub host_name: String,

    /// $host.display_name$
    #[arg(long = "host.display_name", value_name = "NAME", default_value = "")]
    pub host_display_name: String,

    /// $host.action_url$
    #[arg(long = "host.action_url", value_name = "URL", default_value = "")]
    pub host_action_url: String,

    /// $host.state$
    #[arg(long = "host.state", value_name = "STATE", default_value = "")]
    pub host_state: String,

    /// $host.output$
    #[arg(long = "host.output", value_name = "TEXT", default_value = "")]
    pub host_output: String,

    /// $service.name$
    #[arg(long = "service.name", value_name = "NAME", default_value = "")]
    pub service_name: String,

    /// $service.display_name$
    #[arg(long = "service.display_name", value_name = "NAME", default_value = "")]
    pub service_display_name: String,

    /// $service.action_url$
    #[arg(long = "service.action_url", value_name = "URL", default_value = "")]
    pub service_action_url: String,

    /// $service.state$
    #[arg(long = "service.state", value_name = "STATE", default_value = "")]
    pub service_state: String,

    /// $service.output$
    #[arg(long = "service.output", value_name = "TEXT", default_value = "")]
    pub service_output: String,

    /// Abort delivery after this many seconds (no limit by default)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Log connection details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Parse the process arguments, accepting single-dash long flags.
    pub fn parse_env() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn alert_fields(&self) -> AlertFields {
        AlertFields {
            timestamp: Some(self.timet),
            host_name: self.host_name.clone(),
            host_display_name: self.host_display_name.clone(),
            host_action_url: self.host_action_url.clone(),
            host_state: self.host_state.clone(),
            host_output: self.host_output.clone(),
            service_name: self.service_name.clone(),
            service_display_name: self.service_display_name.clone(),
            service_action_url: self.service_action_url.clone(),
            service_state: self.service_state.clone(),
            service_output: self.service_output.clone(),
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

/// Rewrite `-host.name` style flags to `--host.name`.
///
/// Monitoring command definitions pass long flags with a single dash. Only
/// names clap knows as long flags are rewritten, so values that happen to
/// start with a dash pass through untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let command = CliArgs::command();
    let longs: Vec<&str> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .collect();

    args.into_iter()
        .map(|arg| {
            let rewritten = arg.to_str().and_then(|s| {
                let flag = s.strip_prefix('-').filter(|rest| !rest.starts_with('-'))?;
                let name = flag.split('=').next().unwrap_or(flag);
                longs.contains(&name).then(|| format!("-{}", s))
            });
            rewritten.map(OsString::from).unwrap_or(arg)
        })
        .collect()
}

/// Install the stderr log subscriber. Stdout is reserved for server output.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_normalize_single_dash_flags() {
        let normalized = normalize_args(args(&[
            "slirc-notify",
            "-host.name",
            "h1",
            "-host.state=DOWN",
            "--service.name",
            "db",
            "-v",
        ]));
        assert_eq!(
            normalized,
            args(&[
                "slirc-notify",
                "--host.name",
                "h1",
                "--host.state=DOWN",
                "--service.name",
                "db",
                "-v",
            ])
        );
    }

    #[test]
    fn test_values_starting_with_dash_are_kept() {
        let normalized = normalize_args(args(&[
            "slirc-notify",
            "-host.output",
            "-unknown flag- in output",
        ]));
        assert_eq!(normalized[2], OsString::from("-unknown flag- in output"));
    }

    #[test]
    fn test_parse_icinga_style_arguments() {
        let cli = CliArgs::try_parse_from(normalize_args(args(&[
            "slirc-notify",
            "-icinga.timet",
            "1700000000",
            "-host.name",
            "h1",
            "-host.state",
            "DOWN",
            "-host.output",
            "ping failed",
            "--timeout",
            "30",
            "--irc-url",
            "irc://bot@irc.example/channel/alerts",
        ])))
        .unwrap();

        let fields = cli.alert_fields();
        assert_eq!(fields.timestamp, Some(1_700_000_000));
        assert_eq!(fields.host_name, "h1");
        assert_eq!(fields.host_output, "ping failed");
        assert!(fields.service_name.is_empty());
        assert_eq!(cli.deadline(), Some(Duration::from_secs(30)));
        assert_eq!(
            cli.irc_url.as_deref(),
            Some("irc://bot@irc.example/channel/alerts")
        );
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }
}
