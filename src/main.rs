//! slirc-notify - send one monitoring alert to IRC.
//!
//! Exit codes: 0 delivered, 1 connection or I/O failure, 2 invalid
//! configuration, 3 delivered but the local hostname was unavailable.

mod cli;

use std::process::ExitCode;

use chrono::{Local, Utc};
use tracing::debug;

use slirc_notify::encode::{Frame, IrcEncode};
use slirc_notify::{compose, deliver, local_name_or_unknown, AlertContext, ConnectionTarget, Result};

use crate::cli::CliArgs;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse_env();
    cli::init_tracing(args.verbose);

    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: CliArgs) -> Result<u8> {
    // Validate everything before touching the network.
    let target = ConnectionTarget::parse(args.irc_url.as_deref().unwrap_or_default())?;
    let alert = AlertContext::normalize(args.alert_fields(), Utc::now().timestamp())?;

    let lookup = local_name();
    if let Err(e) = &lookup {
        eprintln!("warning: cannot determine local hostname: {}", e);
    }
    let (local_name, exit_code) = local_name_or_unknown(&lookup);

    let message = compose(&alert, &local_name, &Local);
    let frame = Frame::build(&target.identity(), &target.recipient(), &message)?;
    debug!(
        descriptor = %target,
        scope = %alert.scope(),
        lines = frame.message_count(),
        "frame built"
    );

    let mut stdout = tokio::io::stdout();
    deliver(&target, &frame.to_bytes(), &mut stdout, args.deadline()).await?;

    Ok(exit_code)
}

fn local_name() -> std::io::Result<String> {
    hostname::get()?.into_string().map_err(|raw| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("hostname {:?} is not valid UTF-8", raw),
        )
    })
}
