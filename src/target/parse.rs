//! Nom grammar for the descriptor path.
//!
//! ```text
//! path      = "/" mode "/" recipient
//! mode      = "direct" / "channel"
//! recipient = 1*( any character except "/" )
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{all_consuming, value},
    error::{context, VerboseError},
    sequence::{pair, preceded},
    IResult,
};

use super::Delivery;

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

fn parse_delivery(input: &str) -> ParseResult<&str, Delivery> {
    context(
        "parsing delivery mode",
        alt((
            value(Delivery::Direct, tag("direct")),
            value(Delivery::Channel, tag("channel")),
        )),
    )(input)
}

fn parse_recipient(input: &str) -> ParseResult<&str, &str> {
    context("parsing recipient", take_while1(|c| c != '/'))(input)
}

/// Split a decoded descriptor path into its delivery mode and recipient.
///
/// Returns `None` unless the whole path matches `/direct/<name>` or
/// `/channel/<name>`.
pub(super) fn descriptor_path(input: &str) -> Option<(Delivery, &str)> {
    all_consuming(pair(
        preceded(char('/'), parse_delivery),
        preceded(char('/'), parse_recipient),
    ))(input)
    .ok()
    .map(|(_, parsed)| parsed)
}
