//! Protocol-token validation for descriptor components.
//!
//! The user name, recipient and password taken from the connection
//! descriptor are written verbatim into `NICK`, `USER`, `PRIVMSG` and `PASS`
//! lines. A percent-encoded CR or LF in any of them would split the line and
//! inject a command of the descriptor author's choosing, so they are checked
//! here before anything is encoded.
//!
//! # Rules
//!
//! - Tokens (user, recipient): no whitespace, no control characters, and no
//!   leading `:` since that would turn a middle parameter into a trailing one.
//! - Parameters (password): no NUL, CR or LF.

use std::borrow::Cow;

use crate::error::ConfigError;

/// Control characters that are never valid inside an IRC line.
///
/// These characters terminate or delimit IRC protocol lines.
pub const PROTOCOL_CONTROL_CHARS: &[char] = &[
    '\x00', // NUL - terminates strings
    '\x0D', // CR - line delimiter
    '\x0A', // LF - line delimiter
];

/// Check if a character is a protocol control character (NUL, CR, LF).
///
/// # Examples
///
/// ```
/// use slirc_notify::validation::is_protocol_control_char;
///
/// assert!(is_protocol_control_char('\x00'));
/// assert!(is_protocol_control_char('\r'));
/// assert!(is_protocol_control_char('\n'));
/// assert!(!is_protocol_control_char('\x02')); // Bold - formatting, not protocol
/// ```
#[inline]
pub fn is_protocol_control_char(c: char) -> bool {
    PROTOCOL_CONTROL_CHARS.contains(&c)
}

/// Check if a character may not appear inside a space-delimited IRC token.
#[inline]
pub fn is_invalid_token_char(c: char) -> bool {
    c.is_whitespace() || c.is_control()
}

/// Remove carriage returns from a message body.
///
/// Borrows when there is nothing to strip.
///
/// # Examples
///
/// ```
/// use slirc_notify::validation::strip_carriage_returns;
///
/// assert_eq!(strip_carriage_returns("a\r\nb"), "a\nb");
/// assert_eq!(strip_carriage_returns("plain"), "plain");
/// ```
pub fn strip_carriage_returns(s: &str) -> Cow<'_, str> {
    if !s.contains('\r') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.replace('\r', ""))
}

/// Validate a nick, user name or recipient.
///
/// `field` names the descriptor component in the resulting error.
pub fn validate_token(field: &'static str, token: &str) -> Result<(), ConfigError> {
    for (position, ch) in token.chars().enumerate() {
        if is_invalid_token_char(ch) || (position == 0 && ch == ':') {
            return Err(ConfigError::InvalidChar {
                field,
                ch,
                position,
            });
        }
    }
    Ok(())
}

/// Validate a free-form parameter such as a password.
pub fn validate_param(field: &'static str, param: &str) -> Result<(), ConfigError> {
    match param
        .chars()
        .enumerate()
        .find(|(_, ch)| is_protocol_control_char(*ch))
    {
        Some((position, ch)) => Err(ConfigError::InvalidChar {
            field,
            ch,
            position,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token_accepts_nick_chars() {
        assert!(validate_token("user", "alert-bot").is_ok());
        assert!(validate_token("user", "[bot]^_`{|}").is_ok());
        assert!(validate_token("recipient", "#ops").is_ok());
        assert!(validate_token("recipient", "ops:west").is_ok());
    }

    #[test]
    fn test_validate_token_rejects_line_breaks() {
        let err = validate_token("recipient", "ops\r\nQUIT").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidChar {
                field: "recipient",
                ch: '\r',
                position: 3,
            }
        );
    }

    #[test]
    fn test_validate_token_rejects_whitespace_and_leading_colon() {
        assert!(matches!(
            validate_token("user", "al ice"),
            Err(ConfigError::InvalidChar { ch: ' ', position: 2, .. })
        ));
        assert!(matches!(
            validate_token("user", ":alice"),
            Err(ConfigError::InvalidChar { ch: ':', position: 0, .. })
        ));
        assert!(matches!(
            validate_token("user", "bell\x07"),
            Err(ConfigError::InvalidChar { ch: '\x07', .. })
        ));
    }

    #[test]
    fn test_validate_param() {
        assert!(validate_param("password", "s3cret with spaces").is_ok());
        assert!(validate_param("password", ":leading").is_ok());
        assert!(matches!(
            validate_param("password", "pw\nNICK x"),
            Err(ConfigError::InvalidChar { field: "password", ch: '\n', position: 2 })
        ));
        assert!(validate_param("password", "nul\0").is_err());
    }

    #[test]
    fn test_strip_carriage_returns_borrows_when_clean() {
        assert!(matches!(strip_carriage_returns("clean"), Cow::Borrowed(_)));
        assert_eq!(strip_carriage_returns("\r\r\n"), "\n");
    }
}
