//! Alert field normalization.
//!
//! The monitoring system hands over a flat set of `host.*` and `service.*`
//! macros. [`AlertContext::normalize`] decides whether the alert concerns a
//! host or a service, checks that the required fields for that scope are
//! present and fills in display names and the timestamp.

use std::fmt;

use crate::error::ConfigError;

/// Raw alert fields as supplied by the monitoring system.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlertFields {
    /// `$icinga.timet$`; zero or absent means "now".
    pub timestamp: Option<i64>,

    pub host_name: String,
    pub host_display_name: String,
    pub host_action_url: String,
    pub host_state: String,
    pub host_output: String,

    pub service_name: String,
    pub service_display_name: String,
    pub service_action_url: String,
    pub service_state: String,
    pub service_output: String,
}

impl AlertFields {
    fn has_service_fields(&self) -> bool {
        [
            &self.service_name,
            &self.service_display_name,
            &self.service_action_url,
            &self.service_state,
            &self.service_output,
        ]
        .into_iter()
        .any(|f| !blank(f))
    }

    fn has_host_fields(&self) -> bool {
        [
            &self.host_name,
            &self.host_display_name,
            &self.host_action_url,
            &self.host_state,
            &self.host_output,
        ]
        .into_iter()
        .any(|f| !blank(f))
    }
}

/// Whether an alert concerns a host or a service on a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Host,
    Service,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Host => f.write_str("Host"),
            Scope::Service => f.write_str("Service"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostDetails {
    pub name: String,
    pub display_name: String,
    pub action_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceDetails {
    pub name: String,
    pub display_name: String,
    pub action_url: String,
}

/// A validated alert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertContext {
    /// Unix seconds.
    pub timestamp: i64,
    pub host: HostDetails,
    /// Present exactly when the alert is service-scoped.
    pub service: Option<ServiceDetails>,
    /// State of the active scope, e.g. `DOWN` or `CRITICAL`.
    pub state: String,
    /// Check output of the active scope.
    pub output: String,
}

impl AlertContext {
    /// Validate raw fields and apply defaults.
    ///
    /// `now` is the wall-clock time in unix seconds, used when the alert
    /// carries no timestamp.
    pub fn normalize(fields: AlertFields, now: i64) -> Result<Self, ConfigError> {
        let service_scoped = if fields.has_service_fields() {
            if blank(&fields.host_name) || blank(&fields.service_name) || blank(&fields.service_state)
            {
                return Err(ConfigError::IncompleteServiceAlert);
            }
            true
        } else if fields.has_host_fields() {
            if blank(&fields.host_name) || blank(&fields.host_state) {
                return Err(ConfigError::IncompleteHostAlert);
            }
            false
        } else {
            return Err(ConfigError::MissingAlert);
        };

        let timestamp = match fields.timestamp {
            Some(ts) if ts != 0 => ts,
            _ => now,
        };

        let host = HostDetails {
            display_name: or_default(fields.host_display_name, &fields.host_name),
            name: fields.host_name,
            action_url: fields.host_action_url,
        };

        if service_scoped {
            Ok(Self {
                timestamp,
                host,
                service: Some(ServiceDetails {
                    display_name: or_default(fields.service_display_name, &fields.service_name),
                    name: fields.service_name,
                    action_url: fields.service_action_url,
                }),
                state: fields.service_state,
                output: fields.service_output,
            })
        } else {
            Ok(Self {
                timestamp,
                host,
                service: None,
                state: fields.host_state,
                output: fields.host_output,
            })
        }
    }

    /// Host or service scope.
    pub fn scope(&self) -> Scope {
        if self.service.is_some() {
            Scope::Service
        } else {
            Scope::Host
        }
    }

    /// Whether the state reports a recovery. Case-sensitive.
    pub fn is_recovery(&self) -> bool {
        matches!(self.state.as_str(), "UP" | "OK")
    }
}

#[inline]
fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn or_default(value: String, fallback: &str) -> String {
    if blank(&value) {
        fallback.to_string()
    } else {
        value
    }
}
