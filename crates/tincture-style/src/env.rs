//! Environment abstractions for testability.
//!
//! Capability probing reads environment variables and asks the terminfo
//! database what the terminal can do. Both go through the traits in this
//! module so tests can describe a terminal without having one.

/// Abstraction over environment variables.
pub trait EnvReader: Send + Sync {
    /// Get an environment variable value.
    fn var(&self, name: &str) -> Option<String>;
}

/// Abstraction over the terminfo database.
pub trait TerminfoQuery: Send + Sync {
    /// Returns the value of the capability `capname` for the current terminal.
    ///
    /// `None` means the capability is absent, or the database could not be
    /// consulted at all. Implementations never fail loudly.
    fn query(&self, capname: &str) -> Option<String>;
}

// === Real implementations ===

/// Real environment variable reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealEnv;

impl EnvReader for RealEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Terminfo lookups through the `tput` utility.
///
/// `tput` exits with status 1 when the terminal lacks a capability; any
/// other failure (binary missing, unknown `TERM`) is treated the same way.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tput;

impl TerminfoQuery for Tput {
    fn query(&self, capname: &str) -> Option<String> {
        query_tput(capname)
    }
}

#[cfg(unix)]
fn query_tput(capname: &str) -> Option<String> {
    use std::process::{Command, Stdio};

    let output = match Command::new("tput")
        .arg(capname)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            log::debug!("tput unavailable, assuming no terminal capabilities: {err}");
            return None;
        }
    };

    if !output.status.success() {
        log::trace!("tput {capname}: not supported ({})", output.status);
        return None;
    }

    let value = String::from_utf8_lossy(&output.stdout).into_owned();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(not(unix))]
fn query_tput(_capname: &str) -> Option<String> {
    None
}

// === Mock implementations for testing ===

/// Mock environment variable reader for testing.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: std::collections::HashMap<String, String>,
}

impl MockEnv {
    /// Create an empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvReader for MockEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Mock terminfo database for testing.
#[derive(Debug, Clone, Default)]
pub struct MockTerminfo {
    caps: std::collections::HashMap<String, String>,
}

impl MockTerminfo {
    /// A terminal without any capabilities (or no terminfo database at all).
    pub fn empty() -> Self {
        Self::default()
    }

    /// An xterm-like terminal with 8 colors and every attribute.
    pub fn xterm() -> Self {
        Self::empty()
            .with_cap("colors", "8")
            .with_cap("bold", "\x1b[1m")
            .with_cap("blink", "\x1b[5m")
            .with_cap("smul", "\x1b[4m")
            .with_cap("sitm", "\x1b[3m")
            .with_cap("smso", "\x1b[7m")
    }

    /// Add (or replace) a capability.
    pub fn with_cap(mut self, capname: impl Into<String>, value: impl Into<String>) -> Self {
        self.caps.insert(capname.into(), value.into());
        self
    }

    /// Remove a capability.
    pub fn without_cap(mut self, capname: &str) -> Self {
        self.caps.remove(capname);
        self
    }
}

impl TerminfoQuery for MockTerminfo {
    fn query(&self, capname: &str) -> Option<String> {
        self.caps.get(capname).cloned()
    }
}

// === Flag conventions ===

/// Returns true if `name` is set to an affirmative value.
///
/// Accepted (trimmed, case-insensitive): `on`, `enabled`, `activated`,
/// `yes`, `true`, or any integer other than zero.
pub fn is_enabled(env: &impl EnvReader, name: &str) -> bool {
    let Some(value) = env.var(name) else {
        return false;
    };
    let value = value.trim().to_lowercase();
    matches!(
        value.as_str(),
        "on" | "enabled" | "activated" | "yes" | "true"
    ) || parse_flag_number(&value).is_some_and(|n| n != 0)
}

/// Returns true if `name` is set to a negative value.
///
/// Accepted (trimmed, case-insensitive): `off`, `disabled`, `deactivated`,
/// `no`, `false`, or an integer equal to zero.
pub fn is_disabled(env: &impl EnvReader, name: &str) -> bool {
    let Some(value) = env.var(name) else {
        return false;
    };
    let value = value.trim().to_lowercase();
    matches!(
        value.as_str(),
        "off" | "disabled" | "deactivated" | "no" | "false"
    ) || parse_flag_number(&value) == Some(0)
}

fn parse_flag_number(value: &str) -> Option<u64> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        // Digit strings too long for u64 are still "non-zero" unless all zeros.
        Some(value.parse().unwrap_or(u64::from(value.bytes().any(|b| b != b'0'))))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_env_empty() {
        let env = MockEnv::new();
        assert_eq!(env.var("MISSING"), None);
    }

    #[test]
    fn mock_env_with_vars() {
        let env = MockEnv::new()
            .with_var("TERM", "xterm")
            .with_var("NO_COLOR", "1");

        assert_eq!(env.var("TERM"), Some("xterm".to_string()));
        assert_eq!(env.var("NO_COLOR"), Some("1".to_string()));
        assert_eq!(env.var("MISSING"), None);
    }

    #[test]
    fn mock_terminfo_xterm_has_attributes() {
        let info = MockTerminfo::xterm();
        assert_eq!(info.query("colors"), Some("8".to_string()));
        assert!(info.query("smul").is_some());
        assert_eq!(info.query("setaf"), None);
    }

    #[test]
    fn mock_terminfo_without_cap() {
        let info = MockTerminfo::xterm().without_cap("blink");
        assert_eq!(info.query("blink"), None);
        assert!(info.query("bold").is_some());
    }

    #[test]
    fn enabled_words_and_numbers() {
        for value in ["on", "Enabled", "ACTIVATED", " yes ", "true", "1", "42"] {
            let env = MockEnv::new().with_var("FLAG", value);
            assert!(is_enabled(&env, "FLAG"), "{value:?} should be enabled");
            assert!(!is_disabled(&env, "FLAG"), "{value:?} should not be disabled");
        }
    }

    #[test]
    fn disabled_words_and_zero() {
        for value in ["off", "Disabled", "deactivated", "NO", " false", "0", "000"] {
            let env = MockEnv::new().with_var("FLAG", value);
            assert!(is_disabled(&env, "FLAG"), "{value:?} should be disabled");
            assert!(!is_enabled(&env, "FLAG"), "{value:?} should not be enabled");
        }
    }

    #[test]
    fn unset_or_garbage_is_neither() {
        let env = MockEnv::new().with_var("FLAG", "maybe").with_var("EMPTY", "");
        assert!(!is_enabled(&env, "FLAG"));
        assert!(!is_disabled(&env, "FLAG"));
        assert!(!is_enabled(&env, "EMPTY"));
        assert!(!is_disabled(&env, "EMPTY"));
        assert!(!is_enabled(&env, "UNSET"));
        assert!(!is_disabled(&env, "UNSET"));
    }

    #[test]
    fn huge_numbers_are_enabled() {
        let env = MockEnv::new().with_var("FLAG", "99999999999999999999999");
        assert!(is_enabled(&env, "FLAG"));
    }
}
