//! Terminal capability probing.
//!
//! Before any escape sequence is emitted we need to know two things about the
//! stream the text ends up in: whether it is safe to style at all, and which
//! attributes the terminal on the other end understands. [`Capabilities`]
//! holds the answer; [`probe`] computes it once per [`Stream`] and caches it.
//!
//! # Decision order
//!
//! 1. `NO_COLOR` (non-empty) or a disabled `CLICOLOR` turn styling off,
//!    overriding everything else.
//! 2. A stream that is not an interactive terminal gets no styling, unless
//!    `CLICOLOR_FORCE` is enabled.
//! 3. A missing or `dumb` `TERM` gets no styling, unless forced.
//! 4. Otherwise the terminfo database is asked: `colors >= 8` enables color,
//!    and each attribute is enabled when its capability string exists.
//!
//! Probing never fails. Anything that cannot be determined is assumed to be
//! unsupported, which degrades output to plain text.
//!
//! # Testing
//!
//! [`Probe`] takes its environment and terminfo source as parameters, so the
//! whole decision table can be exercised with [`MockEnv`](crate::env::MockEnv)
//! and [`MockTerminfo`](crate::env::MockTerminfo):
//!
//! ```rust
//! use tincture_style::env::{MockEnv, MockTerminfo};
//! use tincture_style::Probe;
//!
//! let probe = Probe::with(MockEnv::new().with_var("TERM", "xterm"), MockTerminfo::xterm());
//! assert!(probe.probe_terminal(true).supports_color);
//! assert!(!probe.probe_terminal(false).supports_color);
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::env::{is_disabled, is_enabled, EnvReader, RealEnv, TerminfoQuery, Tput};
use crate::style::{Attribute, Attributes};

/// What the output stream can render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Foreground colors may be used.
    pub supports_color: bool,
    pub bold: bool,
    pub blink: bool,
    pub underline: bool,
    pub italic: bool,
    /// Reverse video.
    pub standout: bool,
}

impl Capabilities {
    /// Nothing supported: every style renders to the empty string.
    pub const fn none() -> Self {
        Self {
            supports_color: false,
            bold: false,
            blink: false,
            underline: false,
            italic: false,
            standout: false,
        }
    }

    /// Everything supported, as on any modern ANSI terminal.
    pub const fn ansi() -> Self {
        Self {
            supports_color: true,
            bold: true,
            blink: true,
            underline: true,
            italic: true,
            standout: true,
        }
    }

    /// Returns true if `attr` is usable.
    pub fn supports(&self, attr: Attribute) -> bool {
        match attr {
            Attribute::Bold => self.bold,
            Attribute::Italic => self.italic,
            Attribute::Underline => self.underline,
            Attribute::Blink => self.blink,
            Attribute::Standout => self.standout,
        }
    }

    /// The usable attributes as a set.
    pub fn attributes(&self) -> Attributes {
        Attribute::ALL
            .into_iter()
            .filter(|a| self.supports(*a))
            .collect()
    }

    /// Returns a copy with `attr` switched on or off.
    #[must_use]
    pub fn with_attribute(mut self, attr: Attribute, supported: bool) -> Self {
        match attr {
            Attribute::Bold => self.bold = supported,
            Attribute::Italic => self.italic = supported,
            Attribute::Underline => self.underline = supported,
            Attribute::Blink => self.blink = supported,
            Attribute::Standout => self.standout = supported,
        }
        self
    }

    /// Returns a copy with color switched on or off.
    #[must_use]
    pub fn with_color(mut self, supported: bool) -> Self {
        self.supports_color = supported;
        self
    }

    /// Returns true if no escape sequence can ever be produced.
    pub fn is_plain(&self) -> bool {
        !self.supports_color && self.attributes().is_empty()
    }
}

/// An output stream whose capabilities can be probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    /// Returns true if the stream is connected to an interactive terminal.
    pub fn is_terminal(self) -> bool {
        match self {
            Stream::Stdout => console::Term::stdout().is_term(),
            Stream::Stderr => console::Term::stderr().is_term(),
        }
    }
}

/// Capability prober over an injectable environment.
#[derive(Debug, Clone, Default)]
pub struct Probe<E = RealEnv, T = Tput> {
    env: E,
    terminfo: T,
}

impl Probe {
    /// A probe over the real process environment and `tput`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: EnvReader, T: TerminfoQuery> Probe<E, T> {
    /// A probe over the given environment and terminfo source.
    pub fn with(env: E, terminfo: T) -> Self {
        Self { env, terminfo }
    }

    /// Probes the capabilities of `stream`.
    pub fn probe(&self, stream: Stream) -> Capabilities {
        self.probe_terminal(stream.is_terminal())
    }

    /// Probes capabilities for a stream whose interactivity is already known.
    pub fn probe_terminal(&self, is_terminal: bool) -> Capabilities {
        if self.env.var("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            log::debug!("NO_COLOR is set, styling disabled");
            return Capabilities::none();
        }
        if is_disabled(&self.env, "CLICOLOR") {
            log::debug!("CLICOLOR is disabled, styling disabled");
            return Capabilities::none();
        }

        let forced = is_enabled(&self.env, "CLICOLOR_FORCE");
        if !is_terminal && !forced {
            log::debug!("stream is not a terminal, styling disabled");
            return Capabilities::none();
        }

        let term = self.env.var("TERM").unwrap_or_default();
        if !forced && (term.is_empty() || term == "dumb") {
            log::debug!("TERM={term:?} has no styling support");
            return Capabilities::none();
        }

        let colors = self
            .terminfo
            .query("colors")
            .and_then(|v| v.trim().parse::<i32>().ok())
            .unwrap_or(0);

        let caps = Attribute::ALL.into_iter().fold(
            Capabilities::none().with_color(forced || colors >= 8),
            |caps, attr| {
                let supported = self
                    .terminfo
                    .query(attr.capname())
                    .is_some_and(|v| !v.is_empty());
                caps.with_attribute(attr, supported)
            },
        );

        log::debug!("probed TERM={term:?} colors={colors} forced={forced}: {caps:?}");
        caps
    }
}

type CapabilityCache = HashMap<Stream, Capabilities>;

static CAPABILITY_CACHE: Lazy<Mutex<CapabilityCache>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the capabilities of `stream`, probing on first use.
///
/// The result is cached for the lifetime of the process (or until
/// [`forget_capabilities`]). Probing twice concurrently is harmless: both
/// probes compute the same answer.
pub fn probe(stream: Stream) -> Capabilities {
    if let Some(caps) = lock_cache().get(&stream) {
        return *caps;
    }
    let caps = Probe::new().probe(stream);
    *lock_cache().entry(stream).or_insert(caps)
}

/// Overrides the cached capabilities of `stream`.
///
/// Useful for tests, or for applications that know better than the probe
/// (e.g. a `--color=always` flag).
pub fn set_capabilities(stream: Stream, caps: Capabilities) {
    lock_cache().insert(stream, caps);
}

/// Drops the cached capabilities of `stream` so the next [`probe`] re-probes.
pub fn forget_capabilities(stream: Stream) {
    lock_cache().remove(&stream);
}

fn lock_cache() -> std::sync::MutexGuard<'static, CapabilityCache> {
    // The cache holds plain Copy values, so a poisoned lock is still consistent.
    CAPABILITY_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
