//! # Tincture - Colored Logging for Terminals
//!
//! Tincture is a `log` backend that writes one styled line per record to
//! stderr. Record attributes (logger name, line, module) get their own
//! colors, the level decides the color of the whole line, and keywords in
//! the message (`error`, `"quoted strings"`, `**bold**`, `` `code` ``, …)
//! are highlighted on top of it without ever losing the line's color.
//!
//! When stderr is not a terminal, or the terminal cannot display a style,
//! the output degrades: unsupported attributes are dropped and a plain
//! stream gets plain text with no escape sequences at all.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tincture::{setup_colored_stderr_logging, LoggerConfig};
//!
//! setup_colored_stderr_logging(LoggerConfig::new())?;
//! log::error!("Failed to open file \"{}\"", "config.yaml");
//! # Ok::<(), tincture::SetupError>(())
//! ```
//!
//! ## Formatting Without a Logger
//!
//! [`ColoredFormatter`] works on its own, for example to style lines for a
//! different sink:
//!
//! ```rust
//! use tincture::{Capabilities, ColoredFormatter, Palette, Record, Template};
//!
//! let formatter = ColoredFormatter::new(Palette::default(), Capabilities::ansi())
//!     .with_template(Template::parse("{{ level }} {{ message }}").unwrap());
//! let line = formatter.format(&Record::new("INFO", "server ready"));
//! assert_eq!(line, "\x1b[1;34mINFO server ready\x1b[0m");
//! ```
//!
//! ## Configuration
//!
//! - Environment: `NO_COLOR`, `CLICOLOR`, `CLICOLOR_FORCE` and `TERM` decide
//!   what is displayed (see [`tincture_style::capability`]).
//! - Styles: [`LoggerConfig`] takes attribute, level and keyword overrides in
//!   code, or a YAML palette file (see [`tincture_style::palette`]).
//!
//! The styling engine itself lives in the `tincture-style` crate, re-exported
//! here as [`style`].

pub mod formatter;
pub mod logger;
mod setup;

pub use tincture_style as style;

// Re-export the engine types needed to configure a logger
pub use tincture_style::{
    forget_capabilities, highlight, probe, set_capabilities, Attribute, Capabilities, Color,
    ConfigurationError, Overrides, Palette, PaletteOverrides, Stream, Style,
};

pub use formatter::{level_name, ColoredFormatter, Field, LineStyle, Record, Template, DEFAULT_TEMPLATE};
pub use logger::{setup_colored_stderr_logging, ColoredLogger, LoggerConfig};
pub use setup::SetupError;
