//! Convenient imports.
//!
//! ```rust
//! use tincture_style::prelude::*;
//!
//! let caps = Capabilities::ansi();
//! let out = highlight("all good", &Style::new().green(), Palette::default().keywords(), &caps);
//! assert_eq!(out, "\x1b[32mall good\x1b[0m");
//! ```

pub use crate::capability::{probe, Capabilities, Stream};
pub use crate::highlight::{highlight, highlight_pinned, Span};
pub use crate::palette::{Palette, PaletteOverrides};
pub use crate::rules::{merge, Overrides, PatternRules, RuleDomain};
pub use crate::style::{Attribute, Color, Style};
pub use crate::ConfigurationError;
