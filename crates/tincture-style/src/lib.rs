//! # Tincture Style - Terminal Style Engine
//!
//! `tincture-style` decorates plain text lines with terminal styles: a
//! foreground color plus bold, italic, underline, blink and standout. It
//! decides once per stream what the terminal can display and degrades every
//! style to that, down to plain text with no escape sequences at all.
//!
//! This crate is the engine behind the `tincture` colored logger, but can be
//! used on its own for anything that writes lines to a terminal.
//!
//! ## Core Concepts
//!
//! - [`Capabilities`]: what a stream can display, from [`probe`]
//! - [`Style`]: an immutable color + attribute value; [`Style::combine`]
//!   layers one over another and [`Style::render`] produces the escape sequence
//! - [`RuleSet`]: ordered key → style rules, layered over defaults with [`merge`]
//! - [`highlight`]: overlap-safe keyword highlighting over an ambient style
//! - [`Palette`]: attribute, level and keyword rules together, loadable from YAML
//!
//! ## Quick Start
//!
//! ```rust
//! use tincture_style::{highlight, Capabilities, Palette};
//!
//! let palette = Palette::default();
//! let caps = Capabilities::ansi();
//!
//! let line = highlight(
//!     "Failed to open file \"abc\"",
//!     &palette.level_style("ERROR"),
//!     palette.keywords(),
//!     &caps,
//! );
//! assert!(line.starts_with("\x1b[1;31m"));
//! assert!(line.contains("\x1b[1;33m\"abc\""));
//!
//! // The same call on a stream that cannot display styles is a no-op.
//! let plain = highlight(
//!     "Failed to open file \"abc\"",
//!     &palette.level_style("ERROR"),
//!     palette.keywords(),
//!     &Capabilities::none(),
//! );
//! assert_eq!(plain, "Failed to open file \"abc\"");
//! ```
//!
//! ## Ambient Styles
//!
//! The ambient style is in force for the whole line. A highlighted span is
//! drawn in the ambient style combined with the rule's style; when it ends,
//! the ambient style is re-asserted so that the rest of the line keeps its
//! color:
//!
//! ```rust
//! use tincture_style::{highlight, Capabilities, PatternRules, RuleDomain, Style};
//!
//! let rules = PatternRules::from_entries(RuleDomain::Keyword, [("mid", Style::new().red())])
//!     .unwrap();
//! let out = highlight("premidpost", &Style::new().yellow(), &rules, &Capabilities::ansi());
//! assert_eq!(out, "\x1b[33mpre\x1b[31mmid\x1b[0m\x1b[33mpost\x1b[0m");
//! ```
//!
//! ## Configuration
//!
//! Capability probing honors `NO_COLOR`, `CLICOLOR`, `CLICOLOR_FORCE` and
//! `TERM`; see [`capability`]. Palettes are read from YAML; see [`palette`].

pub mod capability;
pub mod env;
mod error;
pub mod highlight;
pub mod palette;
pub mod prelude;
pub mod rules;
pub mod style;

// Error types
pub use error::{ConfigurationError, Result};

// Capability probing
pub use capability::{forget_capabilities, probe, set_capabilities, Capabilities, Probe, Stream};

// Style values
pub use style::{
    parse_style_value, reset_sequence, Attribute, Attributes, Color, Style, RESET,
};

// Rule sets
pub use rules::{
    default_attribute_rules, default_keyword_rules, default_level_rules, merge, Name, NameRules,
    Overrides, Pattern, PatternRules, RuleDomain, RuleKey, RuleSet,
};

// Highlighting
pub use highlight::{highlight, highlight_pinned, resolve_pinned_spans, resolve_spans, Span};

// Palettes
pub use palette::{Palette, PaletteOverrides};
