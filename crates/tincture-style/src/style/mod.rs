//! Style primitives: colors, attributes and the composable [`Style`] value.
//!
//! - [`Color`]: the sixteen-color foreground palette
//! - [`Attribute`] / [`Attributes`]: bold, italic, underline, blink, standout
//! - [`Style`]: color + attributes, combined with [`Style::combine`] and
//!   rendered to an escape sequence with [`Style::render`]
//! - [`parse_style_value`]: style definitions as they appear in YAML palettes

mod attributes;
mod color;
mod definition;
mod value;

pub use attributes::{Attribute, Attributes};
pub use color::Color;
pub use definition::parse_style_value;
pub use value::{reset_sequence, Style, RESET};
