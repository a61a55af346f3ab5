//! The composable style value.

use std::fmt;
use std::str::FromStr;

use super::attributes::{Attribute, Attributes};
use super::color::Color;
use crate::capability::Capabilities;
use crate::error::ConfigurationError;

/// The canonical "clear all styling" sequence.
pub const RESET: &str = "\x1b[0m";

/// Returns the canonical reset sequence, [`RESET`].
///
/// The reset is safe on any terminal that understands escape sequences at
/// all. On streams without styling support nothing else is emitted either,
/// so the highlighter only appends it after having emitted a start sequence.
pub fn reset_sequence() -> &'static str {
    RESET
}

/// A terminal style: an optional foreground color plus a set of attributes.
///
/// Styles are small `Copy` values built with chained methods, in the same
/// manner as `console::Style`:
///
/// ```rust
/// use tincture_style::{Capabilities, Style};
///
/// let error = Style::new().red().bold();
/// assert_eq!(error.render(&Capabilities::ansi()), "\x1b[1;31m");
/// assert_eq!(error.render(&Capabilities::none()), "");
/// ```
///
/// # Composition
///
/// [`combine`](Style::combine) unions the attribute sets; the color of the
/// right-hand style wins when it has one. The empty style is the identity.
///
/// # Degradation
///
/// [`render`](Style::render) first drops whatever the [`Capabilities`] do
/// not support. Unsupported facets vanish silently; a style with nothing
/// left renders to the empty string.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Style {
    fg: Option<Color>,
    attributes: Attributes,
}

impl Style {
    /// Creates the empty style.
    pub const fn new() -> Self {
        Self {
            fg: None,
            attributes: Attributes::empty(),
        }
    }

    /// Sets the foreground color.
    #[must_use]
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, attr: Attribute) -> Self {
        self.attributes = self.attributes.with(attr);
        self
    }

    #[must_use]
    pub fn black(self) -> Self {
        self.fg(Color::Black)
    }

    #[must_use]
    pub fn red(self) -> Self {
        self.fg(Color::Red)
    }

    #[must_use]
    pub fn green(self) -> Self {
        self.fg(Color::Green)
    }

    #[must_use]
    pub fn yellow(self) -> Self {
        self.fg(Color::Yellow)
    }

    #[must_use]
    pub fn blue(self) -> Self {
        self.fg(Color::Blue)
    }

    #[must_use]
    pub fn purple(self) -> Self {
        self.fg(Color::Purple)
    }

    #[must_use]
    pub fn cyan(self) -> Self {
        self.fg(Color::Cyan)
    }

    #[must_use]
    pub fn gray(self) -> Self {
        self.fg(Color::Gray)
    }

    #[must_use]
    pub fn white(self) -> Self {
        self.fg(Color::White)
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.attr(Attribute::Bold)
    }

    #[must_use]
    pub fn italic(self) -> Self {
        self.attr(Attribute::Italic)
    }

    #[must_use]
    pub fn underline(self) -> Self {
        self.attr(Attribute::Underline)
    }

    #[must_use]
    pub fn blink(self) -> Self {
        self.attr(Attribute::Blink)
    }

    #[must_use]
    pub fn standout(self) -> Self {
        self.attr(Attribute::Standout)
    }

    /// The foreground color, if any.
    pub fn foreground(&self) -> Option<Color> {
        self.fg
    }

    /// The attribute set.
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    /// Returns true if the style has no facet at all.
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.attributes.is_empty()
    }

    /// Layers `other` on top of `self`.
    ///
    /// Attributes are unioned; `other`'s color replaces `self`'s when set.
    #[must_use]
    pub fn combine(&self, other: &Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            attributes: self.attributes.union(other.attributes),
        }
    }

    /// Drops the facets `caps` cannot render.
    #[must_use]
    pub fn filtered(&self, caps: &Capabilities) -> Style {
        Style {
            fg: self.fg.filter(|_| caps.supports_color),
            attributes: self.attributes.intersection(caps.attributes()),
        }
    }

    /// Renders the start sequence for this style.
    ///
    /// Produces one SGR sequence with the attribute parameters first (in
    /// [`Attribute::ALL`] order) and the color last, or `""` when no facet
    /// survives capability filtering.
    pub fn render(&self, caps: &Capabilities) -> String {
        let effective = self.filtered(caps);
        if effective.is_empty() {
            return String::new();
        }

        let params: Vec<String> = effective
            .attributes
            .iter()
            .map(|a| a.sgr())
            .chain(effective.fg.map(Color::sgr))
            .map(|code| code.to_string())
            .collect();

        format!("\x1b[{}m", params.join(";"))
    }

    /// Styles a single token: start sequence, text, reset.
    ///
    /// Returns `text` unchanged when nothing would be rendered.
    pub fn paint(&self, text: &str, caps: &Capabilities) -> String {
        let start = self.render(caps);
        if start.is_empty() {
            text.to_string()
        } else {
            format!("{start}{text}{RESET}")
        }
    }

    /// Parses a shorthand style such as `"red bold"` or `"italic"`.
    ///
    /// Shorthand is a whitespace-separated list of attribute names and at
    /// most one color name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidStyle`] for empty input, unknown
    /// words or more than one color.
    pub fn parse_shorthand(s: &str) -> Result<Style, ConfigurationError> {
        Self::parse_shorthand_for(s, "<inline>")
    }

    /// Like [`parse_shorthand`](Self::parse_shorthand), naming `key` in errors.
    pub(crate) fn parse_shorthand_for(s: &str, key: &str) -> Result<Style, ConfigurationError> {
        let invalid = |message: String| ConfigurationError::InvalidStyle {
            key: key.to_string(),
            value: s.to_string(),
            message,
        };

        let mut style = Style::new();
        for part in s.split_whitespace() {
            if let Some(attr) = Attribute::parse(part) {
                style = style.attr(attr);
                continue;
            }
            // If not a known attribute, try as a color
            if let Some(existing) = style.fg {
                return Err(invalid(format!(
                    "multiple colors in shorthand: already have {}, got '{}'",
                    existing, part
                )));
            }
            style = style.fg(Color::parse(part).map_err(invalid)?);
        }

        if style.is_empty() {
            return Err(invalid("empty style".to_string()));
        }
        Ok(style)
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Style({})", self)
    }
}

/// Formats as shorthand (`"red bold"`), or `"none"` for the empty style.
impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let words: Vec<&str> = self
            .fg
            .map(Color::name)
            .into_iter()
            .chain(self.attributes.iter().map(Attribute::name))
            .collect();
        f.write_str(&words.join(" "))
    }
}

impl FromStr for Style {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::parse_shorthand(s)
    }
}

impl From<Color> for Style {
    fn from(color: Color) -> Self {
        Style::new().fg(color)
    }
}

impl From<Attribute> for Style {
    fn from(attr: Attribute) -> Self {
        Style::new().attr(attr)
    }
}
