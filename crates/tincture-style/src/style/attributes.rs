//! Text attributes and attribute sets.

use std::fmt;

/// A single text attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Bold,
    Italic,
    Underline,
    Blink,
    /// Reverse video (terminfo "standout" mode).
    Standout,
}

impl Attribute {
    /// All attributes, in the order their SGR parameters are emitted.
    pub const ALL: [Attribute; 5] = [
        Attribute::Bold,
        Attribute::Italic,
        Attribute::Underline,
        Attribute::Blink,
        Attribute::Standout,
    ];

    /// SGR parameter that turns the attribute on.
    pub fn sgr(self) -> u8 {
        match self {
            Attribute::Bold => 1,
            Attribute::Italic => 3,
            Attribute::Underline => 4,
            Attribute::Blink => 5,
            Attribute::Standout => 7,
        }
    }

    /// Terminfo capability name announcing support for the attribute.
    pub fn capname(self) -> &'static str {
        match self {
            Attribute::Bold => "bold",
            Attribute::Italic => "sitm",
            Attribute::Underline => "smul",
            Attribute::Blink => "blink",
            Attribute::Standout => "smso",
        }
    }

    /// Canonical lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Bold => "bold",
            Attribute::Italic => "italic",
            Attribute::Underline => "underline",
            Attribute::Blink => "blink",
            Attribute::Standout => "standout",
        }
    }

    /// Parses an attribute name; `italics` and `reverse` are accepted too.
    pub fn parse(name: &str) -> Option<Attribute> {
        match name.trim().to_lowercase().as_str() {
            "bold" => Some(Attribute::Bold),
            "italic" | "italics" => Some(Attribute::Italic),
            "underline" => Some(Attribute::Underline),
            "blink" => Some(Attribute::Blink),
            "standout" | "reverse" => Some(Attribute::Standout),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`Attribute`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Attributes(u8);

impl Attributes {
    /// The empty set.
    pub const fn empty() -> Self {
        Attributes(0)
    }

    /// The set of every attribute.
    pub fn all() -> Self {
        Attribute::ALL.into_iter().collect()
    }

    /// Returns the set with `attr` added.
    #[must_use]
    pub fn with(self, attr: Attribute) -> Self {
        Attributes(self.0 | attr.bit())
    }

    /// Returns the set with `attr` removed.
    #[must_use]
    pub fn without(self, attr: Attribute) -> Self {
        Attributes(self.0 & !attr.bit())
    }

    pub fn contains(self, attr: Attribute) -> bool {
        self.0 & attr.bit() != 0
    }

    #[must_use]
    pub fn union(self, other: Attributes) -> Self {
        Attributes(self.0 | other.0)
    }

    #[must_use]
    pub fn intersection(self, other: Attributes) -> Self {
        Attributes(self.0 & other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the members in SGR emission order.
    pub fn iter(self) -> impl Iterator<Item = Attribute> {
        Attribute::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        iter.into_iter().fold(Attributes::empty(), Attributes::with)
    }
}

impl From<Attribute> for Attributes {
    fn from(attr: Attribute) -> Self {
        Attributes::empty().with(attr)
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
