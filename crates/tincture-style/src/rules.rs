//! Ordered rule sets and their layered merge.
//!
//! A rule set maps keys to [`Style`]s in a fixed order. There are three
//! domains:
//!
//! | Domain | Key | Built-in defaults |
//! |--------|-----|-------------------|
//! | [`RuleDomain::Attribute`] | record attribute name (`name`, `line`, …) | [`default_attribute_rules`] |
//! | [`RuleDomain::Level`] | level name (`DEBUG`, `ERROR`, …) | [`default_level_rules`] |
//! | [`RuleDomain::Keyword`] | regular expression | [`default_keyword_rules`] |
//!
//! Order matters for keyword rules: the highlighter gives earlier rules
//! priority when matches overlap. Keyword patterns always match
//! case-insensitively, so keys are written bare (`\berror\b`, not
//! `(?i)\berror\b`) and an override with the same text replaces a default.
//!
//! # Merging
//!
//! [`merge`] layers caller [`Overrides`] over a default set:
//!
//! ```rust
//! use tincture_style::{default_level_rules, merge, Overrides, Style};
//!
//! let overrides = Overrides::new()
//!     .with("INFO", Style::new().cyan())
//!     .with("TRACE", Style::new().gray());
//! let levels = merge(&default_level_rules(), &overrides).unwrap();
//!
//! let keys: Vec<&str> = levels.keys().collect();
//! assert_eq!(keys, ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL", "TRACE"]);
//! assert_eq!(levels.get("INFO"), Some(&Style::new().cyan()));
//! ```

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::ConfigurationError;
use crate::style::Style;

/// The three kinds of rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleDomain {
    /// Record attribute names such as `name`, `line`, `module`.
    Attribute,
    /// Level names such as `DEBUG` or `ERROR`.
    Level,
    /// Regular expressions matched against message text.
    Keyword,
}

impl fmt::Display for RuleDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleDomain::Attribute => "attribute",
            RuleDomain::Level => "level",
            RuleDomain::Keyword => "keyword",
        })
    }
}

/// A rule key: built from override text at merge time.
pub trait RuleKey: Clone + fmt::Debug + Sized {
    /// Builds a key from its textual form.
    fn from_text(text: &str, domain: RuleDomain) -> Result<Self, ConfigurationError>;

    /// The textual form; two keys are the same rule when these are equal.
    fn as_str(&self) -> &str;
}

/// A plain name key, for attribute and level rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Name(name.into())
    }
}

impl RuleKey for Name {
    fn from_text(text: &str, domain: RuleDomain) -> Result<Self, ConfigurationError> {
        if text.trim().is_empty() {
            return Err(ConfigurationError::InvalidKey {
                domain,
                key: text.to_string(),
            });
        }
        Ok(Name(text.to_string()))
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

/// A compiled regular expression key, for keyword rules.
///
/// Keyword patterns are compiled case-insensitive; the key text is kept as
/// written, so it still identifies the rule in a merge.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// The compiled expression.
    pub fn regex(&self) -> &Regex {
        &self.0
    }
}

impl RuleKey for Pattern {
    fn from_text(text: &str, domain: RuleDomain) -> Result<Self, ConfigurationError> {
        let regex = RegexBuilder::new(text)
            .case_insensitive(domain == RuleDomain::Keyword)
            .build()
            .map_err(|source| ConfigurationError::InvalidPattern {
                domain,
                pattern: text.to_string(),
                source,
            })?;
        Ok(Pattern(regex))
    }

    fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

/// An ordered key → style mapping with unique keys.
///
/// Rule sets are immutable once built; use [`merge`] to derive a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet<K> {
    domain: RuleDomain,
    entries: Vec<(K, Style)>,
}

/// Attribute or level rules.
pub type NameRules = RuleSet<Name>;

/// Keyword rules.
pub type PatternRules = RuleSet<Pattern>;

impl<K: RuleKey> RuleSet<K> {
    /// Creates an empty rule set for `domain`.
    pub fn empty(domain: RuleDomain) -> Self {
        Self {
            domain,
            entries: Vec::new(),
        }
    }

    /// Builds a rule set from textual keys, in the order given.
    ///
    /// Equivalent to merging `entries` over an empty set.
    pub fn from_entries<'a, I>(domain: RuleDomain, entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (&'a str, Style)>,
    {
        let overrides: Overrides = entries.into_iter().collect();
        merge(&Self::empty(domain), &overrides)
    }

    pub fn domain(&self) -> RuleDomain {
        self.domain
    }

    /// Looks up the style for a key by its textual form.
    pub fn get(&self, key: &str) -> Option<&Style> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, style)| style)
    }

    /// Iterates the rules in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Style)> {
        self.entries.iter().map(|(k, s)| (k, s))
    }

    /// Iterates the keys' textual forms in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Caller-supplied rule overrides, in the order given.
///
/// Keys are not validated until they are [`merge`]d into a rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    entries: Vec<(String, Style)>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an override, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, style: Style) -> Self {
        self.push(key, style);
        self
    }

    /// Adds an override.
    pub fn push(&mut self, key: impl Into<String>, style: Style) {
        self.entries.push((key.into(), style));
    }

    /// Adds an override given in shorthand form (`"red bold"`).
    pub fn with_shorthand(
        self,
        key: impl Into<String>,
        shorthand: &str,
    ) -> Result<Self, ConfigurationError> {
        let key = key.into();
        let style = Style::parse_shorthand_for(shorthand, &key)?;
        Ok(self.with(key, style))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Style)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Style)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (S, Style)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, s)| (k.into(), s)).collect(),
        }
    }
}

impl<S: Into<String>> Extend<(S, Style)> for Overrides {
    fn extend<I: IntoIterator<Item = (S, Style)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, s)| (k.into(), s)));
    }
}

/// Layers `overrides` over `defaults`.
///
/// - A key present in both keeps the default's position with the override's
///   style.
/// - Default-only keys keep their relative order.
/// - Override-only keys are appended in the order supplied; a key repeated
///   within the overrides keeps its first position and its last style.
///
/// Pattern keys are compiled here, so an invalid regular expression fails
/// with [`ConfigurationError::InvalidPattern`] rather than at highlight time.
pub fn merge<K: RuleKey>(
    defaults: &RuleSet<K>,
    overrides: &Overrides,
) -> Result<RuleSet<K>, ConfigurationError> {
    let mut entries = defaults.entries.clone();
    let mut positions: HashMap<String, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, (k, _))| (k.as_str().to_string(), i))
        .collect();

    for (text, style) in overrides.iter() {
        if let Some(&i) = positions.get(text) {
            entries[i].1 = *style;
            continue;
        }
        let key = K::from_text(text, defaults.domain)?;
        positions.insert(text.to_string(), entries.len());
        entries.push((key, *style));
    }

    if !overrides.is_empty() {
        log::trace!(
            "merged {} {} override(s) into {} rule(s)",
            overrides.len(),
            defaults.domain,
            entries.len()
        );
    }

    Ok(RuleSet {
        domain: defaults.domain,
        entries,
    })
}

/// Built-in styles for record attributes: `module`, `line`, `name`.
pub fn default_attribute_rules() -> NameRules {
    name_rules(
        RuleDomain::Attribute,
        [
            ("module", Style::new().blue()),
            ("line", Style::new().yellow()),
            ("name", Style::new().cyan()),
        ],
    )
}

/// Built-in styles for log levels.
pub fn default_level_rules() -> NameRules {
    name_rules(
        RuleDomain::Level,
        [
            ("DEBUG", Style::new().green().bold()),
            ("INFO", Style::new().blue().bold()),
            ("WARNING", Style::new().yellow().bold()),
            ("ERROR", Style::new().red().bold()),
            ("CRITICAL", Style::new().red().blink().bold()),
        ],
    )
}

/// Built-in keyword rules, in priority order.
///
/// Level words match in any case, like every keyword rule; quoted strings, `**bold**`,
/// `*italic*`, `__underline__` and `` `code` `` get markdown-ish styling.
/// Double-asterisk bold comes before single-asterisk italic so that
/// `**x**` is bold as a whole.
pub fn default_keyword_rules() -> PatternRules {
    DEFAULT_KEYWORDS.clone()
}

static DEFAULT_KEYWORDS: Lazy<PatternRules> = Lazy::new(|| {
    RuleSet::from_entries(
        RuleDomain::Keyword,
        [
            (r"\bcritical(?: error)?\b", Style::new().red().blink().bold()),
            (r"\bdebug(?:ged|ging)?\b", Style::new().green().bold()),
            (r"\berror\b", Style::new().red().bold()),
            (r"\bfail(?:ed|ing)?\b", Style::new().red().bold()),
            (r"\binfo\b", Style::new().blue().bold()),
            (r"\bwarn(?:ed|ing)?\b", Style::new().yellow().bold()),
            (r#""[^"]*""#, Style::new().yellow()),
            (r"\*\*[^*]+\*\*", Style::new().bold()),
            (r"\*[^*]+\*", Style::new().italic()),
            (r"__[^_]+__", Style::new().underline()),
            (r"`[^`]+`", Style::new().standout()),
        ],
    )
    .expect("built-in keyword patterns are compile-time constants and must be valid")
});

fn name_rules<const N: usize>(domain: RuleDomain, entries: [(&str, Style); N]) -> NameRules {
    RuleSet {
        domain,
        entries: entries
            .into_iter()
            .map(|(k, s)| (Name::new(k), s))
            .collect(),
    }
}
