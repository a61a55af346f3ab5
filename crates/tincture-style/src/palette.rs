//! Palettes: the three rule sets together, plus YAML loading.
//!
//! A [`Palette`] is what a formatter needs: attribute styles, level styles and
//! keyword rules. [`Palette::default()`] holds the built-in sets; overrides are
//! layered on with [`Palette::apply`], either built in code or read from a
//! YAML document:
//!
//! ```yaml
//! attributes:
//!   name: purple
//! levels:
//!   DEBUG: cyan bold
//!   TRACE: gray
//! keywords:
//!   '\btimeout\b': { fg: red, bold: true }
//! ```
//!
//! Every section is optional. Each style is shorthand or a mapping, see
//! [`parse_style_value`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::rules::{
    default_attribute_rules, default_keyword_rules, default_level_rules, merge, NameRules,
    Overrides, PatternRules, RuleDomain,
};
use crate::style::{parse_style_value, Style};

/// Attribute, level and keyword rules merged and ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    attributes: NameRules,
    levels: NameRules,
    keywords: PatternRules,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            attributes: default_attribute_rules(),
            levels: default_level_rules(),
            keywords: default_keyword_rules(),
        }
    }
}

impl Palette {
    /// Builds a palette from explicit rule sets.
    pub fn new(attributes: NameRules, levels: NameRules, keywords: PatternRules) -> Self {
        Self {
            attributes,
            levels,
            keywords,
        }
    }

    /// The built-in palette with `overrides` layered on.
    pub fn with_overrides(overrides: &PaletteOverrides) -> Result<Self, ConfigurationError> {
        Self::default().apply(overrides)
    }

    /// Parses a YAML palette document and layers it over the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigurationError> {
        Self::with_overrides(&PaletteOverrides::from_yaml(yaml)?)
    }

    /// Reads a YAML palette file and layers it over the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        Self::with_overrides(&PaletteOverrides::from_file(path)?)
    }

    /// Returns a new palette with `overrides` merged into each rule set.
    pub fn apply(&self, overrides: &PaletteOverrides) -> Result<Self, ConfigurationError> {
        Ok(Self {
            attributes: merge(&self.attributes, &overrides.attributes)?,
            levels: merge(&self.levels, &overrides.levels)?,
            keywords: merge(&self.keywords, &overrides.keywords)?,
        })
    }

    pub fn attributes(&self) -> &NameRules {
        &self.attributes
    }

    pub fn levels(&self) -> &NameRules {
        &self.levels
    }

    pub fn keywords(&self) -> &PatternRules {
        &self.keywords
    }

    /// Style for a record attribute, if one is configured.
    pub fn attribute_style(&self, name: &str) -> Option<Style> {
        self.attributes.get(name).copied()
    }

    /// Style for a level name; the empty style for unknown levels.
    pub fn level_style(&self, level: &str) -> Style {
        self.levels.get(level).copied().unwrap_or_default()
    }
}

/// Unmerged overrides for the three rule sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteOverrides {
    pub attributes: Overrides,
    pub levels: Overrides,
    pub keywords: Overrides,
}

/// Raw document shape. Sections keep their YAML order.
#[derive(Debug, Default, Deserialize)]
struct PaletteDocument {
    #[serde(default)]
    attributes: serde_yaml::Mapping,
    #[serde(default)]
    levels: serde_yaml::Mapping,
    #[serde(default)]
    keywords: serde_yaml::Mapping,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_yaml::Value>,
}

impl PaletteOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML palette document.
    ///
    /// An empty document yields no overrides. Styles are validated here;
    /// patterns are compiled when the overrides are applied.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigurationError> {
        Self::parse(yaml, None)
    }

    /// Reads and parses a YAML palette file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loading palette from {}", path.display());
        Self::parse(&content, Some(path))
    }

    fn parse(yaml: &str, path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let parse_error = |e: serde_yaml::Error| ConfigurationError::Parse {
            path: path.map(Path::to_path_buf),
            message: e.to_string(),
        };

        let value: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(parse_error)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        let doc: PaletteDocument = serde_yaml::from_value(value).map_err(parse_error)?;

        if let Some(section) = doc.unknown.keys().next() {
            return Err(ConfigurationError::UnknownSection(section.clone()));
        }

        Ok(Self {
            attributes: section_overrides(&doc.attributes, RuleDomain::Attribute)?,
            levels: section_overrides(&doc.levels, RuleDomain::Level)?,
            keywords: section_overrides(&doc.keywords, RuleDomain::Keyword)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.levels.is_empty() && self.keywords.is_empty()
    }
}

fn section_overrides(
    section: &serde_yaml::Mapping,
    domain: RuleDomain,
) -> Result<Overrides, ConfigurationError> {
    let mut overrides = Overrides::new();
    for (key, value) in section {
        let key = match key {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            other => {
                return Err(ConfigurationError::InvalidKey {
                    domain,
                    key: format!("{:?}", other),
                })
            }
        };
        let style = parse_style_value(value, &key)?;
        overrides.push(key, style);
    }
    Ok(overrides)
}
