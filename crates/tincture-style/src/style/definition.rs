//! Style definitions as they appear in YAML palette files.
//!
//! A style is written either as shorthand or as a mapping:
//!
//! ```yaml
//! # Shorthand - color and attribute keywords
//! ERROR: "red bold"
//!
//! # Full definition - mapping with attributes
//! '\btimeout\b':
//!   fg: red
//!   bold: true
//!   underline: true
//! ```

use super::attributes::Attribute;
use super::color::Color;
use super::value::Style;
use crate::error::ConfigurationError;

/// Parses a style definition from a YAML value.
///
/// - String → shorthand (see [`Style::parse_shorthand`])
/// - Mapping → `fg` plus boolean attribute flags
///
/// `key` names the rule the style belongs to and is used in error messages.
pub fn parse_style_value(value: &serde_yaml::Value, key: &str) -> Result<Style, ConfigurationError> {
    match value {
        serde_yaml::Value::String(s) => Style::parse_shorthand_for(s, key),
        serde_yaml::Value::Mapping(map) => parse_mapping(map, key),
        _ => Err(invalid(
            key,
            value,
            format!("expected string or mapping, got {:?}", value),
        )),
    }
}

fn parse_mapping(map: &serde_yaml::Mapping, key: &str) -> Result<Style, ConfigurationError> {
    let mut style = Style::new();

    for (field, value) in map {
        let field = field.as_str().ok_or_else(|| {
            invalid(
                key,
                value,
                format!("non-string key in style definition: {:?}", field),
            )
        })?;

        if field == "fg" {
            let name = value
                .as_str()
                .ok_or_else(|| invalid(key, value, "'fg' must be a color name".to_string()))?;
            let color = Color::parse(name).map_err(|e| invalid(key, value, e))?;
            style = style.fg(color);
            continue;
        }

        let attr = Attribute::parse(field).ok_or_else(|| {
            invalid(key, value, format!("unknown style attribute '{}'", field))
        })?;
        let enabled = value.as_bool().ok_or_else(|| {
            invalid(
                key,
                value,
                format!("'{}' must be a boolean, got {:?}", field, value),
            )
        })?;
        if enabled {
            style = style.attr(attr);
        }
    }

    if style.is_empty() {
        return Err(ConfigurationError::InvalidStyle {
            key: key.to_string(),
            value: format!("{:?}", map),
            message: "empty style".to_string(),
        });
    }
    Ok(style)
}

fn invalid(key: &str, value: &serde_yaml::Value, message: String) -> ConfigurationError {
    let value = match value {
        serde_yaml::Value::String(s) => s.clone(),
        other => format!("{:?}", other),
    };
    ConfigurationError::InvalidStyle {
        key: key.to_string(),
        value,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> serde_yaml::Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_shorthand_value() {
        let style = parse_style_value(&yaml("red bold"), "ERROR").unwrap();
        assert_eq!(style, Style::new().red().bold());
    }

    #[test]
    fn test_parse_mapping_value() {
        let style = parse_style_value(&yaml("{ fg: cyan, underline: true }"), "name").unwrap();
        assert_eq!(style, Style::new().cyan().underline());
    }

    #[test]
    fn test_parse_mapping_false_flag_is_ignored() {
        let style = parse_style_value(&yaml("{ fg: red, bold: false }"), "x").unwrap();
        assert_eq!(style, Style::new().red());
    }

    #[test]
    fn test_parse_mapping_accepts_attribute_aliases() {
        let style = parse_style_value(&yaml("{ reverse: true, italics: true }"), "x").unwrap();
        assert_eq!(style, Style::new().standout().italic());
    }

    #[test]
    fn test_parse_mapping_unknown_attribute() {
        let err = parse_style_value(&yaml("{ sparkle: true }"), "x").unwrap_err();
        assert!(err.to_string().contains("sparkle"));
    }

    #[test]
    fn test_parse_mapping_non_bool_flag() {
        assert!(parse_style_value(&yaml("{ bold: yes please }"), "x").is_err());
    }

    #[test]
    fn test_parse_mapping_unknown_color() {
        assert!(parse_style_value(&yaml("{ fg: orange }"), "x").is_err());
    }

    #[test]
    fn test_parse_empty_mapping() {
        assert!(parse_style_value(&yaml("{ bold: false }"), "x").is_err());
    }

    #[test]
    fn test_parse_wrong_type() {
        let err = parse_style_value(&yaml("42"), "line").unwrap_err();
        assert!(err.to_string().contains("line"));
    }
}
