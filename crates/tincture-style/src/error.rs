//! Error types for style and rule configuration.
//!
//! Everything that can go wrong in this crate goes wrong at setup time: a
//! malformed style shorthand, a regular expression that does not compile, a
//! palette file that cannot be read. The per-line entry points
//! ([`highlight`](crate::highlight()), [`Style::render`](crate::Style::render))
//! have no error path at all.

use std::path::PathBuf;

use thiserror::Error;

use crate::rules::RuleDomain;

/// Error raised while building styles, rule sets, palettes or templates.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A keyword rule whose pattern is not a valid regular expression.
    #[error("invalid {domain} pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Domain of the rule set the pattern was supplied for.
        domain: RuleDomain,
        /// The offending pattern text.
        pattern: String,
        /// Compilation error reported by the regex engine.
        #[source]
        source: regex::Error,
    },

    /// A style definition that cannot be understood.
    #[error("invalid style '{value}' for '{key}': {message}")]
    InvalidStyle {
        /// Rule key (or `"<inline>"`) the style was given for.
        key: String,
        /// The style text or value as supplied.
        value: String,
        /// What was wrong with it.
        message: String,
    },

    /// A rule key that is empty or otherwise unusable in its domain.
    #[error("invalid {domain} key '{key}'")]
    InvalidKey {
        /// Domain of the rule set.
        domain: RuleDomain,
        /// The offending key.
        key: String,
    },

    /// A palette document with a section other than the known domains.
    #[error("unknown palette section '{0}' (expected attributes, levels or keywords)")]
    UnknownSection(String),

    /// A format template referencing a variable that is not a record field.
    #[error("unknown field '{field}' in format template")]
    UnknownField {
        /// The variable name as written in the template.
        field: String,
    },

    /// A format template that does not compile or render.
    #[error("invalid format template at byte {position}: {message}")]
    InvalidTemplate {
        /// Byte offset of the problem in the template.
        position: usize,
        /// Description of the problem.
        message: String,
    },

    /// YAML parse error for a palette document.
    #[error("failed to parse palette{}: {message}", .path.as_ref().map(|p| format!(" {}", p.display())).unwrap_or_default())]
    Parse {
        /// Source file, when parsed from disk.
        path: Option<PathBuf>,
        /// Message from the YAML parser.
        message: String,
    },

    /// A palette file that cannot be read.
    #[error("failed to load palette {}: {source}", .path.display())]
    Load {
        /// The file that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
