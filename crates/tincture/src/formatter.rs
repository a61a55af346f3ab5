//! Log record formatting.
//!
//! A [`ColoredFormatter`] turns a [`Record`] into one line of text:
//!
//! 1. The [`Template`] is rendered with the record's fields.
//! 2. Each rendered attribute field (`name`, `line`, `module`, `file`) that
//!    has an attribute rule in the palette is styled with it, and the `level`
//!    field with its level style.
//! 3. The line is keyword-highlighted. In [`LineStyle::Level`] the level
//!    style is the ambient style of the whole line.
//!
//! Field tokens are pinned: keyword rules never restyle them. The message
//! is free text and only ever receives keyword styling.
//!
//! ```rust
//! use tincture::{Capabilities, ColoredFormatter, Palette, Record};
//!
//! let formatter = ColoredFormatter::new(Palette::default(), Capabilities::none());
//! let record = Record::new("ERROR", "Failed \"x\"").name("app").line(7).module("main");
//! assert_eq!(formatter.format(&record), "[ERROR] (app:7:main): Failed \"x\"");
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use once_cell::sync::Lazy;
use tincture_style::{highlight_pinned, Capabilities, ConfigurationError, Palette, Span, Style};

/// The template used when none is configured.
pub const DEFAULT_TEMPLATE: &str =
    "[{{ level }}] ({{ name }}:{{ line }}:{{ module }}): {{ message }}";

/// Placeholder for a field the record does not carry.
const MISSING: &str = "?";

/// Each template is the only one in its environment, under this name.
const TEMPLATE_NAME: &str = "line";

// Field boundaries are found by rendering every value as
// OPEN, the field's tag, the value, CLOSE. All of these are private-use
// characters in U+E000..=U+E01F.
const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';
const TAGS: [char; 6] = [
    '\u{E010}', '\u{E011}', '\u{E012}', '\u{E013}', '\u{E014}', '\u{E015}',
];

fn is_marker(c: char) -> bool {
    ('\u{E000}'..='\u{E01F}').contains(&c)
}

/// A record field a template can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Level,
    Name,
    Line,
    Module,
    File,
    Message,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Level,
        Field::Name,
        Field::Line,
        Field::Module,
        Field::File,
        Field::Message,
    ];

    /// Name used in templates and as attribute rule key.
    pub fn name(self) -> &'static str {
        match self {
            Field::Level => "level",
            Field::Name => "name",
            Field::Line => "line",
            Field::Module => "module",
            Field::File => "file",
            Field::Message => "message",
        }
    }

    pub fn parse(name: &str) -> Option<Field> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    fn tag(self) -> char {
        TAGS[self as usize]
    }

    fn from_tag(tag: char) -> Option<Field> {
        TAGS.iter().position(|&t| t == tag).map(|i| Self::ALL[i])
    }

    fn mark(self, value: &str) -> String {
        format!("{OPEN}{}{value}{CLOSE}", self.tag())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compiled format template such as `"[{{ level }}] {{ name }}: {{ message }}"`.
///
/// Templates use minijinja syntax over the record fields (`level`, `name`,
/// `line`, `module`, `file`, `message`), so filters and conditionals work:
///
/// ```rust
/// use tincture::{Capabilities, ColoredFormatter, Palette, Record, Template};
///
/// let template = Template::parse("{{ level|lower }}: {{ message }}").unwrap();
/// let formatter = ColoredFormatter::new(Palette::default(), Capabilities::none())
///     .with_template(template);
/// assert_eq!(formatter.format(&Record::new("INFO", "ready")), "info: ready");
/// ```
///
/// Every field is a string; a missing one renders as `?`.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    env: Arc<Environment<'static>>,
    fields: Vec<Field>,
}

static DEFAULT: Lazy<Template> = Lazy::new(|| {
    Template::parse(DEFAULT_TEMPLATE)
        .expect("default template is a compile-time constant and must be valid")
});

impl Default for Template {
    fn default() -> Self {
        DEFAULT.clone()
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Template {}

impl Template {
    /// Compiles a template and renders it once with sample values, so that
    /// errors surface here rather than on every record.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::UnknownField`] for a variable that is not a [`Field`]
    /// - [`ConfigurationError::InvalidTemplate`] for a syntax error, or a
    ///   template that fails to render (an unknown filter, for example)
    pub fn parse(source: &str) -> Result<Self, ConfigurationError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template_owned(TEMPLATE_NAME, source.to_string())
            .map_err(template_error)?;

        let declared: HashSet<String> = env
            .get_template(TEMPLATE_NAME)
            .map_err(template_error)?
            .undeclared_variables(false);
        let mut unknown: Vec<&String> = declared
            .iter()
            .filter(|name| Field::parse(name).is_none())
            .collect();
        unknown.sort();
        if let Some(field) = unknown.first() {
            return Err(ConfigurationError::UnknownField {
                field: field.to_string(),
            });
        }

        let mut template = Self {
            source: source.to_string(),
            env: Arc::new(env),
            fields: Vec::new(),
        };

        let sample = template
            .render(|field| field.mark(field.name()))
            .map_err(template_error)?;
        let (_, placed) = unmark(&sample);
        let mut fields: Vec<Field> = Vec::new();
        for field in placed.into_iter().map(|(field, _)| field).chain(
            Field::ALL
                .into_iter()
                .filter(|field| declared.contains(field.name())),
        ) {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        template.fields = fields;

        log::trace!("compiled format template {:?}", template.source);
        Ok(template)
    }

    /// The template text as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Fields referenced by the template, in order of first appearance.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().copied()
    }

    fn render(&self, value: impl Fn(Field) -> String) -> Result<String, minijinja::Error> {
        let context: BTreeMap<&str, String> = Field::ALL
            .into_iter()
            .map(|field| (field.name(), value(field)))
            .collect();
        self.env.get_template(TEMPLATE_NAME)?.render(context)
    }

    /// Renders a record into its line and the byte ranges its fields took.
    ///
    /// The line comes from a render with the plain values. A second render
    /// with marked values locates the fields; when the two disagree, as in a
    /// template that branches on a value, no field is located.
    fn expand(&self, record: &Record<'_>) -> (String, Vec<(Field, Range<usize>)>) {
        let line = match self.render(|field| record.value(field).into_owned()) {
            Ok(line) => line,
            Err(_) => return (record.message().to_string(), Vec::new()),
        };
        match self.render(|field| field.mark(&record.value(field))) {
            Ok(marked) => match unmark(&marked) {
                (text, placed) if text == line => (line, placed),
                _ => (line, Vec::new()),
            },
            Err(_) => (line, Vec::new()),
        }
    }
}

impl FromStr for Template {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::parse(s)
    }
}

fn template_error(err: minijinja::Error) -> ConfigurationError {
    ConfigurationError::InvalidTemplate {
        position: err.range().map_or(0, |range| range.start),
        message: err
            .detail()
            .map_or_else(|| err.kind().to_string(), str::to_string),
    }
}

/// Strips field markers, returning the text and where each closed field landed.
fn unmark(marked: &str) -> (String, Vec<(Field, Range<usize>)>) {
    let mut text = String::with_capacity(marked.len());
    let mut placed = Vec::new();
    let mut open: Option<(Field, usize)> = None;
    let mut chars = marked.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            OPEN => {
                open = chars
                    .peek()
                    .copied()
                    .and_then(Field::from_tag)
                    .map(|field| (field, text.len()));
            }
            CLOSE => {
                if let Some((field, start)) = open.take() {
                    placed.push((field, start..text.len()));
                }
            }
            c if is_marker(c) => {}
            c => text.push(c),
        }
    }
    (text, placed)
}

/// A log record as seen by the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    level: &'a str,
    name: Option<&'a str>,
    line: Option<u32>,
    module: Option<&'a str>,
    file: Option<&'a str>,
    message: Cow<'a, str>,
}

impl<'a> Record<'a> {
    /// A record with a level name and message; other fields are missing.
    pub fn new(level: &'a str, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            level,
            name: None,
            line: None,
            module: None,
            file: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub fn line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn module(mut self, module: &'a str) -> Self {
        self.module = Some(module);
        self
    }

    #[must_use]
    pub fn file(mut self, file: &'a str) -> Self {
        self.file = Some(file);
        self
    }

    /// Views a `log` record. The logger name is the record's target.
    pub fn from_log(record: &log::Record<'a>) -> Self {
        let message = match record.args().as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(record.args().to_string()),
        };
        Self {
            level: level_name(record.level()),
            name: Some(record.target()),
            line: record.line(),
            module: record.module_path(),
            file: record.file(),
            message,
        }
    }

    pub fn level(&self) -> &str {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn value(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::Level => Cow::Borrowed(self.level),
            Field::Name => Cow::Borrowed(self.name.unwrap_or(MISSING)),
            Field::Line => self
                .line
                .map_or(Cow::Borrowed(MISSING), |l| Cow::Owned(l.to_string())),
            Field::Module => Cow::Borrowed(self.module.unwrap_or(MISSING)),
            Field::File => Cow::Borrowed(self.file.unwrap_or(MISSING)),
            Field::Message => Cow::Borrowed(&self.message),
        }
    }
}

/// Level names as they appear in output and as level rule keys.
///
/// `Warn` is spelled `WARNING`, matching the default level rules.
pub fn level_name(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARNING",
        log::Level::Info => "INFO",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

/// How the level style applies to a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// The whole line is drawn in the level style.
    #[default]
    Level,
    /// Only the level token is drawn in the level style.
    Tokens,
}

/// Formats records into styled lines.
#[derive(Debug, Clone)]
pub struct ColoredFormatter {
    template: Template,
    palette: Palette,
    caps: Capabilities,
    line_style: LineStyle,
}

impl ColoredFormatter {
    /// A formatter with the default template.
    pub fn new(palette: Palette, caps: Capabilities) -> Self {
        Self {
            template: Template::default(),
            palette,
            caps,
            line_style: LineStyle::default(),
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    #[must_use]
    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// Formats one record. Never fails.
    pub fn format(&self, record: &Record<'_>) -> String {
        let (line, placed) = self.template.expand(record);
        let pinned: Vec<Span> = placed
            .into_iter()
            .filter(|(_, range)| !range.is_empty())
            .filter_map(|(field, range)| Some(Span::new(range, self.field_style(field, record)?)))
            .collect();

        let ambient = match self.line_style {
            LineStyle::Level => self.palette.level_style(record.level),
            LineStyle::Tokens => Style::new(),
        };
        highlight_pinned(&line, &ambient, &pinned, self.palette.keywords(), &self.caps)
    }

    fn field_style(&self, field: Field, record: &Record<'_>) -> Option<Style> {
        match field {
            Field::Message => None,
            Field::Level => Some(self.palette.level_style(record.level)),
            other => self.palette.attribute_style(other.name()),
        }
        .filter(|style| !style.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tincture_style::{Overrides, PaletteOverrides};

    fn record() -> Record<'static> {
        Record::new("ERROR", "Failed \"x\"")
            .name("app")
            .line(7)
            .module("main")
    }

    #[test]
    fn test_template_parse_default() {
        let template = Template::default();
        assert_eq!(template.as_str(), DEFAULT_TEMPLATE);
        let fields: Vec<Field> = template.fields().collect();
        assert_eq!(
            fields,
            [Field::Level, Field::Name, Field::Line, Field::Module, Field::Message]
        );
    }

    #[test]
    fn test_template_literal_braces() {
        let template = Template::parse("{{ '{' }}{{ level }}{{ '}' }} {{ message }}").unwrap();
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::none())
            .with_template(template);
        assert_eq!(formatter.format(&Record::new("INFO", "hi")), "{INFO} hi");
    }

    #[test]
    fn test_template_unknown_field() {
        let err = Template::parse("{{ thread }}: {{ message }}").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownField { field } if field == "thread"));
    }

    #[test]
    fn test_template_syntax_error() {
        let err = Template::parse("[{{ level ] {{ message }}").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidTemplate { .. }));
        assert!(Template::parse("{{ message").is_err());
        assert!(Template::parse("{% if level %}{{ message }}").is_err());
    }

    #[test]
    fn test_template_unknown_filter_fails_at_parse() {
        let err = Template::parse("{{ level|sparkle }}").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_template_empty_expression() {
        assert!(matches!(
            Template::parse("{{ }}").unwrap_err(),
            ConfigurationError::InvalidTemplate { .. }
        ));
    }

    #[test]
    fn test_template_non_ascii_literals() {
        let template = Template::parse("→ {{ level }} · {{ message }}").unwrap();
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::none())
            .with_template(template);
        assert_eq!(formatter.format(&Record::new("INFO", "ok")), "→ INFO · ok");
    }

    #[test]
    fn test_template_fields_in_order() {
        let template = Template::parse("{{ message }} at {{ file }}:{{ line }} ({{ file }})").unwrap();
        let fields: Vec<Field> = template.fields().collect();
        assert_eq!(fields, [Field::Message, Field::File, Field::Line]);
    }

    #[test]
    fn test_filtered_field_keeps_its_style() {
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::ansi())
            .with_template(Template::parse("{{ level|lower }} {{ message }}").unwrap())
            .with_line_style(LineStyle::Tokens);
        assert_eq!(
            formatter.format(&Record::new("INFO", "hi")),
            "\x1b[1;34minfo\x1b[0m hi\x1b[0m"
        );
    }

    #[test]
    fn test_conditional_on_field_value() {
        let template =
            Template::parse("{% if line != '?' %}{{ line }} {% endif %}{{ message }}").unwrap();
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::ansi())
            .with_template(template)
            .with_line_style(LineStyle::Tokens);

        assert_eq!(formatter.format(&Record::new("INFO", "hi")), "hi");
        assert_eq!(
            formatter.format(&Record::new("INFO", "hi").line(3)),
            "\x1b[33m3\x1b[0m hi\x1b[0m"
        );
    }

    #[test]
    fn test_marker_characters_in_values_pass_through() {
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::none());
        let message = "odd \u{E000}\u{E011}bytes\u{E001}";
        assert_eq!(
            formatter.format(&Record::new("INFO", message).name("app").line(1).module("m")),
            format!("[INFO] (app:1:m): {message}")
        );
    }

    #[test]
    fn test_template_equality_by_source() {
        assert_eq!(Template::default(), Template::parse(DEFAULT_TEMPLATE).unwrap());
        assert_ne!(Template::default(), Template::parse("{{ message }}").unwrap());
    }

    #[test]
    fn test_format_plain() {
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::none());
        assert_eq!(formatter.format(&record()), "[ERROR] (app:7:main): Failed \"x\"");
    }

    #[test]
    fn test_format_missing_fields() {
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::none());
        assert_eq!(
            formatter.format(&Record::new("INFO", "hi")),
            "[INFO] (?:?:?): hi"
        );
    }

    #[test]
    fn test_format_styles_tokens_and_restores_ambient() {
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::ansi());
        let out = formatter.format(&record());

        let ambient = "\x1b[1;31m";
        let restore = "\x1b[0m\x1b[1;31m";
        let expected = [
            ambient,
            "[ERROR] (",
            "\x1b[1;36m",
            "app",
            restore,
            ":",
            "\x1b[1;33m",
            "7",
            restore,
            ":",
            "\x1b[1;34m",
            "main",
            restore,
            "): Failed ",
            "\x1b[1;33m",
            "\"x\"",
            restore,
            "\x1b[0m",
        ]
        .concat();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_format_tokens_line_style() {
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::ansi())
            .with_line_style(LineStyle::Tokens);
        let out = formatter.format(&Record::new("WARNING", "disk low").name("app"));

        assert!(out.starts_with("[\x1b[1;33mWARNING\x1b[0m] ("));
        assert!(out.contains("\x1b[36mapp\x1b[0m"));
        assert!(out.ends_with("): disk low\x1b[0m"));
    }

    #[test]
    fn test_fields_are_not_keyword_highlighted() {
        // "error" in the logger name would match the keyword rule.
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::ansi())
            .with_line_style(LineStyle::Tokens);
        let out = formatter.format(&Record::new("INFO", "ok").name("error"));
        assert!(out.contains("\x1b[36merror\x1b[0m"));
        assert!(!out.contains("\x1b[1;31m"));
    }

    #[test]
    fn test_unknown_level_has_no_ambient() {
        let formatter = ColoredFormatter::new(Palette::default(), Capabilities::ansi())
            .with_template(Template::parse("{{ level }} {{ message }}").unwrap());
        assert_eq!(formatter.format(&Record::new("TRACE", "quiet")), "TRACE quiet");
    }

    #[test]
    fn test_attribute_rule_for_file_field() {
        let overrides = PaletteOverrides {
            attributes: Overrides::new().with("file", Style::new().gray()),
            ..Default::default()
        };
        let palette = Palette::with_overrides(&overrides).unwrap();
        let formatter = ColoredFormatter::new(palette, Capabilities::ansi())
            .with_template(Template::parse("{{ file }}").unwrap())
            .with_line_style(LineStyle::Tokens);
        let out = formatter.format(&Record::new("INFO", "").file("src/main.rs"));
        assert_eq!(out, "\x1b[37msrc/main.rs\x1b[0m\x1b[0m");
    }

    fn assert_viewed(log_record: &log::Record<'_>) {
        let record = Record::from_log(log_record);
        assert_eq!(record.level(), "WARNING");
        assert_eq!(record.message(), "retrying 3 times");
        assert_eq!(record.value(Field::Name), "net");
        assert_eq!(record.value(Field::Module), "net::client");
        assert_eq!(record.value(Field::File), "src/client.rs");
        assert_eq!(record.value(Field::Line), "42");
    }

    #[test]
    fn test_record_from_log() {
        assert_viewed(
            &log::Record::builder()
                .args(format_args!("retrying {} times", 3))
                .level(log::Level::Warn)
                .target("net")
                .module_path(Some("net::client"))
                .file(Some("src/client.rs"))
                .line(Some(42))
                .build(),
        );
    }

    #[test]
    fn test_level_names() {
        assert_eq!(level_name(log::Level::Error), "ERROR");
        assert_eq!(level_name(log::Level::Warn), "WARNING");
        assert_eq!(level_name(log::Level::Trace), "TRACE");
    }
}
