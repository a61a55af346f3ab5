//! The colored `log` backend.
//!
//! [`setup_colored_stderr_logging`] is the one-call entry point: it probes
//! stderr, builds a [`ColoredFormatter`] from a [`LoggerConfig`] and installs
//! a [`ColoredLogger`] as the global logger.
//!
//! ```rust,no_run
//! use tincture::{setup_colored_stderr_logging, LoggerConfig, Style};
//!
//! setup_colored_stderr_logging(
//!     LoggerConfig::new()
//!         .level(log::LevelFilter::Debug)
//!         .level_style("DEBUG", Style::new().cyan().bold())
//!         .keyword_style(r"\btimeout\b", Style::new().red().underline()),
//! )?;
//!
//! log::warn!("connection **lost**, retrying");
//! # Ok::<(), tincture::SetupError>(())
//! ```

use std::path::PathBuf;

use console::Term;
use log::{LevelFilter, Log, Metadata};
use tincture_style::{
    forget_capabilities, probe, Capabilities, ConfigurationError, Palette, PaletteOverrides,
    Stream, Style,
};

use crate::formatter::{ColoredFormatter, LineStyle, Record, Template};
use crate::setup::SetupError;

/// Configuration for a [`ColoredLogger`].
///
/// Overrides are layered in this order: built-in palette, palette file, then
/// the styles given here.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    template: Option<String>,
    level: LevelFilter,
    line_style: LineStyle,
    palette_file: Option<PathBuf>,
    overrides: PaletteOverrides,
    stream: Stream,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            template: None,
            level: LevelFilter::Info,
            line_style: LineStyle::default(),
            palette_file: None,
            overrides: PaletteOverrides::default(),
            stream: Stream::Stderr,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the format template. Parsed when the logger is built.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Sets the most verbose level that is written. Defaults to `Info`.
    #[must_use]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    /// Reads palette overrides from a YAML file when the logger is built.
    #[must_use]
    pub fn palette_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.palette_file = Some(path.into());
        self
    }

    /// Styles a record attribute (`name`, `line`, `module`, `file`).
    #[must_use]
    pub fn attribute_style(mut self, attribute: impl Into<String>, style: Style) -> Self {
        self.overrides.attributes.push(attribute, style);
        self
    }

    /// Styles a level name (`DEBUG`, `WARNING`, …).
    #[must_use]
    pub fn level_style(mut self, level: impl Into<String>, style: Style) -> Self {
        self.overrides.levels.push(level, style);
        self
    }

    /// Adds or replaces a keyword rule. The pattern is compiled when the
    /// logger is built.
    #[must_use]
    pub fn keyword_style(mut self, pattern: impl Into<String>, style: Style) -> Self {
        self.overrides.keywords.push(pattern, style);
        self
    }

    /// Sets the stream written to. Defaults to stderr.
    #[must_use]
    pub fn stream(mut self, stream: Stream) -> Self {
        self.stream = stream;
        self
    }

    /// Builds the formatter this configuration describes.
    pub fn build_formatter(&self, caps: Capabilities) -> Result<ColoredFormatter, ConfigurationError> {
        let mut palette = Palette::default();
        if let Some(path) = &self.palette_file {
            palette = palette.apply(&PaletteOverrides::from_file(path)?)?;
        }
        palette = palette.apply(&self.overrides)?;

        let template = match &self.template {
            Some(source) => Template::parse(source)?,
            None => Template::default(),
        };

        Ok(ColoredFormatter::new(palette, caps)
            .with_template(template)
            .with_line_style(self.line_style))
    }
}

/// A `log::Log` implementation writing styled lines to a terminal stream.
#[derive(Debug)]
pub struct ColoredLogger {
    formatter: ColoredFormatter,
    level: LevelFilter,
    stream: Stream,
}

impl ColoredLogger {
    /// Builds a logger, probing the configured stream.
    pub fn new(config: &LoggerConfig) -> Result<Self, ConfigurationError> {
        Self::with_capabilities(config, probe(config.stream))
    }

    /// Builds a logger for explicitly given capabilities.
    pub fn with_capabilities(
        config: &LoggerConfig,
        caps: Capabilities,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            formatter: config.build_formatter(caps)?,
            level: config.level,
            stream: config.stream,
        })
    }

    pub fn formatter(&self) -> &ColoredFormatter {
        &self.formatter
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Formats a `log` record the way it would be written.
    pub fn format(&self, record: &log::Record<'_>) -> String {
        self.formatter.format(&Record::from_log(record))
    }

    fn term(&self) -> Term {
        match self.stream {
            Stream::Stdout => Term::stdout(),
            Stream::Stderr => Term::stderr(),
        }
    }
}

impl Log for ColoredLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // A logger has nowhere to report its own write failures.
        let _ = self.term().write_line(&self.format(record));
    }

    fn flush(&self) {
        let _ = self.term().flush();
    }
}

/// Installs a colored logger writing to the configured stream (stderr by
/// default) as the global `log` backend.
///
/// Cached capabilities for the stream are dropped first, so the probe sees
/// the environment as it is now.
///
/// # Errors
///
/// - [`SetupError::Configuration`] for an invalid template, style, pattern or
///   palette file
/// - [`SetupError::Logger`] if a global logger is already installed
pub fn setup_colored_stderr_logging(config: LoggerConfig) -> Result<(), SetupError> {
    forget_capabilities(config.stream);
    let logger = ColoredLogger::new(&config)?;
    log::debug!(
        "installing colored logger at {} with {:?}",
        logger.level,
        logger.formatter.capabilities()
    );

    let level = logger.level;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}
