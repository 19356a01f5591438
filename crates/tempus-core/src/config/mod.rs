//! Configuration of the `Server-Timing` instrumentation.
//!
//! The settings are read from the `[server-timing]` table:
//!
//! ```toml
//! [server-timing]
//! enabled = true
//! record-total = true
//! total-metric = "total"
//! total-description = "request"
//! skip-paths = ["/health"]
//! ```

use crate::{SharedString, error::Error, extension::TomlTableExt};
use toml::Table;

/// Settings of the `Server-Timing` instrumentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTimingConfig {
    /// A flag to enable the instrumentation.
    enabled: bool,
    /// A flag to record the total time of processing a request.
    record_total: bool,
    /// Name of the total time metric.
    total_metric: SharedString,
    /// Optional description of the total time metric.
    total_description: Option<SharedString>,
    /// Request paths which are not instrumented.
    skip_paths: Vec<String>,
}

impl ServerTimingConfig {
    /// Creates a new instance with the default settings.
    #[inline]
    pub fn new() -> Self {
        Self {
            enabled: true,
            record_total: false,
            total_metric: "total".into(),
            total_description: None,
            skip_paths: Vec::new(),
        }
    }

    /// Constructs an instance from the `[server-timing]` table.
    pub fn from_table(config: &Table) -> Self {
        let mut settings = Self::new();
        if let Some(enabled) = config.get_bool("enabled") {
            settings.enabled = enabled;
        }
        if let Some(record_total) = config.get_bool("record-total") {
            settings.record_total = record_total;
        }
        if let Some(metric) = config.get_str("total-metric") {
            settings.total_metric = metric.to_owned().into();
        }
        if let Some(description) = config.get_str("total-description") {
            settings.total_description = Some(description.to_owned().into());
        }
        if let Some(paths) = config.get_str_array("skip-paths") {
            settings.skip_paths = paths.into_iter().map(|s| s.to_owned()).collect();
        }
        settings
    }

    /// Parses the TOML document and reads its `[server-timing]` table.
    /// The default settings are used if the table does not exist.
    pub fn parse_toml(document: &str) -> Result<Self, Error> {
        let table = toml::from_str::<Table>(document)
            .map_err(|err| Error::with_source("fail to parse the server timing config", err))?;
        let settings = table
            .get_table("server-timing")
            .map(Self::from_table)
            .unwrap_or_default();
        Ok(settings)
    }

    /// Returns the settings with the total time metric enabled.
    #[inline]
    pub fn with_total(mut self, metric: impl Into<SharedString>) -> Self {
        self.record_total = true;
        self.total_metric = metric.into();
        self
    }

    /// Returns `true` if the instrumentation is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if the total time of processing a request should be recorded.
    #[inline]
    pub fn record_total(&self) -> bool {
        self.record_total
    }

    /// Returns the name of the total time metric.
    #[inline]
    pub fn total_metric(&self) -> &str {
        self.total_metric.as_ref()
    }

    /// Returns the description of the total time metric.
    #[inline]
    pub fn total_description(&self) -> Option<&str> {
        self.total_description.as_deref()
    }

    /// Returns `true` if requests to the path should be instrumented.
    pub fn instruments_path(&self, path: &str) -> bool {
        self.enabled && !self.skip_paths.iter().any(|skip_path| skip_path == path)
    }
}

impl Default for ServerTimingConfig {
    fn default() -> Self {
        Self::new()
    }
}
