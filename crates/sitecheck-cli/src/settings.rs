//! Run settings: CLI flags, environment, optional TOML file, built-in defaults.
//!
//! Precedence is flag > environment > settings file > default. Environment
//! variables only count when set to a non-empty value.
//!
//! Example settings file:
//!
//! ```toml
//! [paths]
//! sites = "config/sites.yaml"
//! template = "config/README.md.tmpl"
//! output = "README.md"
//!
//! [probe]
//! timeout_secs = 5
//! max_concurrent = 4
//!
//! [output]
//! show = false
//! log_format = "json"
//! timestamp = true
//! ```

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use sitecheck_core::ProbeConfig;

pub const SITES_ENV: &str = "SITECHECK_SITES";
pub const TEMPLATE_ENV: &str = "SITECHECK_TEMPLATE";
pub const OUTPUT_ENV: &str = "SITECHECK_OUTPUT";

pub const DEFAULT_SITES_PATH: &str = "sites.yaml";
pub const DEFAULT_TEMPLATE_PATH: &str = "README.md.tmpl";
pub const DEFAULT_OUTPUT_PATH: &str = "README.md";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub probe: ProbeSection,

    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    pub sites: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    pub timeout_secs: Option<u64>,
    pub max_concurrent: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub show: Option<bool>,
    pub log_format: Option<LogFormat>,
    pub timestamp: Option<bool>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file {}: {}", path.display(), e))?;

        let file: SettingsFile = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse settings file {}: {}", path.display(), e))?;

        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<(), String> {
        if self.probe.timeout_secs == Some(0) {
            return Err("probe.timeout_secs must be greater than 0".into());
        }
        if self.probe.max_concurrent == Some(0) {
            return Err("probe.max_concurrent must be greater than 0".into());
        }
        Ok(())
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub sites: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub concurrency: Option<usize>,
    pub quiet: bool,
    pub log_format: Option<LogFormat>,
    pub timestamp: bool,
}

/// Fully resolved, immutable settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sites_path: PathBuf,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub show_output: bool,
    pub probe: ProbeConfig,
    pub log_format: LogFormat,
    /// Pass `generated_at` to the template. Off by default so that reruns
    /// over unchanged results produce the same report.
    pub timestamp: bool,
}

impl Settings {
    pub fn resolve<E>(
        overrides: &Overrides,
        file: Option<&SettingsFile>,
        env: E,
    ) -> Result<Self, String>
    where
        E: Fn(&str) -> Option<String>,
    {
        let defaults = SettingsFile::default();
        let file = file.unwrap_or(&defaults);

        let path = |flag: &Option<PathBuf>, key: &str, from_file: &Option<PathBuf>, default: &str| {
            flag.clone()
                .or_else(|| env(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
                .or_else(|| from_file.clone())
                .unwrap_or_else(|| PathBuf::from(default))
        };

        let sites_path = path(&overrides.sites, SITES_ENV, &file.paths.sites, DEFAULT_SITES_PATH);
        let template_path = path(
            &overrides.template,
            TEMPLATE_ENV,
            &file.paths.template,
            DEFAULT_TEMPLATE_PATH,
        );
        let output_path = path(
            &overrides.output,
            OUTPUT_ENV,
            &file.paths.output,
            DEFAULT_OUTPUT_PATH,
        );

        let mut probe = ProbeConfig::default();
        match overrides.timeout_secs.or(file.probe.timeout_secs) {
            Some(0) => return Err("timeout must be greater than 0 seconds".into()),
            Some(secs) => probe = probe.with_timeout_secs(secs),
            None => {}
        }
        match overrides.concurrency.or(file.probe.max_concurrent) {
            Some(0) => return Err("concurrency must be greater than 0".into()),
            Some(n) => probe = probe.with_max_concurrent_probes(n),
            None => {}
        }

        let show_output = !overrides.quiet && file.output.show.unwrap_or(true);
        let log_format = overrides
            .log_format
            .or(file.output.log_format)
            .unwrap_or_default();
        let timestamp = overrides.timestamp || file.output.timestamp.unwrap_or(false);

        Ok(Self {
            sites_path,
            template_path,
            output_path,
            show_output,
            probe,
            log_format,
            timestamp,
        })
    }
}

/// Process environment lookup for [`Settings::resolve`].
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
