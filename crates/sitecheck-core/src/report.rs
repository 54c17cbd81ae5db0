//! Template rendering of probe results.
//!
//! Templates use Jinja syntax. The context exposes:
//!
//! - `sites`: ordered list of `{ name, url, status }`, `status` being the marker
//! - `summary`: `{ total, up, down }`
//! - `up_marker`, `down_marker`
//! - `generated_at`: RFC 3339 timestamp, only when the caller supplies one
//!
//! ```jinja
//! | Site | Status |
//! |------|--------|
//! {% for site in sites -%}
//! | [{{ site.name }}]({{ site.url }}) | {{ site.status }} |
//! {% endfor %}
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use minijinja::Environment;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SiteCheckError;
use crate::status::{ReportSummary, SiteStatus, DOWN_MARKER, UP_MARKER};

/// Data handed to the template.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext<'a> {
    pub sites: &'a [SiteStatus],
    pub summary: ReportSummary,
    pub up_marker: &'static str,
    pub down_marker: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl<'a> ReportContext<'a> {
    pub fn new(sites: &'a [SiteStatus]) -> Self {
        Self {
            sites,
            summary: ReportSummary::from_statuses(sites),
            up_marker: UP_MARKER,
            down_marker: DOWN_MARKER,
            generated_at: None,
        }
    }

    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }
}

/// A template loaded from disk and checked for syntax errors.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    template_path: PathBuf,
    source: String,
}

impl ReportRenderer {
    pub fn load(template_path: impl AsRef<Path>) -> Result<Self, SiteCheckError> {
        let template_path = template_path.as_ref();
        let source =
            fs::read_to_string(template_path).map_err(|e| SiteCheckError::TemplateRead {
                path: template_path.to_path_buf(),
                source: e,
            })?;
        Self::from_source(template_path, source)
    }

    /// Build from in-memory source. `template_path` is only used in errors.
    pub fn from_source(
        template_path: impl Into<PathBuf>,
        source: impl Into<String>,
    ) -> Result<Self, SiteCheckError> {
        let renderer = Self {
            template_path: template_path.into(),
            source: source.into(),
        };
        renderer.check_syntax()?;
        debug!(path = %renderer.template_path.display(), "Loaded template");
        Ok(renderer)
    }

    fn environment<'s>() -> Environment<'s> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env
    }

    fn check_syntax(&self) -> Result<(), SiteCheckError> {
        let env = Self::environment();
        env.template_from_str(&self.source)
            .map(|_| ())
            .map_err(|e| self.syntax_error(e))
    }

    fn syntax_error(&self, source: minijinja::Error) -> SiteCheckError {
        SiteCheckError::TemplateSyntax {
            path: self.template_path.clone(),
            source,
        }
    }

    pub fn render(&self, context: &ReportContext<'_>) -> Result<String, SiteCheckError> {
        let env = Self::environment();
        let template = env
            .template_from_str(&self.source)
            .map_err(|e| self.syntax_error(e))?;
        template
            .render(context)
            .map_err(|e| SiteCheckError::TemplateRender {
                path: self.template_path.clone(),
                source: e,
            })
    }

    /// Render and replace `output_path`. The file is swapped in only after a
    /// successful render and a complete write.
    pub fn write(
        &self,
        output_path: impl AsRef<Path>,
        context: &ReportContext<'_>,
    ) -> Result<(), SiteCheckError> {
        let output_path = output_path.as_ref();
        let rendered = self.render(context)?;
        write_atomic(output_path, rendered.as_bytes())?;
        info!(
            path = %output_path.display(),
            bytes = rendered.len(),
            "Wrote report"
        );
        Ok(())
    }
}

/// Load `template_path`, render `statuses` into it and write `output_path`.
pub fn write_report(
    output_path: impl AsRef<Path>,
    template_path: impl AsRef<Path>,
    statuses: &[SiteStatus],
) -> Result<(), SiteCheckError> {
    ReportRenderer::load(template_path)?.write(output_path, &ReportContext::new(statuses))
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), SiteCheckError> {
    let err = |e| SiteCheckError::output_write(path, e);

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same mode as a plain create: 0666 less the process umask.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(err)?;
    tmp.write_all(contents).map_err(err)?;
    tmp.flush().map_err(err)?;

    // Keep the mode of a report that is being replaced.
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions()).map_err(err)?;
    }

    tmp.persist(path).map_err(|e| err(e.error))?;
    Ok(())
}
