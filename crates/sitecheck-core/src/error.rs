use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal errors that abort a run. Probe failures are not represented here;
/// they are folded into a down status by the checker.
#[derive(Debug, Error)]
pub enum SiteCheckError {
    #[error("Failed to read sites file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse sites file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Failed to read template {}: {source}", .path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid template {}: {source}", .path.display())]
    TemplateSyntax {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },
    #[error("Failed to render template {}: {source}", .path.display())]
    TemplateRender {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },
    #[error("Failed to write output file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SiteCheckError {
    pub(crate) fn config_read(path: &Path, source: io::Error) -> Self {
        Self::ConfigRead {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn config_parse(path: &Path, source: serde_yaml::Error) -> Self {
        Self::ConfigParse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn output_write(path: &Path, source: io::Error) -> Self {
        Self::OutputWrite {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the file the failing step was working on.
    pub fn path(&self) -> &Path {
        match self {
            Self::ConfigRead { path, .. }
            | Self::ConfigParse { path, .. }
            | Self::TemplateRead { path, .. }
            | Self::TemplateSyntax { path, .. }
            | Self::TemplateRender { path, .. }
            | Self::OutputWrite { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path() {
        let err = SiteCheckError::config_read(
            Path::new("missing/sites.yaml"),
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing/sites.yaml"), "{}", msg);
        assert!(msg.contains("no such file"), "{}", msg);
    }

    #[test]
    fn output_write_reports_its_path() {
        let err = SiteCheckError::output_write(
            Path::new("README.md"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.path(), Path::new("README.md"));
    }
}
