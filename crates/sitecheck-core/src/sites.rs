//! YAML sites file schema and loading.
//!
//! Example sites file:
//!
//! ```yaml
//! sites:
//!   - name: Homepage
//!     url: https://example.com
//!   - name: API
//!     url: https://api.example.com/health
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SiteCheckError;

/// A named URL endpoint to be health-checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl Site {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Root document of the sites file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitesFile {
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl SitesFile {
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, SiteCheckError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SiteCheckError::config_read(path, e))?;

        let file =
            Self::from_yaml_str(&content).map_err(|e| SiteCheckError::config_parse(path, e))?;

        for (i, site) in file.sites.iter().enumerate() {
            if let Err(e) = url::Url::parse(&site.url) {
                warn!(
                    index = i,
                    name = %site.name,
                    url = %site.url,
                    error = %e,
                    "Site URL does not parse; it will be reported down"
                );
            }
        }

        debug!(path = %path.display(), count = file.sites.len(), "Loaded sites file");
        Ok(file)
    }
}

/// Read and parse the sites file at `path`, returning sites in file order.
pub fn load_sites(path: impl AsRef<Path>) -> Result<Vec<Site>, SiteCheckError> {
    SitesFile::load(path.as_ref()).map(|f| f.sites)
}
