mod http;

pub use http::HttpProber;

use async_trait::async_trait;
use thiserror::Error;

/// Why a probe did not count as up.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("Network error probing {url}: {reason}")]
    Network { url: String, reason: String },
    #[error("Timeout probing {url}")]
    Timeout { url: String },
}

impl ProbeError {
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Network { url, .. } | Self::Timeout { url } => url,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Trait for checking whether a single URL is reachable.
///
/// `Ok(())` means the site is up. Implementations must not retry; one call
/// issues at most one request.
#[async_trait]
pub trait SiteProber: Send + Sync {
    async fn probe(&self, url: &str) -> Result<(), ProbeError>;
}
