use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{ProbeError, SiteProber};
use crate::config::ProbeConfig;

/// Probes a site with a single GET; up only on `200 OK`.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(Self::build_client(timeout)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.timeout)
    }

    pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sitecheck/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

#[async_trait]
impl SiteProber for HttpProber {
    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ProbeError::Network {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        debug!(url, status = status.as_u16(), "Probe response");

        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(ProbeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}
