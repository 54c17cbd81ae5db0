use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::ProbeConfig;
use crate::prober::SiteProber;
use crate::sites::Site;
use crate::status::{ReportSummary, SiteStatus, Status};

/// Runs one probe per site and collects statuses in site order.
pub struct Checker {
    prober: Arc<dyn SiteProber>,
    config: ProbeConfig,
}

impl Checker {
    pub fn new(prober: Arc<dyn SiteProber>, config: ProbeConfig) -> Self {
        Self { prober, config }
    }

    pub async fn check_all(&self, sites: &[Site]) -> Vec<SiteStatus> {
        self.check_all_with(sites, |_| {}).await
    }

    /// Like [`check_all`](Self::check_all), calling `on_result` as each status
    /// becomes available. Callbacks arrive in site order.
    pub async fn check_all_with<F>(&self, sites: &[Site], on_result: F) -> Vec<SiteStatus>
    where
        F: FnMut(&SiteStatus),
    {
        let concurrency = self.config.max_concurrent_probes.max(1);
        info!(sites = sites.len(), concurrency, "Probing sites");

        // `buffered` yields in input order regardless of completion order.
        let statuses: Vec<SiteStatus> = stream::iter(sites)
            .map(|site| self.check_one(site))
            .buffered(concurrency)
            .inspect(on_result)
            .collect()
            .await;

        let summary = ReportSummary::from_statuses(&statuses);
        info!(
            total = summary.total,
            up = summary.up,
            down = summary.down,
            "Probing finished"
        );
        statuses
    }

    pub async fn check_one(&self, site: &Site) -> SiteStatus {
        let result = self.prober.probe(&site.url).await;
        if let Err(ref e) = result {
            warn!(name = %site.name, url = %site.url, reason = %e, "Site is down");
        } else {
            debug!(name = %site.name, url = %site.url, "Site is up");
        }
        SiteStatus::new(site, Status::from_probe(&result))
    }
}
