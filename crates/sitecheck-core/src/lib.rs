#![forbid(unsafe_code)]

pub mod checker;
pub mod config;
pub mod error;
pub mod prober;
pub mod report;
pub mod sites;
pub mod status;

pub use checker::Checker;
pub use config::{ProbeConfig, DEFAULT_PROBE_TIMEOUT};
pub use error::SiteCheckError;
pub use prober::{HttpProber, ProbeError, SiteProber};
pub use report::{write_report, ReportContext, ReportRenderer};
pub use sites::{load_sites, Site, SitesFile};
pub use status::{ReportSummary, SiteStatus, Status, DOWN_MARKER, UP_MARKER};
