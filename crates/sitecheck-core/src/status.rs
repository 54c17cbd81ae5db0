use std::fmt;

use serde::{Serialize, Serializer};

use crate::prober::ProbeError;
use crate::sites::Site;

pub const UP_MARKER: &str = ":green_square:";
pub const DOWN_MARKER: &str = ":red_square:";

/// Up/down classification of a probed site. Serializes as its marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Up,
    Down,
}

impl Status {
    pub fn from_probe(result: &Result<(), ProbeError>) -> Self {
        match result {
            Ok(()) => Self::Up,
            Err(_) => Self::Down,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Up => UP_MARKER,
            Self::Down => DOWN_MARKER,
        }
    }

    pub fn is_up(self) -> bool {
        self == Self::Up
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.marker())
    }
}

/// Result of probing one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteStatus {
    pub name: String,
    pub url: String,
    pub status: Status,
}

impl SiteStatus {
    pub fn new(site: &Site, status: Status) -> Self {
        Self {
            name: site.name.clone(),
            url: site.url.clone(),
            status,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub up: usize,
    pub down: usize,
}

impl ReportSummary {
    pub fn from_statuses(statuses: &[SiteStatus]) -> Self {
        let up = statuses.iter().filter(|s| s.is_up()).count();
        Self {
            total: statuses.len(),
            up,
            down: statuses.len() - up,
        }
    }
}
