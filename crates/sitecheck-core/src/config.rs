use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default probe timeout. A site that has not answered within this window is down.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a probing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Client-side timeout for a single GET, covering connect and response.
    pub timeout: Duration,
    /// Number of probes allowed in flight at once. 1 probes strictly in order.
    pub max_concurrent_probes: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
            max_concurrent_probes: 1,
        }
    }
}

impl ProbeConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_secs(self, secs: u64) -> Self {
        self.with_timeout(Duration::from_secs(secs))
    }

    pub fn with_max_concurrent_probes(mut self, max: usize) -> Self {
        self.max_concurrent_probes = max.max(1);
        self
    }

    pub fn is_sequential(&self) -> bool {
        self.max_concurrent_probes <= 1
    }
}
