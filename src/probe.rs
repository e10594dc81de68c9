//! HTTP readiness probing.
//!
//! Reachability is the defining condition: any received response counts,
//! whatever the status code. Application-level health is the probed
//! service's own concern.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ProbeConfig;
use crate::error::ProbeError;

/// Polls an endpoint with a fixed attempt budget and inter-attempt delay.
pub struct Prober {
    client: reqwest::Client,
    max_attempts: u32,
    delay: Duration,
    timeout: Duration,
}

impl Prober {
    pub fn new(max_attempts: u32, delay: Duration, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            max_attempts,
            delay,
            timeout,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_secs(config.delay_secs),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Single reachability check.
    pub async fn check_once(&self, url: &str) -> bool {
        match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => {
                debug!(url, status = %response.status(), "endpoint responded");
                true
            }
            Err(error) => {
                debug!(url, %error, "endpoint not reachable");
                false
            }
        }
    }

    /// Poll `url` until it responds or the attempt budget is exhausted.
    ///
    /// Fixed delay between consecutive attempts, no backoff. Exhaustion is
    /// the caller's problem to treat as fatal.
    pub async fn wait_until_reachable(&self, url: &str) -> Result<(), ProbeError> {
        for attempt in 1..=self.max_attempts {
            if self.check_once(url).await {
                info!(url, attempt, "endpoint reachable");
                return Ok(());
            }

            warn!(
                url,
                attempt,
                max_attempts = self.max_attempts,
                "endpoint not ready"
            );

            if attempt < self.max_attempts {
                tokio::time::sleep(self.delay).await;
            }
        }

        Err(ProbeError::Exhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
        })
    }
}
