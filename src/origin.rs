//! Simulated Origin
//!
//! A stand-in upstream used by the demo server: it answers every request
//! after a fixed delay, so cache hits and misses are easy to tell apart.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::fetch::FetchStrategy;

// == Simulated Origin ==
/// Fetch strategy that echoes its parameters after `latency`.
///
/// A parameter equal to `"fail"` makes the fetch fail, which exercises the
/// failure path end to end.
#[derive(Debug, Default)]
pub struct SimulatedOrigin {
    latency: Duration,
    requests: AtomicU64,
}

impl SimulatedOrigin {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            requests: AtomicU64::new(0),
        }
    }

    /// Number of fetches served so far, failures included.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FetchStrategy for SimulatedOrigin {
    async fn fetch(&self, params: &[Value]) -> anyhow::Result<Value> {
        let request = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        tokio::time::sleep(self.latency).await;

        if params.iter().any(|p| p.as_str() == Some("fail")) {
            anyhow::bail!("origin unavailable");
        }

        Ok(json!({
            "params": params,
            "request": request,
            "fetched_at": Utc::now().to_rfc3339(),
        }))
    }
}
