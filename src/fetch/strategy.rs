//! Fetch Strategy
//!
//! The caller-supplied operation that retrieves authoritative data.

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

// == Fetch Strategy ==
/// Retrieves data from its origin for the given call parameters.
///
/// Any `Fn(Vec<Value>) -> impl Future<Output = anyhow::Result<Value>>`
/// closure is a strategy.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    async fn fetch(&self, params: &[Value]) -> anyhow::Result<Value>;
}

#[async_trait]
impl<F, Fut> FetchStrategy for F
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    async fn fetch(&self, params: &[Value]) -> anyhow::Result<Value> {
        self(params.to_vec()).await
    }
}
