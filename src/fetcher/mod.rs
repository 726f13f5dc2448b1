//! The Fetcher capability consumed by the crawl engine
//!
//! The engine core does not know how an address is resolved. Anything that
//! can turn an address into the set of outbound addresses discoverable from
//! it (or fail trying) implements [`Fetcher`]. Retrying, caching, politeness
//! and cycle detection are all the fetcher's concern, never the engine's.

mod http;

pub use http::{build_http_client, HttpFetcher};

use crate::FetchError;
use async_trait::async_trait;

/// Resolves one address to its outbound addresses
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Visits `address` and returns every outbound address discovered there
    ///
    /// # Returns
    ///
    /// * `Ok(children)` - The visit succeeded; `children` may be empty
    /// * `Err(FetchError)` - The visit failed; counted against the error quota
    async fn fetch(&self, address: &str) -> Result<Vec<String>, FetchError>;
}
