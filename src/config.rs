//! Session configuration and quota constants
//!
//! A [`CrawlConfig`] is immutable for the lifetime of one session. The lite
//! mode triggered by an operator signal never mutates the active config; it
//! derives a new value with a reduced depth budget via [`CrawlConfig::lite`].

/// Default error quota for a session
pub const DEFAULT_MAX_ERRORS: u32 = 100_000;

/// Default result quota for a session
pub const DEFAULT_MAX_RESULTS: u32 = 10_000;

/// Default depth budget for lite-mode sessions
pub const DEFAULT_LITE_DEPTH: u32 = 2;

/// Default cap on simultaneously in-flight visit tasks
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// Per-session crawl configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Maximum number of link hops from the seed that will still be expanded.
    /// Depth counts edges traversed, not nodes visited: an address reached at
    /// exactly `max_depth` hops is fetched and reported but not expanded.
    pub max_depth: u32,

    /// Maximum number of visit tasks allowed past the fetch gate at once
    pub max_in_flight: usize,
}

impl CrawlConfig {
    /// Creates a configuration with the given depth budget and the default
    /// in-flight cap
    pub fn new(max_depth: u32) -> Self {
        Self {
            max_depth,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Derives a lite configuration from this one
    ///
    /// The result is a new value whose depth budget is `lite_depth`, clamped
    /// so that a lite session never crawls deeper than the session it was
    /// derived from.
    pub fn lite(&self, lite_depth: u32) -> Self {
        Self {
            max_depth: lite_depth.min(self.max_depth),
            ..*self
        }
    }
}

/// Process-wide session quotas
///
/// Both counters are strictly decreasing and owned exclusively by the
/// aggregator; exhausting either one terminates the session.
#[derive(Debug, Clone, Copy)]
pub struct Quotas {
    /// Number of fetch failures tolerated before the session stops
    pub max_errors: u32,

    /// Number of successful results collected before the session stops
    pub max_results: u32,

    /// Depth budget used when deriving a lite-mode configuration
    pub lite_depth: u32,
}

impl Default for Quotas {
    fn default() -> Self {
        Self {
            max_errors: DEFAULT_MAX_ERRORS,
            max_results: DEFAULT_MAX_RESULTS,
            lite_depth: DEFAULT_LITE_DEPTH,
        }
    }
}
